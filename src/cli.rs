//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::sim_broker::SimBroker;
use crate::domain::backtest::{run_scan, RunConfig, RunResult, DEFAULT_INITIAL_CASH};
use crate::domain::batch::run_batch;
use crate::domain::error::LutraderError;
use crate::domain::generator::SignalGenerator;
use crate::domain::strategy::StrategyRegistry;
use crate::ports::broker_port::BrokerPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "lutrader", about = "Incremental indicator engine and signal scanner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a single symbol for signals
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        /// Symbol override; defaults to the configured code
        #[arg(long)]
        code: Option<String>,
    },
    /// Scan every configured symbol over a worker pool
    Batch {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration without touching any data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan { config, code } => run_scan_command(&config, code.as_deref()),
        Command::Batch { config } => run_batch_command(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Everything the CLI reads out of an INI file.
#[derive(Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub workers: usize,
    pub run: RunConfig,
}

fn required_date(adapter: &dyn ConfigPort, key: &str) -> Result<NaiveDate, LutraderError> {
    let raw = adapter
        .get_string("backtest", key)
        .ok_or_else(|| LutraderError::ConfigMissing {
            section: "backtest".into(),
            key: key.into(),
        })?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| LutraderError::ConfigInvalid {
        section: "backtest".into(),
        key: key.into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

fn optional_date(adapter: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, LutraderError> {
    match adapter.get_string("backtest", key) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| LutraderError::ConfigInvalid {
                section: "backtest".into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }),
    }
}

pub fn build_app_config(adapter: &dyn ConfigPort) -> Result<AppConfig, LutraderError> {
    let data_dir = adapter
        .get_string("backtest", "data_dir")
        .ok_or_else(|| LutraderError::ConfigMissing {
            section: "backtest".into(),
            key: "data_dir".into(),
        })?;

    let start_date = required_date(adapter, "start")?;
    let end_date = required_date(adapter, "end")?;

    let defaults = RunConfig::default();
    let run = RunConfig {
        lookback_n: adapter.get_int("backtest", "lookback_n", defaults.lookback_n as i64) as usize,
        ma60_slope_days: adapter.get_int(
            "backtest",
            "ma60_slope_days",
            defaults.ma60_slope_days as i64,
        ) as usize,
        commission_rate: adapter.get_double(
            "backtest",
            "commission_rate",
            defaults.commission_rate,
        ),
        initial_cash: adapter.get_double("backtest", "initial_cash", DEFAULT_INITIAL_CASH),
        execute_start: optional_date(adapter, "execute_start")?,
        execute_end: optional_date(adapter, "execute_end")?,
        buy_rule: adapter
            .get_string("strategy", "buy")
            .unwrap_or(defaults.buy_rule),
        sell_rules: match adapter.get_string("strategy", "sells") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.sell_rules,
        },
    };

    Ok(AppConfig {
        data_dir: PathBuf::from(data_dir),
        start_date,
        end_date,
        workers: adapter.get_int("backtest", "workers", 4).max(1) as usize,
        run,
    })
}

pub fn resolve_codes(code_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(c) = code_override {
        return vec![c.to_string()];
    }

    if let Some(codes_str) = config.get_string("backtest", "codes") {
        return codes_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(code) = config.get_string("backtest", "code") {
        let code = code.trim().to_string();
        if !code.is_empty() {
            return vec![code];
        }
    }

    vec![]
}

fn print_result(code: &str, result: &RunResult) {
    for signal in &result.signals {
        println!(
            "{} {} {:?} {} price={:.2} size={}",
            code, signal.date, signal.kind, signal.strategy_name, signal.price, signal.size
        );
    }

    let stats = &result.stats;
    eprintln!("\n=== {} ===", code);
    eprintln!("Signals:          {}", result.signals.len());
    eprintln!(
        "Closed Trades:    {} ({} won, {} lost)",
        stats.total_trades, stats.winning_trades, stats.losing_trades
    );
    eprintln!("Win Rate:         {:.1}%", stats.win_rate);
    eprintln!("Total Profit:     {:.2}", stats.total_profit);
    eprintln!("Total Loss:       {:.2}", stats.total_loss);
    eprintln!("P/L Ratio:        {:.2}", stats.profit_loss_ratio);
    eprintln!("Commission:       {:.2}", stats.total_commission);
    eprintln!("Final Cash:       {:.2}", result.final_cash);
    if let Some(position) = &result.open_position {
        eprintln!(
            "Open Position:    {} @ {:.2} since {}",
            position.size, position.entry_price, position.entry_date
        );
    }
    if !stats.buy_dates.is_empty() {
        let dates: Vec<String> = stats.buy_dates.iter().map(|d| d.to_string()).collect();
        eprintln!("Buy Dates:        {}", dates.join(", "));
    }
}

fn run_scan_command(config_path: &PathBuf, code_override: Option<&str>) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let app = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: Resolve the symbol
    let codes = resolve_codes(code_override, &adapter);
    let Some(code) = codes.first() else {
        eprintln!("error: no code configured (use --code or set [backtest] code)");
        return ExitCode::from(2);
    };

    // Stage 3: Fetch bars
    eprintln!(
        "Scanning {} from {} to {}",
        code, app.start_date, app.end_date
    );
    let data_port = CsvAdapter::new(app.data_dir.clone());
    let bars = match data_port.fetch_ohlcv(code, app.start_date, app.end_date) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Run and report
    let mut broker = SimBroker::new(app.run.initial_cash, app.run.commission_rate);
    match run_scan(code, &bars, &app.run, &mut broker) {
        Ok(result) => {
            print_result(code, &result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_batch_command(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let app = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(app.data_dir.clone());
    let codes = resolve_codes(None, &adapter);
    let codes = if codes.is_empty() {
        match data_port.list_symbols() {
            Ok(symbols) => symbols,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    } else {
        codes
    };
    if codes.is_empty() {
        eprintln!("error: no symbols to scan");
        return ExitCode::from(2);
    }

    eprintln!(
        "Scanning {} symbols with {} workers, {} to {}",
        codes.len(),
        app.workers,
        app.start_date,
        app.end_date
    );

    let initial_cash = app.run.initial_cash;
    let commission_rate = app.run.commission_rate;
    let items = run_batch(
        &data_port,
        &codes,
        &app.run,
        app.start_date,
        app.end_date,
        app.workers,
        move || Box::new(SimBroker::new(initial_cash, commission_rate)) as Box<dyn BrokerPort>,
    );

    let mut failures = 0usize;
    let mut with_signals = 0usize;
    for item in &items {
        match &item.outcome {
            Ok(result) => {
                if !result.signals.is_empty() {
                    with_signals += 1;
                    print_result(&item.code, result);
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("warning: {} failed: {}", item.code, e);
            }
        }
    }

    eprintln!("\n=== Batch Summary ===");
    eprintln!("Symbols:          {}", items.len());
    eprintln!("With Signals:     {}", with_signals);
    eprintln!("Failed:           {}", failures);
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let app = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(app.data_dir);
    match data_port.list_symbols() {
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            eprintln!("{} symbols found", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let app = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if app.end_date < app.start_date {
        let e = LutraderError::ConfigInvalid {
            section: "backtest".into(),
            key: "end".into(),
            reason: "end date precedes start date".into(),
        };
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Resolving rule names against the registry catches typos here rather
    // than mid-run.
    let registry = StrategyRegistry::with_builtins();
    if let Err(e) = SignalGenerator::from_config(
        &registry,
        &app.run.rule_params(),
        &app.run.buy_rule,
        &app.run.sell_rules,
    ) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("\nBuy rule:   {}", app.run.buy_rule);
    eprintln!("Sell rules: {}", app.run.sell_rules.join(", "));
    eprintln!("Data dir:   {}", app.data_dir.display());
    eprintln!("Window:     {} to {}", app.start_date, app.end_date);
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
