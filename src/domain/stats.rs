//! Per-run trade statistics, fed by broker fill and trade-close notices.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillDirection {
    Buy,
    Sell,
}

/// One executed fill.
#[derive(Debug, Clone, Copy)]
pub struct FillNotice {
    pub direction: FillDirection,
    pub price: f64,
    pub size: i64,
    pub commission: f64,
    pub date: NaiveDate,
}

/// Emitted when a position round-trips back to zero.
#[derive(Debug, Clone, Copy)]
pub struct TradeCloseNotice {
    /// Realized profit net of all commissions on the round trip.
    pub pnl_net: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub total_profit: f64,
    pub total_loss: f64,
    pub profit_loss_ratio: f64,
    pub total_commission: f64,
    pub buy_dates: Vec<NaiveDate>,
}

/// Accumulates closed-trade outcomes across one symbol's run.
///
/// Commission is staged per open trade and only folded into the total when
/// the trade closes; a still-open trade at run end contributes its entry
/// date but not its commission.
#[derive(Debug, Clone, Default)]
pub struct TradeStats {
    total_trades: usize,
    winning_trades: usize,
    losing_trades: usize,
    total_profit: f64,
    total_loss: f64,
    total_commission: f64,
    buy_dates: Vec<NaiveDate>,

    current_trade_commission: f64,
    open_entry_date: Option<NaiveDate>,
}

impl TradeStats {
    pub fn new() -> Self {
        TradeStats::default()
    }

    pub fn on_fill(&mut self, fill: &FillNotice) {
        match fill.direction {
            FillDirection::Buy => {
                self.current_trade_commission = fill.commission;
                self.open_entry_date = Some(fill.date);
            }
            FillDirection::Sell => {
                self.current_trade_commission += fill.commission;
            }
        }
    }

    pub fn on_trade_closed(&mut self, notice: &TradeCloseNotice) {
        self.total_commission += self.current_trade_commission;
        self.current_trade_commission = 0.0;
        if let Some(date) = self.open_entry_date.take() {
            self.buy_dates.push(date);
        }

        self.total_trades += 1;
        if notice.pnl_net > 0.0 {
            self.winning_trades += 1;
            self.total_profit += notice.pnl_net;
        } else {
            self.losing_trades += 1;
            self.total_loss += -notice.pnl_net;
        }
    }

    /// Fold a still-open position's entry date into the ledger at run end.
    pub fn record_open_entry(&mut self) {
        if let Some(date) = self.open_entry_date.take() {
            self.buy_dates.push(date);
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_trades == 0 {
            0.0
        } else {
            self.winning_trades as f64 / self.total_trades as f64 * 100.0
        }
    }

    pub fn profit_loss_ratio(&self) -> f64 {
        if self.total_trades == 0 {
            0.0
        } else if self.total_loss == 0.0 {
            f64::INFINITY
        } else {
            self.total_profit / self.total_loss
        }
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            total_trades: self.total_trades,
            winning_trades: self.winning_trades,
            losing_trades: self.losing_trades,
            win_rate: self.win_rate(),
            total_profit: self.total_profit,
            total_loss: self.total_loss,
            profit_loss_ratio: self.profit_loss_ratio(),
            total_commission: self.total_commission,
            buy_dates: self.buy_dates.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn buy(day: u32, commission: f64) -> FillNotice {
        FillNotice {
            direction: FillDirection::Buy,
            price: 10.0,
            size: 1_000,
            commission,
            date: date(day),
        }
    }

    fn sell(day: u32, commission: f64) -> FillNotice {
        FillNotice {
            direction: FillDirection::Sell,
            price: 11.0,
            size: 1_000,
            commission,
            date: date(day),
        }
    }

    #[test]
    fn empty_run_has_zero_rates() {
        let stats = TradeStats::new();
        let summary = stats.summary();
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.profit_loss_ratio, 0.0);
        assert!(summary.buy_dates.is_empty());
    }

    #[test]
    fn round_trip_accumulates_commission_and_outcome() {
        let mut stats = TradeStats::new();
        stats.on_fill(&buy(1, 2.0));
        stats.on_fill(&sell(5, 2.2));
        stats.on_trade_closed(&TradeCloseNotice { pnl_net: 995.8 });

        let summary = stats.summary();
        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.winning_trades, 1);
        assert_eq!(summary.win_rate, 100.0);
        assert_relative_eq!(summary.total_commission, 4.2);
        assert_eq!(summary.buy_dates, vec![date(1)]);
        assert!(summary.profit_loss_ratio.is_infinite());
    }

    #[test]
    fn losing_trade_counts_positive_loss() {
        let mut stats = TradeStats::new();
        stats.on_fill(&buy(1, 2.0));
        stats.on_fill(&sell(3, 1.8));
        stats.on_trade_closed(&TradeCloseNotice { pnl_net: -503.8 });

        let summary = stats.summary();
        assert_eq!(summary.losing_trades, 1);
        assert_relative_eq!(summary.total_loss, 503.8);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.profit_loss_ratio, 0.0);
    }

    #[test]
    fn zero_pnl_trade_is_a_loss() {
        let mut stats = TradeStats::new();
        stats.on_fill(&buy(1, 0.0));
        stats.on_fill(&sell(2, 0.0));
        stats.on_trade_closed(&TradeCloseNotice { pnl_net: 0.0 });
        assert_eq!(stats.summary().losing_trades, 1);
    }

    #[test]
    fn partial_sells_stage_commission_until_close() {
        let mut stats = TradeStats::new();
        stats.on_fill(&buy(1, 2.0));
        stats.on_fill(&sell(3, 1.0));
        // trade still open, nothing folded in yet
        assert_eq!(stats.summary().total_commission, 0.0);
        stats.on_fill(&sell(4, 1.0));
        stats.on_trade_closed(&TradeCloseNotice { pnl_net: 100.0 });
        assert_relative_eq!(stats.summary().total_commission, 4.0);
    }

    #[test]
    fn mixed_trades_compute_ratio() {
        let mut stats = TradeStats::new();
        stats.on_fill(&buy(1, 1.0));
        stats.on_fill(&sell(2, 1.0));
        stats.on_trade_closed(&TradeCloseNotice { pnl_net: 300.0 });
        stats.on_fill(&buy(3, 1.0));
        stats.on_fill(&sell(4, 1.0));
        stats.on_trade_closed(&TradeCloseNotice { pnl_net: -150.0 });

        let summary = stats.summary();
        assert_eq!(summary.total_trades, 2);
        assert_relative_eq!(summary.win_rate, 50.0);
        assert_relative_eq!(summary.profit_loss_ratio, 2.0);
        assert_eq!(summary.buy_dates, vec![date(1), date(3)]);
    }

    #[test]
    fn open_position_at_run_end_keeps_its_buy_date() {
        let mut stats = TradeStats::new();
        stats.on_fill(&buy(7, 2.0));
        stats.record_open_entry();

        let summary = stats.summary();
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.total_commission, 0.0);
        assert_eq!(summary.buy_dates, vec![date(7)]);
    }
}
