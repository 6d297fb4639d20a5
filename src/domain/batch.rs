//! Batch orchestration: scan many symbols over a fixed worker pool.
//!
//! Workers pull symbol indices from a shared atomic cursor, so an
//! expensive symbol never stalls the rest of its worker's share. One
//! symbol's failure is recorded in its own outcome and leaves every
//! sibling untouched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use chrono::NaiveDate;

use crate::domain::backtest::{run_scan, RunConfig, RunResult};
use crate::domain::error::LutraderError;
use crate::ports::broker_port::BrokerPort;
use crate::ports::data_port::DataPort;

pub struct BatchItem {
    pub code: String,
    pub outcome: Result<RunResult, LutraderError>,
}

pub fn run_batch<F>(
    data_port: &(dyn DataPort + Sync),
    codes: &[String],
    config: &RunConfig,
    start_date: NaiveDate,
    end_date: NaiveDate,
    workers: usize,
    broker_factory: F,
) -> Vec<BatchItem>
where
    F: Fn() -> Box<dyn BrokerPort> + Sync,
{
    let workers = workers.max(1).min(codes.len().max(1));
    let cursor = AtomicUsize::new(0);
    let results = Mutex::new(Vec::with_capacity(codes.len()));

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(code) = codes.get(index) else {
                    break;
                };

                let outcome = data_port
                    .fetch_ohlcv(code, start_date, end_date)
                    .and_then(|bars| {
                        let mut broker = broker_factory();
                        run_scan(code, &bars, config, broker.as_mut())
                    });

                let mut guard = results.lock().unwrap_or_else(|p| p.into_inner());
                guard.push(BatchItem {
                    code: code.clone(),
                    outcome,
                });
            });
        }
    });

    let mut items = results.into_inner().unwrap_or_else(|p| p.into_inner());
    items.sort_by(|a, b| a.code.cmp(&b.code));
    items
}
