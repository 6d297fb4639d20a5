//! Order execution port trait.

use crate::domain::position::Position;
use crate::domain::signal::Signal;
use crate::domain::stats::{FillNotice, TradeCloseNotice};

/// Notifications produced by submitting a signal, in execution order.
#[derive(Debug, Clone, Copy)]
pub enum BrokerEvent {
    Fill(FillNotice),
    TradeClosed(TradeCloseNotice),
}

pub trait BrokerPort {
    fn cash(&self) -> f64;

    fn position(&self) -> Option<&Position>;

    /// Execute a signal at its stated price. Returns the resulting events;
    /// an empty vector means the order could not be filled.
    fn submit(&mut self, signal: &Signal) -> Vec<BrokerEvent>;
}
