//! Simple moving averages over a trailing buffer.
//!
//! Two flavours: [`AdaptiveSma`] averages over min(elapsed, period) values
//! so it is defined from the first bar (TDX warm-up semantics), while
//! [`RollingSma`] is the conventional SMA that stays undefined until a full
//! period of history exists. Price lines use the former, volume moving
//! averages the latter.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct AdaptiveSma {
    period: usize,
    window: VecDeque<f64>,
}

impl AdaptiveSma {
    pub fn new(period: usize) -> Self {
        AdaptiveSma {
            period,
            window: VecDeque::with_capacity(period),
        }
    }

    /// Advance one bar and return the mean of the last min(elapsed, period)
    /// inputs.
    pub fn update(&mut self, input: f64) -> f64 {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(input);
        let sum: f64 = self.window.iter().sum();
        sum / self.window.len() as f64
    }
}

#[derive(Debug, Clone)]
pub struct RollingSma {
    period: usize,
    window: VecDeque<f64>,
}

impl RollingSma {
    pub fn new(period: usize) -> Self {
        RollingSma {
            period,
            window: VecDeque::with_capacity(period),
        }
    }

    /// Advance one bar; `None` until a full period of inputs has been seen.
    pub fn update(&mut self, input: f64) -> Option<f64> {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(input);
        if self.window.len() < self.period {
            return None;
        }
        let sum: f64 = self.window.iter().sum();
        Some(sum / self.period as f64)
    }
}
