//! Double-line composite indicator.
//!
//! Three lines derived from the close:
//! - trend line: EMA(EMA(close, 10), 10), double-smoothed
//! - duokong line: (MA14 + MA28 + MA57 + MA114) / 4, adaptive warm-up
//! - ma1: standalone MA60

use crate::domain::indicator::ema::Ema;
use crate::domain::indicator::sma::AdaptiveSma;

pub const EMA_PERIOD: usize = 10;
pub const DUOKONG_PERIODS: [usize; 4] = [14, 28, 57, 114];
pub const MA60_PERIOD: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleLinePoint {
    pub trend_line: f64,
    pub duokong_line: f64,
    pub ma1: f64,
}

#[derive(Debug, Clone)]
pub struct DoubleLine {
    ema_inner: Ema,
    ema_outer: Ema,
    duokong_mas: [AdaptiveSma; 4],
    ma60: AdaptiveSma,
}

impl DoubleLine {
    pub fn new() -> Self {
        DoubleLine {
            ema_inner: Ema::new(EMA_PERIOD),
            ema_outer: Ema::new(EMA_PERIOD),
            duokong_mas: DUOKONG_PERIODS.map(AdaptiveSma::new),
            ma60: AdaptiveSma::new(MA60_PERIOD),
        }
    }

    /// Advance one bar. All three lines are defined from the first bar
    /// because both primitives self-seed during warm-up.
    pub fn update(&mut self, close: f64) -> DoubleLinePoint {
        let inner = self.ema_inner.update(close);
        let trend_line = self.ema_outer.update(inner);

        let duokong_line = self
            .duokong_mas
            .iter_mut()
            .map(|ma| ma.update(close))
            .sum::<f64>()
            / 4.0;

        DoubleLinePoint {
            trend_line,
            duokong_line,
            ma1: self.ma60.update(close),
        }
    }
}

impl Default for DoubleLine {
    fn default() -> Self {
        DoubleLine::new()
    }
}
