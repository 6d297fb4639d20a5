//! KDJ stochastic oscillator.
//!
//! RSV over a rolling high/low window, smoothed into K and D with the
//! TDX recursion K = (rsv + (m-1)*K_prev)/m. The lines are undefined until
//! a full RSV period has elapsed; the first qualifying bar seeds K = D = RSV.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdjPoint {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

#[derive(Debug, Clone)]
pub struct Kdj {
    period: usize,
    period_k: usize,
    period_d: usize,
    lows: VecDeque<f64>,
    highs: VecDeque<f64>,
    elapsed: usize,
    prev: Option<(f64, f64)>,
}

impl Kdj {
    pub fn new(period: usize, period_k: usize, period_d: usize) -> Self {
        Kdj {
            period,
            period_k,
            period_d,
            lows: VecDeque::with_capacity(period),
            highs: VecDeque::with_capacity(period),
            elapsed: 0,
            prev: None,
        }
    }

    /// Conventional 9/3/3 parametrisation.
    pub fn standard() -> Self {
        Kdj::new(9, 3, 3)
    }

    /// Advance one bar; `None` until `period` bars have elapsed.
    pub fn update(&mut self, high: f64, low: f64, close: f64) -> Option<KdjPoint> {
        if self.lows.len() == self.period {
            self.lows.pop_front();
            self.highs.pop_front();
        }
        self.lows.push_back(low);
        self.highs.push_back(high);
        self.elapsed += 1;

        if self.elapsed < self.period {
            return None;
        }

        let low_n = self.lows.iter().cloned().fold(f64::INFINITY, f64::min);
        let high_n = self.highs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        // Division guard: a flat window pins RSV to the midpoint.
        let rsv = if high_n == low_n {
            50.0
        } else {
            (close - low_n) / (high_n - low_n) * 100.0
        };

        let (k, d) = match self.prev {
            None => (rsv, rsv),
            Some((k_prev, d_prev)) => {
                let k = (rsv + (self.period_k as f64 - 1.0) * k_prev) / self.period_k as f64;
                let d = (k + (self.period_d as f64 - 1.0) * d_prev) / self.period_d as f64;
                (k, d)
            }
        };
        self.prev = Some((k, d));

        Some(KdjPoint {
            k,
            d,
            j: 3.0 * k - 2.0 * d,
        })
    }
}
