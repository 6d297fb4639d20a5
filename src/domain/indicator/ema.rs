//! Exponential moving average, TDX style.
//!
//! alpha = 2/(period+1). The first observation seeds the average directly,
//! and a missing prior value reseeds the same way, so the line is defined
//! from bar one with no warm-up gap.

#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    last: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Ema {
            alpha: 2.0 / (period as f64 + 1.0),
            last: None,
        }
    }

    /// Advance one bar and return the updated average.
    pub fn update(&mut self, input: f64) -> f64 {
        let next = match self.last {
            Some(prev) if prev.is_finite() => self.alpha * input + (1.0 - self.alpha) * prev,
            _ => input,
        };
        self.last = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.last
    }
}
