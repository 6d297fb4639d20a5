//! Standard top windmill: a bearish candle with long shadows on a volume
//! blow-off while the oscillator is stretched. Exits the whole position.
//!
//! The J threshold is 50 here; an earlier write-up quoted 70, but 50 is the
//! evaluated value and suspected_top_windmill covers the >70 regime.

use std::collections::BTreeMap;

use crate::domain::signal::{Signal, SignalKind};
use crate::domain::strategy::{SellRule, SignalContext};

pub const NAME: &str = "standard_top_windmill";

const UPPER_SHADOW_MIN: f64 = 0.015;
const LOWER_SHADOW_MIN: f64 = 0.005;
const VOL_MA10_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Copy)]
pub struct StandardTopWindmillRule;

impl SellRule for StandardTopWindmillRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_signal(&self, ctx: &SignalContext) -> Option<Signal> {
        let position = ctx.position?;
        let i = ctx.index();
        let bar = ctx.bar();
        let volume = bar.volume as f64;
        let kdj_j = ctx.kdj_today().map(|p| p.j);

        let is_bearish = bar.close < bar.open;
        let upper_shadow = (bar.high - bar.open) / bar.close >= UPPER_SHADOW_MIN;
        let lower_shadow = (bar.close - bar.low) / bar.close >= LOWER_SHADOW_MIN;
        let volume_vs_ma10 = ctx.vol_ma10[i].is_some_and(|ma| volume >= VOL_MA10_FACTOR * ma);
        let recent_max = ctx.bars[i.saturating_sub(2)..=i]
            .iter()
            .map(|b| b.volume)
            .max()
            .unwrap_or(bar.volume);
        let volume_is_recent_max = bar.volume == recent_max;
        let volume_vs_ma5 = ctx.vol_ma5[i].is_some_and(|ma| volume >= ma);
        let j_stretched = kdj_j.is_some_and(|j| j > 50.0);

        if !(is_bearish
            && upper_shadow
            && lower_shadow
            && volume_vs_ma10
            && volume_is_recent_max
            && volume_vs_ma5
            && j_stretched)
        {
            return None;
        }

        let mut conditions = BTreeMap::new();
        conditions.insert("is_bearish", is_bearish);
        conditions.insert("upper_shadow_ge_1.5pct", upper_shadow);
        conditions.insert("lower_shadow_ge_0.5pct", lower_shadow);
        conditions.insert("volume_ge_120pct_ma10", volume_vs_ma10);
        conditions.insert("volume_is_max_3days", volume_is_recent_max);
        conditions.insert("volume_ge_ma5", volume_vs_ma5);
        conditions.insert("kdj_j_gt_50", j_stretched);

        let mut metrics = BTreeMap::new();
        metrics.insert("duokong_line", ctx.duokong_line[i]);
        metrics.insert("volume", volume);
        metrics.insert("volume_ma10", ctx.vol_ma10[i].unwrap_or(f64::NAN));
        metrics.insert("kdj_j", kdj_j.unwrap_or(f64::NAN));

        Some(Signal {
            kind: SignalKind::SellFull,
            strategy_name: NAME,
            price: bar.close,
            size: position.size,
            date: bar.date,
            conditions,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::testutil::ContextFixture;

    /// Blow-off candle on which every windmill condition holds.
    fn windmill_fixture() -> ContextFixture {
        let mut fx = ContextFixture::new(10).with_position(800);
        let i = fx.bars.len() - 1;
        fx.set_j(i, 60.0);
        let bar = &mut fx.bars[i];
        bar.open = 102.0;
        bar.high = 104.0; // upper shadow (104-102)/100 = 2%
        bar.low = 99.0; //   lower shadow (100-99)/100 = 1%
        bar.close = 100.0;
        bar.volume = 2_000; // 2x both volume MAs, max of last 3
        fx
    }

    #[test]
    fn fires_on_blowoff_candle() {
        let fx = windmill_fixture();
        let signal = StandardTopWindmillRule.check_signal(&fx.ctx()).unwrap();
        assert_eq!(signal.kind, SignalKind::SellFull);
        assert_eq!(signal.size, 800);
        assert_eq!(signal.conditions["kdj_j_gt_50"], true);
    }

    #[test]
    fn j_just_above_50_qualifies() {
        let mut fx = windmill_fixture();
        let i = fx.bars.len() - 1;
        fx.set_j(i, 50.1);
        assert!(StandardTopWindmillRule.check_signal(&fx.ctx()).is_some());
    }

    #[test]
    fn rejects_bullish_candle() {
        let mut fx = windmill_fixture();
        let i = fx.bars.len() - 1;
        fx.bars[i].close = 103.0;
        assert!(StandardTopWindmillRule.check_signal(&fx.ctx()).is_none());
    }

    #[test]
    fn rejects_short_upper_shadow() {
        let mut fx = windmill_fixture();
        let i = fx.bars.len() - 1;
        fx.bars[i].high = 103.0; // (103-102)/100 = 1% < 1.5%
        assert!(StandardTopWindmillRule.check_signal(&fx.ctx()).is_none());
    }

    #[test]
    fn rejects_short_lower_shadow() {
        let mut fx = windmill_fixture();
        let i = fx.bars.len() - 1;
        fx.bars[i].low = 99.8; // 0.2% < 0.5%
        assert!(StandardTopWindmillRule.check_signal(&fx.ctx()).is_none());
    }

    #[test]
    fn rejects_when_volume_below_120pct_ma10() {
        let mut fx = windmill_fixture();
        let i = fx.bars.len() - 1;
        fx.bars[i].volume = 1_100;
        assert!(StandardTopWindmillRule.check_signal(&fx.ctx()).is_none());
    }

    #[test]
    fn rejects_when_yesterday_had_more_volume() {
        let mut fx = windmill_fixture();
        let i = fx.bars.len() - 1;
        fx.bars[i - 1].volume = 3_000;
        assert!(StandardTopWindmillRule.check_signal(&fx.ctx()).is_none());
    }

    #[test]
    fn rejects_when_volume_ma_undefined() {
        let mut fx = windmill_fixture();
        let i = fx.bars.len() - 1;
        fx.vol_ma10[i] = None;
        assert!(StandardTopWindmillRule.check_signal(&fx.ctx()).is_none());
    }

    #[test]
    fn rejects_low_j() {
        let mut fx = windmill_fixture();
        let i = fx.bars.len() - 1;
        fx.set_j(i, 40.0);
        assert!(StandardTopWindmillRule.check_signal(&fx.ctx()).is_none());
    }

    #[test]
    fn flat_book_never_sells() {
        let mut fx = windmill_fixture();
        fx.position = None;
        assert!(StandardTopWindmillRule.check_signal(&fx.ctx()).is_none());
    }
}
