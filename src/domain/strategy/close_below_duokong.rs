//! Stop rule: two consecutive closes below the duokong line exit the
//! whole position.

use std::collections::BTreeMap;

use crate::domain::signal::{Signal, SignalKind};
use crate::domain::strategy::{SellRule, SignalContext};

pub const NAME: &str = "close_below_duokong";

#[derive(Debug, Clone, Copy)]
pub struct CloseBelowDuokongRule;

impl SellRule for CloseBelowDuokongRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_signal(&self, ctx: &SignalContext) -> Option<Signal> {
        let position = ctx.position?;
        let i = ctx.index();
        if i < 1 {
            return None;
        }

        let below_yesterday = ctx.bars[i - 1].close < ctx.duokong_line[i - 1];
        let below_today = ctx.bars[i].close < ctx.duokong_line[i];
        if !(below_yesterday && below_today) {
            return None;
        }

        let bar = ctx.bar();
        let mut conditions = BTreeMap::new();
        conditions.insert("close_below_duokong_yesterday", below_yesterday);
        conditions.insert("close_below_duokong_today", below_today);

        let mut metrics = BTreeMap::new();
        metrics.insert("duokong_line", ctx.duokong_line[i]);

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
