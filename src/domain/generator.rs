//! Signal generator: routes each bar to the buy rule when flat, or to the
//! ordered sell rules when positioned. At most one signal per bar; the
//! first sell rule to fire wins.

use crate::domain::error::LutraderError;
use crate::domain::signal::Signal;
use crate::domain::strategy::{BuyRule, RuleParams, SellRule, SignalContext, StrategyRegistry};

pub struct SignalGenerator {
    buy_rule: Box<dyn BuyRule>,
    sell_rules: Vec<Box<dyn SellRule>>,
}

impl SignalGenerator {
    /// Resolve configured rule names against the registry. Any unknown
    /// name fails construction, before a single bar is processed.
    pub fn from_config(
        registry: &StrategyRegistry,
        params: &RuleParams,
        buy_name: &str,
        sell_names: &[String],
    ) -> Result<Self, LutraderError> {
        let buy_rule = registry.buy_rule(buy_name, params)?;
        let sell_rules = sell_names
            .iter()
            .map(|name| registry.sell_rule(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SignalGenerator {
            buy_rule,
            sell_rules,
        })
    }

    pub fn check(&self, ctx: &SignalContext) -> Option<Signal> {
        match ctx.position {
            None => self.buy_rule.check_signal(ctx),
            Some(_) => self
                .sell_rules
                .iter()
                .find_map(|rule| rule.check_signal(ctx)),
        }
    }
}
