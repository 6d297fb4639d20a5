//! Simulated broker: fills every order at the signal's price, charges a
//! proportional commission on both sides, and reports the round-trip
//! result when a position returns to zero.

use crate::domain::position::Position;
use crate::domain::signal::{Signal, SignalKind};
use crate::domain::stats::{FillDirection, FillNotice, TradeCloseNotice};
use crate::ports::broker_port::{BrokerEvent, BrokerPort};

pub struct SimBroker {
    cash: f64,
    commission_rate: f64,
    position: Option<Position>,

    // round-trip accumulators for the open trade
    trade_entry_cost: f64,
    trade_proceeds: f64,
    trade_commission: f64,
}

impl SimBroker {
    pub fn new(initial_cash: f64, commission_rate: f64) -> Self {
        SimBroker {
            cash: initial_cash,
            commission_rate,
            position: None,
            trade_entry_cost: 0.0,
            trade_proceeds: 0.0,
            trade_commission: 0.0,
        }
    }

    fn fill_buy(&mut self, signal: &Signal) -> Vec<BrokerEvent> {
        if self.position.is_some() || signal.size <= 0 {
            return Vec::new();
        }
        let cost = signal.price * signal.size as f64;
        let commission = cost * self.commission_rate;
        if cost + commission > self.cash {
            return Vec::new();
        }

        self.cash -= cost + commission;
        self.position = Some(Position {
            size: signal.size,
            entry_price: signal.price,
            entry_date: signal.date,
        });
        self.trade_entry_cost = cost;
        self.trade_proceeds = 0.0;
        self.trade_commission = commission;

        vec![BrokerEvent::Fill(FillNotice {
            direction: FillDirection::Buy,
            price: signal.price,
            size: signal.size,
            commission,
            date: signal.date,
        })]
    }

    fn fill_sell(&mut self, signal: &Signal) -> Vec<BrokerEvent> {
        let Some(position) = self.position.as_mut() else {
            return Vec::new();
        };
        let size = signal.size.min(position.size);
        if size <= 0 {
            return Vec::new();
        }

        let proceeds = signal.price * size as f64;
        let commission = proceeds * self.commission_rate;
        self.cash += proceeds - commission;
        position.size -= size;
        self.trade_proceeds += proceeds;
        self.trade_commission += commission;

        let mut events = vec![BrokerEvent::Fill(FillNotice {
            direction: FillDirection::Sell,
            price: signal.price,
            size,
            commission,
            date: signal.date,
        })];

        if position.size == 0 {
            self.position = None;
            events.push(BrokerEvent::TradeClosed(TradeCloseNotice {
                pnl_net: self.trade_proceeds - self.trade_entry_cost - self.trade_commission,
            }));
        }

        events
    }
}

impl BrokerPort for SimBroker {
    fn cash(&self) -> f64 {
        self.cash
    }

    fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    fn submit(&mut self, signal: &Signal) -> Vec<BrokerEvent> {
        match signal.kind {
            SignalKind::Buy => self.fill_buy(signal),
            SignalKind::SellFull | SignalKind::SellHalf => self.fill_sell(signal),
        }
    }
}
