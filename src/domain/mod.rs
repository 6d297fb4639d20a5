//! Core domain types and logic.

pub mod ohlcv;
pub mod position;
pub mod slope;
pub mod indicator;
pub mod engine;
pub mod signal;
pub mod strategy;
pub mod generator;
pub mod stats;
pub mod backtest;
pub mod batch;
pub mod error;
