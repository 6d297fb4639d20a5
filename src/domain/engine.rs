//! Indicator engine: advances every indicator once per bar and records the
//! aligned per-bar series that strategy rules read through their context.

use crate::domain::indicator::double_line::DoubleLine;
use crate::domain::indicator::kdj::{Kdj, KdjPoint};
use crate::domain::indicator::sma::RollingSma;
use crate::domain::ohlcv::OhlcvBar;

pub const VOL_MA_SHORT: usize = 5;
pub const VOL_MA_MEDIUM: usize = 10;

/// Aligned indicator values for a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeSnapshot {
    pub trend_line: f64,
    pub duokong_line: f64,
    pub ma1: f64,
    pub kdj: Option<KdjPoint>,
    pub vol_ma5: Option<f64>,
    pub vol_ma10: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    double_line: DoubleLine,
    kdj: Kdj,
    vol_ma5: RollingSma,
    vol_ma10: RollingSma,

    bars: Vec<OhlcvBar>,
    trend_line: Vec<f64>,
    duokong_line: Vec<f64>,
    ma60: Vec<f64>,
    kdj_series: Vec<Option<KdjPoint>>,
    vol_ma5_series: Vec<Option<f64>>,
    vol_ma10_series: Vec<Option<f64>>,
}

impl IndicatorEngine {
    pub fn new() -> Self {
        IndicatorEngine {
            double_line: DoubleLine::new(),
            kdj: Kdj::standard(),
            vol_ma5: RollingSma::new(VOL_MA_SHORT),
            vol_ma10: RollingSma::new(VOL_MA_MEDIUM),
            bars: Vec::new(),
            trend_line: Vec::new(),
            duokong_line: Vec::new(),
            ma60: Vec::new(),
            kdj_series: Vec::new(),
            vol_ma5_series: Vec::new(),
            vol_ma10_series: Vec::new(),
        }
    }

    /// Ingest one bar, advancing every indicator exactly once, and return
    /// the aligned snapshot for that bar.
    pub fn update(&mut self, bar: OhlcvBar) -> CompositeSnapshot {
        let lines = self.double_line.update(bar.close);
        let kdj = self.kdj.update(bar.high, bar.low, bar.close);
        let volume = bar.volume as f64;
        let vol_ma5 = self.vol_ma5.update(volume);
        let vol_ma10 = self.vol_ma10.update(volume);

        self.trend_line.push(lines.trend_line);
        self.duokong_line.push(lines.duokong_line);
        self.ma60.push(lines.ma1);
        self.kdj_series.push(kdj);
        self.vol_ma5_series.push(vol_ma5);
        self.vol_ma10_series.push(vol_ma10);
        self.bars.push(bar);

        CompositeSnapshot {
            trend_line: lines.trend_line,
            duokong_line: lines.duokong_line,
            ma1: lines.ma1,
            kdj,
            vol_ma5,
            vol_ma10,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn trend_line(&self) -> &[f64] {
        &self.trend_line
    }

    pub fn duokong_line(&self) -> &[f64] {
        &self.duokong_line
    }

    pub fn ma60(&self) -> &[f64] {
        &self.ma60
    }

    pub fn kdj(&self) -> &[Option<KdjPoint>] {
        &self.kdj_series
    }

    pub fn vol_ma5(&self) -> &[Option<f64>] {
        &self.vol_ma5_series
    }

    pub fn vol_ma10(&self) -> &[Option<f64>] {
        &self.vol_ma10_series
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        IndicatorEngine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(i: usize, close: f64, volume: i64) -> OhlcvBar {
        OhlcvBar {
            code: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        }
    }

    #[test]
    fn series_stay_aligned_with_bars() {
        let mut engine = IndicatorEngine::new();
        for i in 0..20 {
            engine.update(make_bar(i, 100.0 + i as f64, 1_000 + i as i64));
        }
        assert_eq!(engine.len(), 20);
        assert_eq!(engine.trend_line().len(), 20);
        assert_eq!(engine.duokong_line().len(), 20);
        assert_eq!(engine.ma60().len(), 20);
        assert_eq!(engine.kdj().len(), 20);
        assert_eq!(engine.vol_ma5().len(), 20);
        assert_eq!(engine.vol_ma10().len(), 20);
    }

    #[test]
    fn kdj_warmup_is_undefined() {
        let mut engine = IndicatorEngine::new();
        for i in 0..8 {
            let snap = engine.update(make_bar(i, 100.0 + i as f64, 1_000));
            assert!(snap.kdj.is_none());
        }
        let snap = engine.update(make_bar(8, 110.0, 1_000));
        assert!(snap.kdj.is_some());
    }

    #[test]
    fn volume_ma_warmup_is_undefined() {
        let mut engine = IndicatorEngine::new();
        for i in 0..4 {
            let snap = engine.update(make_bar(i, 100.0, 2_000));
            assert!(snap.vol_ma5.is_none());
            assert!(snap.vol_ma10.is_none());
        }
        let snap = engine.update(make_bar(4, 100.0, 2_000));
        assert_eq!(snap.vol_ma5, Some(2_000.0));
        assert!(snap.vol_ma10.is_none());
    }

    #[test]
    fn snapshot_matches_recorded_series() {
        let mut engine = IndicatorEngine::new();
        let mut last = None;
        for i in 0..30 {
            last = Some(engine.update(make_bar(i, 50.0 + (i % 7) as f64, 500 + i as i64)));
        }
        let snap = last.unwrap();
        let i = engine.len() - 1;
        assert_eq!(snap.trend_line, engine.trend_line()[i]);
        assert_eq!(snap.duokong_line, engine.duokong_line()[i]);
        assert_eq!(snap.ma1, engine.ma60()[i]);
        assert_eq!(snap.kdj, engine.kdj()[i]);
        assert_eq!(snap.vol_ma5, engine.vol_ma5()[i]);
        assert_eq!(snap.vol_ma10, engine.vol_ma10()[i]);
    }
}
