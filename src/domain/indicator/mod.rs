//! Indicator series feeding the inference core.
//!
//! The core consumes a materialized RSI value per bar. This module computes that
//! series from closes and lines it up with the bars it belongs to:
//! - `IndicatorPoint`: a single dated value with a warm-up flag
//! - `IndicatorSeries`: the per-bar series for one indicator
//! - `align_valid`: drops warm-up bars so bars and values pair one-to-one

pub mod rsi;

use chrono::NaiveDate;
use std::fmt;

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rsi(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

/// Bars whose indicator point is valid, paired with the point's value.
///
/// Points are matched to bars by position; a bar with no point is dropped.
pub fn align_valid(bars: &[OhlcvBar], series: &IndicatorSeries) -> (Vec<OhlcvBar>, Vec<f64>) {
    bars.iter()
        .zip(&series.values)
        .filter(|(bar, point)| point.valid && point.date == bar.date)
        .map(|(bar, point)| (bar.clone(), point.value))
        .unzip()
}
