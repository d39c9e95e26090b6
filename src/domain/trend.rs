//! Single-bar trend classification.
//!
//! `threshold = threshold_pct * open` (default 2%):
//! - Bullish (+1): `close > open` and `high - close > threshold`
//! - Bearish (-1): `close < open` and `close - low > threshold`
//! - Neutral (0): otherwise
//!
//! Both comparisons are strict. A zero or negative open gives a zero or negative
//! threshold and the rules are applied as written.

use std::fmt;

use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_THRESHOLD_PCT: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    /// Crisp input for the `market_trend` variable.
    pub fn magnitude(self) -> f64 {
        match self {
            Trend::Bullish => 1.0,
            Trend::Bearish => -1.0,
            Trend::Neutral => 0.0,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "Bullish"),
            Trend::Bearish => write!(f, "Bearish"),
            Trend::Neutral => write!(f, "Neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendClassifier {
    pub threshold_pct: f64,
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self {
            threshold_pct: DEFAULT_THRESHOLD_PCT,
        }
    }
}

impl TrendClassifier {
    pub fn new(threshold_pct: f64) -> Self {
        Self { threshold_pct }
    }

    pub fn classify(&self, open: f64, high: f64, low: f64, close: f64) -> Trend {
        let threshold = self.threshold_pct * open;
        if close > open && (high - close) > threshold {
            Trend::Bullish
        } else if close < open && (close - low) > threshold {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }

    pub fn classify_bar(&self, bar: &OhlcvBar) -> Trend {
        self.classify(bar.open, bar.high, bar.low, bar.close)
    }
}
