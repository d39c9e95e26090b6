//! Categorical decisions and the per-bar Decision Record.

use std::fmt;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::domain::error::SignalError;
use crate::domain::ohlcv::{format_date, OhlcvBar};

pub const DEFAULT_SELL_BELOW: f64 = 45.0;
pub const DEFAULT_BUY_AT_OR_ABOVE: f64 = 65.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Decision {
    Sell,
    Hold,
    Buy,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Sell => "Sell",
            Decision::Hold => "Hold",
            Decision::Buy => "Buy",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `strength < sell_below` sells, `strength >= buy_at_or_above` buys, anything between holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionThresholds {
    pub sell_below: f64,
    pub buy_at_or_above: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            sell_below: DEFAULT_SELL_BELOW,
            buy_at_or_above: DEFAULT_BUY_AT_OR_ABOVE,
        }
    }
}

impl DecisionThresholds {
    pub fn new(sell_below: f64, buy_at_or_above: f64) -> Result<Self, SignalError> {
        if !(sell_below.is_finite() && buy_at_or_above.is_finite()) {
            return Err(SignalError::configuration("decision thresholds must be finite"));
        }
        if sell_below > buy_at_or_above {
            return Err(SignalError::configuration(format!(
                "sell threshold {} is above buy threshold {}",
                sell_below, buy_at_or_above
            )));
        }
        Ok(Self {
            sell_below,
            buy_at_or_above,
        })
    }

    pub fn classify(&self, strength: f64) -> Decision {
        if strength < self.sell_below {
            Decision::Sell
        } else if strength < self.buy_at_or_above {
            Decision::Hold
        } else {
            Decision::Buy
        }
    }
}

/// One output row: the bar's market fields, its date and the decision.
///
/// Serializes as `[open, high, low, close, volume, dividends, splits, "YYYY-M-D", label]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub dividends: f64,
    pub splits: f64,
    pub decision: Decision,
}

impl DecisionRecord {
    pub fn from_bar(bar: &OhlcvBar, decision: Decision) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            dividends: bar.dividends,
            splits: bar.splits,
            decision,
        }
    }

    pub fn formatted_date(&self) -> String {
        format_date(self.date)
    }
}

impl Serialize for DecisionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(9))?;
        seq.serialize_element(&self.open)?;
        seq.serialize_element(&self.high)?;
        seq.serialize_element(&self.low)?;
        seq.serialize_element(&self.close)?;
        seq.serialize_element(&self.volume)?;
        seq.serialize_element(&self.dividends)?;
        seq.serialize_element(&self.splits)?;
        seq.serialize_element(&self.formatted_date())?;
        seq.serialize_element(self.decision.as_str())?;
        seq.end()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionSummary {
    pub sell: usize,
    pub hold: usize,
    pub buy: usize,
}

impl DecisionSummary {
    pub fn total(&self) -> usize {
        self.sell + self.hold + self.buy
    }
}

pub fn summarize(records: &[DecisionRecord]) -> DecisionSummary {
    records
        .iter()
        .fold(DecisionSummary::default(), |mut acc, r| {
            match r.decision {
                Decision::Sell => acc.sell += 1,
                Decision::Hold => acc.hold += 1,
                Decision::Buy => acc.buy += 1,
            }
            acc
        })
}
