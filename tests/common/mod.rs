#![allow(dead_code)]

use chrono::NaiveDate;
use fuzzysignal::domain::config::SignalSettings;
use fuzzysignal::domain::error::SignalError;
pub use fuzzysignal::domain::ohlcv::OhlcvBar;
use fuzzysignal::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub listing_error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            listing_error: None,
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }

    pub fn with_listing_error(mut self, reason: &str) -> Self {
        self.listing_error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, SignalError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(SignalError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| start_date.is_none_or(|s| b.date >= s))
                    .filter(|b| end_date.is_none_or(|e| b.date <= e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
        if let Some(reason) = &self.listing_error {
            return Err(SignalError::Data {
                reason: reason.clone(),
            });
        }
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, open: f64, high: f64, low: f64, close: f64) -> OhlcvBar {
    OhlcvBar::new(
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open,
        high,
        low,
        close,
        1000,
    )
}

/// Steadily rising closes with narrow ranges: neutral trend, RSI pinned at 100.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let price = start_price + i as f64;
            OhlcvBar::new(
                start + chrono::Duration::days(i as i64),
                price,
                price + 0.5,
                price - 0.5,
                price,
                1000,
            )
        })
        .collect()
}

/// Closes that swing up and down in a saw-tooth, so RSI moves through its range.
pub fn generate_swinging_bars(start_date: &str, count: usize) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let phase = (i % 20) as f64;
            let close = if phase < 10.0 {
                100.0 + phase * 1.5
            } else {
                115.0 - (phase - 10.0) * 1.5
            };
            OhlcvBar::new(
                start + chrono::Duration::days(i as i64),
                close,
                close + 0.5,
                close - 0.5,
                close,
                2000,
            )
        })
        .collect()
}

pub fn settings(code: &str, rsi_period: usize) -> SignalSettings {
    SignalSettings {
        csv_dir: "data".into(),
        code: code.to_string(),
        start_date: None,
        end_date: None,
        rsi_period,
    }
}

pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume,dividends,splits\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            b.date.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume,
            b.dividends,
            b.splits
        ));
    }
    out
}
