//! JSON report adapter.
//!
//! Records are emitted as one object keyed by row index:
//! `{"0": [open, high, low, close, volume, dividends, splits, "2024-1-5", "Buy"], "1": ...}`.

use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::domain::decision::DecisionRecord;
use crate::domain::error::SignalError;
use crate::ports::report_port::ReportPort;

pub fn indexed_json(records: &[DecisionRecord]) -> Result<Value, SignalError> {
    let mut object = Map::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let row = serde_json::to_value(record).map_err(|e| SignalError::Data {
            reason: format!("failed to serialize record {}: {}", i, e),
        })?;
        object.insert(i.to_string(), row);
    }
    Ok(Value::Object(object))
}

/// Writes the indexed JSON to a file, or to stdout when no path is set.
pub struct JsonReportAdapter {
    output: Option<PathBuf>,
}

impl JsonReportAdapter {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, records: &[DecisionRecord]) -> Result<(), SignalError> {
        let body = indexed_json(records)?.to_string();
        match &self.output {
            Some(path) => {
                fs::write(path, body)?;
                tracing::info!(path = %path.display(), records = records.len(), "report written");
            }
            None => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{}", body)?;
            }
        }
        Ok(())
    }
}
