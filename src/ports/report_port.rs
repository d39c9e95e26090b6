//! Decision output port trait.

use crate::domain::decision::DecisionRecord;
use crate::domain::error::SignalError;

/// Port for emitting a batch of decision records.
pub trait ReportPort {
    fn write(&self, records: &[DecisionRecord]) -> Result<(), SignalError>;
}
