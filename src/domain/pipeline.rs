//! Batch decision pipeline.
//!
//! Order-preserving map from `(bar[i], rsi[i])` to a [`DecisionRecord`]. Each bar
//! is evaluated independently against the shared, read-only [`TradingSystem`].
//!
//! The first bar whose inputs cannot be evaluated fails the whole batch with
//! [`SignalError::InvalidBar`]; no default decision is substituted. Callers that
//! hold an RSI series with a warm-up gap must drop those bars before calling in;
//! [`run_signal_pipeline`] does that for a symbol read through a [`DataPort`].

use tracing::{debug, info, warn};

use crate::domain::config::SignalSettings;
use crate::domain::decision::{summarize, DecisionRecord};
use crate::domain::error::SignalError;
use crate::domain::indicator::align_valid;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::system::TradingSystem;
use crate::ports::data_port::DataPort;

pub fn run_pipeline(
    bars: &[OhlcvBar],
    rsi: &[f64],
    system: &TradingSystem,
) -> Result<Vec<DecisionRecord>, SignalError> {
    if bars.len() != rsi.len() {
        return Err(SignalError::SeriesMismatch {
            bars: bars.len(),
            rsi: rsi.len(),
        });
    }

    let records = bars
        .iter()
        .zip(rsi)
        .enumerate()
        .map(|(index, (bar, &rsi))| {
            let eval = system
                .evaluate_bar(bar, rsi)
                .map_err(|e| SignalError::InvalidBar {
                    index,
                    date: bar.date,
                    reason: e.to_string(),
                })?;
            debug!(
                index,
                date = %bar.date,
                trend = %eval.trend,
                rsi,
                strength = eval.strength,
                decision = %eval.decision,
                "bar evaluated"
            );
            Ok(DecisionRecord::from_bar(bar, eval.decision))
        })
        .collect::<Result<Vec<_>, SignalError>>()?;

    let summary = summarize(&records);
    info!(
        bars = records.len(),
        sell = summary.sell,
        hold = summary.hold,
        buy = summary.buy,
        "pipeline complete"
    );
    Ok(records)
}

/// Fetch bars, derive RSI, drop the warm-up bars and label the rest.
pub fn run_signal_pipeline(
    data_port: &dyn DataPort,
    system: &TradingSystem,
    settings: &SignalSettings,
) -> Result<Vec<DecisionRecord>, SignalError> {
    let bars = data_port.fetch_ohlcv(&settings.code, settings.start_date, settings.end_date)?;
    if bars.is_empty() {
        return Err(SignalError::NoData {
            code: settings.code.clone(),
        });
    }
    let minimum = settings.rsi_period + 1;
    if bars.len() < minimum {
        return Err(SignalError::InsufficientData {
            code: settings.code.clone(),
            bars: bars.len(),
            minimum,
        });
    }
    info!(code = %settings.code, bars = bars.len(), "bars loaded");

    let rsi = calculate_rsi(&bars, settings.rsi_period);
    let (kept, values) = align_valid(&bars, &rsi);
    let dropped = bars.len() - kept.len();
    if dropped > 0 {
        warn!(
            code = %settings.code,
            dropped,
            indicator = %rsi.indicator_type,
            "bars without an RSI value excluded"
        );
    }

    run_pipeline(&kept, &values, system)
}
