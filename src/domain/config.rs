//! Builds the trading system and run settings from configuration.
//!
//! Every section is optional; absent keys fall back to the built-in system.
//! All validation happens here, before any bar is evaluated.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::decision::{DecisionThresholds, DEFAULT_BUY_AT_OR_ABOVE, DEFAULT_SELL_BELOW};
use crate::domain::engine::InferenceEngine;
use crate::domain::error::SignalError;
use crate::domain::indicator::rsi::DEFAULT_RSI_PERIOD;
use crate::domain::membership::MembershipFunction;
use crate::domain::rule::{default_rules, FuzzyRule, MARKET_TREND, RSI_VALUE, TRADING_DECISION};
use crate::domain::rule_parser;
use crate::domain::system::{
    standard_market_trend, standard_rsi_value, standard_trading_decision, TradingSystem,
};
use crate::domain::trend::{TrendClassifier, DEFAULT_THRESHOLD_PCT};
use crate::domain::variable::{FuzzyVariable, Universe, VariableRole};
use crate::ports::config_port::ConfigPort;

const UNIVERSE_KEYS: [&str; 3] = ["min", "max", "step"];

/// Where the bars come from and how the RSI input is derived.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSettings {
    pub csv_dir: PathBuf,
    pub code: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub rsi_period: usize,
}

pub fn build_signal_settings(config: &dyn ConfigPort) -> Result<SignalSettings, SignalError> {
    let code = config
        .get_string("data", "code")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| SignalError::ConfigMissing {
            section: "data".into(),
            key: "code".into(),
        })?;
    let csv_dir = config
        .get_string("data", "csv_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let start_date = optional_date(config, "start_date")?;
    let end_date = optional_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(SignalError::ConfigInvalid {
                section: "data".into(),
                key: "start_date".into(),
                reason: "start_date must not be after end_date".into(),
            });
        }
    }

    let rsi_period = read_double(config, "indicator", "rsi_period", DEFAULT_RSI_PERIOD as f64)?;
    if rsi_period < 1.0 || rsi_period.fract() != 0.0 {
        return Err(SignalError::ConfigInvalid {
            section: "indicator".into(),
            key: "rsi_period".into(),
            reason: "rsi_period must be a positive integer".into(),
        });
    }

    Ok(SignalSettings {
        csv_dir,
        code: code.trim().to_string(),
        start_date,
        end_date,
        rsi_period: rsi_period as usize,
    })
}

pub fn build_trading_system(config: &dyn ConfigPort) -> Result<TradingSystem, SignalError> {
    let market_trend = build_variable(config, MARKET_TREND, VariableRole::Antecedent, standard_market_trend()?)?;
    let rsi_value = build_variable(config, RSI_VALUE, VariableRole::Antecedent, standard_rsi_value()?)?;
    let trading_decision = build_variable(
        config,
        TRADING_DECISION,
        VariableRole::Consequent,
        standard_trading_decision()?,
    )?;
    let rules = build_rules(config)?;
    let engine = InferenceEngine::new(vec![market_trend, rsi_value], trading_decision, rules)?;

    let threshold_pct = read_double(config, "trend", "threshold_pct", DEFAULT_THRESHOLD_PCT)?;
    TradingSystem::new(
        TrendClassifier::new(threshold_pct),
        engine,
        build_thresholds(config)?,
    )
}

pub fn build_thresholds(config: &dyn ConfigPort) -> Result<DecisionThresholds, SignalError> {
    let sell_below = read_double(config, "decision", "sell_below", DEFAULT_SELL_BELOW)?;
    let buy_at_or_above = read_double(config, "decision", "buy_at_or_above", DEFAULT_BUY_AT_OR_ABOVE)?;
    // Both values are finite here, so the only failure is ordering. Blame the
    // buy bound unless the sell bound alone was overridden.
    let key = if config.get_string("decision", "buy_at_or_above").is_some() {
        "buy_at_or_above"
    } else {
        "sell_below"
    };
    DecisionThresholds::new(sell_below, buy_at_or_above).map_err(|e| SignalError::ConfigInvalid {
        section: "decision".into(),
        key: key.into(),
        reason: e.to_string(),
    })
}

/// A section that defines any term replaces the default term set.
pub fn build_variable(
    config: &dyn ConfigPort,
    name: &str,
    role: VariableRole,
    default: FuzzyVariable,
) -> Result<FuzzyVariable, SignalError> {
    let base = default.universe;
    let universe = Universe::new(
        read_double(config, name, "min", base.min)?,
        read_double(config, name, "max", base.max)?,
        read_double(config, name, "step", base.step)?,
    )
    .map_err(|e| SignalError::ConfigInvalid {
        section: name.into(),
        key: "step".into(),
        reason: e.to_string(),
    })?;

    let term_keys: Vec<String> = config
        .keys(name)
        .into_iter()
        .filter(|k| !UNIVERSE_KEYS.contains(&k.as_str()))
        .collect();

    let mut variable = FuzzyVariable::new(name, role, universe);
    if term_keys.is_empty() {
        for (term, mf) in default.terms() {
            variable = variable.with_term(term, *mf)?;
        }
        return Ok(variable);
    }

    for key in term_keys {
        let text = config.get_string(name, &key).unwrap_or_default();
        let mf: MembershipFunction = text.parse().map_err(|e: SignalError| SignalError::ConfigInvalid {
            section: name.into(),
            key: key.clone(),
            reason: e.to_string(),
        })?;
        variable = variable.with_term(key, mf)?;
    }
    Ok(variable)
}

/// A `[rules]` section with any entry replaces the default rule base.
pub fn build_rules(config: &dyn ConfigPort) -> Result<Vec<FuzzyRule>, SignalError> {
    let keys = config.keys("rules");
    if keys.is_empty() {
        return Ok(default_rules());
    }
    keys.into_iter()
        .map(|key| {
            let text = config.get_string("rules", &key).unwrap_or_default();
            rule_parser::parse(&text).map_err(|e| SignalError::ConfigInvalid {
                section: "rules".into(),
                key,
                reason: e.display_with_context(&text),
            })
        })
        .collect()
}

fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SignalError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| SignalError::ConfigInvalid {
                section: section.into(),
                key: key.into(),
                reason: format!("expected a number, found '{}'", raw),
            }),
    }
}

fn optional_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, SignalError> {
    match config.get_string("data", key).filter(|s| !s.trim().is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| SignalError::ConfigInvalid {
                section: "data".into(),
                key: key.into(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", key),
            }),
    }
}
