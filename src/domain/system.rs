//! The trend x RSI trading system.
//!
//! Binds the [`TrendClassifier`], an [`InferenceEngine`] over `market_trend` and
//! `rsi_value`, and the [`DecisionThresholds`] that label its output.

use crate::domain::decision::{Decision, DecisionThresholds};
use crate::domain::engine::InferenceEngine;
use crate::domain::error::SignalError;
use crate::domain::membership::MembershipFunction;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rule::{default_rules, MARKET_TREND, RSI_VALUE, TRADING_DECISION};
use crate::domain::trend::{Trend, TrendClassifier};
use crate::domain::variable::{FuzzyVariable, Universe};

pub fn standard_market_trend() -> Result<FuzzyVariable, SignalError> {
    FuzzyVariable::antecedent(MARKET_TREND, Universe::new(-1.0, 1.0, 0.1)?)
        .with_term("bearish", MembershipFunction::trapezoid(-1.0, -1.0, -0.5, 0.0)?)?
        .with_term("neutral", MembershipFunction::triangle(-0.5, 0.0, 0.5)?)?
        .with_term("bullish", MembershipFunction::trapezoid(0.0, 0.5, 1.0, 1.0)?)
}

pub fn standard_rsi_value() -> Result<FuzzyVariable, SignalError> {
    FuzzyVariable::antecedent(RSI_VALUE, Universe::new(0.0, 100.0, 1.0)?)
        .with_term("oversold", MembershipFunction::trapezoid(0.0, 0.0, 30.0, 50.0)?)?
        .with_term("neutral", MembershipFunction::triangle(30.0, 50.0, 70.0)?)?
        .with_term("overbought", MembershipFunction::trapezoid(50.0, 70.0, 100.0, 100.0)?)
}

pub fn standard_trading_decision() -> Result<FuzzyVariable, SignalError> {
    FuzzyVariable::consequent(TRADING_DECISION, Universe::new(0.0, 100.0, 1.0)?)
        .with_term("sell", MembershipFunction::trapezoid(0.0, 0.0, 30.0, 50.0)?)?
        .with_term("hold", MembershipFunction::triangle(30.0, 50.0, 70.0)?)?
        .with_term("buy", MembershipFunction::trapezoid(50.0, 70.0, 100.0, 100.0)?)
}

/// Result of evaluating one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarEvaluation {
    pub trend: Trend,
    pub strength: f64,
    pub decision: Decision,
}

#[derive(Debug, Clone)]
pub struct TradingSystem {
    classifier: TrendClassifier,
    engine: InferenceEngine,
    thresholds: DecisionThresholds,
}

impl TradingSystem {
    /// Requires `market_trend` and `rsi_value` antecedents and a
    /// `trading_decision` consequent.
    pub fn new(
        classifier: TrendClassifier,
        engine: InferenceEngine,
        thresholds: DecisionThresholds,
    ) -> Result<Self, SignalError> {
        if !classifier.threshold_pct.is_finite() {
            return Err(SignalError::configuration("trend threshold_pct must be finite"));
        }
        for name in [MARKET_TREND, RSI_VALUE] {
            if engine.antecedent(name).is_none() {
                return Err(SignalError::configuration(format!(
                    "trading system needs a '{}' antecedent",
                    name
                )));
            }
        }
        if engine.antecedents().len() != 2 {
            return Err(SignalError::configuration(format!(
                "trading system takes exactly {} and {} as inputs",
                MARKET_TREND, RSI_VALUE
            )));
        }
        if engine.consequent().name != TRADING_DECISION {
            return Err(SignalError::configuration(format!(
                "trading system needs a '{}' consequent",
                TRADING_DECISION
            )));
        }
        Ok(Self {
            classifier,
            engine,
            thresholds,
        })
    }

    /// Default variables, the nine-rule base, 2% trend threshold and 45/65 cut-offs.
    pub fn standard() -> Result<Self, SignalError> {
        let engine = InferenceEngine::new(
            vec![standard_market_trend()?, standard_rsi_value()?],
            standard_trading_decision()?,
            default_rules(),
        )?;
        Self::new(TrendClassifier::default(), engine, DecisionThresholds::default())
    }

    pub fn classifier(&self) -> &TrendClassifier {
        &self.classifier
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }

    /// Crisp decision strength in the `trading_decision` universe.
    pub fn decision_strength(&self, trend_magnitude: f64, rsi: f64) -> Result<f64, SignalError> {
        self.engine
            .infer(&[(MARKET_TREND, trend_magnitude), (RSI_VALUE, rsi)])
    }

    pub fn evaluate(&self, trend_magnitude: f64, rsi: f64) -> Result<(f64, Decision), SignalError> {
        let strength = self.decision_strength(trend_magnitude, rsi)?;
        Ok((strength, self.thresholds.classify(strength)))
    }

    pub fn evaluate_bar(&self, bar: &OhlcvBar, rsi: f64) -> Result<BarEvaluation, SignalError> {
        let trend = self.classifier.classify_bar(bar);
        let (strength, decision) = self.evaluate(trend.magnitude(), rsi)?;
        Ok(BarEvaluation {
            trend,
            strength,
            decision,
        })
    }

    pub fn decide(&self, bar: &OhlcvBar, rsi: f64) -> Result<Decision, SignalError> {
        self.evaluate_bar(bar, rsi).map(|eval| eval.decision)
    }
}
