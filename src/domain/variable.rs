//! Linguistic variables.
//!
//! A [`FuzzyVariable`] pairs a name and a [`Universe`] with named terms, each
//! backed by a [`MembershipFunction`]. The universe doubles as the sampling grid
//! used for defuzzification, so its `step` sets the quadrature resolution
//! independently of the term shapes.

use std::collections::BTreeMap;

use crate::domain::error::SignalError;
use crate::domain::membership::MembershipFunction;

/// Upper bound on grid points per universe.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Closed interval `[min, max]` sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Universe {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Universe {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, SignalError> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(SignalError::configuration(format!(
                "universe bounds must be finite: [{}, {}] step {}",
                min, max, step
            )));
        }
        if min >= max {
            return Err(SignalError::configuration(format!(
                "universe is empty: min {} must be below max {}",
                min, max
            )));
        }
        if step <= 0.0 || step > max - min {
            return Err(SignalError::configuration(format!(
                "universe step {} must be positive and no wider than [{}, {}]",
                step, min, max
            )));
        }
        let intervals = (max - min) / step;
        if !intervals.is_finite() || intervals.round() + 1.0 > MAX_SAMPLES as f64 {
            return Err(SignalError::configuration(format!(
                "universe step {} over [{}, {}] exceeds {} samples",
                step, min, max, MAX_SAMPLES
            )));
        }
        Ok(Self { min, max, step })
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    pub fn sample_count(&self) -> usize {
        ((self.max - self.min) / self.step).round() as usize + 1
    }

    /// Grid points `min, min + step, ...`, computed by index to avoid drift.
    pub fn samples(&self) -> Vec<f64> {
        (0..self.sample_count())
            .map(|i| (self.min + i as f64 * self.step).min(self.max))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableRole {
    Antecedent,
    Consequent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyVariable {
    pub name: String,
    pub role: VariableRole,
    pub universe: Universe,
    terms: BTreeMap<String, MembershipFunction>,
}

impl FuzzyVariable {
    pub fn new(name: impl Into<String>, role: VariableRole, universe: Universe) -> Self {
        Self {
            name: name.into(),
            role,
            universe,
            terms: BTreeMap::new(),
        }
    }

    pub fn antecedent(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, VariableRole::Antecedent, universe)
    }

    pub fn consequent(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, VariableRole::Consequent, universe)
    }

    /// Builder-style term registration. Re-using a term name is a configuration error.
    pub fn with_term(
        mut self,
        term: impl Into<String>,
        mf: MembershipFunction,
    ) -> Result<Self, SignalError> {
        let term = term.into();
        if self.terms.contains_key(&term) {
            return Err(SignalError::configuration(format!(
                "duplicate term '{}' on variable '{}'",
                term, self.name
            )));
        }
        self.terms.insert(term, mf);
        Ok(self)
    }

    pub fn term(&self, name: &str) -> Option<&MembershipFunction> {
        self.terms.get(name)
    }

    pub fn has_term(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &MembershipFunction)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Membership degree of `x` in every term, keyed by term name.
    ///
    /// Fails with `InvalidInput` when `x` is non-finite, or belongs to no term
    /// and lies outside the universe. A gap between terms inside the universe
    /// yields all-zero degrees.
    pub fn fuzzify(&self, x: f64) -> Result<BTreeMap<&str, f64>, SignalError> {
        let invalid = || SignalError::InvalidInput {
            variable: self.name.clone(),
            value: x,
        };
        if !x.is_finite() {
            return Err(invalid());
        }
        let degrees: BTreeMap<&str, f64> = self
            .terms
            .iter()
            .map(|(name, mf)| (name.as_str(), mf.evaluate(x)))
            .collect();
        if degrees.values().all(|d| *d == 0.0) && !self.universe.contains(x) {
            return Err(invalid());
        }
        Ok(degrees)
    }
}
