//! Mamdani inference engine.
//!
//! For crisp inputs, one per antecedent variable:
//! 1. Fuzzify every antecedent variable.
//! 2. Fire each rule: `min` over its antecedent degrees.
//! 3. Per consequent term, keep the `max` firing strength of the rules targeting it.
//! 4. Clip each consequent term at that strength and aggregate by pointwise `max`.
//! 5. Defuzzify by centroid over the consequent universe grid.
//!
//! The engine is immutable after construction; every evaluation takes `&self`.

use std::collections::{BTreeMap, HashSet};

use crate::domain::defuzz::centroid;
use crate::domain::error::SignalError;
use crate::domain::rule::FuzzyRule;
use crate::domain::variable::{FuzzyVariable, VariableRole};

#[derive(Debug, Clone)]
pub struct InferenceEngine {
    antecedents: Vec<FuzzyVariable>,
    consequent: FuzzyVariable,
    rules: Vec<FuzzyRule>,
}

impl InferenceEngine {
    /// Validates that every rule references declared variables and terms.
    pub fn new(
        antecedents: Vec<FuzzyVariable>,
        consequent: FuzzyVariable,
        rules: Vec<FuzzyRule>,
    ) -> Result<Self, SignalError> {
        let mut names = HashSet::new();
        for var in &antecedents {
            if var.role != VariableRole::Antecedent {
                return Err(SignalError::configuration(format!(
                    "variable '{}' is not an antecedent",
                    var.name
                )));
            }
            if !names.insert(var.name.as_str()) {
                return Err(SignalError::configuration(format!(
                    "duplicate variable '{}'",
                    var.name
                )));
            }
            if var.term_count() == 0 {
                return Err(SignalError::configuration(format!(
                    "variable '{}' has no terms",
                    var.name
                )));
            }
        }
        if consequent.role != VariableRole::Consequent {
            return Err(SignalError::configuration(format!(
                "variable '{}' is not a consequent",
                consequent.name
            )));
        }
        if names.contains(consequent.name.as_str()) {
            return Err(SignalError::configuration(format!(
                "duplicate variable '{}'",
                consequent.name
            )));
        }
        if consequent.term_count() == 0 {
            return Err(SignalError::configuration(format!(
                "variable '{}' has no terms",
                consequent.name
            )));
        }
        if rules.is_empty() {
            return Err(SignalError::configuration("rule base is empty"));
        }

        for (i, rule) in rules.iter().enumerate() {
            if rule.antecedents.is_empty() {
                return Err(SignalError::configuration(format!(
                    "rule {} has no antecedents",
                    i + 1
                )));
            }
            for ante in &rule.antecedents {
                let var = antecedents
                    .iter()
                    .find(|v| v.name == ante.variable)
                    .ok_or_else(|| {
                        SignalError::configuration(format!(
                            "rule {} ({}) references unknown antecedent '{}'",
                            i + 1,
                            rule,
                            ante.variable
                        ))
                    })?;
                if !var.has_term(&ante.term) {
                    return Err(SignalError::configuration(format!(
                        "rule {} ({}) references unknown term '{}' on '{}'",
                        i + 1,
                        rule,
                        ante.term,
                        ante.variable
                    )));
                }
            }
            if rule.consequent.variable != consequent.name {
                return Err(SignalError::configuration(format!(
                    "rule {} ({}) concludes on '{}', expected '{}'",
                    i + 1,
                    rule,
                    rule.consequent.variable,
                    consequent.name
                )));
            }
            if !consequent.has_term(&rule.consequent.term) {
                return Err(SignalError::configuration(format!(
                    "rule {} ({}) references unknown term '{}' on '{}'",
                    i + 1,
                    rule,
                    rule.consequent.term,
                    consequent.name
                )));
            }
        }

        Ok(Self {
            antecedents,
            consequent,
            rules,
        })
    }

    pub fn antecedents(&self) -> &[FuzzyVariable] {
        &self.antecedents
    }

    pub fn antecedent(&self, name: &str) -> Option<&FuzzyVariable> {
        self.antecedents.iter().find(|v| v.name == name)
    }

    pub fn consequent(&self) -> &FuzzyVariable {
        &self.consequent
    }

    pub fn rules(&self) -> &[FuzzyRule] {
        &self.rules
    }

    /// Firing strength of each rule, in rule order.
    pub fn firing_strengths(&self, inputs: &[(&str, f64)]) -> Result<Vec<f64>, SignalError> {
        let mut degrees: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
        for var in &self.antecedents {
            let value = inputs
                .iter()
                .find(|(name, _)| *name == var.name)
                .map(|(_, v)| *v)
                .ok_or_else(|| SignalError::MissingInput {
                    variable: var.name.clone(),
                })?;
            degrees.insert(var.name.as_str(), var.fuzzify(value)?);
        }

        Ok(self
            .rules
            .iter()
            .map(|rule| {
                rule.antecedents
                    .iter()
                    .map(|ante| {
                        degrees
                            .get(ante.variable.as_str())
                            .and_then(|terms| terms.get(ante.term.as_str()))
                            .copied()
                            .unwrap_or(0.0)
                    })
                    .fold(1.0, f64::min)
            })
            .collect())
    }

    /// Activation level of each consequent term: max over the rules concluding on it.
    pub fn activations(&self, inputs: &[(&str, f64)]) -> Result<BTreeMap<&str, f64>, SignalError> {
        let strengths = self.firing_strengths(inputs)?;
        let mut activations: BTreeMap<&str, f64> = BTreeMap::new();
        for (rule, strength) in self.rules.iter().zip(strengths) {
            let slot = activations.entry(rule.consequent.term.as_str()).or_insert(0.0);
            *slot = slot.max(strength);
        }
        Ok(activations)
    }

    /// Crisp output value in the consequent universe.
    pub fn infer(&self, inputs: &[(&str, f64)]) -> Result<f64, SignalError> {
        let activations = self.activations(inputs)?;
        let clipped: Vec<_> = self
            .consequent
            .terms()
            .filter_map(|(name, mf)| activations.get(name).map(|level| (mf, *level)))
            .filter(|(_, level)| *level > 0.0)
            .collect();

        Ok(centroid(&self.consequent.universe, |x| {
            clipped
                .iter()
                .map(|(mf, level)| mf.evaluate(x).min(*level))
                .fold(0.0, f64::max)
        }))
    }
}
