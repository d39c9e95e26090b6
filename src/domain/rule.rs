//! Fuzzy rule data structures.
//!
//! A rule is plain data: a conjunction of `(variable, term)` antecedents and a
//! single `(variable, term)` consequent. Rules render to the same text the
//! parser in [`crate::domain::rule_parser`] accepts.

use std::fmt;

pub const MARKET_TREND: &str = "market_trend";
pub const RSI_VALUE: &str = "rsi_value";
pub const TRADING_DECISION: &str = "trading_decision";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TermRef {
    pub variable: String,
    pub term: String,
}

impl TermRef {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }
}

impl fmt::Display for TermRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} IS {}", self.variable, self.term)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyRule {
    pub antecedents: Vec<TermRef>,
    pub consequent: TermRef,
}

impl FuzzyRule {
    pub fn new(antecedents: Vec<TermRef>, consequent: TermRef) -> Self {
        Self {
            antecedents,
            consequent,
        }
    }
}

impl fmt::Display for FuzzyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF ")?;
        for (i, ante) in self.antecedents.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{}", ante)?;
        }
        write!(f, " THEN {}", self.consequent)
    }
}

/// The nine trend x RSI rules.
pub fn default_rules() -> Vec<FuzzyRule> {
    const TABLE: [(&str, &str, &str); 9] = [
        ("bearish", "overbought", "sell"),
        ("bearish", "oversold", "hold"),
        ("bearish", "neutral", "hold"),
        ("neutral", "overbought", "sell"),
        ("neutral", "oversold", "buy"),
        ("neutral", "neutral", "hold"),
        ("bullish", "overbought", "hold"),
        ("bullish", "oversold", "buy"),
        ("bullish", "neutral", "buy"),
    ];

    TABLE
        .iter()
        .map(|(trend, rsi, decision)| {
            FuzzyRule::new(
                vec![TermRef::new(MARKET_TREND, *trend), TermRef::new(RSI_VALUE, *rsi)],
                TermRef::new(TRADING_DECISION, *decision),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_rules_cover_every_combination_once() {
        let rules = default_rules();
        assert_eq!(rules.len(), 9);
        let pairs: HashSet<(String, String)> = rules
            .iter()
            .map(|r| (r.antecedents[0].term.clone(), r.antecedents[1].term.clone()))
            .collect();
        assert_eq!(pairs.len(), 9);
        for r in &rules {
            assert_eq!(r.antecedents[0].variable, MARKET_TREND);
            assert_eq!(r.antecedents[1].variable, RSI_VALUE);
            assert_eq!(r.consequent.variable, TRADING_DECISION);
        }
    }

    #[test]
    fn neutral_overbought_sells() {
        let rules = default_rules();
        let rule = &rules[3];
        assert_eq!(rule.antecedents[0].term, "neutral");
        assert_eq!(rule.antecedents[1].term, "overbought");
        assert_eq!(rule.consequent.term, "sell");
    }

    #[test]
    fn display_rule() {
        let rule = FuzzyRule::new(
            vec![
                TermRef::new(MARKET_TREND, "bullish"),
                TermRef::new(RSI_VALUE, "oversold"),
            ],
            TermRef::new(TRADING_DECISION, "buy"),
        );
        assert_eq!(
            rule.to_string(),
            "IF market_trend IS bullish AND rsi_value IS oversold THEN trading_decision IS buy"
        );
    }

    #[test]
    fn single_antecedent_display() {
        let rule = FuzzyRule::new(
            vec![TermRef::new(RSI_VALUE, "oversold")],
            TermRef::new(TRADING_DECISION, "buy"),
        );
        assert_eq!(
            rule.to_string(),
            "IF rsi_value IS oversold THEN trading_decision IS buy"
        );
    }
}
