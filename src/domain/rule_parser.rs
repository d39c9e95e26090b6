//! Rule DSL parser.
//!
//! Grammar (keywords case-insensitive, identifiers `[A-Za-z_][A-Za-z0-9_]*`):
//!
//! ```text
//! rule   := "IF" clause ("AND" clause)* "THEN" clause
//! clause := ident "IS" ident
//! ```
//!
//! Errors carry the byte offset of the offending token.

use crate::domain::error::ParseError;
use crate::domain::rule::{FuzzyRule, TermRef};

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek_word(&self) -> &'a str {
        let rem = self.remaining();
        let end = rem
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
            .map(|(i, _)| i)
            .unwrap_or(rem.len());
        &rem[..end]
    }

    fn describe_next(&self) -> String {
        let word = self.peek_word();
        if !word.is_empty() {
            word.to_string()
        } else {
            self.peek()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "end of input".to_string())
        }
    }

    fn consume_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let word = self.peek_word();
        if word.eq_ignore_ascii_case(keyword) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(ParseError {
                message: format!("expected '{}', found '{}'", keyword, self.describe_next()),
                position: self.pos,
            })
        }
    }

    fn parse_ident(&mut self, what: &str) -> Result<String, ParseError> {
        self.skip_whitespace();
        let word = self.peek_word();
        let starts_ok = word
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);
        if !starts_ok || is_keyword(word) {
            return Err(ParseError {
                message: format!("expected {}, found '{}'", what, self.describe_next()),
                position: self.pos,
            });
        }
        self.pos += word.len();
        Ok(word.to_string())
    }

    fn parse_clause(&mut self) -> Result<TermRef, ParseError> {
        let variable = self.parse_ident("variable name")?;
        self.expect_keyword("IS")?;
        let term = self.parse_ident("term name")?;
        Ok(TermRef { variable, term })
    }

    fn parse_rule(&mut self) -> Result<FuzzyRule, ParseError> {
        self.expect_keyword("IF")?;
        let mut antecedents = vec![self.parse_clause()?];
        while self.consume_keyword("AND") {
            antecedents.push(self.parse_clause()?);
        }
        self.expect_keyword("THEN")?;
        let consequent = self.parse_clause()?;

        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(ParseError {
                message: format!("unexpected trailing input '{}'", self.describe_next()),
                position: self.pos,
            });
        }
        Ok(FuzzyRule {
            antecedents,
            consequent,
        })
    }
}

fn is_keyword(word: &str) -> bool {
    ["IF", "IS", "AND", "THEN"]
        .iter()
        .any(|k| word.eq_ignore_ascii_case(k))
}

pub fn parse(input: &str) -> Result<FuzzyRule, ParseError> {
    Parser::new(input).parse_rule()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::default_rules;

    #[test]
    fn parse_two_clause_rule() {
        let rule =
            parse("IF market_trend IS bearish AND rsi_value IS overbought THEN trading_decision IS sell")
                .unwrap();
        assert_eq!(rule.antecedents.len(), 2);
        assert_eq!(rule.antecedents[0], TermRef::new("market_trend", "bearish"));
        assert_eq!(rule.antecedents[1], TermRef::new("rsi_value", "overbought"));
        assert_eq!(rule.consequent, TermRef::new("trading_decision", "sell"));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let rule = parse("if rsi_value is oversold then trading_decision is buy").unwrap();
        assert_eq!(rule.antecedents, vec![TermRef::new("rsi_value", "oversold")]);
    }

    #[test]
    fn extra_whitespace_is_ignored() {
        let rule = parse("  IF   a IS b\tAND c IS d   THEN  e IS f  ").unwrap();
        assert_eq!(rule.antecedents.len(), 2);
        assert_eq!(rule.consequent.term, "f");
    }

    #[test]
    fn default_rules_round_trip_through_text() {
        for rule in default_rules() {
            assert_eq!(parse(&rule.to_string()).unwrap(), rule);
        }
    }

    #[test]
    fn missing_then_reports_position() {
        let input = "IF market_trend IS bullish";
        let err = parse(input).unwrap_err();
        assert_eq!(err.position, input.len());
        assert!(err.message.contains("expected 'THEN'"));
        assert!(err.message.contains("end of input"));
    }

    #[test]
    fn missing_if() {
        let err = parse("market_trend IS bullish THEN x IS y").unwrap_err();
        assert_eq!(err.position, 0);
        assert!(err.message.contains("expected 'IF'"));
    }

    #[test]
    fn keyword_is_not_an_identifier() {
        let err = parse("IF AND IS x THEN y IS z").unwrap_err();
        assert_eq!(err.position, 3);
        assert!(err.message.contains("variable name"));
    }

    #[test]
    fn identifier_must_not_start_with_digit() {
        let err = parse("IF 9lives IS x THEN y IS z").unwrap_err();
        assert_eq!(err.position, 3);
    }

    #[test]
    fn trailing_input_rejected() {
        let err = parse("IF a IS b THEN c IS d OR e").unwrap_err();
        assert!(err.message.contains("trailing input 'OR'"));
        assert_eq!(err.position, 22);
    }

    #[test]
    fn bad_symbol_in_clause() {
        let err = parse("IF a IS b THEN c IS -").unwrap_err();
        assert!(err.message.contains("found '-'"));
    }

    #[test]
    fn display_with_context_renders_caret() {
        let input = "IF a IS b THEN";
        let err = parse(input).unwrap_err();
        let rendered = err.display_with_context(input);
        assert!(rendered.contains(&format!("{}^", " ".repeat(input.len()))));
    }
}
