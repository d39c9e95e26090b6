//! Core domain types and logic.

pub mod ohlcv;
pub mod membership;
pub mod variable;
pub mod defuzz;
pub mod trend;
pub mod rule;
pub mod rule_parser;
pub mod engine;
pub mod decision;
pub mod system;
pub mod pipeline;
pub mod indicator;
pub mod config;
pub mod error;
