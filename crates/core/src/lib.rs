//! Declarative input validation.
//!
//! Input records are checked against statically built, ordered rule sets.
//! Everything here is pure logic: no I/O, no shared mutable state, so a
//! [`rule_set::RuleSet`] can be shared across threads behind an `Arc`.

pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod record;
pub mod rule_set;
pub mod rules;
pub mod shapes;
pub mod violation;
