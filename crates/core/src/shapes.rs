//! The input shapes served by the API and the rule sets declared for them.
//!
//! Discriminator and choice values come from [`ShapeConfig`] so deployments
//! can change them without touching the rule definitions.

use crate::catalog::RuleCatalog;
use crate::error::RuleError;
use crate::rule_set::RuleSet;
use crate::rules::{Bounds, Choice, Predicate, Range, Rule, TypeKind};
use crate::violation::BOUNDED_RANGE_MESSAGE;

pub const MEASUREMENT_SHAPE: &str = "measurement";
pub const SELECTION_SHAPE: &str = "selection";
pub const BOUNDED_SHAPE: &str = "bounded";

/// `type` value selecting the open `(-1000, 1000)` range for `value`.
pub const TYPE_ABSOLUTE: &str = "absolute";
/// `type` value selecting the closed `[0, 100]` range for `value`.
pub const TYPE_RELATIVE: &str = "relative";
/// `type` value requiring `value` to be a size name.
pub const TYPE_NAME: &str = "name";

/// Configurable value sets used by the built-in shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeConfig {
    /// Allowed values of the measurement `type` discriminator.
    pub type_choices: Vec<String>,
    /// Allowed values of the selection `choice` field.
    pub selection_choices: Vec<String>,
    /// Size names and the numeric size each stands for.
    pub size_names: Vec<(String, i64)>,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            type_choices: vec![
                TYPE_ABSOLUTE.to_string(),
                TYPE_RELATIVE.to_string(),
                TYPE_NAME.to_string(),
            ],
            selection_choices: vec!["correct".to_string(), "valid".to_string()],
            size_names: vec![
                ("Large".to_string(), 20),
                ("Medium".to_string(), 15),
                ("Small".to_string(), 10),
            ],
        }
    }
}

impl ShapeConfig {
    fn size_values(&self) -> Vec<i64> {
        let mut values: Vec<i64> = self.size_names.iter().map(|(_, v)| *v).collect();
        values.sort_unstable();
        values.dedup();
        values
    }
}

/// `type` + `value`, where `type` picks which rules apply to `value`.
pub fn measurement(config: &ShapeConfig) -> Result<RuleSet, RuleError> {
    let size_names = config.size_names.iter().map(|(name, _)| name.as_str());

    RuleSet::builder(MEASUREMENT_SHAPE)
        .rules(
            "type",
            [
                Rule::NotBlank,
                Rule::choice(Choice::single(config.type_choices.iter().map(String::as_str))?),
            ],
        )
        .field(
            "value",
            Rule::when(
                Predicate::field_equals("type", TYPE_ABSOLUTE),
                vec![Rule::range(-1000.0, 1000.0, Bounds::Open)?],
            )?,
        )
        .field(
            "value",
            Rule::when(
                Predicate::field_equals("type", TYPE_RELATIVE),
                vec![Rule::range(0.0, 100.0, Bounds::Closed)?],
            )?,
        )
        .field(
            "value",
            Rule::when(
                Predicate::field_equals("type", TYPE_NAME),
                vec![Rule::NotNull, Rule::choice(Choice::single(size_names)?)],
            )?,
        )
        .build()
}

/// A single `choice` plus a multi-valued `sizes` list given by name.
pub fn selection(config: &ShapeConfig) -> Result<RuleSet, RuleError> {
    let sizes = Choice::multiple(config.size_values())?.with_lookup(
        config
            .size_names
            .iter()
            .map(|(name, value)| (name.as_str(), *value)),
    )?;

    RuleSet::builder(SELECTION_SHAPE)
        .rules(
            "choice",
            [
                Rule::NotBlank,
                Rule::choice(Choice::single(
                    config.selection_choices.iter().map(String::as_str),
                )?),
            ],
        )
        .field("sizes", Rule::choice(sizes))
        .build()
}

/// Required numeric fields with fixed intervals.
pub fn bounded() -> Result<RuleSet, RuleError> {
    RuleSet::builder(BOUNDED_SHAPE)
        .rules(
            "score",
            [
                Rule::NotNull,
                Rule::type_check(TypeKind::Numeric),
                Rule::Range(
                    Range::new(0.0, 100.0, Bounds::Closed)?.with_message(BOUNDED_RANGE_MESSAGE),
                ),
            ],
        )
        .rules(
            "offset",
            [
                Rule::NotNull,
                Rule::range(-1000.0, 1000.0, Bounds::ClosedOpen)?,
            ],
        )
        .build()
}

/// Build the catalog of every built-in shape.
pub fn catalog(config: &ShapeConfig) -> Result<RuleCatalog, RuleError> {
    let mut catalog = RuleCatalog::new();
    catalog.register(measurement(config)?)?;
    catalog.register(selection(config)?)?;
    catalog.register(bounded()?)?;
    Ok(catalog)
}
