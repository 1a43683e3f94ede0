use crate::rules::Bounds;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with key {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid rule definition: {0}")]
    Rules(#[from] RuleError),
}

/// A malformed rule definition, reported when a rule or rule set is built.
///
/// These never reach the evaluator: a rule that cannot be constructed does
/// not exist.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("range bounds must be finite numbers")]
    NonFiniteBound,

    #[error("range minimum {min} is greater than maximum {max}")]
    InvertedBounds { min: f64, max: f64 },

    #[error("range {bounds:?} between {min} and {max} admits no value")]
    EmptyRange { min: f64, max: f64, bounds: Bounds },

    #[error("choice rule needs at least one allowed value")]
    EmptyChoices,

    #[error("choice lookup maps '{name}' to {value}, which is not an allowed value")]
    UnknownLookupTarget { name: String, value: String },

    #[error("conditional rule '{predicate}' has no inner rules")]
    EmptyConditional { predicate: String },

    #[error("rule set '{shape}' declares a rule with an empty field name")]
    EmptyFieldName { shape: String },

    #[error("rule set name must not be empty")]
    EmptyShapeName,

    #[error("rule set '{0}' is already registered")]
    DuplicateShape(String),
}
