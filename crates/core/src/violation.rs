//! Violation types produced by the evaluator.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub const NOT_NULL_MESSAGE: &str = "This value should not be null.";
pub const NOT_BLANK_MESSAGE: &str = "This value should not be blank.";
pub const TYPE_MESSAGE: &str = "This value should be of type {{ type }}.";
pub const RANGE_MESSAGE: &str = "This value should be within {{ interval }}.";
/// Range wording that cites only the endpoints.
pub const BOUNDED_RANGE_MESSAGE: &str = "Value should be in range [{{ min }}, {{ max }}].";
pub const CHOICE_MESSAGE: &str =
    "The value you selected is not a valid choice. Valid choices: {{ choices }}.";
pub const MULTIPLE_CHOICE_MESSAGE: &str =
    "One or more of the given values is invalid: {{ invalid }}. Valid choices: {{ choices }}.";

/// Machine-readable kind of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    IsNull,
    IsBlank,
    /// The value has the wrong shape for its rule (e.g. text given to a range).
    TypeMismatch,
    OutOfRange,
    InvalidChoice,
    InvalidChoices,
}

/// One failed rule for one field.
///
/// `message` is a template; `params` maps each literal placeholder
/// (`"{{ min }}"`) to its substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub code: ViolationCode,
    pub message: String,
    pub params: BTreeMap<String, String>,
}

impl Violation {
    pub fn new(field: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    /// Attach a parameter. `name` is the bare placeholder name, `min` for `{{ min }}`.
    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.insert(placeholder(name), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(&placeholder(name)).map(String::as_str)
    }

    /// The message with every placeholder substituted.
    pub fn render(&self) -> String {
        self.params
            .iter()
            .fold(self.message.clone(), |message, (key, value)| {
                message.replace(key.as_str(), value)
            })
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.render())
    }
}

fn placeholder(name: &str) -> String {
    format!("{{{{ {name} }}}}")
}

/// Ordered violations from one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationList(Vec<Violation>);

impl ViolationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Field names in violation order.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.field.as_str()).collect()
    }
}

impl std::ops::Index<usize> for ViolationList {
    type Output = Violation;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for ViolationList {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ViolationList {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One line per violation, `field: message`.
impl fmt::Display for ViolationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for violation in &self.0 {
            writeln!(f, "{violation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_all_placeholders() {
        let violation = Violation::new("value", ViolationCode::OutOfRange, RANGE_MESSAGE)
            .with_param("interval", "[0, 100]")
            .with_param("value", "150");

        assert_eq!(violation.render(), "This value should be within [0, 100].");
        assert_eq!(violation.param("value"), Some("150"));
        assert_eq!(
            violation.to_string(),
            "value: This value should be within [0, 100]."
        );
    }

    #[test]
    fn params_are_keyed_by_literal_placeholder() {
        let violation = Violation::new("type", ViolationCode::TypeMismatch, TYPE_MESSAGE)
            .with_param("type", "numeric");
        assert_eq!(
            violation.params.get("{{ type }}").map(String::as_str),
            Some("numeric")
        );
    }

    #[test]
    fn list_renders_one_line_per_violation() {
        let mut list = ViolationList::new();
        list.push(Violation::new("type", ViolationCode::IsBlank, NOT_BLANK_MESSAGE));
        list.push(Violation::new("value", ViolationCode::IsNull, NOT_NULL_MESSAGE));

        assert_eq!(
            list.to_string(),
            "type: This value should not be blank.\nvalue: This value should not be null.\n"
        );
        assert_eq!(list.fields(), vec!["type", "value"]);
    }

    #[test]
    fn code_serializes_screaming_snake_case() {
        let json = serde_json::to_value(ViolationCode::TypeMismatch).unwrap();
        assert_eq!(json, "TYPE_MISMATCH");
    }
}
