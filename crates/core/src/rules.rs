//! Rule definitions.
//!
//! Every constructor that can be given inconsistent arguments returns a
//! [`RuleError`], so a [`Rule`] value is always well-formed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::RuleError;
use crate::record::{as_number, display_value, is_integral, InputRecord};
use crate::violation::RANGE_MESSAGE;

/// A single validation rule attached to a field.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Fails only when the field is absent or `null`.
    NotNull,
    /// Fails when the field is absent, `null`, empty or whitespace-only.
    NotBlank,
    TypeCheck(TypeKind),
    Range(Range),
    Choice(Choice),
    Conditional(Conditional),
}

impl Rule {
    pub fn type_check(kind: TypeKind) -> Self {
        Rule::TypeCheck(kind)
    }

    pub fn range(min: f64, max: f64, bounds: Bounds) -> Result<Self, RuleError> {
        Range::new(min, max, bounds).map(Rule::Range)
    }

    pub fn choice(choice: Choice) -> Self {
        Rule::Choice(choice)
    }

    /// Apply `rules` only when `predicate` holds for the whole record.
    pub fn when(predicate: Predicate, rules: Vec<Rule>) -> Result<Self, RuleError> {
        Conditional::new(predicate, rules).map(Rule::Conditional)
    }
}

/// Value shapes a [`Rule::TypeCheck`] can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    String,
    /// A number, or a string holding a finite decimal.
    Numeric,
    Integer,
    Array,
    /// Anything but an array or object.
    Scalar,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::String => "string",
            TypeKind::Numeric => "numeric",
            TypeKind::Integer => "integer",
            TypeKind::Array => "array",
            TypeKind::Scalar => "scalar",
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            TypeKind::String => value.is_string(),
            TypeKind::Numeric => as_number(value).is_some(),
            TypeKind::Integer => is_integral(value),
            TypeKind::Array => value.is_array(),
            TypeKind::Scalar => !value.is_array() && !value.is_object(),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which ends of a [`Range`] are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// `[min, max]`
    Closed,
    /// `(min, max)`
    Open,
    /// `[min, max)`
    ClosedOpen,
    /// `(min, max]`
    OpenClosed,
}

impl Bounds {
    fn includes_min(self) -> bool {
        matches!(self, Bounds::Closed | Bounds::ClosedOpen)
    }

    fn includes_max(self) -> bool {
        matches!(self, Bounds::Closed | Bounds::OpenClosed)
    }
}

/// A numeric interval with explicit bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
    bounds: Bounds,
    message: Option<&'static str>,
}

impl Range {
    pub fn new(min: f64, max: f64, bounds: Bounds) -> Result<Self, RuleError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(RuleError::NonFiniteBound);
        }
        if min > max {
            return Err(RuleError::InvertedBounds { min, max });
        }
        if min == max && bounds != Bounds::Closed {
            return Err(RuleError::EmptyRange { min, max, bounds });
        }
        Ok(Self {
            min,
            max,
            bounds,
            message: None,
        })
    }

    /// Replace the default out-of-range template. The violation carries
    /// `{{ interval }}`, `{{ min }}`, `{{ max }}` and `{{ value }}`.
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    pub fn message(&self) -> &'static str {
        self.message.unwrap_or(RANGE_MESSAGE)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_min = if self.bounds.includes_min() {
            value >= self.min
        } else {
            value > self.min
        };
        let below_max = if self.bounds.includes_max() {
            value <= self.max
        } else {
            value < self.max
        };
        above_min && below_max
    }
}

/// Interval notation, e.g. `[0, 100]` or `(-1000, 1000)`.
impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.bounds.includes_min() { '[' } else { '(' };
        let close = if self.bounds.includes_max() { ']' } else { ')' };
        write!(f, "{open}{}, {}{close}", self.min, self.max)
    }
}

/// Membership in a fixed, ordered set of allowed values.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    allowed: Vec<Value>,
    multiple: bool,
    lookup: Option<BTreeMap<String, Value>>,
}

impl Choice {
    /// The value must equal one allowed member.
    pub fn single<I, T>(allowed: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::build(allowed, false)
    }

    /// The value must be an array whose every element is an allowed member.
    pub fn multiple<I, T>(allowed: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::build(allowed, true)
    }

    fn build<I, T>(allowed: I, multiple: bool) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
        if allowed.is_empty() {
            return Err(RuleError::EmptyChoices);
        }
        Ok(Self {
            allowed,
            multiple,
            lookup: None,
        })
    }

    /// Resolve input through a name table before checking membership.
    ///
    /// Names missing from the table resolve to `null`, which only passes when
    /// `null` is itself an allowed member.
    pub fn with_lookup<I, K, T>(mut self, names: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        let mut lookup = BTreeMap::new();
        for (name, value) in names {
            let name = name.into();
            let value = value.into();
            if !self.allows(&value) {
                return Err(RuleError::UnknownLookupTarget {
                    name,
                    value: display_value(&value),
                });
            }
            lookup.insert(name, value);
        }
        self.lookup = Some(lookup);
        Ok(self)
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn allowed(&self) -> &[Value] {
        &self.allowed
    }

    /// Map one input element to the member it stands for.
    pub fn resolve(&self, element: &Value) -> Value {
        match &self.lookup {
            Some(lookup) => element
                .as_str()
                .and_then(|name| lookup.get(name))
                .cloned()
                .unwrap_or(Value::Null),
            None => element.clone(),
        }
    }

    pub fn allows(&self, value: &Value) -> bool {
        self.allowed.iter().any(|member| values_match(member, value))
    }

    /// The allowed set as shown in messages: `10, 15, 20`.
    pub fn describe_allowed(&self) -> String {
        self.allowed
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Strict equality, plus numeric equality so a form string `"10"` matches `10`.
pub fn values_match(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    match (as_number(left), as_number(right)) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}

/// A named test over the whole input record.
#[derive(Clone)]
pub struct Predicate {
    description: String,
    test: Arc<dyn Fn(&InputRecord) -> bool + Send + Sync>,
}

impl Predicate {
    pub fn new<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&InputRecord) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            test: Arc::new(test),
        }
    }

    /// Holds when `field` is present and matches `expected`.
    pub fn field_equals(field: impl Into<String>, expected: impl Into<Value>) -> Self {
        let field = field.into();
        let expected = expected.into();
        let description = format!("{field} == {}", display_value(&expected));
        Self::new(description, move |record| {
            record
                .get(&field)
                .is_some_and(|value| values_match(value, &expected))
        })
    }

    pub fn matches(&self, record: &InputRecord) -> bool {
        (self.test)(record)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Rules that only apply when a predicate over the record holds.
#[derive(Debug, Clone)]
pub struct Conditional {
    predicate: Predicate,
    rules: Vec<Rule>,
}

impl Conditional {
    pub fn new(predicate: Predicate, rules: Vec<Rule>) -> Result<Self, RuleError> {
        if rules.is_empty() {
            return Err(RuleError::EmptyConditional {
                predicate: predicate.description,
            });
        }
        Ok(Self { predicate, rules })
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn inverted_range_is_rejected() {
        assert_matches!(
            Range::new(10.0, 1.0, Bounds::Closed),
            Err(RuleError::InvertedBounds { .. })
        );
    }

    #[test]
    fn degenerate_range_only_allowed_when_closed() {
        assert!(Range::new(5.0, 5.0, Bounds::Closed).is_ok());
        assert_matches!(
            Range::new(5.0, 5.0, Bounds::ClosedOpen),
            Err(RuleError::EmptyRange { .. })
        );
        assert_matches!(
            Range::new(5.0, 5.0, Bounds::Open),
            Err(RuleError::EmptyRange { .. })
        );
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        assert_eq!(
            Range::new(f64::NAN, 1.0, Bounds::Closed),
            Err(RuleError::NonFiniteBound)
        );
        assert_eq!(
            Range::new(0.0, f64::INFINITY, Bounds::Closed),
            Err(RuleError::NonFiniteBound)
        );
    }

    #[test]
    fn bounds_control_endpoints() {
        let closed = Range::new(0.0, 100.0, Bounds::Closed).unwrap();
        assert!(closed.contains(0.0) && closed.contains(100.0));

        let open = Range::new(0.0, 100.0, Bounds::Open).unwrap();
        assert!(!open.contains(0.0) && !open.contains(100.0));
        assert!(open.contains(0.5));

        let closed_open = Range::new(0.0, 100.0, Bounds::ClosedOpen).unwrap();
        assert!(closed_open.contains(0.0) && !closed_open.contains(100.0));

        let open_closed = Range::new(0.0, 100.0, Bounds::OpenClosed).unwrap();
        assert!(!open_closed.contains(0.0) && open_closed.contains(100.0));
    }

    #[test]
    fn range_displays_interval_notation() {
        let range = Range::new(-1000.0, 1000.0, Bounds::ClosedOpen).unwrap();
        assert_eq!(range.to_string(), "[-1000, 1000)");
        let range = Range::new(0.0, 0.5, Bounds::OpenClosed).unwrap();
        assert_eq!(range.to_string(), "(0, 0.5]");
    }

    #[test]
    fn empty_choice_is_rejected() {
        assert_eq!(
            Choice::single(Vec::<Value>::new()),
            Err(RuleError::EmptyChoices)
        );
    }

    #[test]
    fn lookup_must_target_allowed_values() {
        let result = Choice::multiple([10, 15, 20])
            .unwrap()
            .with_lookup([("Large", 20), ("Huge", 99)]);
        assert_matches!(result, Err(RuleError::UnknownLookupTarget { name, .. }) if name == "Huge");
    }

    #[test]
    fn lookup_resolves_unknown_names_to_null() {
        let choice = Choice::multiple([10, 15, 20])
            .unwrap()
            .with_lookup([("Large", 20), ("Small", 10)])
            .unwrap();
        assert_eq!(choice.resolve(&json!("Large")), json!(20));
        assert_eq!(choice.resolve(&json!("Huge")), Value::Null);
        assert_eq!(choice.resolve(&json!(20)), Value::Null);
    }

    #[test]
    fn numeric_strings_match_numeric_members() {
        let choice = Choice::single([10, 15, 20]).unwrap();
        assert!(choice.allows(&json!("15")));
        assert!(choice.allows(&json!(15.0)));
        assert!(!choice.allows(&json!("12")));
        assert_eq!(choice.describe_allowed(), "10, 15, 20");
    }

    #[test]
    fn field_equals_reads_other_fields() {
        let predicate = Predicate::field_equals("type", "relative");
        assert_eq!(predicate.description(), "type == relative");
        assert!(predicate.matches(&InputRecord::new().with("type", "relative")));
        assert!(!predicate.matches(&InputRecord::new().with("type", "absolute")));
        assert!(!predicate.matches(&InputRecord::new()));
    }

    #[test]
    fn conditional_needs_inner_rules() {
        let result = Rule::when(Predicate::field_equals("type", "name"), vec![]);
        assert_matches!(result, Err(RuleError::EmptyConditional { predicate }) if predicate == "type == name");
    }

    #[test]
    fn range_message_defaults_and_overrides() {
        let range = Range::new(0.0, 100.0, Bounds::Closed).unwrap();
        assert_eq!(range.message(), RANGE_MESSAGE);

        let custom = range.with_message("Pick {{ min }} to {{ max }}.");
        assert_eq!(custom.message(), "Pick {{ min }} to {{ max }}.");
        assert!(custom.contains(100.0));
    }

    #[test]
    fn type_kinds() {
        assert!(TypeKind::Numeric.accepts(&json!("12.5")));
        assert!(!TypeKind::Numeric.accepts(&json!("twelve")));
        assert!(TypeKind::Integer.accepts(&json!("12")));
        assert!(!TypeKind::Integer.accepts(&json!("12.5")));
        assert!(TypeKind::Integer.accepts(&json!(12.0)));
        assert!(TypeKind::Integer.accepts(&json!(u64::MAX)));
        assert!(TypeKind::Array.accepts(&json!([])));
        assert!(TypeKind::Scalar.accepts(&json!("x")));
        assert!(!TypeKind::Scalar.accepts(&json!(["x"])));
        assert!(TypeKind::String.accepts(&json!("")));
        assert!(!TypeKind::String.accepts(&json!(1)));
    }
}
