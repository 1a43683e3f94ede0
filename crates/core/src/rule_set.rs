//! Ordered rule sets for one input shape.

use crate::error::RuleError;
use crate::evaluator;
use crate::record::InputRecord;
use crate::rules::Rule;
use crate::violation::ViolationList;

/// The static, ordered `(field, rule)` pairs declared for one input shape.
///
/// Built once through [`RuleSet::builder`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    entries: Vec<(String, Rule)>,
}

impl RuleSet {
    pub fn builder(name: impl Into<String>) -> RuleSetBuilder {
        RuleSetBuilder {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.entries
            .iter()
            .map(|(field, rule)| (field.as_str(), rule))
    }

    /// Distinct field names in declaration order.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for (field, _) in &self.entries {
            if !fields.contains(&field.as_str()) {
                fields.push(field);
            }
        }
        fields
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn evaluate(&self, record: &InputRecord) -> ViolationList {
        evaluator::evaluate(record, self)
    }
}

#[derive(Debug)]
pub struct RuleSetBuilder {
    name: String,
    entries: Vec<(String, Rule)>,
}

impl RuleSetBuilder {
    pub fn field(mut self, field: impl Into<String>, rule: Rule) -> Self {
        self.entries.push((field.into(), rule));
        self
    }

    /// Declare several rules for one field, in chain order.
    pub fn rules(mut self, field: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        let field = field.into();
        self.entries
            .extend(rules.into_iter().map(|rule| (field.clone(), rule)));
        self
    }

    pub fn build(self) -> Result<RuleSet, RuleError> {
        if self.name.trim().is_empty() {
            return Err(RuleError::EmptyShapeName);
        }
        if self.entries.iter().any(|(field, _)| field.trim().is_empty()) {
            return Err(RuleError::EmptyFieldName { shape: self.name });
        }
        Ok(RuleSet {
            name: self.name,
            entries: self.entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn fields_are_distinct_and_ordered() {
        let rule_set = RuleSet::builder("shape")
            .field("type", Rule::NotBlank)
            .rules("value", [Rule::NotNull, Rule::NotBlank])
            .field("type", Rule::NotNull)
            .build()
            .unwrap();

        assert_eq!(rule_set.fields(), vec!["type", "value"]);
        assert_eq!(rule_set.len(), 4);
        assert_eq!(rule_set.name(), "shape");
    }

    #[test]
    fn empty_field_name_is_rejected() {
        let result = RuleSet::builder("shape").field(" ", Rule::NotNull).build();
        assert_matches!(result, Err(RuleError::EmptyFieldName { shape }) if shape == "shape");
    }

    #[test]
    fn empty_shape_name_is_rejected() {
        let result = RuleSet::builder("").field("a", Rule::NotNull).build();
        assert_matches!(result, Err(RuleError::EmptyShapeName));
    }
}
