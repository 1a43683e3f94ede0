//! Rule evaluator — pure logic, no I/O.
//!
//! Rules run in declaration order. Every field is checked on every call;
//! within one field, evaluation stops at that field's first violation.

use std::collections::HashSet;

use serde_json::Value;

use crate::record::{as_number, display_value, is_blank, is_null, InputRecord};
use crate::rule_set::RuleSet;
use crate::rules::{Choice, Conditional, Range, Rule, TypeKind};
use crate::violation::{
    Violation, ViolationCode, ViolationList, CHOICE_MESSAGE, MULTIPLE_CHOICE_MESSAGE,
    NOT_BLANK_MESSAGE, NOT_NULL_MESSAGE, TYPE_MESSAGE,
};

/// Evaluate a rule set against one input record.
pub fn evaluate(record: &InputRecord, rule_set: &RuleSet) -> ViolationList {
    let mut violations = ViolationList::new();
    let mut failed_fields: HashSet<&str> = HashSet::new();

    for (field, rule) in rule_set.entries() {
        if failed_fields.contains(field) {
            continue;
        }
        if let Some(violation) = evaluate_rule(field, rule, record) {
            failed_fields.insert(field);
            violations.push(violation);
        }
    }

    violations
}

/// Evaluate one rule for `field`, returning the first violation it produces.
pub fn evaluate_rule(field: &str, rule: &Rule, record: &InputRecord) -> Option<Violation> {
    let value = record.get(field);

    match rule {
        Rule::NotNull => evaluate_not_null(field, value),
        Rule::NotBlank => evaluate_not_blank(field, value),
        Rule::TypeCheck(kind) => evaluate_type_check(field, *kind, value),
        Rule::Range(range) => evaluate_range(field, range, value),
        Rule::Choice(choice) => evaluate_choice(field, choice, value),
        Rule::Conditional(conditional) => evaluate_conditional(field, conditional, record),
    }
}

fn evaluate_not_null(field: &str, value: Option<&Value>) -> Option<Violation> {
    is_null(value).then(|| Violation::new(field, ViolationCode::IsNull, NOT_NULL_MESSAGE))
}

fn evaluate_not_blank(field: &str, value: Option<&Value>) -> Option<Violation> {
    is_blank(value).then(|| Violation::new(field, ViolationCode::IsBlank, NOT_BLANK_MESSAGE))
}

fn type_mismatch(field: &str, kind: TypeKind, value: &Value) -> Violation {
    Violation::new(field, ViolationCode::TypeMismatch, TYPE_MESSAGE)
        .with_param("type", kind.as_str())
        .with_param("value", display_value(value))
}

fn evaluate_type_check(field: &str, kind: TypeKind, value: Option<&Value>) -> Option<Violation> {
    let value = match value {
        Some(v) if !v.is_null() => v,
        _ => return None, // presence is checked by NotNull / NotBlank
    };
    if kind.accepts(value) {
        None
    } else {
        Some(type_mismatch(field, kind, value))
    }
}

fn evaluate_range(field: &str, range: &Range, value: Option<&Value>) -> Option<Violation> {
    let value = match value {
        Some(v) if !v.is_null() => v,
        _ => return None,
    };
    let Some(number) = as_number(value) else {
        return Some(type_mismatch(field, TypeKind::Numeric, value));
    };
    if range.contains(number) {
        return None;
    }
    Some(
        Violation::new(field, ViolationCode::OutOfRange, range.message())
            .with_param("interval", range.to_string())
            .with_param("min", range.min().to_string())
            .with_param("max", range.max().to_string())
            .with_param("value", display_value(value)),
    )
}

fn evaluate_choice(field: &str, choice: &Choice, value: Option<&Value>) -> Option<Violation> {
    let value = match value {
        Some(v) if !v.is_null() => v,
        _ => return None,
    };

    if !choice.is_multiple() {
        if value.is_array() || value.is_object() {
            return Some(type_mismatch(field, TypeKind::Scalar, value));
        }
        if choice.allows(&choice.resolve(value)) {
            return None;
        }
        return Some(
            Violation::new(field, ViolationCode::InvalidChoice, CHOICE_MESSAGE)
                .with_param("value", display_value(value))
                .with_param("choices", choice.describe_allowed()),
        );
    }

    let Some(elements) = value.as_array() else {
        return Some(type_mismatch(field, TypeKind::Array, value));
    };
    // Unknown elements resolve to the null sentinel; all of them are reported together.
    let invalid: Vec<String> = elements
        .iter()
        .filter(|element| !choice.allows(&choice.resolve(element)))
        .map(display_value)
        .collect();
    if invalid.is_empty() {
        return None;
    }
    Some(
        Violation::new(field, ViolationCode::InvalidChoices, MULTIPLE_CHOICE_MESSAGE)
            .with_param("invalid", invalid.join(", "))
            .with_param("choices", choice.describe_allowed()),
    )
}

fn evaluate_conditional(
    field: &str,
    conditional: &Conditional,
    record: &InputRecord,
) -> Option<Violation> {
    if !conditional.predicate().matches(record) {
        return None;
    }
    conditional
        .rules()
        .iter()
        .find_map(|rule| evaluate_rule(field, rule, record))
}
