//! Registry of rule sets by shape name.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{CoreError, RuleError};
use crate::rule_set::RuleSet;

/// Immutable-after-startup map from shape name to its [`RuleSet`].
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rule_sets: BTreeMap<String, Arc<RuleSet>>,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule_set: RuleSet) -> Result<(), RuleError> {
        let name = rule_set.name().to_string();
        if self.rule_sets.contains_key(&name) {
            return Err(RuleError::DuplicateShape(name));
        }
        self.rule_sets.insert(name, Arc::new(rule_set));
        Ok(())
    }

    pub fn get(&self, shape: &str) -> Result<Arc<RuleSet>, CoreError> {
        self.rule_sets
            .get(shape)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "RuleSet",
                key: shape.to_string(),
            })
    }

    /// Rule sets sorted by shape name.
    pub fn iter(&self) -> impl Iterator<Item = &RuleSet> {
        self.rule_sets.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use assert_matches::assert_matches;

    fn shape(name: &str) -> RuleSet {
        RuleSet::builder(name)
            .field("a", Rule::NotNull)
            .build()
            .unwrap()
    }

    #[test]
    fn duplicate_shape_is_rejected() {
        let mut catalog = RuleCatalog::new();
        catalog.register(shape("one")).unwrap();
        assert_eq!(
            catalog.register(shape("one")),
            Err(RuleError::DuplicateShape("one".to_string()))
        );
    }

    #[test]
    fn unknown_shape_is_not_found() {
        let catalog = RuleCatalog::new();
        assert_matches!(
            catalog.get("missing"),
            Err(CoreError::NotFound { entity: "RuleSet", key }) if key == "missing"
        );
    }

    #[test]
    fn iterates_in_name_order() {
        let mut catalog = RuleCatalog::new();
        catalog.register(shape("zeta")).unwrap();
        catalog.register(shape("alpha")).unwrap();
        let names: Vec<_> = catalog.iter().map(RuleSet::name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(catalog.get("zeta").unwrap().name(), "zeta");
    }
}
