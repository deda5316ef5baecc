//! Builder for declarative intent schemas

use crate::intent::resolve::Intent;

/// Accumulates required, alternative, and optional entity slots, then freezes
/// them into an immutable [`Intent`].
///
/// Field names default to the entity type; the `_as` variants override them.
#[derive(Debug, Clone)]
pub struct IntentBuilder {
    name: String,
    requires: Vec<(String, String)>,
    at_least_one: Vec<Vec<String>>,
    optional: Vec<(String, String)>,
}

impl IntentBuilder {
    pub fn new(intent_name: impl Into<String>) -> Self {
        Self {
            name: intent_name.into(),
            requires: Vec::new(),
            at_least_one: Vec::new(),
            optional: Vec::new(),
        }
    }

    /// Requires an entity of `entity_type`, bound to a field of the same name.
    pub fn require(self, entity_type: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let field = entity_type.clone();
        self.require_as(entity_type, field)
    }

    pub fn require_as(
        mut self,
        entity_type: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        self.requires.push((entity_type.into(), field.into()));
        self
    }

    /// Appends one alternative group: any single type from the group
    /// satisfies it. Each call adds an independent group.
    pub fn one_of<I, S>(mut self, entity_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.at_least_one
            .push(entity_types.into_iter().map(Into::into).collect());
        self
    }

    /// Optionally binds an entity of `entity_type` to a field of the same name.
    pub fn optionally(self, entity_type: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let field = entity_type.clone();
        self.optionally_as(entity_type, field)
    }

    pub fn optionally_as(
        mut self,
        entity_type: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        self.optional.push((entity_type.into(), field.into()));
        self
    }

    /// Freezes the accumulated slots into an immutable schema.
    pub fn build(self) -> Intent {
        Intent::new(self.name, self.requires, self.at_least_one, self.optional)
    }
}
