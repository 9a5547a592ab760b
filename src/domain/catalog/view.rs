//! FieldCatalog - the ordered enabled-field view of one campaign.

use std::collections::BTreeSet;

use super::FieldDefinition;

/// Read-only, ordered view of a campaign's enabled field definitions.
///
/// Construction filters out disabled definitions and sorts the remainder by
/// `(step_number, sort_order)`; every downstream ordering decision (next
/// field, next step, rule evaluation order) walks this sequence. Keeping the
/// filter and sort in one place means a disabled field can never leak into
/// flow computation.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: Vec<FieldDefinition>,
}

impl FieldCatalog {
    /// Builds a catalog from raw definitions, keeping only enabled fields
    /// in `(step_number, sort_order)` order.
    pub fn new(mut definitions: Vec<FieldDefinition>) -> Self {
        definitions.retain(|f| f.is_enabled);
        definitions.sort_by_key(FieldDefinition::order_key);
        Self { fields: definitions }
    }

    /// Returns the enabled fields in presentation order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Looks up an enabled field by key.
    pub fn find(&self, field_key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.field_key == field_key)
    }

    /// Returns true if the campaign has no enabled fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of enabled fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Keys of every enabled field, in presentation order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field_key.as_str())
    }

    /// Keys of every required enabled field.
    ///
    /// This is the completion denominator: branching only reorders or
    /// reveals, it never shrinks this set.
    pub fn required_keys(&self) -> BTreeSet<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_required)
            .map(|f| f.field_key.as_str())
            .collect()
    }

    /// Fields grouped into the given step, in sort order.
    pub fn fields_in_step(&self, step_number: i32) -> impl Iterator<Item = &FieldDefinition> {
        self.fields
            .iter()
            .filter(move |f| f.step_number == step_number)
    }

    /// Returns true if any enabled field belongs to the given step.
    pub fn has_step(&self, step_number: i32) -> bool {
        self.fields.iter().any(|f| f.step_number == step_number)
    }
}
