//! Field catalog - read-only view of a campaign's question definitions.
//!
//! Campaign administrators author an ordered set of questions (field key,
//! type, validation rules, branching rules, step grouping) with no code
//! change. This module holds those definitions and the ordering semantics
//! the rest of the engine relies on. Authoring itself is external; the
//! engine only ever reads.
//!
//! # Module Organization
//!
//! - `field_type` - The closed set of question types
//! - `field` - `FieldDefinition`, one onboarding question
//! - `rules` - Validation and branching rule shapes
//! - `view` - `FieldCatalog`, the ordered enabled-field view

mod field;
mod field_type;
mod rules;
mod view;

pub use view::FieldCatalog;
pub use field::FieldDefinition;
pub use field_type::FieldType;
pub use rules::{
    BranchAction, BranchCondition, BranchOperator, BranchingRule, ValidationRule,
    ValidationRuleKind,
};
