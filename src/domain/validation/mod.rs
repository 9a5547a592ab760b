//! Validation engine - per-type normalization and custom rule evaluation.
//!
//! Validates one raw answer against one field definition, producing either a
//! normalized value or a list of human-readable error messages. Pure
//! functions over inputs; the two surfaces choose between stopping at the
//! first failing rule (conversational turn) and collecting every failure
//! (wizard step summary) via [`ValidationMode`].

mod engine;

pub use engine::{ValidationEngine, ValidationMode, ValidationOptions};
