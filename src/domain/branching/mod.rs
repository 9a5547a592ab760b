//! Branching engine - conditional visibility and step jumps.
//!
//! Given the accumulated answer set, decides which fields are visible and
//! whether a forced step jump applies. Pure functions; rule order is the
//! only priority mechanism (last applied wins).

mod engine;

pub use engine::{BranchOutcome, BranchingEngine};
