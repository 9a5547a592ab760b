//! Next-step computation for the wizard surface.

use std::collections::HashMap;

use crate::domain::branching::BranchingEngine;
use crate::domain::catalog::FieldCatalog;

/// Computes the step shown after `current_step`.
///
/// A `skip_to_step` rule on any of the current step's fields wins (the last
/// matching rule, in rule order). Otherwise the flow advances to
/// `current_step + 1` when that step exists; `None` means the flow is
/// finished.
pub fn compute_next_step(
    catalog: &FieldCatalog,
    answers: &HashMap<String, String>,
    current_step: i32,
) -> Option<i32> {
    if let Some(forced) = BranchingEngine::forced_step(catalog, answers, current_step) {
        return Some(forced);
    }

    let next = current_step + 1;
    catalog.has_step(next).then_some(next)
}
