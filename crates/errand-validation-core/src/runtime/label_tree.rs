// crates/errand-validation-core/src/runtime/label_tree.rs
// ============================================================================
// Module: Label Tree Validator
// Description: Structural uniqueness checks over recursive label forests.
// Purpose: Reject sibling labels sharing a classification and name.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Every sibling list of a label forest (the root list included) must hold
//! unique `(classification, name)` pairs. Lists under different parents are
//! checked independently, so the same pair may repeat at unrelated levels.
//! Traversal uses an explicit work stack; tree depth never grows the call
//! stack.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::model::Label;
use crate::core::violation::ConstraintReport;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Context-free label forest validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelTreeValidator;

impl LabelTreeValidator {
    /// Creates a label tree validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an optional label forest.
    ///
    /// Invalid forests rely on the report's default violation.
    pub fn is_valid(&self, forest: Option<&[Label]>, _report: &mut ConstraintReport) -> bool {
        let Some(forest) = forest else {
            return true;
        };
        let mut pending: Vec<&[Label]> = vec![forest];
        while let Some(siblings) = pending.pop() {
            if has_sibling_collision(siblings) {
                return false;
            }
            pending.extend(
                siblings
                    .iter()
                    .filter(|label| !label.labels.is_empty())
                    .map(|label| label.labels.as_slice()),
            );
        }
        true
    }
}

/// Returns true when two siblings share a classification and name.
fn has_sibling_collision(siblings: &[Label]) -> bool {
    let mut seen = BTreeSet::new();
    siblings
        .iter()
        .any(|label| !seen.insert((label.classification.as_str(), label.name.as_str())))
}
