// crates/errand-validation-core/src/runtime/membership.rs
// ============================================================================
// Module: Allow-List Membership
// Description: Blank checks and case-insensitive allow-list matching.
// Purpose: Share the membership primitive between tag and classification checks.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Submitted names are compared against allow-lists without regard to case:
//! `role-1` matches an allow-list entry `ROLE-1`. Blank means absent or
//! whitespace only.

use crate::core::violation::ConstraintReport;

/// Returns the value when it is present and not whitespace only.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|candidate| !candidate.trim().is_empty())
}

/// Returns true when both names are equal ignoring case.
///
/// Characters are folded one at a time, so a final sigma matches `Σ`.
#[must_use]
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left == right
        || left.chars().flat_map(char::to_lowercase).eq(right.chars().flat_map(char::to_lowercase))
        || left.chars().flat_map(char::to_uppercase).eq(right.chars().flat_map(char::to_uppercase))
}

/// Returns the allow-list spelling of `candidate`, if it is a member.
pub fn find_ignore_case<'a, I>(candidate: &str, allow_list: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    allow_list.into_iter().find(|allowed| eq_ignore_case(candidate, allowed))
}

/// Returns true when `candidate` is a member of `allow_list`.
pub fn contains_ignore_case<'a, I>(candidate: &str, allow_list: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    find_ignore_case(candidate, allow_list).is_some()
}

/// Replaces the default violation with `message` and reports the call invalid.
pub(crate) fn reject(report: &mut ConstraintReport, message: &str) -> bool {
    report.disable_default_violation();
    report.add_violation(message);
    false
}
