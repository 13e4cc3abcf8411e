//! Day lock policy.
//!
//! Decides whether a transaction date may be edited by a role. The check is a
//! pure function of its three inputs and is re-evaluated on every request.

use chrono::NaiveDate;

use crate::Role;

/// Returns `true` when `role` may **not** edit transactions dated
/// `selected`.
///
/// - `admin` is never locked.
/// - `read` is always locked.
/// - `write` is unlocked only for `today`.
pub fn is_locked(role: Role, selected: NaiveDate, today: NaiveDate) -> bool {
    match role {
        Role::Admin => false,
        Role::Read => true,
        Role::Write => selected != today,
    }
}
