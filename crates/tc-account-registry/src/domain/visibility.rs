//! # Visibility Filter
//!
//! Decides whether an account is visible to a caller. This is the
//! security boundary that keeps accounts registered under one user scope
//! from leaking into another.
//!
//! The check ordering is load-bearing and must not be rearranged:
//!
//! 1. Multi-user accounts are visible unconditionally.
//! 2. An account whose owning scope is unset is visible to no one.
//! 3. With no known current scope (bootstrap only), default to visible.
//! 4. Owning scope == calling scope is visible.
//! 5. A root-scope caller additionally sees accounts owned by declared
//!    sub-profiles of the current scope. Profiles only; never other
//!    users.
//! 6. Everything else is invisible.

use crate::domain::entities::{capability, PhoneAccount, UserScope};
use crate::ports::outbound::ScopeIdentity;

/// Whether `account` is visible to a caller running in `calling_scope`
/// while `current_scope` is active on the device.
///
/// Callers that looked the account up by handle handle the
/// nonexistent-account case themselves (nothing is visible through a
/// dangling reference).
#[must_use]
pub fn is_visible(
    account: &PhoneAccount,
    current_scope: Option<&UserScope>,
    calling_scope: &UserScope,
    scopes: &dyn ScopeIdentity,
) -> bool {
    if account.has_capabilities(capability::MULTI_USER) {
        return true;
    }

    let Some(owner) = account.handle.scope.as_ref() else {
        return false;
    };

    let Some(current) = current_scope else {
        // Bootstrap: no active scope known yet. Fail open.
        tracing::debug!("[tc-reg] no current scope; assuming visible");
        return true;
    };

    if owner == calling_scope {
        return true;
    }

    if *calling_scope == UserScope::ROOT {
        return scopes.profiles_of(current).iter().any(|p| p == owner);
    }

    false
}
