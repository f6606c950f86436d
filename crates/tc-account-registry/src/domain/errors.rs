//! # Domain Errors
//!
//! Error types for the phone-account registry.
//!
//! The registry distinguishes two failure channels and never collapses
//! them:
//!
//! - Hard failures ([`RegistryError`]): the caller did something it had no
//!   authority to do. Surfaced as `Err`.
//! - Soft rejections ([`MutationOutcome::Rejected`]): operating on an
//!   unknown handle, or a default that fails capability validation. These
//!   are logged and reported in the outcome, but the caller is otherwise
//!   unaffected.

use crate::domain::entities::ComponentName;
use thiserror::Error;

/// Hard failures surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The account's connection service does not declare the telecom bind
    /// permission (or cannot be resolved at all). Registration is refused.
    #[error("connection service {component:?} requires the telecom bind permission")]
    BindPermissionDenied { component: ComponentName },
}

/// Result of a fail-soft mutation.
///
/// `Rejected` carries the reason that was logged; callers may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// State changed, was persisted, and listeners were notified.
    Committed,
    /// The request was valid but matched nothing to change.
    Unchanged,
    /// The request failed validation and was dropped (logged, not an error).
    Rejected(&'static str),
}

impl MutationOutcome {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed)
    }
}

/// Failures while encoding or decoding the durable state format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    #[error("node length {len} overruns its parent")]
    BadNodeLength { len: usize },

    #[error("required field missing: {0}")]
    MissingField(&'static str),
}

/// Failures while loading or saving the durable state file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("state encode failed: {0}")]
    Codec(#[from] CodecError),
}
