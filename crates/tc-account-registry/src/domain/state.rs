//! # Registry State
//!
//! The persisted aggregate: user-chosen defaults plus the full account
//! list. Created once at startup (loaded or default-constructed), mutated
//! only through the registry service, persisted after every mutation.

use crate::domain::entities::{PhoneAccount, PhoneAccountHandle};
use crate::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// The complete registry state.
///
/// Accounts are unique by handle. List order is not semantically
/// meaningful but is preserved across save/load for persistence
/// stability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryState {
    /// The account chosen by the user for outgoing calls, or `None` if no
    /// selection was made.
    pub default_outgoing: Option<PhoneAccountHandle>,

    /// The connection-manager account chosen by the user. `None` means
    /// never configured; the no-account-selected sentinel means the user
    /// explicitly chose none.
    pub sim_call_manager: Option<PhoneAccountHandle>,

    /// Every account known to the registry.
    pub accounts: Vec<PhoneAccount>,

    /// Schema version the state was decoded from (or the current version
    /// for fresh state). Monotonically non-decreasing over the registry's
    /// lifetime.
    pub version: u32,
}

impl RegistryState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_outgoing: None,
            sim_call_manager: None,
            accounts: Vec::new(),
            version: SCHEMA_VERSION,
        }
    }

    /// Raw lookup by handle. No visibility filtering.
    #[must_use]
    pub fn account(&self, handle: &PhoneAccountHandle) -> Option<&PhoneAccount> {
        self.accounts.iter().find(|a| &a.handle == handle)
    }

    #[must_use]
    pub fn account_mut(&mut self, handle: &PhoneAccountHandle) -> Option<&mut PhoneAccount> {
        self.accounts.iter_mut().find(|a| &a.handle == handle)
    }

    #[must_use]
    pub fn index_of(&self, handle: &PhoneAccountHandle) -> Option<usize> {
        self.accounts.iter().position(|a| &a.handle == handle)
    }
}

impl Default for RegistryState {
    fn default() -> Self {
        Self::new()
    }
}
