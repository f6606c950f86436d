//! Mutations: register/unregister, enable/disable, and the two
//! user-chosen defaults.
//!
//! Every committed mutation persists the state before releasing the lock
//! and notifies listeners after releasing it. Validation failures are
//! soft ([`MutationOutcome::Rejected`]) with one exception: registering
//! an account whose connection service lacks the bind permission is a
//! hard [`RegistryError`].

use crate::bus::RegistryEvent;
use crate::domain::entities::{capability, PhoneAccount, PhoneAccountHandle, UserScope};
use crate::domain::errors::{MutationOutcome, RegistryError};
use crate::ports::outbound::{ComponentResolver, PlatformConfig, ScopeIdentity, SubscriptionService};
use crate::service::PhoneAccountRegistry;

impl<CR, SS, SI, PC> PhoneAccountRegistry<CR, SS, SI, PC>
where
    CR: ComponentResolver,
    SS: SubscriptionService,
    SI: ScopeIdentity,
    PC: PlatformConfig,
{
    /// Insert or replace the account with the same handle.
    ///
    /// The enabled flag on the input is ignored: a replaced account keeps
    /// its previous value, and a new account starts disabled unless it is
    /// SIM-subscription-backed.
    pub fn register(&self, mut account: PhoneAccount) -> Result<MutationOutcome, RegistryError> {
        if !self.component_has_bind_permission(&account.handle) {
            tracing::warn!(
                "[tc-reg] refusing to register {:?}: missing bind permission",
                account.handle
            );
            return Err(RegistryError::BindPermissionDenied {
                component: account.handle.component.clone(),
            });
        }

        let mut state = self.lock_state();
        let previous = state.index_of(&account.handle);

        let was_enabled = previous
            .map(|i| state.accounts[i].enabled)
            .unwrap_or(false);
        account.enabled = was_enabled || account.has_capabilities(capability::SIM_SUBSCRIPTION);

        match previous {
            Some(i) => state.accounts[i] = account,
            None => state.accounts.push(account),
        }

        self.persist(&state);
        drop(state);
        self.notify(RegistryEvent::AccountsChanged);
        Ok(MutationOutcome::Committed)
    }

    /// Remove the account, if present. Defaults referring to it are left
    /// in place; they go stale and are filtered at read time, and come
    /// back to life if the account is re-registered.
    pub fn unregister(&self, handle: &PhoneAccountHandle) -> MutationOutcome {
        let mut state = self.lock_state();
        let Some(i) = state.index_of(handle) else {
            return MutationOutcome::Unchanged;
        };
        state.accounts.remove(i);

        self.persist(&state);
        drop(state);
        self.notify(RegistryEvent::AccountsChanged);
        MutationOutcome::Committed
    }

    /// Remove every account `package` registered under `scope`, as when
    /// the owning application is uninstalled for one user.
    pub fn clear_by_owner(&self, package: &str, scope: &UserScope) -> MutationOutcome {
        let mut state = self.lock_state();
        let before = state.accounts.len();
        state.accounts.retain(|a| {
            !(a.handle.component.package == package && a.handle.scope.as_ref() == Some(scope))
        });
        let removed = before - state.accounts.len();
        if removed == 0 {
            return MutationOutcome::Unchanged;
        }
        tracing::info!("[tc-reg] cleared {removed} account(s) owned by {package} in {scope:?}");

        self.persist(&state);
        drop(state);
        self.notify(RegistryEvent::AccountsChanged);
        MutationOutcome::Committed
    }

    /// Toggle an account's enabled flag.
    pub fn set_enabled(&self, handle: &PhoneAccountHandle, enabled: bool) -> MutationOutcome {
        let mut state = self.lock_state();
        let Some(account) = state.account_mut(handle) else {
            tracing::warn!("[tc-reg] set_enabled on unknown account {handle:?}");
            return MutationOutcome::Rejected("unknown account");
        };
        if account.has_capabilities(capability::SIM_SUBSCRIPTION) {
            // SIM accounts are always enabled.
            return MutationOutcome::Unchanged;
        }
        if account.enabled == enabled {
            return MutationOutcome::Unchanged;
        }
        account.enabled = enabled;

        self.persist(&state);
        drop(state);
        self.notify(RegistryEvent::AccountsChanged);
        MutationOutcome::Committed
    }

    /// Set (or clear, with `None`) the user-selected default outgoing
    /// account. A valid request always persists and notifies, even when
    /// it restates the current selection.
    pub fn set_default_outgoing(&self, handle: Option<PhoneAccountHandle>) -> MutationOutcome {
        let mut state = self.lock_state();

        if let Some(handle) = &handle {
            // Validated against the raw account list: the user picked it
            // from a visibility-filtered list already.
            let Some(account) = state.account(handle) else {
                tracing::warn!("[tc-reg] default outgoing rejected, unknown {handle:?}");
                return MutationOutcome::Rejected("unknown account");
            };
            if !account.has_capabilities(capability::CALL_PROVIDER) {
                tracing::warn!("[tc-reg] default outgoing rejected, not a call provider");
                return MutationOutcome::Rejected("not a call provider");
            }
            if account.has_capabilities(capability::SIM_SUBSCRIPTION) {
                // Propagate the choice down to the subscription record.
                if let Some(sub_id) = self.subscriptions.subscription_id_for(account) {
                    self.subscriptions.set_default_voice_subscription(sub_id);
                }
            }
        }

        state.default_outgoing = handle;
        self.persist(&state);
        drop(state);
        self.notify(RegistryEvent::DefaultOutgoingChanged);
        MutationOutcome::Committed
    }

    /// Set the user-chosen sim call manager. `None` is stored as the
    /// no-account-selected sentinel: an explicit "none, thanks" that
    /// survives persistence distinctly from never-configured.
    pub fn set_sim_call_manager(&self, handle: Option<PhoneAccountHandle>) -> MutationOutcome {
        let chosen = match handle {
            None => PhoneAccountHandle::no_account_selected(),
            Some(handle) => handle,
        };

        let mut state = self.lock_state();
        if !chosen.is_no_account_selected() {
            let Some(account) = state.account(&chosen) else {
                tracing::warn!("[tc-reg] sim call manager rejected, unknown {chosen:?}");
                return MutationOutcome::Rejected("unknown account");
            };
            if !account.has_capabilities(capability::CONNECTION_MANAGER) {
                tracing::warn!("[tc-reg] sim call manager rejected, not a connection manager");
                return MutationOutcome::Rejected("not a connection manager");
            }
        }
        state.sim_call_manager = Some(chosen);

        self.persist(&state);
        drop(state);
        self.notify(RegistryEvent::SimCallManagerChanged);
        MutationOutcome::Committed
    }

    /// A handle's connection service must resolve and every match must
    /// declare one of the accepted bind permissions.
    fn component_has_bind_permission(&self, handle: &PhoneAccountHandle) -> bool {
        let matches = self
            .resolver
            .resolve(&handle.component, handle.scope.as_ref());
        !matches.is_empty() && matches.iter().all(|m| m.has_bind_permission())
    }
}
