//! # Inbound Port (Driving Port)
//!
//! The registry API as seen by the owning telephony service. Mirrors the
//! public surface one-to-one; nothing here is exposed over a network.
//!
//! Mutations are fail-soft: validation failures come back as
//! [`MutationOutcome::Rejected`] and are logged, never raised. The single
//! hard failure is the bind-permission authority check on `register`.
//!
//! The calling scope is an explicit parameter on every visibility-
//! sensitive read; there is no ambient caller identity in-process.

use crate::domain::entities::{PhoneAccount, PhoneAccountHandle, UserScope};
use crate::domain::errors::{MutationOutcome, RegistryError};

pub trait PhoneAccountRegistryApi {
    /// Insert or replace the account with the same handle. The enabled
    /// flag is recomputed, never taken from the input: a prior entry's
    /// value is preserved, otherwise the account starts disabled unless it
    /// is SIM-subscription-capable.
    ///
    /// Fails hard only if the account's connection service does not
    /// declare the telecom bind permission.
    fn register(&self, account: PhoneAccount) -> Result<MutationOutcome, RegistryError>;

    /// Remove the account, if present.
    fn unregister(&self, handle: &PhoneAccountHandle) -> MutationOutcome;

    /// Remove every account registered by `package` under `scope`.
    fn clear_by_owner(&self, package: &str, scope: &UserScope) -> MutationOutcome;

    /// Toggle an account's enabled flag. No-op for unknown handles and for
    /// SIM-subscription accounts (those are always enabled).
    fn set_enabled(&self, handle: &PhoneAccountHandle, enabled: bool) -> MutationOutcome;

    /// Set (or clear, with `None`) the user-selected default outgoing
    /// account. A concrete handle must resolve to a known call-provider
    /// account; for SIM accounts the default voice subscription is updated
    /// as a side effect.
    fn set_default_outgoing(&self, handle: Option<PhoneAccountHandle>) -> MutationOutcome;

    /// Set (or explicitly clear, with `None`) the sim call manager. A
    /// concrete handle must resolve to a known connection-manager account.
    /// `None` is stored as the no-account-selected sentinel so an explicit
    /// clear survives persistence distinctly from never-configured.
    fn set_sim_call_manager(&self, handle: Option<PhoneAccountHandle>) -> MutationOutcome;

    /// Every enabled account visible to the caller.
    fn all_accounts(&self, caller: &UserScope) -> Vec<PhoneAccount>;

    /// Handles of every enabled account visible to the caller.
    fn all_handles(&self, caller: &UserScope) -> Vec<PhoneAccountHandle>;

    /// Call-provider accounts, optionally restricted to one URI scheme.
    fn call_capable_handles(
        &self,
        uri_scheme: Option<&str>,
        include_disabled: bool,
        caller: &UserScope,
    ) -> Vec<PhoneAccountHandle>;

    /// SIM-subscription-backed call-provider accounts.
    fn sim_handles(&self, caller: &UserScope) -> Vec<PhoneAccountHandle>;

    /// Accounts registered by the given package.
    fn handles_for_package(&self, package: &str, caller: &UserScope) -> Vec<PhoneAccountHandle>;

    /// Connection-manager-capable accounts, disabled ones included.
    fn connection_manager_handles(&self, caller: &UserScope) -> Vec<PhoneAccountHandle>;

    /// Raw lookup with no visibility filtering. Privileged/internal use.
    fn account(&self, handle: &PhoneAccountHandle) -> Option<PhoneAccount>;

    /// Lookup plus visibility check against the caller.
    fn account_visible_to(
        &self,
        handle: &PhoneAccountHandle,
        caller: &UserScope,
    ) -> Option<PhoneAccount>;

    /// The user-selected default outgoing handle, if it is set and visible
    /// to the caller.
    fn user_selected_outgoing(&self, caller: &UserScope) -> Option<PhoneAccountHandle>;

    /// The default outgoing account for a URI scheme: the user selection
    /// when it is usable, otherwise the single call-capable candidate, and
    /// `None` when there are zero or several candidates.
    fn default_outgoing_for_scheme(
        &self,
        uri_scheme: &str,
        caller: &UserScope,
    ) -> Option<PhoneAccountHandle>;

    /// The effective sim call manager: the sticky user configuration when
    /// it is visible and still resolvable, else the platform default.
    fn sim_call_manager(&self, caller: &UserScope) -> Option<PhoneAccountHandle>;

    /// Subscription id for a visible SIM account, else `None`.
    fn subscription_id_for_account(
        &self,
        handle: &PhoneAccountHandle,
        caller: &UserScope,
    ) -> Option<i32>;

    /// Whether the account backs the user-selected SMS subscription.
    fn is_user_selected_sms_account(
        &self,
        handle: &PhoneAccountHandle,
        caller: &UserScope,
    ) -> bool;
}
