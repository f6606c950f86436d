//! Queries: every read is filtered through the visibility check and,
//! except for the privileged raw lookup, through component
//! resolvability. An account whose owning application was uninstalled
//! stays registered but drops out of every query until it resolves
//! again.

use crate::domain::entities::{capability, PhoneAccount, PhoneAccountHandle, UserScope};
use crate::domain::visibility::is_visible;
use crate::ports::outbound::{ComponentResolver, PlatformConfig, ScopeIdentity, SubscriptionService};
use crate::service::PhoneAccountRegistry;

impl<CR, SS, SI, PC> PhoneAccountRegistry<CR, SS, SI, PC>
where
    CR: ComponentResolver,
    SS: SubscriptionService,
    SI: ScopeIdentity,
    PC: PlatformConfig,
{
    /// Every enabled account visible to the caller.
    pub fn all_accounts(&self, caller: &UserScope) -> Vec<PhoneAccount> {
        self.accounts_matching(0, None, None, false, caller)
    }

    /// Handles of every enabled account visible to the caller.
    pub fn all_handles(&self, caller: &UserScope) -> Vec<PhoneAccountHandle> {
        self.handles_matching(0, None, None, false, caller)
    }

    /// Call-provider accounts, optionally restricted to one URI scheme.
    pub fn call_capable_handles(
        &self,
        uri_scheme: Option<&str>,
        include_disabled: bool,
        caller: &UserScope,
    ) -> Vec<PhoneAccountHandle> {
        self.handles_matching(
            capability::CALL_PROVIDER,
            uri_scheme,
            None,
            include_disabled,
            caller,
        )
    }

    /// SIM-subscription-backed call-provider accounts.
    pub fn sim_handles(&self, caller: &UserScope) -> Vec<PhoneAccountHandle> {
        self.handles_matching(
            capability::SIM_SUBSCRIPTION | capability::CALL_PROVIDER,
            None,
            None,
            false,
            caller,
        )
    }

    /// Accounts registered by the given package, disabled ones included.
    pub fn handles_for_package(
        &self,
        package: &str,
        caller: &UserScope,
    ) -> Vec<PhoneAccountHandle> {
        self.handles_matching(0, None, Some(package), true, caller)
    }

    /// Connection-manager-capable accounts, disabled ones included.
    pub fn connection_manager_handles(&self, caller: &UserScope) -> Vec<PhoneAccountHandle> {
        self.handles_matching(capability::CONNECTION_MANAGER, None, None, true, caller)
    }

    /// Raw lookup with no visibility or resolvability filtering.
    /// Privileged/internal use only.
    pub fn account(&self, handle: &PhoneAccountHandle) -> Option<PhoneAccount> {
        self.lock_state().account(handle).cloned()
    }

    /// Lookup plus visibility check against the caller.
    pub fn account_visible_to(
        &self,
        handle: &PhoneAccountHandle,
        caller: &UserScope,
    ) -> Option<PhoneAccount> {
        let account = self.lock_state().account(handle).cloned()?;
        let current = self.current_scope();
        is_visible(&account, current.as_ref(), caller, &self.scopes).then_some(account)
    }

    /// The user-selected default outgoing handle, if set and visible to
    /// the caller. A stale selection (account since unregistered) reads
    /// as unset.
    pub fn user_selected_outgoing(&self, caller: &UserScope) -> Option<PhoneAccountHandle> {
        let selected = self.lock_state().default_outgoing.clone()?;
        self.account_visible_to(&selected, caller).map(|_| selected)
    }

    /// The default outgoing account for a URI scheme: the user selection
    /// when it is visible and supports the scheme (disabled or not);
    /// otherwise the single call-capable candidate. Zero or several
    /// candidates yield `None` so the user is asked to choose.
    pub fn default_outgoing_for_scheme(
        &self,
        uri_scheme: &str,
        caller: &UserScope,
    ) -> Option<PhoneAccountHandle> {
        if let Some(selected) = self.user_selected_outgoing(caller) {
            if let Some(account) = self.account_visible_to(&selected, caller) {
                if account.supports_uri_scheme(uri_scheme) {
                    return Some(selected);
                }
            }
        }

        let mut candidates = self.call_capable_handles(Some(uri_scheme), false, caller);
        if candidates.len() == 1 {
            candidates.pop()
        } else {
            None
        }
    }

    /// The effective sim call manager.
    ///
    /// The user-chosen account is sticky: it survives unregistration and
    /// is honored again once the account exists, resolves, and is visible.
    /// With no usable user choice, the platform's configured default
    /// connection manager is used if a visible registered account matches
    /// its component. The explicit no-account-selected sentinel never
    /// matches a registered account, so it takes the fallback path too.
    pub fn sim_call_manager(&self, caller: &UserScope) -> Option<PhoneAccountHandle> {
        let configured = self.lock_state().sim_call_manager.clone();
        if let Some(configured) = configured {
            let usable = !configured.is_no_account_selected()
                && self.account_visible_to(&configured, caller).is_some()
                && !self
                    .resolver
                    .resolve(&configured.component, configured.scope.as_ref())
                    .is_empty();
            if usable {
                return Some(configured);
            }
        }

        let component = self.platform.default_connection_manager_component()?;
        let mut matches = self.resolver.resolve(&component, None);
        if matches.is_empty() {
            matches = self.resolver.resolve(&component, Some(caller));
        }
        if matches.is_empty() {
            tracing::debug!("[tc-reg] platform connection manager does not resolve");
            return None;
        }

        let handle = self
            .all_handles(caller)
            .into_iter()
            .find(|h| h.component == component);
        if handle.is_none() {
            tracing::debug!("[tc-reg] platform connection manager has no registered account");
        }
        handle
    }

    /// Subscription id for a visible SIM-subscription account.
    pub fn subscription_id_for_account(
        &self,
        handle: &PhoneAccountHandle,
        caller: &UserScope,
    ) -> Option<i32> {
        let account = self.account_visible_to(handle, caller)?;
        if !account.has_capabilities(capability::SIM_SUBSCRIPTION) {
            return None;
        }
        self.subscriptions.subscription_id_for(&account)
    }

    /// Whether the account backs the subscription currently selected as
    /// the SMS default.
    pub fn is_user_selected_sms_account(
        &self,
        handle: &PhoneAccountHandle,
        caller: &UserScope,
    ) -> bool {
        match (
            self.subscription_id_for_account(handle, caller),
            self.subscriptions.default_sms_subscription(),
        ) {
            (Some(sub_id), Some(default)) => sub_id == default,
            _ => false,
        }
    }

    fn handles_matching(
        &self,
        capability_mask: u32,
        uri_scheme: Option<&str>,
        package: Option<&str>,
        include_disabled: bool,
        caller: &UserScope,
    ) -> Vec<PhoneAccountHandle> {
        self.accounts_matching(capability_mask, uri_scheme, package, include_disabled, caller)
            .into_iter()
            .map(|a| a.handle)
            .collect()
    }

    /// The one filter behind every list query. Checks run cheapest first;
    /// resolvability and visibility consult the outbound ports.
    fn accounts_matching(
        &self,
        capability_mask: u32,
        uri_scheme: Option<&str>,
        package: Option<&str>,
        include_disabled: bool,
        caller: &UserScope,
    ) -> Vec<PhoneAccount> {
        let state = self.lock_state();
        let current = self.current_scope();

        let mut matched = Vec::new();
        for account in &state.accounts {
            if !account.enabled && !include_disabled {
                continue;
            }
            if capability_mask != 0 && !account.has_capabilities(capability_mask) {
                continue;
            }
            if let Some(uri_scheme) = uri_scheme {
                if !account.supports_uri_scheme(uri_scheme) {
                    continue;
                }
            }
            if let Some(package) = package {
                if account.handle.component.package != package {
                    continue;
                }
            }
            if self
                .resolver
                .resolve(&account.handle.component, account.handle.scope.as_ref())
                .is_empty()
            {
                continue;
            }
            if !is_visible(account, current.as_ref(), caller, &self.scopes) {
                continue;
            }
            matched.push(account.clone());
        }
        matched
    }
}
