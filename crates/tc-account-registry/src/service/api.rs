//! [`PhoneAccountRegistryApi`] implementation. Pure delegation to the
//! inherent methods in `mutations` and `queries`.

use crate::domain::entities::{PhoneAccount, PhoneAccountHandle, UserScope};
use crate::domain::errors::{MutationOutcome, RegistryError};
use crate::ports::inbound::PhoneAccountRegistryApi;
use crate::ports::outbound::{ComponentResolver, PlatformConfig, ScopeIdentity, SubscriptionService};
use crate::service::PhoneAccountRegistry;

impl<CR, SS, SI, PC> PhoneAccountRegistryApi for PhoneAccountRegistry<CR, SS, SI, PC>
where
    CR: ComponentResolver,
    SS: SubscriptionService,
    SI: ScopeIdentity,
    PC: PlatformConfig,
{
    fn register(&self, account: PhoneAccount) -> Result<MutationOutcome, RegistryError> {
        PhoneAccountRegistry::register(self, account)
    }

    fn unregister(&self, handle: &PhoneAccountHandle) -> MutationOutcome {
        PhoneAccountRegistry::unregister(self, handle)
    }

    fn clear_by_owner(&self, package: &str, scope: &UserScope) -> MutationOutcome {
        PhoneAccountRegistry::clear_by_owner(self, package, scope)
    }

    fn set_enabled(&self, handle: &PhoneAccountHandle, enabled: bool) -> MutationOutcome {
        PhoneAccountRegistry::set_enabled(self, handle, enabled)
    }

    fn set_default_outgoing(&self, handle: Option<PhoneAccountHandle>) -> MutationOutcome {
        PhoneAccountRegistry::set_default_outgoing(self, handle)
    }

    fn set_sim_call_manager(&self, handle: Option<PhoneAccountHandle>) -> MutationOutcome {
        PhoneAccountRegistry::set_sim_call_manager(self, handle)
    }

    fn all_accounts(&self, caller: &UserScope) -> Vec<PhoneAccount> {
        PhoneAccountRegistry::all_accounts(self, caller)
    }

    fn all_handles(&self, caller: &UserScope) -> Vec<PhoneAccountHandle> {
        PhoneAccountRegistry::all_handles(self, caller)
    }

    fn call_capable_handles(
        &self,
        uri_scheme: Option<&str>,
        include_disabled: bool,
        caller: &UserScope,
    ) -> Vec<PhoneAccountHandle> {
        PhoneAccountRegistry::call_capable_handles(self, uri_scheme, include_disabled, caller)
    }

    fn sim_handles(&self, caller: &UserScope) -> Vec<PhoneAccountHandle> {
        PhoneAccountRegistry::sim_handles(self, caller)
    }

    fn handles_for_package(&self, package: &str, caller: &UserScope) -> Vec<PhoneAccountHandle> {
        PhoneAccountRegistry::handles_for_package(self, package, caller)
    }

    fn connection_manager_handles(&self, caller: &UserScope) -> Vec<PhoneAccountHandle> {
        PhoneAccountRegistry::connection_manager_handles(self, caller)
    }

    fn account(&self, handle: &PhoneAccountHandle) -> Option<PhoneAccount> {
        PhoneAccountRegistry::account(self, handle)
    }

    fn account_visible_to(
        &self,
        handle: &PhoneAccountHandle,
        caller: &UserScope,
    ) -> Option<PhoneAccount> {
        PhoneAccountRegistry::account_visible_to(self, handle, caller)
    }

    fn user_selected_outgoing(&self, caller: &UserScope) -> Option<PhoneAccountHandle> {
        PhoneAccountRegistry::user_selected_outgoing(self, caller)
    }

    fn default_outgoing_for_scheme(
        &self,
        uri_scheme: &str,
        caller: &UserScope,
    ) -> Option<PhoneAccountHandle> {
        PhoneAccountRegistry::default_outgoing_for_scheme(self, uri_scheme, caller)
    }

    fn sim_call_manager(&self, caller: &UserScope) -> Option<PhoneAccountHandle> {
        PhoneAccountRegistry::sim_call_manager(self, caller)
    }

    fn subscription_id_for_account(
        &self,
        handle: &PhoneAccountHandle,
        caller: &UserScope,
    ) -> Option<i32> {
        PhoneAccountRegistry::subscription_id_for_account(self, handle, caller)
    }

    fn is_user_selected_sms_account(
        &self,
        handle: &PhoneAccountHandle,
        caller: &UserScope,
    ) -> bool {
        PhoneAccountRegistry::is_user_selected_sms_account(self, handle, caller)
    }
}
