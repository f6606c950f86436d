//! # In-Memory Collaborator Adapters
//!
//! Implementations of every outbound port backed by shared in-memory
//! tables. Each adapter is `Clone` and clones share state, so a test (or
//! a single-process host) can keep a handle and mutate the world after
//! the registry has been constructed - uninstall a component, delete a
//! user scope, flip a subscription default.

use crate::domain::entities::{ComponentName, PhoneAccount, PhoneAccountHandle, ScopeSerial, UserScope};
use crate::ports::outbound::{
    ComponentResolver, PlatformConfig, ResolvedService, ScopeIdentity, SubscriptionService,
    BIND_TELECOM_CONNECTION_SERVICE,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Component catalog keyed by flattened component name.
#[derive(Clone, Default)]
pub struct InMemoryComponentResolver {
    inner: Arc<Mutex<HashMap<String, Vec<ResolvedService>>>>,
}

impl InMemoryComponentResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a component declaring the telecom bind permission.
    pub fn add_component(&self, component: &ComponentName) {
        self.add_component_with_permission(component, Some(BIND_TELECOM_CONNECTION_SERVICE));
    }

    /// Install a component declaring an arbitrary (or no) permission.
    pub fn add_component_with_permission(
        &self,
        component: &ComponentName,
        permission: Option<&str>,
    ) {
        let service = ResolvedService {
            permission: permission.map(str::to_string),
        };
        self.inner
            .lock()
            .expect("resolver table")
            .insert(component.flatten(), vec![service]);
    }

    /// Uninstall a component; it stops resolving everywhere.
    pub fn remove_component(&self, component: &ComponentName) {
        self.inner
            .lock()
            .expect("resolver table")
            .remove(&component.flatten());
    }
}

impl ComponentResolver for InMemoryComponentResolver {
    fn resolve(
        &self,
        component: &ComponentName,
        _scope: Option<&UserScope>,
    ) -> Vec<ResolvedService> {
        self.inner
            .lock()
            .expect("resolver table")
            .get(&component.flatten())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Default)]
struct SubscriptionTable {
    by_handle: HashMap<PhoneAccountHandle, i32>,
    default_voice: Option<i32>,
    default_sms: Option<i32>,
}

/// Subscription-id table with recorded default assignments.
#[derive(Clone, Default)]
pub struct InMemorySubscriptionService {
    inner: Arc<Mutex<SubscriptionTable>>,
}

impl InMemorySubscriptionService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_subscription_id(&self, handle: &PhoneAccountHandle, sub_id: i32) {
        self.inner
            .lock()
            .expect("subscription table")
            .by_handle
            .insert(handle.clone(), sub_id);
    }

    pub fn set_default_sms(&self, sub_id: i32) {
        self.inner.lock().expect("subscription table").default_sms = Some(sub_id);
    }

    /// The default voice subscription recorded by the registry, if any.
    #[must_use]
    pub fn default_voice(&self) -> Option<i32> {
        self.inner.lock().expect("subscription table").default_voice
    }
}

impl SubscriptionService for InMemorySubscriptionService {
    fn subscription_id_for(&self, account: &PhoneAccount) -> Option<i32> {
        self.inner
            .lock()
            .expect("subscription table")
            .by_handle
            .get(&account.handle)
            .copied()
    }

    fn set_default_voice_subscription(&self, sub_id: i32) {
        self.inner
            .lock()
            .expect("subscription table")
            .default_voice = Some(sub_id);
    }

    fn default_sms_subscription(&self) -> Option<i32> {
        self.inner.lock().expect("subscription table").default_sms
    }
}

#[derive(Default)]
struct ScopeTable {
    serials: HashMap<u32, i64>,
    profiles: HashMap<u32, Vec<UserScope>>,
}

/// Scope identity table with removable scopes and profile nesting.
#[derive(Clone, Default)]
pub struct InMemoryScopeIdentity {
    inner: Arc<Mutex<ScopeTable>>,
}

impl InMemoryScopeIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scope(&self, scope: UserScope, serial: i64) {
        self.inner
            .lock()
            .expect("scope table")
            .serials
            .insert(scope.id(), serial);
    }

    /// Declare `profile` as a sub-profile of `parent` (and register it as
    /// a live scope).
    pub fn add_profile(&self, parent: UserScope, profile: UserScope, serial: i64) {
        let mut table = self.inner.lock().expect("scope table");
        table.serials.insert(profile.id(), serial);
        table.profiles.entry(parent.id()).or_default().push(profile);
    }

    /// Delete a scope, as when a device user is removed. Its serial stops
    /// resolving in both directions.
    pub fn remove_scope(&self, scope: &UserScope) {
        let mut table = self.inner.lock().expect("scope table");
        table.serials.remove(&scope.id());
        for profiles in table.profiles.values_mut() {
            profiles.retain(|p| p != scope);
        }
    }
}

impl ScopeIdentity for InMemoryScopeIdentity {
    fn serial_for_scope(&self, scope: &UserScope) -> Option<ScopeSerial> {
        self.inner
            .lock()
            .expect("scope table")
            .serials
            .get(&scope.id())
            .map(|serial| ScopeSerial::new(*serial))
    }

    fn scope_for_serial(&self, serial: ScopeSerial) -> Option<UserScope> {
        self.inner
            .lock()
            .expect("scope table")
            .serials
            .iter()
            .find(|(_, s)| **s == serial.value())
            .map(|(id, _)| UserScope::new(*id))
    }

    fn profiles_of(&self, scope: &UserScope) -> Vec<UserScope> {
        let table = self.inner.lock().expect("scope table");
        let mut profiles = vec![*scope];
        if let Some(declared) = table.profiles.get(&scope.id()) {
            profiles.extend(declared.iter().copied());
        }
        profiles
    }
}

/// Fixed platform configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticPlatformConfig {
    pub default_connection_manager: Option<ComponentName>,
    pub use_sip_for_pstn: bool,
}

impl PlatformConfig for StaticPlatformConfig {
    fn default_connection_manager_component(&self) -> Option<ComponentName> {
        self.default_connection_manager.clone()
    }

    fn use_sip_for_pstn_calls(&self) -> bool {
        self.use_sip_for_pstn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_clones_share_state() {
        let resolver = InMemoryComponentResolver::new();
        let clone = resolver.clone();
        let component = ComponentName::new("pkg", "cls");

        resolver.add_component(&component);
        assert_eq!(clone.resolve(&component, None).len(), 1);

        clone.remove_component(&component);
        assert!(resolver.resolve(&component, None).is_empty());
    }

    #[test]
    fn resolved_permission_gates_bind_check() {
        let resolver = InMemoryComponentResolver::new();
        let component = ComponentName::new("pkg", "cls");
        resolver.add_component_with_permission(&component, Some("android.permission.INTERNET"));

        let matches = resolver.resolve(&component, None);
        assert!(!matches[0].has_bind_permission());
    }

    #[test]
    fn scope_serial_resolves_both_ways_until_removed() {
        let scopes = InMemoryScopeIdentity::new();
        let scope = UserScope::new(10);
        scopes.add_scope(scope, 100);

        assert_eq!(scopes.serial_for_scope(&scope), Some(ScopeSerial::new(100)));
        assert_eq!(scopes.scope_for_serial(ScopeSerial::new(100)), Some(scope));

        scopes.remove_scope(&scope);
        assert_eq!(scopes.serial_for_scope(&scope), None);
        assert_eq!(scopes.scope_for_serial(ScopeSerial::new(100)), None);
    }

    #[test]
    fn profiles_include_the_scope_itself() {
        let scopes = InMemoryScopeIdentity::new();
        let parent = UserScope::new(10);
        let profile = UserScope::new(11);
        scopes.add_scope(parent, 100);
        scopes.add_profile(parent, profile, 101);

        assert_eq!(scopes.profiles_of(&parent), vec![parent, profile]);
    }
}
