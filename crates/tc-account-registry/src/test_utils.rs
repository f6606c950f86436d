//! Shared fixtures for unit and integration tests. Compiled into the
//! crate so downstream test crates can reuse them.

use crate::adapters::collaborators::{
    InMemoryComponentResolver, InMemoryScopeIdentity, InMemorySubscriptionService,
    StaticPlatformConfig,
};
use crate::adapters::store::frame;
use crate::codec::encode_v1_state;
use crate::domain::entities::{capability, ComponentName, PhoneAccount, PhoneAccountHandle, UserScope};
use crate::ports::outbound::ScopeIdentity;
use crate::service::{PhoneAccountRegistry, RegistryConfig, RegistryDependencies};
use std::path::{Path, PathBuf};

pub type TestRegistry = PhoneAccountRegistry<
    InMemoryComponentResolver,
    InMemorySubscriptionService,
    InMemoryScopeIdentity,
    StaticPlatformConfig,
>;

pub fn test_component(package: &str) -> ComponentName {
    ComponentName::new(package, format!("{package}.ConnectionService"))
}

pub fn test_handle(package: &str, id: &str, scope: UserScope) -> PhoneAccountHandle {
    PhoneAccountHandle::new(test_component(package), id, Some(scope))
}

pub fn call_provider_account(package: &str, id: &str, scope: UserScope) -> PhoneAccount {
    PhoneAccount::builder(test_handle(package, id, scope))
        .capabilities(capability::CALL_PROVIDER)
        .supported_uri_scheme("tel")
        .label(format!("{package} line {id}"))
        .build()
}

pub fn sim_account(package: &str, id: &str, scope: UserScope) -> PhoneAccount {
    PhoneAccount::builder(test_handle(package, id, scope))
        .capabilities(capability::CALL_PROVIDER | capability::SIM_SUBSCRIPTION)
        .supported_uri_scheme("tel")
        .supported_uri_scheme("voicemail")
        .build()
}

pub fn connection_manager_account(package: &str, id: &str, scope: UserScope) -> PhoneAccount {
    PhoneAccount::builder(test_handle(package, id, scope))
        .capabilities(capability::CONNECTION_MANAGER)
        .build()
}

/// A registry wired to shared in-memory collaborators. Tests keep the
/// adapter handles to reshape the world mid-test.
pub struct RegistryHarness {
    pub resolver: InMemoryComponentResolver,
    pub subscriptions: InMemorySubscriptionService,
    pub scopes: InMemoryScopeIdentity,
    pub registry: TestRegistry,
}

impl RegistryHarness {
    /// Harness with default platform config and the root scope (serial 0)
    /// pre-registered.
    pub fn new(state_file: impl Into<PathBuf>) -> Self {
        Self::with_platform(state_file, StaticPlatformConfig::default())
    }

    pub fn with_platform(state_file: impl Into<PathBuf>, platform: StaticPlatformConfig) -> Self {
        let resolver = InMemoryComponentResolver::new();
        let subscriptions = InMemorySubscriptionService::new();
        let scopes = InMemoryScopeIdentity::new();
        scopes.add_scope(UserScope::ROOT, 0);

        let registry = PhoneAccountRegistry::new(
            RegistryDependencies {
                resolver: resolver.clone(),
                subscriptions: subscriptions.clone(),
                scopes: scopes.clone(),
                platform,
            },
            RegistryConfig {
                state_file: state_file.into(),
                process_scope: UserScope::ROOT,
            },
        );

        Self {
            resolver,
            subscriptions,
            scopes,
            registry,
        }
    }

    /// Install the account's component and register it, asserting success.
    pub fn install_and_register(&self, account: PhoneAccount) {
        self.resolver.add_component(&account.handle.component);
        self.registry
            .register(account)
            .expect("bind permission fixture");
    }
}

/// Write a framed state file in the version-1 layout (capabilities and
/// enabled flag only, no URI scheme sets), as a registry predating the
/// current schema would have left behind.
pub fn write_legacy_v1_state_file(
    path: &Path,
    accounts: &[(PhoneAccountHandle, u32, bool)],
    scopes: &dyn ScopeIdentity,
) -> std::io::Result<()> {
    std::fs::write(path, frame(&encode_v1_state(accounts, scopes)))
}
