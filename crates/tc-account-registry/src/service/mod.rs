//! # Phone Account Registry Service
//!
//! The main service implementing the registry API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements [`PhoneAccountRegistryApi`] for mutations and queries
//! 2. Guards the state behind one mutex; every committed mutation is
//!    persisted before the lock is released
//! 3. Notifies listeners after the lock is released, so listeners may
//!    call back into the registry
//! 4. Uses dependency injection for all external collaborators
//!
//! [`PhoneAccountRegistryApi`]: crate::ports::inbound::PhoneAccountRegistryApi

mod api;
mod mutations;
mod queries;

use crate::adapters::store::{DurableStore, LoadOutcome};
use crate::bus::{NotificationBus, RegistryEvent, RegistryListener};
use crate::codec::DecodeContext;
use crate::domain::entities::UserScope;
use crate::domain::state::RegistryState;
use crate::ports::outbound::{ComponentResolver, PlatformConfig, ScopeIdentity, SubscriptionService};
use crate::SCHEMA_VERSION;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Construction-time configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Where the durable state lives.
    pub state_file: PathBuf,
    /// The scope this registry process runs under. Used to back-fill
    /// legacy persisted handles and as the fallback current scope.
    pub process_scope: UserScope,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from("phone-account-registrar-state.bin"),
            process_scope: UserScope::ROOT,
        }
    }
}

/// Dependencies for [`PhoneAccountRegistry`].
pub struct RegistryDependencies<CR, SS, SI, PC> {
    pub resolver: CR,
    pub subscriptions: SS,
    pub scopes: SI,
    pub platform: PC,
}

/// The phone account registry.
///
/// Holds the authoritative account state for the process, keeps it
/// durable across restarts, and filters every read by caller scope.
pub struct PhoneAccountRegistry<CR, SS, SI, PC>
where
    CR: ComponentResolver,
    SS: SubscriptionService,
    SI: ScopeIdentity,
    PC: PlatformConfig,
{
    pub(crate) resolver: CR,
    pub(crate) subscriptions: SS,
    pub(crate) scopes: SI,
    pub(crate) platform: PC,
    pub(crate) store: DurableStore,
    pub(crate) state: Mutex<RegistryState>,
    /// The scope active on the device. `set_current_scope` updates it on
    /// user switch.
    pub(crate) current_scope: Mutex<Option<UserScope>>,
    pub(crate) process_scope: UserScope,
    pub(crate) bus: NotificationBus,
}

impl<CR, SS, SI, PC> PhoneAccountRegistry<CR, SS, SI, PC>
where
    CR: ComponentResolver,
    SS: SubscriptionService,
    SI: ScopeIdentity,
    PC: PlatformConfig,
{
    /// Create the registry and load its durable state.
    ///
    /// On construction, this will:
    /// 1. Load and (if written by an older schema) upgrade the state file
    /// 2. Prune accounts whose owning scope no longer exists
    /// 3. Re-persist at the current schema version if either step changed
    ///    anything
    ///
    /// A missing or corrupt state file yields an empty registry; corruption
    /// is logged, never raised.
    pub fn new(deps: RegistryDependencies<CR, SS, SI, PC>, config: RegistryConfig) -> Self {
        let store = DurableStore::new(config.state_file);

        let ctx = DecodeContext {
            scopes: &deps.scopes,
            platform: &deps.platform,
            process_scope: config.process_scope,
        };
        let (mut state, mut needs_resave) = match store.load(&ctx) {
            LoadOutcome::Loaded {
                state,
                decoded_version,
            } => {
                if decoded_version < SCHEMA_VERSION {
                    tracing::info!(
                        "[tc-reg] state upgraded from schema version {decoded_version} to {SCHEMA_VERSION}"
                    );
                }
                (state, decoded_version < SCHEMA_VERSION)
            }
            LoadOutcome::Absent => (RegistryState::new(), false),
            LoadOutcome::Corrupt => {
                tracing::warn!("[tc-reg] starting with empty state after corrupt state file");
                (RegistryState::new(), false)
            }
        };

        // Accounts whose owning scope was deleted while we were down are
        // unreachable through the visibility filter. Drop them now.
        let before = state.accounts.len();
        state.accounts.retain(|a| a.handle.scope.is_some());
        let pruned = before - state.accounts.len();
        if pruned > 0 {
            tracing::info!("[tc-reg] pruned {pruned} account(s) with deleted owning scopes");
            needs_resave = true;
        }

        state.version = SCHEMA_VERSION;
        if needs_resave {
            if let Err(err) = store.save(&state, &deps.scopes) {
                tracing::warn!("[tc-reg] failed to re-persist upgraded state: {err}");
            }
        }

        Self {
            resolver: deps.resolver,
            subscriptions: deps.subscriptions,
            scopes: deps.scopes,
            platform: deps.platform,
            store,
            state: Mutex::new(state),
            current_scope: Mutex::new(Some(config.process_scope)),
            process_scope: config.process_scope,
            bus: NotificationBus::new(),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn RegistryListener>) {
        self.bus.add_listener(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn RegistryListener>) {
        self.bus.remove_listener(listener);
    }

    /// Record a user switch. `None` resets to the process scope.
    pub fn set_current_scope(&self, scope: Option<UserScope>) {
        let scope = scope.unwrap_or(self.process_scope);
        *self
            .current_scope
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(scope);
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, RegistryState> {
        // A panic mid-mutation leaves valid (if stale) state; recover.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn current_scope(&self) -> Option<UserScope> {
        *self
            .current_scope
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist the given state. A write failure is logged and swallowed:
    /// the in-memory state stays authoritative and the previous durable
    /// copy is intact.
    pub(crate) fn persist(&self, state: &RegistryState) {
        if let Err(err) = self.store.save(state, &self.scopes) {
            tracing::warn!("[tc-reg] failed to persist state: {err}");
        }
    }

    pub(crate) fn notify(&self, event: RegistryEvent) {
        self.bus.notify(event);
    }
}
