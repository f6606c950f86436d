//! # Phone Account Registry
//!
//! The authoritative registry of phone accounts: call-capable endpoints
//! registered by applications, the user-chosen defaults among them, and
//! the durable state file that carries both across restarts.
//!
//! ## Responsibilities
//!
//! - Register, replace, and remove phone accounts, enforcing the bind
//!   permission on the backing connection service
//! - Track the user-selected default outgoing account and sim call
//!   manager, including an explicit "none selected" distinct from unset
//! - Filter every read by the caller's user scope so accounts never leak
//!   between users
//! - Persist atomically after every mutation and self-upgrade state files
//!   written by older schema versions on load
//! - Notify registered listeners after each committed mutation
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, errors, the state aggregate, and the
//!   visibility filter
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `codec/` - The versioned durable wire format and upgrade pipeline
//! - `adapters/` - The durable store and in-memory port implementations
//! - `bus/` - Listener registration and change fan-out
//! - `service/` - The registry service implementing the API
//!
//! ## Usage
//!
//! ```ignore
//! use tc_account_registry::adapters::{
//!     InMemoryComponentResolver, InMemoryScopeIdentity,
//!     InMemorySubscriptionService, StaticPlatformConfig,
//! };
//! use tc_account_registry::{PhoneAccountRegistry, RegistryConfig, RegistryDependencies};
//!
//! let registry = PhoneAccountRegistry::new(
//!     RegistryDependencies {
//!         resolver: InMemoryComponentResolver::new(),
//!         subscriptions: InMemorySubscriptionService::new(),
//!         scopes: InMemoryScopeIdentity::new(),
//!         platform: StaticPlatformConfig::default(),
//!     },
//!     RegistryConfig::default(),
//! );
//!
//! registry.register(account)?;
//! let handles = registry.call_capable_handles(Some("tel"), false, &caller);
//! ```

pub mod adapters;
pub mod bus;
pub mod codec;
pub mod domain;
pub mod ports;
pub mod service;
pub mod test_utils;

/// Current schema version of the durable state format. Files written at
/// older versions are upgraded on load and re-persisted at this version.
pub const SCHEMA_VERSION: u32 = 5;

// Re-export key types for convenience
pub use bus::{NotificationBus, RegistryEvent, RegistryListener};
pub use domain::entities::{
    capability, scheme, AccountIcon, ComponentName, PhoneAccount, PhoneAccountBuilder,
    PhoneAccountHandle, ScopeSerial, UserScope,
};
pub use domain::errors::{CodecError, MutationOutcome, RegistryError, StoreError};
pub use domain::state::RegistryState;
pub use ports::inbound::PhoneAccountRegistryApi;
pub use ports::outbound::{
    ComponentResolver, PlatformConfig, ResolvedService, ScopeIdentity, SubscriptionService,
};
pub use service::{PhoneAccountRegistry, RegistryConfig, RegistryDependencies};
