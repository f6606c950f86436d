//! # Adapters
//!
//! Concrete implementations at the edges of the crate: the durable state
//! store, and in-memory implementations of every outbound port for tests
//! and single-process embedding.

pub mod collaborators;
pub mod store;

pub use collaborators::{
    InMemoryComponentResolver, InMemoryScopeIdentity, InMemorySubscriptionService,
    StaticPlatformConfig,
};
pub use store::{DurableStore, LoadOutcome};
