//! # Telecom Core Test Suite
//!
//! Unified test crate for scenarios that cross module boundaries:
//! registry lifecycle against live collaborators, and durability across
//! simulated process restarts.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── lifecycle.rs    # Multi-user register/query/default flows
//!     └── persistence.rs  # Restart, schema upgrade, scope pruning
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tc-tests
//!
//! # By category
//! cargo test -p tc-tests integration::lifecycle
//! cargo test -p tc-tests integration::persistence
//! ```

pub mod integration;

/// Install a subscriber so test failures come with registry logs. Safe to
/// call from every test; only the first call wins.
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
