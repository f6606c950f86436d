//! # Ports
//!
//! Interface boundaries of the registry crate.
//!
//! - `inbound` - the API the host service drives
//! - `outbound` - the collaborators the registry requires the host to
//!   provide (component resolution, subscriptions, scope identity,
//!   platform configuration)

pub mod inbound;
pub mod outbound;
