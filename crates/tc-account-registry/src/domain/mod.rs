//! # Domain Layer
//!
//! Pure domain logic for the phone-account registry: entities, the
//! persisted aggregate state, error types, and the cross-scope
//! visibility rules. Nothing in this module touches the filesystem or
//! any external collaborator.

pub mod entities;
pub mod errors;
pub mod state;
pub mod visibility;

pub use entities::{
    capability, scheme, AccountIcon, ComponentName, PhoneAccount, PhoneAccountBuilder,
    PhoneAccountHandle, ScopeSerial, UserScope, NO_HIGHLIGHT_COLOR, NO_ICON_TINT, NO_RESOURCE_ID,
};
pub use errors::{CodecError, MutationOutcome, RegistryError, StoreError};
pub use state::RegistryState;
