//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the registry requires the host application to implement.
//!
//! Production implementations live in the host; in-memory adapters for
//! every port ship in `adapters::collaborators` for tests and
//! single-process embedding.

use crate::domain::entities::{ComponentName, PhoneAccount, ScopeSerial, UserScope};

/// Permission a resolved connection service may declare. Registration
/// requires one of these on every match.
pub const BIND_CONNECTION_SERVICE: &str = "android.permission.BIND_CONNECTION_SERVICE";
pub const BIND_TELECOM_CONNECTION_SERVICE: &str =
    "android.permission.BIND_TELECOM_CONNECTION_SERVICE";

/// A service match produced by [`ComponentResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedService {
    /// The bind permission the service declares, if any.
    pub permission: Option<String>,
}

impl ResolvedService {
    /// True if the service declares one of the accepted bind permissions.
    #[must_use]
    pub fn has_bind_permission(&self) -> bool {
        matches!(
            self.permission.as_deref(),
            Some(BIND_CONNECTION_SERVICE) | Some(BIND_TELECOM_CONNECTION_SERVICE)
        )
    }
}

/// Abstract interface over the host's installed-component catalog.
///
/// Resolvability doubles as a liveness check: an account whose component
/// no longer resolves (owning app uninstalled) drops out of every query.
pub trait ComponentResolver: Send + Sync {
    /// Resolve a component, optionally restricted to one scope. Returns
    /// every matching call-handling service; empty means unresolvable.
    fn resolve(&self, component: &ComponentName, scope: Option<&UserScope>)
        -> Vec<ResolvedService>;
}

/// Abstract interface for subscription-id lookup and default-subscription
/// assignment.
pub trait SubscriptionService: Send + Sync {
    /// Subscription id backing a SIM account, or `None` if the account has
    /// no subscription.
    fn subscription_id_for(&self, account: &PhoneAccount) -> Option<i32>;

    /// Record the given subscription as the default for voice calls.
    fn set_default_voice_subscription(&self, sub_id: i32);

    /// The subscription currently selected as the SMS default.
    fn default_sms_subscription(&self) -> Option<i32>;
}

/// Abstract interface over scope identity and nesting.
pub trait ScopeIdentity: Send + Sync {
    /// Stable serial for a scope, or `None` if the scope does not exist.
    fn serial_for_scope(&self, scope: &UserScope) -> Option<ScopeSerial>;

    /// Scope for a persisted serial, or `None` if that scope was deleted.
    fn scope_for_serial(&self, serial: ScopeSerial) -> Option<UserScope>;

    /// The declared sub-profiles of a scope (work-profile nesting),
    /// including the scope itself.
    fn profiles_of(&self, scope: &UserScope) -> Vec<UserScope>;
}

/// Abstract interface over platform-level configuration.
pub trait PlatformConfig: Send + Sync {
    /// The platform-configured fallback connection manager, if any.
    fn default_connection_manager_component(&self) -> Option<ComponentName>;

    /// Whether the global SIP settings route PSTN calls through SIP.
    /// Consulted only while upgrading version-1 state records.
    fn use_sip_for_pstn_calls(&self) -> bool;
}
