//! # Domain Entities
//!
//! Core entities for the phone-account registry.
//!
//! A `PhoneAccount` is a registered call-capable endpoint; its
//! `PhoneAccountHandle` (component + id + owning scope) is the registry's
//! primary key. Capability bit values are stable: they are persisted as a
//! raw integer, so renumbering them would silently corrupt old state files.

use serde::{Deserialize, Serialize};

/// Capability bit-flags describing what a phone account can do.
///
/// Values are persisted; keep them stable.
pub mod capability {
    /// The account can intermediate calls across SIM-backed accounts.
    pub const CONNECTION_MANAGER: u32 = 0x1;
    /// The account can place calls.
    pub const CALL_PROVIDER: u32 = 0x2;
    /// The account is backed by a SIM subscription. Such accounts are
    /// always enabled and their enabled flag cannot be toggled.
    pub const SIM_SUBSCRIPTION: u32 = 0x4;
    /// The account is visible across all user scopes. Reserved for
    /// platform telephony/SIP accounts.
    pub const MULTI_USER: u32 = 0x20;
}

/// Well-known URI schemes an account may support.
pub mod scheme {
    pub const TEL: &str = "tel";
    pub const SIP: &str = "sip";
    pub const VOICEMAIL: &str = "voicemail";
}

/// Sentinel for an icon resource reference without a concrete resource id.
pub const NO_RESOURCE_ID: i32 = -1;
/// Sentinel for an icon with no tint applied.
pub const NO_ICON_TINT: i32 = 0;
/// Sentinel for an account with no highlight color.
pub const NO_HIGHLIGHT_COLOR: i32 = 0;

/// An isolated ownership domain (a device user or profile).
///
/// The numeric id is a volatile runtime identifier; the persisted form is
/// the stable [`ScopeSerial`] resolved through the `ScopeIdentity` port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserScope(u32);

impl UserScope {
    /// The primary/root scope of the device.
    pub const ROOT: UserScope = UserScope(0);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        UserScope(id)
    }

    #[must_use]
    pub const fn id(&self) -> u32 {
        self.0
    }
}

/// Stable cross-reboot identifier for a [`UserScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeSerial(i64);

impl ScopeSerial {
    #[must_use]
    pub const fn new(serial: i64) -> Self {
        ScopeSerial(serial)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

/// An opaque reference to an installed component (package + class).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentName {
    pub package: String,
    pub class: String,
}

impl ComponentName {
    #[must_use]
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            class: class.into(),
        }
    }

    /// Flatten to the persisted `package/class` string form.
    #[must_use]
    pub fn flatten(&self) -> String {
        format!("{}/{}", self.package, self.class)
    }

    /// Parse the `package/class` string form. Returns `None` if the
    /// separator is missing or either side is empty.
    #[must_use]
    pub fn unflatten(flat: &str) -> Option<Self> {
        let (package, class) = flat.split_once('/')?;
        if package.is_empty() || class.is_empty() {
            return None;
        }
        Some(Self::new(package, class))
    }
}

/// Identity of a registered account: component + id + owning scope.
///
/// Equality is structural over all three fields. The owning scope is
/// `None` only for handles read from legacy state files (later pruned or
/// back-filled) and for the no-account-selected sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneAccountHandle {
    pub component: ComponentName,
    pub id: String,
    pub scope: Option<UserScope>,
}

impl PhoneAccountHandle {
    #[must_use]
    pub fn new(component: ComponentName, id: impl Into<String>, scope: Option<UserScope>) -> Self {
        Self {
            component,
            id: id.into(),
            scope,
        }
    }

    /// The explicit "the user chose no sim call manager" sentinel,
    /// distinct from the default never-configured `None`.
    #[must_use]
    pub fn no_account_selected() -> Self {
        Self::new(
            ComponentName::new("null", "null"),
            "NO_ACCOUNT_SELECTED",
            None,
        )
    }

    /// Sentinel check ignoring the owning scope, so that a sentinel whose
    /// scope was back-filled during decode still compares as sentinel.
    #[must_use]
    pub fn is_no_account_selected(&self) -> bool {
        self.component.package == "null"
            && self.component.class == "null"
            && self.id == "NO_ACCOUNT_SELECTED"
    }
}

/// A display icon: either an opaque image payload or a reference to an
/// application resource. Payloads are never decoded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountIcon {
    Payload(Vec<u8>),
    Resource {
        package: String,
        res_id: i32,
        tint: i32,
    },
}

/// A registered call-capable endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneAccount {
    pub handle: PhoneAccountHandle,
    /// Primary address URI, treated as an opaque string.
    pub address: Option<String>,
    /// Subscription address URI, treated as an opaque string.
    pub subscription_address: Option<String>,
    pub capabilities: u32,
    pub icon: Option<AccountIcon>,
    pub highlight_color: i32,
    pub label: Option<String>,
    pub short_description: Option<String>,
    pub supported_uri_schemes: Vec<String>,
    pub enabled: bool,
}

impl PhoneAccount {
    /// Start building an account for the given handle.
    #[must_use]
    pub fn builder(handle: PhoneAccountHandle) -> PhoneAccountBuilder {
        PhoneAccountBuilder::new(handle)
    }

    /// True if the account has ALL of the requested capability bits.
    #[must_use]
    pub fn has_capabilities(&self, mask: u32) -> bool {
        self.capabilities & mask == mask
    }

    #[must_use]
    pub fn supports_uri_scheme(&self, uri_scheme: &str) -> bool {
        self.supported_uri_schemes.iter().any(|s| s == uri_scheme)
    }
}

/// Builder for [`PhoneAccount`].
#[derive(Debug, Clone)]
pub struct PhoneAccountBuilder {
    account: PhoneAccount,
}

impl PhoneAccountBuilder {
    #[must_use]
    pub fn new(handle: PhoneAccountHandle) -> Self {
        Self {
            account: PhoneAccount {
                handle,
                address: None,
                subscription_address: None,
                capabilities: 0,
                icon: None,
                highlight_color: NO_HIGHLIGHT_COLOR,
                label: None,
                short_description: None,
                supported_uri_schemes: Vec::new(),
                enabled: false,
            },
        }
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.account.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn subscription_address(mut self, address: impl Into<String>) -> Self {
        self.account.subscription_address = Some(address.into());
        self
    }

    #[must_use]
    pub fn capabilities(mut self, capabilities: u32) -> Self {
        self.account.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: AccountIcon) -> Self {
        self.account.icon = Some(icon);
        self
    }

    #[must_use]
    pub fn highlight_color(mut self, color: i32) -> Self {
        self.account.highlight_color = color;
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.account.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn short_description(mut self, description: impl Into<String>) -> Self {
        self.account.short_description = Some(description.into());
        self
    }

    #[must_use]
    pub fn supported_uri_scheme(mut self, uri_scheme: impl Into<String>) -> Self {
        self.account.supported_uri_schemes.push(uri_scheme.into());
        self
    }

    #[must_use]
    pub fn supported_uri_schemes(mut self, uri_schemes: Vec<String>) -> Self {
        self.account.supported_uri_schemes = uri_schemes;
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.account.enabled = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> PhoneAccount {
        self.account
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_name_flatten_round_trip() {
        let component = ComponentName::new("com.example.dialer", "com.example.dialer.CallService");
        let flat = component.flatten();
        assert_eq!(flat, "com.example.dialer/com.example.dialer.CallService");
        assert_eq!(ComponentName::unflatten(&flat), Some(component));
    }

    #[test]
    fn component_name_unflatten_rejects_malformed() {
        assert_eq!(ComponentName::unflatten("no-separator"), None);
        assert_eq!(ComponentName::unflatten("/leading"), None);
        assert_eq!(ComponentName::unflatten("trailing/"), None);
    }

    #[test]
    fn has_capabilities_requires_all_bits() {
        let handle = PhoneAccountHandle::new(
            ComponentName::new("pkg", "cls"),
            "id0",
            Some(UserScope::ROOT),
        );
        let account = PhoneAccount::builder(handle)
            .capabilities(capability::CALL_PROVIDER | capability::SIM_SUBSCRIPTION)
            .build();

        assert!(account.has_capabilities(capability::CALL_PROVIDER));
        assert!(
            account.has_capabilities(capability::CALL_PROVIDER | capability::SIM_SUBSCRIPTION)
        );
        assert!(!account.has_capabilities(capability::CONNECTION_MANAGER));
        assert!(
            !account.has_capabilities(capability::CALL_PROVIDER | capability::CONNECTION_MANAGER)
        );
    }

    #[test]
    fn sentinel_ignores_scope() {
        let mut sentinel = PhoneAccountHandle::no_account_selected();
        assert!(sentinel.is_no_account_selected());

        // A decode-time scope back-fill must not break sentinel detection.
        sentinel.scope = Some(UserScope::new(7));
        assert!(sentinel.is_no_account_selected());

        let ordinary = PhoneAccountHandle::new(
            ComponentName::new("pkg", "cls"),
            "NO_ACCOUNT_SELECTED",
            None,
        );
        assert!(!ordinary.is_no_account_selected());
    }
}
