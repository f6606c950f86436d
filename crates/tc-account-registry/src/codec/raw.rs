//! Raw account records and the version-upgrade pipeline.
//!
//! Decoding is staged: the parser fills a [`RawAccountRecord`] with
//! exactly what the file said, then [`apply_upgrades`] runs the ordered
//! upgrade steps for records written by older schema versions, and only
//! then is the record finalized into a [`PhoneAccount`].

use crate::domain::entities::{
    scheme, AccountIcon, ComponentName, PhoneAccount, PhoneAccountHandle, NO_HIGHLIGHT_COLOR,
    NO_ICON_TINT, NO_RESOURCE_ID,
};

/// The SIP connection service that predates per-account URI scheme sets.
/// Version-1 records belonging to it get their scheme set synthesized.
pub(crate) fn legacy_sip_component() -> ComponentName {
    ComponentName::new(
        "com.android.phone",
        "com.android.services.telephony.sip.SipConnectionService",
    )
}

/// An account exactly as parsed from the file, before upgrades.
#[derive(Debug, Clone)]
pub(crate) struct RawAccountRecord {
    pub handle: PhoneAccountHandle,
    pub address: Option<String>,
    pub subscription_address: Option<String>,
    pub capabilities: u32,
    pub icon_payload: Option<Vec<u8>>,
    pub icon_resource: Option<(String, i32, i32)>,
    pub highlight_color: i32,
    pub label: Option<String>,
    pub short_description: Option<String>,
    /// `None` means the field was absent from the record (pre-version-2),
    /// which is distinct from an empty scheme set.
    pub supported_uri_schemes: Option<Vec<String>>,
    pub enabled: bool,
}

impl RawAccountRecord {
    pub(crate) fn new(handle: PhoneAccountHandle) -> Self {
        Self {
            handle,
            address: None,
            subscription_address: None,
            capabilities: 0,
            icon_payload: None,
            icon_resource: None,
            highlight_color: NO_HIGHLIGHT_COLOR,
            label: None,
            short_description: None,
            supported_uri_schemes: None,
            enabled: false,
        }
    }

    pub(crate) fn finalize(self) -> PhoneAccount {
        let icon = if let Some(payload) = self.icon_payload {
            Some(AccountIcon::Payload(payload))
        } else {
            self.icon_resource
                .map(|(package, res_id, tint)| AccountIcon::Resource {
                    package,
                    res_id,
                    tint,
                })
        };

        PhoneAccount {
            handle: self.handle,
            address: self.address,
            subscription_address: self.subscription_address,
            capabilities: self.capabilities,
            icon,
            highlight_color: self.highlight_color,
            label: self.label,
            short_description: self.short_description,
            supported_uri_schemes: self.supported_uri_schemes.unwrap_or_default(),
            enabled: self.enabled,
        }
    }
}

/// Context the upgrade steps need from the platform.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UpgradeContext {
    pub use_sip_for_pstn: bool,
}

type UpgradeFn = fn(&mut RawAccountRecord, &UpgradeContext);

/// Ordered upgrade steps: `(version the field appeared in, step)`. A step
/// runs for every record decoded from a version older than that.
const UPGRADES: &[(u32, UpgradeFn)] = &[
    (2, synthesize_uri_schemes),
    (5, default_icon_to_package_resource),
];

pub(crate) fn apply_upgrades(
    record: &mut RawAccountRecord,
    decoded_version: u32,
    ctx: &UpgradeContext,
) {
    for (introduced_in, step) in UPGRADES {
        if decoded_version < *introduced_in {
            step(record, ctx);
        }
    }
}

/// Pre-version-2 records carry no scheme set. The legacy SIP service gets
/// `sip` (plus `tel` when the global PSTN-over-SIP setting is on);
/// everything else gets `tel` and `voicemail`.
fn synthesize_uri_schemes(record: &mut RawAccountRecord, ctx: &UpgradeContext) {
    let mut schemes = Vec::new();
    if record.handle.component == legacy_sip_component() {
        schemes.push(scheme::SIP.to_string());
        if ctx.use_sip_for_pstn {
            schemes.push(scheme::TEL.to_string());
        }
    } else {
        schemes.push(scheme::TEL.to_string());
        schemes.push(scheme::VOICEMAIL.to_string());
    }
    record.supported_uri_schemes = Some(schemes);
}

/// Pre-version-5 records without an inline icon payload are reinterpreted
/// as a resource reference into the owning component's package.
fn default_icon_to_package_resource(record: &mut RawAccountRecord, _ctx: &UpgradeContext) {
    if record.icon_payload.is_none() {
        record.icon_resource = Some((
            record.handle.component.package.clone(),
            NO_RESOURCE_ID,
            NO_ICON_TINT,
        ));
    }
}
