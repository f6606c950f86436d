//! # State Codec
//!
//! Encodes and decodes [`RegistryState`] to the versioned durable format.
//!
//! ## Format
//!
//! A tree of tagged nodes, `[tag: u8][len: u32 LE][payload]`:
//!
//! ```text
//! REGISTRY_STATE
//!   VERSION (u32)                   absent => version 1
//!   DEFAULT_OUTGOING?  -> HANDLE
//!   SIM_CALL_MANAGER?  -> HANDLE
//!   ACCOUNTS
//!     ACCOUNT*
//!       HANDLE          -> COMPONENT, ID, SCOPE_SERIAL?
//!       ADDRESS?, SUBSCRIPTION_ADDRESS?
//!       CAPABILITIES (u32)
//!       ICON_PAYLOAD? | ICON_RES?
//!       HIGHLIGHT_COLOR (i32)
//!       LABEL?, SHORT_DESCRIPTION?
//!       SUPPORTED_URI_SCHEMES (count-prefixed strings)
//!       ENABLED (u8)
//! ```
//!
//! Unknown child tags are skipped (their length makes that possible), so
//! newer writers can add fields without breaking older readers. An
//! unrecognized ROOT tag decodes to "no state". Any malformed primitive
//! aborts the decode; callers treat that as no usable state.
//!
//! Handles persist the owning scope's stable serial number, never the
//! volatile runtime id. Encoding always writes the current
//! [`SCHEMA_VERSION`](crate::SCHEMA_VERSION); decoding applies the staged
//! upgrade pipeline in [`raw`] for records written by older versions.

mod bytes;
mod raw;

use crate::domain::entities::{
    AccountIcon, ComponentName, PhoneAccount, PhoneAccountHandle, UserScope,
};
use crate::domain::errors::CodecError;
use crate::domain::state::RegistryState;
use crate::ports::outbound::{PlatformConfig, ScopeIdentity};
use crate::SCHEMA_VERSION;
use bytes::{str_payload, Reader, Writer};
use raw::{apply_upgrades, RawAccountRecord, UpgradeContext};

mod tag {
    pub const REGISTRY_STATE: u8 = 0x01;
    pub const VERSION: u8 = 0x02;
    pub const DEFAULT_OUTGOING: u8 = 0x03;
    pub const SIM_CALL_MANAGER: u8 = 0x04;
    pub const ACCOUNTS: u8 = 0x05;
    pub const ACCOUNT: u8 = 0x06;
    pub const HANDLE: u8 = 0x07;
    pub const COMPONENT: u8 = 0x08;
    pub const ID: u8 = 0x09;
    pub const SCOPE_SERIAL: u8 = 0x0A;
    pub const ADDRESS: u8 = 0x0B;
    pub const SUBSCRIPTION_ADDRESS: u8 = 0x0C;
    pub const CAPABILITIES: u8 = 0x0D;
    pub const ICON_PAYLOAD: u8 = 0x0E;
    pub const ICON_RES: u8 = 0x0F;
    pub const HIGHLIGHT_COLOR: u8 = 0x10;
    pub const LABEL: u8 = 0x11;
    pub const SHORT_DESCRIPTION: u8 = 0x12;
    pub const SUPPORTED_URI_SCHEMES: u8 = 0x13;
    pub const ENABLED: u8 = 0x14;
}

/// Everything the decoder needs from the platform.
pub struct DecodeContext<'a> {
    pub scopes: &'a dyn ScopeIdentity,
    pub platform: &'a dyn PlatformConfig,
    /// Back-fill scope for pre-multi-scope sim-call-manager records.
    pub process_scope: UserScope,
}

/// Encode the state at the current schema version.
#[must_use]
pub fn encode_state(state: &RegistryState, scopes: &dyn ScopeIdentity) -> Vec<u8> {
    let mut root = Writer::new();
    root.u32_node(tag::VERSION, SCHEMA_VERSION);

    if let Some(handle) = &state.default_outgoing {
        let mut child = Writer::new();
        child.node(tag::HANDLE, &encode_handle(handle, scopes));
        root.node(tag::DEFAULT_OUTGOING, &child.into_bytes());
    }

    if let Some(handle) = &state.sim_call_manager {
        let mut child = Writer::new();
        child.node(tag::HANDLE, &encode_handle(handle, scopes));
        root.node(tag::SIM_CALL_MANAGER, &child.into_bytes());
    }

    let mut accounts = Writer::new();
    for account in &state.accounts {
        accounts.node(tag::ACCOUNT, &encode_account(account, scopes));
    }
    root.node(tag::ACCOUNTS, &accounts.into_bytes());

    let mut out = Writer::new();
    out.node(tag::REGISTRY_STATE, &root.into_bytes());
    out.into_bytes()
}

/// Decode a state blob.
///
/// Returns `Ok(None)` for an unrecognized root tag. The returned state's
/// `version` field carries the version the file was written at, so the
/// caller can decide whether to re-persist.
pub fn decode_state(
    buf: &[u8],
    ctx: &DecodeContext<'_>,
) -> Result<Option<RegistryState>, CodecError> {
    let (root_tag, root_payload) = Reader::new(buf).node()?;
    if root_tag != tag::REGISTRY_STATE {
        return Ok(None);
    }

    // The version gates account upgrades, so find it before touching any
    // account node. Absent means a version-1 writer.
    let mut version = 1;
    let mut scan = Reader::new(root_payload);
    while !scan.is_empty() {
        let (child_tag, payload) = scan.node()?;
        if child_tag == tag::VERSION {
            version = Reader::new(payload).u32()?;
            break;
        }
    }

    let mut state = RegistryState::new();
    state.version = version;

    let mut children = Reader::new(root_payload);
    while !children.is_empty() {
        let (child_tag, payload) = children.node()?;
        match child_tag {
            tag::DEFAULT_OUTGOING => {
                state.default_outgoing = Some(decode_nested_handle(payload, ctx)?);
            }
            tag::SIM_CALL_MANAGER => {
                let mut handle = decode_nested_handle(payload, ctx)?;
                if handle.scope.is_none() {
                    // Pre-multi-scope record; adopt the process scope.
                    handle.scope = Some(ctx.process_scope);
                }
                state.sim_call_manager = Some(handle);
            }
            tag::ACCOUNTS => {
                let mut entries = Reader::new(payload);
                while !entries.is_empty() {
                    let (entry_tag, entry_payload) = entries.node()?;
                    if entry_tag == tag::ACCOUNT {
                        state
                            .accounts
                            .push(decode_account(entry_payload, version, ctx)?);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(Some(state))
}

fn encode_handle(handle: &PhoneAccountHandle, scopes: &dyn ScopeIdentity) -> Vec<u8> {
    let mut w = Writer::new();
    w.str_node(tag::COMPONENT, &handle.component.flatten());
    w.str_node(tag::ID, &handle.id);
    if let Some(serial) = handle
        .scope
        .as_ref()
        .and_then(|scope| scopes.serial_for_scope(scope))
    {
        w.i64_node(tag::SCOPE_SERIAL, serial.value());
    }
    w.into_bytes()
}

/// Unwrap the single HANDLE node nested under a default-outgoing or
/// sim-call-manager node.
fn decode_nested_handle(
    payload: &[u8],
    ctx: &DecodeContext<'_>,
) -> Result<PhoneAccountHandle, CodecError> {
    let mut children = Reader::new(payload);
    while !children.is_empty() {
        let (child_tag, child_payload) = children.node()?;
        if child_tag == tag::HANDLE {
            return decode_handle(child_payload, ctx);
        }
    }
    Err(CodecError::MissingField("account_handle"))
}

fn decode_handle(
    payload: &[u8],
    ctx: &DecodeContext<'_>,
) -> Result<PhoneAccountHandle, CodecError> {
    let mut component: Option<ComponentName> = None;
    let mut id: Option<String> = None;
    let mut scope: Option<UserScope> = None;

    let mut children = Reader::new(payload);
    while !children.is_empty() {
        let (child_tag, child_payload) = children.node()?;
        match child_tag {
            tag::COMPONENT => {
                component = Some(
                    ComponentName::unflatten(&str_payload(child_payload)?)
                        .ok_or(CodecError::MissingField("component_name"))?,
                );
            }
            tag::ID => id = Some(str_payload(child_payload)?),
            tag::SCOPE_SERIAL => {
                let serial = Reader::new(child_payload).i64()?;
                // A serial that no longer maps to a live scope decodes to
                // an unset scope; the registry prunes those after load.
                scope = ctx
                    .scopes
                    .scope_for_serial(crate::domain::entities::ScopeSerial::new(serial));
            }
            _ => {}
        }
    }

    Ok(PhoneAccountHandle {
        component: component.ok_or(CodecError::MissingField("component_name"))?,
        id: id.ok_or(CodecError::MissingField("id"))?,
        scope,
    })
}

fn encode_account(account: &PhoneAccount, scopes: &dyn ScopeIdentity) -> Vec<u8> {
    let mut w = Writer::new();
    w.node(tag::HANDLE, &encode_handle(&account.handle, scopes));

    if let Some(address) = &account.address {
        w.str_node(tag::ADDRESS, address);
    }
    if let Some(address) = &account.subscription_address {
        w.str_node(tag::SUBSCRIPTION_ADDRESS, address);
    }
    w.u32_node(tag::CAPABILITIES, account.capabilities);

    match &account.icon {
        Some(AccountIcon::Payload(payload)) => w.node(tag::ICON_PAYLOAD, payload),
        Some(AccountIcon::Resource {
            package,
            res_id,
            tint,
        }) => {
            let mut res = Writer::new();
            res.str_prefixed(package);
            res.i32_raw(*res_id);
            res.i32_raw(*tint);
            w.node(tag::ICON_RES, &res.into_bytes());
        }
        None => {}
    }

    w.i32_node(tag::HIGHLIGHT_COLOR, account.highlight_color);
    if let Some(label) = &account.label {
        w.str_node(tag::LABEL, label);
    }
    if let Some(description) = &account.short_description {
        w.str_node(tag::SHORT_DESCRIPTION, description);
    }

    let mut schemes = Writer::new();
    schemes.u32_raw(account.supported_uri_schemes.len() as u32);
    for uri_scheme in &account.supported_uri_schemes {
        schemes.str_prefixed(uri_scheme);
    }
    w.node(tag::SUPPORTED_URI_SCHEMES, &schemes.into_bytes());

    w.u8_node(tag::ENABLED, u8::from(account.enabled));
    w.into_bytes()
}

fn decode_account(
    payload: &[u8],
    version: u32,
    ctx: &DecodeContext<'_>,
) -> Result<PhoneAccount, CodecError> {
    let mut record: Option<RawAccountRecord> = None;
    let mut children = Reader::new(payload);

    // The handle node is written first; everything else tolerates any
    // order but requires the handle to exist.
    while !children.is_empty() {
        let (child_tag, child_payload) = children.node()?;
        if child_tag == tag::HANDLE {
            record = Some(RawAccountRecord::new(decode_handle(child_payload, ctx)?));
            break;
        }
    }
    let mut record = record.ok_or(CodecError::MissingField("account_handle"))?;

    let mut children = Reader::new(payload);
    while !children.is_empty() {
        let (child_tag, child_payload) = children.node()?;
        match child_tag {
            tag::ADDRESS => record.address = Some(str_payload(child_payload)?),
            tag::SUBSCRIPTION_ADDRESS => {
                record.subscription_address = Some(str_payload(child_payload)?);
            }
            tag::CAPABILITIES => record.capabilities = Reader::new(child_payload).u32()?,
            tag::ICON_PAYLOAD => record.icon_payload = Some(child_payload.to_vec()),
            tag::ICON_RES => {
                let mut r = Reader::new(child_payload);
                let package = r.str_prefixed()?;
                let res_id = r.i32()?;
                let tint = r.i32()?;
                record.icon_resource = Some((package, res_id, tint));
            }
            tag::HIGHLIGHT_COLOR => record.highlight_color = Reader::new(child_payload).i32()?,
            tag::LABEL => record.label = Some(str_payload(child_payload)?),
            tag::SHORT_DESCRIPTION => {
                record.short_description = Some(str_payload(child_payload)?);
            }
            tag::SUPPORTED_URI_SCHEMES => {
                let mut r = Reader::new(child_payload);
                let count = r.u32()? as usize;
                let mut schemes = Vec::with_capacity(count.min(16));
                for _ in 0..count {
                    schemes.push(r.str_prefixed()?);
                }
                record.supported_uri_schemes = Some(schemes);
            }
            tag::ENABLED => record.enabled = Reader::new(child_payload).u8()? != 0,
            _ => {}
        }
    }

    apply_upgrades(
        &mut record,
        version,
        &UpgradeContext {
            use_sip_for_pstn: ctx.platform.use_sip_for_pstn_calls(),
        },
    );
    Ok(record.finalize())
}

// Legacy-writer emulation for upgrade tests: a version-1 record has no
// VERSION node, no scheme list, and no icon.
pub(crate) fn encode_v1_state(
    accounts: &[(PhoneAccountHandle, u32, bool)],
    scopes: &dyn ScopeIdentity,
) -> Vec<u8> {
    let mut list = Writer::new();
    for (handle, capabilities, enabled) in accounts {
        let mut a = Writer::new();
        a.node(tag::HANDLE, &encode_handle(handle, scopes));
        a.u32_node(tag::CAPABILITIES, *capabilities);
        a.u8_node(tag::ENABLED, u8::from(*enabled));
        list.node(tag::ACCOUNT, &a.into_bytes());
    }
    let mut root = Writer::new();
    root.node(tag::ACCOUNTS, &list.into_bytes());
    let mut out = Writer::new();
    out.node(tag::REGISTRY_STATE, &root.into_bytes());
    out.into_bytes()
}
