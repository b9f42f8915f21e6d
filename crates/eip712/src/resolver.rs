//! Template resolution: references in, concrete typed data out.

use alloy_dyn_abi::TypedData;
use alloy_primitives::{Address, B256, ChainId, U256, hex};
use opguard_primitives::UserOperation;
use serde_json::{Value, json};

use crate::{
    ReferenceResolutionError, SigningTemplate, ValidityWindow,
    reference::{REFERENCE_SIGIL, TemplateReference},
};

/// Everything a template may draw values from.
///
/// Assembled once by the caller before resolution; resolution itself is pure
/// and performs no I/O. Fields that a given account setup does not supply
/// stay `None`, and a template referencing them fails with
/// [`ReferenceResolutionError::MissingContext`].
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// The user operation being signed.
    pub user_op: &'a UserOperation,
    /// The target chain id.
    pub chain_id: ChainId,
    /// The operation's entry-point hash, when the caller precomputed one.
    pub user_op_hash: Option<B256>,
    /// The signature validity window.
    pub validity_window: Option<ValidityWindow>,
    /// The validator module the signature is addressed to.
    pub module_address: Option<Address>,
    /// The entry point contract.
    pub entry_point: Option<Address>,
}

/// Resolves every reference in the template and assembles the result into
/// concrete EIP-712 typed data.
///
/// Both the domain and the message trees are walked; non-reference literals
/// pass through untouched. No leaf of the output is ever left as a reference
/// string: resolution either produces a concrete value or fails.
pub fn resolve_template(
    template: &SigningTemplate,
    cx: &ResolveContext<'_>,
) -> Result<TypedData, ReferenceResolutionError> {
    let domain = resolve_value(&template.domain, cx)?;
    let message = resolve_value(&template.message, cx)?;

    serde_json::from_value(json!({
        "types": template.types,
        "primaryType": template.primary_type,
        "domain": domain,
        "message": message,
    }))
    .map_err(|e| ReferenceResolutionError::InvalidTypedData { message: e.to_string() })
}

fn resolve_value(
    value: &Value,
    cx: &ResolveContext<'_>,
) -> Result<Value, ReferenceResolutionError> {
    match value {
        Value::String(s) if s.starts_with(REFERENCE_SIGIL) => {
            let reference: TemplateReference = s.parse()?;
            resolve_reference(reference, cx)
        }
        Value::Object(fields) => {
            let mut out = serde_json::Map::with_capacity(fields.len());
            for (key, field) in fields {
                out.insert(key.clone(), resolve_value(field, cx)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            items.iter().map(|item| resolve_value(item, cx)).collect::<Result<_, _>>().map(Value::Array)
        }
        literal => Ok(literal.clone()),
    }
}

fn resolve_reference(
    reference: TemplateReference,
    cx: &ResolveContext<'_>,
) -> Result<Value, ReferenceResolutionError> {
    let missing =
        || ReferenceResolutionError::MissingContext { reference: reference.name() };

    match reference {
        TemplateReference::UserOpSender => Ok(json!(cx.user_op.sender.to_checksum(None))),
        TemplateReference::UserOpNonce => Ok(uint_value(cx.user_op.nonce)),
        TemplateReference::UserOpCallData => Ok(hex_value(&cx.user_op.call_data)),
        TemplateReference::UserOpInitCode => Ok(hex_value(&cx.user_op.init_code())),
        TemplateReference::UserOpHash => {
            cx.user_op_hash.map(|hash| json!(hash.to_string())).ok_or_else(missing)
        }
        TemplateReference::ValidUntil => {
            cx.validity_window.map(|w| json!(w.valid_until)).ok_or_else(missing)
        }
        TemplateReference::ValidAfter => {
            cx.validity_window.map(|w| json!(w.valid_after)).ok_or_else(missing)
        }
        TemplateReference::ChainId => Ok(json!(cx.chain_id)),
        TemplateReference::ModuleAddress => {
            cx.module_address.map(|a| json!(a.to_checksum(None))).ok_or_else(missing)
        }
        TemplateReference::EntryPoint => {
            cx.entry_point.map(|a| json!(a.to_checksum(None))).ok_or_else(missing)
        }
    }
}

// Nonces and timestamps stay JSON numbers while they fit; larger values fall
// back to decimal strings, which the typed-data coercion accepts as uints.
fn uint_value(value: U256) -> Value {
    if value <= U256::from(u64::MAX) { json!(value.to::<u64>()) } else { json!(value.to_string()) }
}

fn hex_value(bytes: &[u8]) -> Value {
    json!(format!("0x{}", hex::encode(bytes)))
}
