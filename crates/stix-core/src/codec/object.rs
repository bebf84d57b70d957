//! Single-object encoding and decoding.

use serde::Deserialize;
use serde_json::Value;

use crate::codec::{lenient, DecodeOptions, EncodeOptions};
use crate::error::{DecodeError, EncodeError};
use crate::model::{ObjectKind, StixObject};

/// Encodes an object as compact JSON.
pub fn encode(object: &StixObject) -> Result<Vec<u8>, EncodeError> {
    encode_with_options(object, EncodeOptions::new())
}

/// Encodes an object as indented JSON.
pub fn encode_pretty(object: &StixObject) -> Result<Vec<u8>, EncodeError> {
    encode_with_options(object, EncodeOptions::pretty())
}

/// Encodes an object with the given options.
pub fn encode_with_options(
    object: &StixObject,
    options: EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let result = if options.pretty {
        serde_json::to_vec_pretty(object)
    } else {
        serde_json::to_vec(object)
    };
    result.map_err(|e| EncodeError::Serialize {
        kind: object.kind().to_string(),
        reason: e.to_string(),
    })
}

/// Decodes `bytes` as the shape named by `kind_tag`.
///
/// The payload's own `type` must equal `kind_tag`.
pub fn decode(kind_tag: &str, bytes: &[u8]) -> Result<StixObject, DecodeError> {
    decode_with_options(kind_tag, bytes, &DecodeOptions::default())
}

/// Decodes `bytes` as the shape named by `kind_tag` with the given options.
pub fn decode_with_options(
    kind_tag: &str,
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<StixObject, DecodeError> {
    check_payload_size(bytes, options)?;
    let kind = shaped_kind(kind_tag)?;
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::malformed(kind_tag, e))?;
    decode_value(kind, value, options)
}

/// Decodes `bytes` using the payload's own `type` discriminator.
pub fn decode_any(bytes: &[u8]) -> Result<StixObject, DecodeError> {
    decode_any_with_options(bytes, &DecodeOptions::default())
}

pub fn decode_any_with_options(
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<StixObject, DecodeError> {
    check_payload_size(bytes, options)?;
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::malformed("object", e))?;
    let kind = sniff_value(&value)?;
    decode_value(shaped_kind(kind.as_str())?, value, options)
}

#[derive(Deserialize)]
struct TypeTag {
    #[serde(rename = "type", default)]
    kind: Value,
}

/// Reads the `type` discriminator without decoding the rest of the payload.
pub fn sniff_kind(bytes: &[u8]) -> Result<ObjectKind, DecodeError> {
    let tag: TypeTag =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::malformed("object", e))?;
    kind_from_tag(&tag.kind)
}

pub(crate) fn sniff_value(value: &Value) -> Result<ObjectKind, DecodeError> {
    kind_from_tag(value.get("type").unwrap_or(&Value::Null))
}

/// An absent or null tag is missing; any other non-string tag is unknown.
fn kind_from_tag(tag: &Value) -> Result<ObjectKind, DecodeError> {
    match tag {
        Value::Null => Err(DecodeError::MissingType),
        Value::String(tag) => {
            ObjectKind::from_name(tag).ok_or_else(|| DecodeError::UnknownType { tag: tag.clone() })
        }
        other => Err(DecodeError::UnknownType {
            tag: other.to_string(),
        }),
    }
}

fn shaped_kind(tag: &str) -> Result<ObjectKind, DecodeError> {
    match ObjectKind::from_name(tag) {
        Some(kind) if StixObject::has_shape(kind) => Ok(kind),
        _ => Err(DecodeError::UnknownType {
            tag: tag.to_string(),
        }),
    }
}

fn check_payload_size(bytes: &[u8], options: &DecodeOptions) -> Result<(), DecodeError> {
    if bytes.len() > options.max_payload_size {
        return Err(DecodeError::LengthExceedsLimit {
            field: "payload",
            len: bytes.len(),
            max: options.max_payload_size,
        });
    }
    Ok(())
}

/// Decodes a parsed JSON value as the shape for `kind`.
pub(crate) fn decode_value(
    kind: ObjectKind,
    mut value: Value,
    options: &DecodeOptions,
) -> Result<StixObject, DecodeError> {
    let tag = kind.as_str();
    let Some(record) = value.as_object() else {
        return Err(DecodeError::malformed(tag, "expected a JSON object"));
    };
    match record.get("type") {
        Some(Value::String(embedded)) if embedded == tag => {}
        Some(Value::String(embedded)) => {
            return Err(DecodeError::malformed(
                tag,
                format!("payload type {embedded:?} does not match"),
            ));
        }
        Some(_) => return Err(DecodeError::malformed(tag, "`type` is not a string")),
        None => return Err(DecodeError::malformed(tag, "missing `type`")),
    }

    if options.lenient {
        lenient::coerce(&mut value);
    }

    tracing::debug!(kind = tag, "decoding object");
    match StixObject::from_value(kind, value) {
        Some(result) => result.map_err(|e| DecodeError::malformed(tag, e)),
        None => Err(DecodeError::UnknownType {
            tag: tag.to_string(),
        }),
    }
}
