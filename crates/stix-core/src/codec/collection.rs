//! Heterogeneous collections and bundle envelopes.
//!
//! A collection is either a bare JSON array of objects or a bundle:
//!
//! ```json
//! {"type": "bundle", "id": "bundle--…", "objects": [ … ]}
//! ```
//!
//! Every element is decoded on its own, dispatching on its embedded `type`.
//! A bad element never fails the whole collection.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::object::{decode_value, sniff_value};
use crate::codec::DecodeOptions;
use crate::error::{DecodeError, EncodeError};
use crate::model::{Identifier, ObjectKind, PropertyBlock, StixObject, Timestamp};

/// A bundle envelope around a list of objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(rename = "type")]
    kind: ObjectKind,
    pub id: Identifier,
    #[serde(default)]
    pub objects: Vec<StixObject>,
}

impl Bundle {
    /// Wraps `objects` in a bundle with a fresh id.
    pub fn new(objects: Vec<StixObject>) -> Self {
        Self {
            kind: ObjectKind::Bundle,
            id: Identifier::new(ObjectKind::Bundle),
            objects,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }
}

/// Encodes objects as a JSON array.
pub fn encode_collection(objects: &[StixObject]) -> Result<Vec<u8>, EncodeError> {
    serde_json::to_vec(objects).map_err(|e| EncodeError::Serialize {
        kind: "collection".to_string(),
        reason: e.to_string(),
    })
}

/// Encodes a bundle envelope.
pub fn encode_bundle(bundle: &Bundle) -> Result<Vec<u8>, EncodeError> {
    serde_json::to_vec(bundle).map_err(|e| EncodeError::Serialize {
        kind: ObjectKind::Bundle.to_string(),
        reason: e.to_string(),
    })
}

/// Decodes a JSON array or bundle element by element.
///
/// The outer `Result` fails only if the container itself is unusable. Each
/// inner `Result` is the outcome for one element, in input order. Versioned
/// objects (domain and relationship) are identified by `id` plus `modified`,
/// so several versions of one object may share a collection; a repeated
/// version, or a repeated observable id, yields [`DecodeError::DuplicateId`]
/// for every occurrence after the first.
pub fn decode_collection(
    bytes: &[u8],
) -> Result<Vec<Result<StixObject, DecodeError>>, DecodeError> {
    decode_collection_with_options(bytes, &DecodeOptions::default())
}

pub fn decode_collection_with_options(
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<Result<StixObject, DecodeError>>, DecodeError> {
    if bytes.len() > options.max_payload_size {
        return Err(DecodeError::LengthExceedsLimit {
            field: "payload",
            len: bytes.len(),
            max: options.max_payload_size,
        });
    }

    let container: Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::malformed("collection", e))?;
    let elements = match container {
        Value::Array(items) => items,
        Value::Object(mut envelope) => {
            match envelope.get("type").and_then(Value::as_str) {
                Some("bundle") => {}
                Some(other) => {
                    return Err(DecodeError::malformed(
                        "collection",
                        format!("expected a bundle, found {other:?}"),
                    ));
                }
                None => return Err(DecodeError::MissingType),
            }
            match envelope.remove("objects") {
                Some(Value::Array(items)) => items,
                None | Some(Value::Null) => Vec::new(),
                Some(_) => {
                    return Err(DecodeError::malformed("bundle", "`objects` is not an array"));
                }
            }
        }
        _ => {
            return Err(DecodeError::malformed(
                "collection",
                "expected a JSON array or a bundle",
            ));
        }
    };

    if elements.len() > options.max_collection_len {
        return Err(DecodeError::LengthExceedsLimit {
            field: "objects",
            len: elements.len(),
            max: options.max_collection_len,
        });
    }

    let mut seen: FxHashSet<(Identifier, Option<Timestamp>)> = FxHashSet::default();
    let mut results = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let result = sniff_value(&element)
            .and_then(|kind| decode_value(kind, element, options))
            .and_then(|object| {
                if seen.insert(version_key(&object)) {
                    Ok(object)
                } else {
                    Err(DecodeError::DuplicateId {
                        id: object.id().to_string(),
                    })
                }
            });
        if let Err(e) = &result {
            tracing::warn!(index, error = %e, "skipping collection element");
        }
        results.push(result);
    }

    tracing::debug!(count = results.len(), "decoded collection");
    Ok(results)
}

/// Observables are unversioned, so their id alone is the key.
fn version_key(object: &StixObject) -> (Identifier, Option<Timestamp>) {
    let modified = match object.block() {
        PropertyBlock::Domain(b) => Some(b.modified),
        PropertyBlock::Relationship(b) => Some(b.modified),
        PropertyBlock::Observable(_) => None,
    };
    (object.id().clone(), modified)
}
