//! Sanitization of objects before persistence.
//!
//! [`sanitize`] returns a cleaned copy of an object: every free-text field,
//! list element, map key and value, and nested extension value goes through
//! [`clean_text`]. Identifiers, timestamps, numbers and booleans are left
//! untouched, as are machine-readable strings such as patterns, URLs and
//! hashes (see [`VERBATIM_FIELDS`]).
//!
//! Domain objects additionally get `modified` stamped from the supplied
//! clock, so sanitization is idempotent on every field except that one.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::model::{
    Clock, DomainCommon, ExternalReference, Identifier, KillChainPhase,
    ObservableCommon, RelationshipCommon, StixObject, Timestamp, WindowsRegistryValue,
};

pub use crate::util::clean_text;

/// Fields whose content is machine-readable and must not be escaped.
pub const VERBATIM_FIELDS: &[&str] = &[
    "pattern",
    "value",
    "url",
    "hashes",
    "payload_bin",
    "decryption_key",
    "credential",
    "command_line",
    "cwd",
    "key",
    "path",
    "path_enc",
    "name_enc",
    "magic_number_hex",
    "cpe",
    "swid",
    "message_id",
    "received_lines",
    "additional_header_fields",
    "x509_v3_extensions",
    "ipfix",
    "lang",
    "selectors",
];

/// Returns true if `field` is copied through sanitization unchanged.
pub fn is_verbatim(field: &str) -> bool {
    VERBATIM_FIELDS.contains(&field)
}

/// Returns a sanitized copy of `object`.
///
/// Never fails. The input is not modified.
pub fn sanitize(object: &StixObject, clock: &dyn Clock) -> StixObject {
    let mut cleaned = object.clone();
    cleaned.sanitize_fields();
    if let Some(common) = cleaned.domain_common_mut() {
        common.touch(clock);
    }
    tracing::debug!(id = %cleaned.id(), kind = %cleaned.kind(), "sanitized object");
    cleaned
}

/// In-place cleaning of a record and everything it contains.
pub trait Sanitize {
    fn sanitize(&mut self);
}

/// In-place cleaning of one field value.
pub trait SanitizeField {
    fn sanitize_value(&mut self);
}

/// Cleans `value` unless `name` is a verbatim field.
pub fn sanitize_field<T: SanitizeField + ?Sized>(name: &str, value: &mut T) {
    if !is_verbatim(name) {
        value.sanitize_value();
    }
}

impl SanitizeField for String {
    fn sanitize_value(&mut self) {
        let cleaned = clean_text(self);
        if cleaned != *self {
            *self = cleaned;
        }
    }
}

macro_rules! opaque_fields {
    ($($t:ty),* $(,)?) => {
        $(
            impl SanitizeField for $t {
                fn sanitize_value(&mut self) {}
            }
        )*
    };
}

opaque_fields! {
    bool,
    i64,
    f64,
    Identifier,
    Timestamp,
}

impl<T: SanitizeField> SanitizeField for Option<T> {
    fn sanitize_value(&mut self) {
        if let Some(value) = self {
            value.sanitize_value();
        }
    }
}

impl<T: SanitizeField> SanitizeField for Vec<T> {
    fn sanitize_value(&mut self) {
        for item in self.iter_mut() {
            item.sanitize_value();
        }
    }
}

impl<V: SanitizeField> SanitizeField for BTreeMap<String, V> {
    fn sanitize_value(&mut self) {
        let entries = std::mem::take(self);
        self.extend(clean_entries(entries));
    }
}

/// Cleans keys and values of a map's entries.
///
/// Keys that are already clean are placed first. A key whose cleaned form
/// is taken keeps its original spelling, so no value is ever dropped.
fn clean_entries<V: SanitizeField>(
    entries: impl IntoIterator<Item = (String, V)>,
) -> Vec<(String, V)> {
    let (clean, dirty): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|(key, _)| clean_text(key) == *key);

    let mut taken: BTreeSet<String> = clean.iter().map(|(key, _)| key.clone()).collect();
    let mut out = Vec::with_capacity(clean.len() + dirty.len());
    for (key, mut value) in clean {
        value.sanitize_value();
        out.push((key, value));
    }
    for (key, mut value) in dirty {
        value.sanitize_value();
        let cleaned = clean_text(&key);
        if taken.insert(cleaned.clone()) {
            out.push((cleaned, value));
        } else {
            tracing::warn!(
                key = %key,
                cleaned = %cleaned,
                "cleaned key collides, keeping original"
            );
            taken.insert(key.clone());
            out.push((key, value));
        }
    }
    out
}

impl SanitizeField for Value {
    fn sanitize_value(&mut self) {
        match self {
            Value::String(s) => s.sanitize_value(),
            Value::Array(items) => items.sanitize_value(),
            Value::Object(map) => {
                let entries = std::mem::take(map);
                map.extend(clean_entries(entries));
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }
}

impl SanitizeField for ExternalReference {
    fn sanitize_value(&mut self) {
        sanitize_field("source_name", &mut self.source_name);
        sanitize_field("description", &mut self.description);
        sanitize_field("url", &mut self.url);
        sanitize_field("hashes", &mut self.hashes);
        sanitize_field("external_id", &mut self.external_id);
    }
}

impl SanitizeField for KillChainPhase {
    fn sanitize_value(&mut self) {
        self.kill_chain_name.sanitize_value();
        self.phase_name.sanitize_value();
    }
}

impl SanitizeField for WindowsRegistryValue {
    fn sanitize_value(&mut self) {
        self.name.sanitize_value();
        self.data_type.sanitize_value();
    }
}

impl Sanitize for DomainCommon {
    fn sanitize(&mut self) {
        sanitize_field("labels", &mut self.labels);
        sanitize_field("external_references", &mut self.external_references);
        sanitize_field("extensions", &mut self.extensions);
    }
}

impl Sanitize for ObservableCommon {
    fn sanitize(&mut self) {
        sanitize_field("extensions", &mut self.extensions);
    }
}

impl Sanitize for RelationshipCommon {
    fn sanitize(&mut self) {}
}
