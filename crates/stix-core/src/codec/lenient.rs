//! Lenient import coercions.
//!
//! Feeds in the wild often carry numbers as strings, booleans as `"true"`,
//! a single value where a list is expected, or explicit `null`s. This pass
//! rewrites those shapes once, at the decode boundary, so the typed model
//! never has to accept them:
//!
//! - numeric strings become integers or floats for numeric fields
//! - `"true"` / `"false"` (any case) and `0` / `1` become booleans
//! - a scalar becomes a one-element list for list fields
//! - `null` members are dropped
//!
//! Coercion only touches top-level fields of the record and members of
//! records nested in lists. Extension payloads are passed through as is.

use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    Integer,
    Float,
    Boolean,
    List,
}

fn field_type(name: &str) -> Option<FieldType> {
    let ty = match name {
        "confidence" | "count" | "number_observed" | "size" | "number" | "pid" | "src_port"
        | "dst_port" | "src_byte_count" | "dst_byte_count" | "src_packets" | "dst_packets"
        | "number_of_subkeys" | "subject_public_key_exponent" => FieldType::Integer,
        "latitude" | "longitude" | "precision" => FieldType::Float,
        "revoked" | "defanged" | "is_family" | "summary" | "is_multipart" | "is_active"
        | "is_hidden" | "is_service_account" | "is_privileged" | "can_escalate_privs"
        | "is_disabled" | "is_self_signed" => FieldType::Boolean,
        "labels" | "aliases" | "roles" | "sectors" | "goals" | "secondary_motivations"
        | "personal_motivations" | "protocols" | "languages" | "authors" | "modules"
        | "capabilities" | "implementation_languages" | "architecture_execution_envs"
        | "received_lines" | "selectors" | "external_references" | "granular_markings"
        | "kill_chain_phases" | "values" => FieldType::List,
        _ if name.ends_with("_refs") || name.ends_with("_types") => FieldType::List,
        _ => return None,
    };
    Some(ty)
}

/// Rewrites loosely typed members of a JSON record in place.
///
/// Returns the number of members changed or removed.
pub fn coerce(value: &mut Value) -> usize {
    match value {
        Value::Object(record) => coerce_record(record),
        _ => 0,
    }
}

fn coerce_record(record: &mut Map<String, Value>) -> usize {
    let before = record.len();
    record.retain(|key, v| {
        if v.is_null() {
            tracing::debug!(field = %key, "dropping null member");
        }
        !v.is_null()
    });
    let mut changed = before - record.len();

    for (key, v) in record.iter_mut() {
        if key == "extensions" {
            continue;
        }
        if let Some(ty) = field_type(key) {
            if coerce_field(ty, v) {
                tracing::debug!(field = %key, to = ?ty, "coerced member");
                changed += 1;
            }
        }
        if let Value::Array(items) = v {
            for item in items.iter_mut() {
                if let Value::Object(nested) = item {
                    changed += coerce_record(nested);
                }
            }
        }
    }
    changed
}

fn coerce_field(ty: FieldType, value: &mut Value) -> bool {
    let replacement = match (ty, &*value) {
        (FieldType::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
        (FieldType::Integer, Value::Number(n)) if n.as_i64().is_none() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| Value::from(f as i64)),
        (FieldType::Float, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        (FieldType::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        (FieldType::Boolean, Value::Number(n)) => match n.as_i64() {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        (FieldType::List, Value::Array(_)) => None,
        (FieldType::List, scalar) => Some(Value::Array(vec![scalar.clone()])),
        _ => None,
    };

    match replacement {
        Some(new) => {
            *value = new;
            true
        }
        None => false,
    }
}
