//! Error types for identifier parsing, validation, encoding and decoding.

use std::fmt;

use thiserror::Error;

/// Error returned when a string is not a well-formed `type--token` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedIdentifier {
    #[error("identifier {value:?} has no `--` separator")]
    MissingSeparator { value: String },

    #[error("identifier {value:?} has more than one `--` separator")]
    MultipleSeparators { value: String },

    #[error("unknown object type {kind:?} in {value:?}")]
    UnknownKind { value: String, kind: String },

    #[error("identifier {value:?} has an empty token")]
    EmptyToken { value: String },

    #[error("identifier {value:?} has a token outside [0-9a-f-]")]
    InvalidToken { value: String },
}

/// Error returned when a string is not a valid RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid RFC 3339 timestamp {value:?}: {reason}")]
pub struct TimestampError {
    pub value: String,
    pub reason: String,
}

/// The structural rule a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    /// V001: Identifier is not `type--token` with a known type and hex token
    MalformedIdentifier,
    /// V002: Object id encodes a different type than the object
    IdKindMismatch,
    /// V003: spec_version outside [0-9a-z.]+
    SpecVersionFormat,
    /// V004: lang outside [a-zA-Z]+
    LangFormat,
    /// V005: Required timestamp still holds the epoch sentinel
    TimestampUnset,
    /// V006: Timestamps out of order (e.g. last_seen before first_seen)
    TimestampOrder,
    /// V007: Reference points at an object type not allowed for the field
    ReferenceKind,
    /// V008: External reference carries no checkable field
    ExternalReferenceEmpty,
    /// V009: Granular marking selectors missing or malformed
    SelectorFormat,
    /// V010: Numeric value outside its allowed range
    OutOfRange,
    /// V011: Required field is empty
    RequiredField,
}

impl ValidationRule {
    /// Returns the rule code string (e.g., "V001").
    pub fn code(&self) -> &'static str {
        match self {
            ValidationRule::MalformedIdentifier => "V001",
            ValidationRule::IdKindMismatch => "V002",
            ValidationRule::SpecVersionFormat => "V003",
            ValidationRule::LangFormat => "V004",
            ValidationRule::TimestampUnset => "V005",
            ValidationRule::TimestampOrder => "V006",
            ValidationRule::ReferenceKind => "V007",
            ValidationRule::ExternalReferenceEmpty => "V008",
            ValidationRule::SelectorFormat => "V009",
            ValidationRule::OutOfRange => "V010",
            ValidationRule::RequiredField => "V011",
        }
    }
}

/// A single structural violation, scoped to one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{}] {field}: {detail}", .rule.code())]
pub struct ValidationError {
    /// Path of the offending field, e.g. `granular_markings[0].selectors[1]`.
    pub field: String,
    /// The rule that was violated.
    pub rule: ValidationRule,
    /// Human-readable description.
    pub detail: String,
}

/// All violations found on one object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub(crate) fn from_vec(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the violations in the order they were found.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns true if any violation is of the given rule.
    pub fn has_rule(&self, rule: ValidationRule) -> bool {
        self.errors.iter().any(|e| e.rule == rule)
    }

    /// Returns true if any violation is on the given field path.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Error during JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The discriminator is not a type in the object catalog.
    #[error("unknown object type {tag:?}")]
    UnknownType { tag: String },

    /// The payload carries no `type` discriminator at all.
    #[error("payload has no `type` discriminator")]
    MissingType,

    /// The payload is broken for an otherwise known type.
    #[error("malformed {kind} payload: {reason}")]
    Malformed { kind: String, reason: String },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A collection holds two objects with the same id.
    #[error("duplicate object id {id} in collection")]
    DuplicateId { id: String },
}

impl DecodeError {
    /// Returns true if the discriminator was absent or not recognized.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, DecodeError::UnknownType { .. } | DecodeError::MissingType)
    }

    pub(crate) fn malformed(kind: impl Into<String>, reason: impl fmt::Display) -> Self {
        DecodeError::Malformed {
            kind: kind.into(),
            reason: reason.to_string(),
        }
    }
}

/// Error during JSON encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("serializing {kind} failed: {reason}")]
    Serialize { kind: String, reason: String },
}
