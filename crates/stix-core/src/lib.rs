//! STIX 2.1: typed threat-intelligence objects.
//!
//! This crate provides the object model, validation, sanitization and JSON
//! encoding for a graph of typed, identified threat-intel objects.
//!
//! # Overview
//!
//! Every object is a `base` identity (`type` + `id`) plus exactly one shared
//! property block plus its own fields:
//! - **Domain objects** (campaign, indicator, malware, ...) carry versioning,
//!   timestamps, labels and markings
//! - **Cyber-observable objects** (file, ipv4-addr, process, ...) carry
//!   markings and extensions but no timestamps
//! - **Relationship objects** (relationship, sighting) link two identifiers
//!
//! # Quick Start
//!
//! ```rust
//! use stix_core::codec::{decode, encode};
//! use stix_core::model::{Identifier, ObjectKind, Relationship, StixObject, Timestamp};
//! use stix_core::validate::validate;
//!
//! let mut rel = Relationship::link(
//!     "uses",
//!     Identifier::new(ObjectKind::IntrusionSet),
//!     Identifier::new(ObjectKind::Malware),
//! );
//! let now = Timestamp::parse("2024-03-15T14:30:00Z").unwrap();
//! rel.relationship_common.set_timestamps(now, now);
//!
//! let object = StixObject::from(rel);
//! assert!(validate(&object).is_ok());
//!
//! // Encode to JSON
//! let bytes = encode(&object).unwrap();
//!
//! // Decode back
//! let decoded = decode("relationship", &bytes).unwrap();
//! assert_eq!(object, decoded);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Kinds, identifiers, timestamps, shared blocks and the catalog
//! - [`validate`]: Structural validation with field-scoped errors
//! - [`sanitize`]: Text cleaning before persistence
//! - [`codec`]: JSON encoding/decoding, collections and lenient import
//! - [`render`]: Indented text for human inspection
//! - [`error`]: Error types
//! - [`limits`]: Security limits for decoding
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Payload size and collection length are bounded by configurable limits
//! - Identifiers are stored as received and checked by the validator, so a
//!   bad reference is reported with its field path
//! - A bad element in a collection is reported and skipped, never fatal

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod render;
pub mod sanitize;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    decode, decode_any, decode_collection, encode, encode_bundle, encode_collection,
    encode_pretty, sniff_kind, Bundle, DecodeOptions, EncodeOptions,
};
pub use error::{
    DecodeError, EncodeError, MalformedIdentifier, TimestampError, ValidationError,
    ValidationErrors, ValidationRule,
};
pub use model::{
    Clock, CommonFields, FixedClock, Identifier, ObjectFamily, ObjectKind, StixObject,
    SystemClock, Timestamp,
};
pub use render::render;
pub use sanitize::sanitize;
pub use validate::{is_valid, validate, Validator};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The STIX version this crate implements.
pub const SPEC_VERSION: &str = model::DEFAULT_SPEC_VERSION;
