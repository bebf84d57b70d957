//! Typed `type--token` identifiers.
//!
//! Every object id and every cross-object reference is an [`Identifier`]. The
//! prefix names the kind of the referenced object; the token is an opaque
//! lowercase hex string (conventionally a UUID).
//!
//! Identifiers decoded from the wire are stored as received so that a bad
//! reference can be reported by the validator with its field path instead of
//! failing the whole decode. [`Identifier::parse`] is the strict constructor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MalformedIdentifier;
use crate::model::ObjectKind;

/// Separator between the kind prefix and the token.
pub const SEPARATOR: &str = "--";

/// Namespace for deterministic (UUIDv5) cyber-observable identifiers.
pub const STIX_NAMESPACE: Uuid = Uuid::from_u128(0x00abedb4_aa42_466c_9c01_fed23315a9b7);

/// A `type--token` reference.
///
/// Equality, ordering and hashing use the full string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Creates a fresh identifier with a random UUIDv4 token.
    pub fn new(kind: ObjectKind) -> Self {
        Self(format!("{}{}{}", kind.as_str(), SEPARATOR, Uuid::new_v4()))
    }

    /// Derives a UUIDv5 identifier from the canonical JSON of `contributing`.
    ///
    /// ```text
    /// token = uuid_v5(STIX_NAMESPACE, canonical_json(contributing))
    /// ```
    ///
    /// `serde_json` maps keep keys sorted, so equal property sets always
    /// serialize to the same bytes.
    pub fn deterministic(kind: ObjectKind, contributing: &serde_json::Value) -> Self {
        let canonical = contributing.to_string();
        let token = Uuid::new_v5(&STIX_NAMESPACE, canonical.as_bytes());
        Self(format!("{}{}{}", kind.as_str(), SEPARATOR, token))
    }

    /// Builds an identifier from a kind and a token, checking the token.
    pub fn from_parts(kind: ObjectKind, token: &str) -> Result<Self, MalformedIdentifier> {
        Self::parse(&format!("{}{}{}", kind.as_str(), SEPARATOR, token))
    }

    /// Parses a `type--token` string.
    pub fn parse(s: &str) -> Result<Self, MalformedIdentifier> {
        split(s)?;
        Ok(Self(s.to_string()))
    }

    /// Wraps a string without checking it.
    ///
    /// This is the import path for untrusted data; run the validator before
    /// relying on the result.
    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Checks the identifier and returns its kind.
    pub fn check(&self) -> Result<ObjectKind, MalformedIdentifier> {
        split(&self.0).map(|(kind, _)| kind)
    }

    /// Returns true if the identifier is well-formed.
    pub fn is_well_formed(&self) -> bool {
        self.check().is_ok()
    }

    /// Returns the kind named by the prefix, if the identifier is well-formed.
    pub fn kind(&self) -> Option<ObjectKind> {
        self.check().ok()
    }

    /// Returns the token, if the identifier is well-formed.
    pub fn token(&self) -> Option<&str> {
        split(&self.0).ok().map(|(_, token)| token)
    }

    /// Returns the canonical `type--token` form.
    pub fn format(&self) -> String {
        self.0.clone()
    }

    /// Returns the string form without copying.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if nothing was assigned (the zero value).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn split(s: &str) -> Result<(ObjectKind, &str), MalformedIdentifier> {
    let (prefix, token) = s
        .split_once(SEPARATOR)
        .ok_or_else(|| MalformedIdentifier::MissingSeparator { value: s.to_string() })?;

    if token.contains(SEPARATOR) {
        return Err(MalformedIdentifier::MultipleSeparators { value: s.to_string() });
    }

    let kind = ObjectKind::from_name(prefix).ok_or_else(|| MalformedIdentifier::UnknownKind {
        value: s.to_string(),
        kind: prefix.to_string(),
    })?;

    if token.is_empty() {
        return Err(MalformedIdentifier::EmptyToken { value: s.to_string() });
    }

    if !token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f' | b'-')) {
        return Err(MalformedIdentifier::InvalidToken { value: s.to_string() });
    }

    Ok((kind, token))
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = MalformedIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "6b2a7d6c-2f3b-4e21-8e5a-0b5d5f3c9e41";

    #[test]
    fn test_new_is_well_formed() {
        let id = Identifier::new(ObjectKind::Malware);
        assert_eq!(id.kind(), Some(ObjectKind::Malware));
        assert!(id.as_str().starts_with("malware--"));
    }

    #[test]
    fn test_format_parse_roundtrip() {
        let id = Identifier::from_parts(ObjectKind::IntrusionSet, TOKEN).unwrap();
        let parsed = Identifier::parse(&id.format()).unwrap();
        assert_eq!(id, parsed);
        assert_eq!(parsed.token(), Some(TOKEN));
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            Identifier::parse("malware"),
            Err(MalformedIdentifier::MissingSeparator { .. })
        ));
        assert!(matches!(
            Identifier::parse("malware--"),
            Err(MalformedIdentifier::EmptyToken { .. })
        ));
        assert!(matches!(
            Identifier::parse("malware--ABCDEF"),
            Err(MalformedIdentifier::InvalidToken { .. })
        ));
        assert!(matches!(
            Identifier::parse("malware--12g4"),
            Err(MalformedIdentifier::InvalidToken { .. })
        ));
        assert!(matches!(
            Identifier::parse("x-widget--1234"),
            Err(MalformedIdentifier::UnknownKind { .. })
        ));
        assert!(matches!(
            Identifier::parse("malware--12--34"),
            Err(MalformedIdentifier::MultipleSeparators { .. })
        ));
    }

    #[test]
    fn test_token_is_not_assumed_uuid() {
        let id = Identifier::parse("file--abc-0").unwrap();
        assert_eq!(id.kind(), Some(ObjectKind::File));
    }

    #[test]
    fn test_raw_is_checked_lazily() {
        let id = Identifier::from_raw("malware--");
        assert!(!id.is_well_formed());
        assert_eq!(id.kind(), None);
        assert!(!id.is_empty());
        assert!(Identifier::default().is_empty());
    }

    #[test]
    fn test_deterministic() {
        let value = serde_json::json!({ "value": "198.51.100.3" });
        let id1 = Identifier::deterministic(ObjectKind::Ipv4Addr, &value);
        let id2 = Identifier::deterministic(ObjectKind::Ipv4Addr, &value);
        assert_eq!(id1, id2);
        assert!(id1.is_well_formed());

        let other = serde_json::json!({ "value": "198.51.100.4" });
        assert_ne!(id1, Identifier::deterministic(ObjectKind::Ipv4Addr, &other));
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = Identifier::from_parts(ObjectKind::Sighting, TOKEN).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"sighting--{TOKEN}\""));
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
