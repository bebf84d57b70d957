//! Shared property blocks.
//!
//! Every object holds a [`BaseIdentity`] plus exactly one family block:
//! - [`DomainCommon`] for domain objects
//! - [`ObservableCommon`] for cyber-observable objects
//! - [`RelationshipCommon`] for relationship objects
//!
//! Blocks are flattened into the object's JSON record; block names never
//! appear on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Clock, Identifier, ObjectFamily, ObjectKind, Timestamp};

/// STIX version written by the constructors.
pub const DEFAULT_SPEC_VERSION: &str = "2.1";

fn default_spec_version() -> String {
    DEFAULT_SPEC_VERSION.to_string()
}

/// Values that have an "empty" state omitted from the wire.
///
/// Every zero value decodes back to itself, so skipping blanks on encode
/// keeps the round trip exact.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for bool {
    fn is_blank(&self) -> bool {
        !*self
    }
}

impl Blank for i64 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

impl Blank for Identifier {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for Timestamp {
    fn is_blank(&self) -> bool {
        self.is_unset()
    }
}

impl Blank for serde_json::Value {
    fn is_blank(&self) -> bool {
        self.is_null()
    }
}

impl<T> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

impl<T> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Blank for BTreeMap<K, V> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// Strips the raw-identifier prefix from a field name (`r#abstract` -> `abstract`).
pub fn field_name(ident: &'static str) -> &'static str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

/// The identity envelope present on every object.
///
/// Both fields are fixed at construction; a changed kind or id is a new object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseIdentity {
    #[serde(rename = "type")]
    kind: ObjectKind,
    id: Identifier,
}

impl BaseIdentity {
    /// Creates an identity with a fresh random id.
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            id: Identifier::new(kind),
        }
    }

    /// Creates an identity with a caller-supplied id.
    pub fn with_id(kind: ObjectKind, id: Identifier) -> Self {
        Self { kind, id }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }
}

/// A pointer to a record outside the STIX graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hashes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub external_id: String,
}

impl ExternalReference {
    /// Creates a reference with only a source name set.
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Self::default()
        }
    }

    /// Returns true if no externally checkable field is populated.
    pub fn is_empty(&self) -> bool {
        self.source_name.is_empty()
            && self.url.is_empty()
            && self.hashes.is_empty()
            && self.external_id.is_empty()
    }
}

/// A marking applied to a selected subset of an object's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranularMarking {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lang: String,
    #[serde(default, skip_serializing_if = "Identifier::is_empty")]
    pub marking_ref: Identifier,
    #[serde(default)]
    pub selectors: Vec<String>,
}

impl GranularMarking {
    pub fn new(
        marking_ref: Identifier,
        selectors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            lang: String::new(),
            marking_ref,
            selectors: selectors.into_iter().map(Into::into).collect(),
        }
    }
}

/// A phase in a named kill chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillChainPhase {
    #[serde(default)]
    pub kill_chain_name: String,
    #[serde(default)]
    pub phase_name: String,
}

impl KillChainPhase {
    pub fn new(kill_chain_name: impl Into<String>, phase_name: impl Into<String>) -> Self {
        Self {
            kill_chain_name: kill_chain_name.into(),
            phase_name: phase_name.into(),
        }
    }
}

/// Common fields of domain objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCommon {
    #[serde(default = "default_spec_version")]
    pub spec_version: String,
    #[serde(default, skip_serializing_if = "Blank::is_blank")]
    pub created: Timestamp,
    #[serde(default, skip_serializing_if = "Blank::is_blank")]
    pub modified: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_ref: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Blank::is_blank")]
    pub revoked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// 0 means "unspecified"; valid values are 0 to 100.
    #[serde(default, skip_serializing_if = "Blank::is_blank")]
    pub confidence: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lang: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_references: Vec<ExternalReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_marking_refs: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub granular_markings: Vec<GranularMarking>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Blank::is_blank")]
    pub defanged: bool,
}

impl Default for DomainCommon {
    fn default() -> Self {
        Self {
            spec_version: default_spec_version(),
            created: Timestamp::epoch(),
            modified: Timestamp::epoch(),
            created_by_ref: None,
            revoked: false,
            labels: Vec::new(),
            confidence: 0,
            lang: String::new(),
            external_references: Vec::new(),
            object_marking_refs: Vec::new(),
            granular_markings: Vec::new(),
            extensions: BTreeMap::new(),
            defanged: false,
        }
    }
}

impl DomainCommon {
    /// Sets both `created` and `modified`.
    pub fn set_timestamps(&mut self, created: Timestamp, modified: Timestamp) {
        self.created = created;
        self.modified = modified;
    }

    /// Sets the confidence score; range is checked by the validator.
    pub fn set_confidence(&mut self, confidence: i64) {
        self.confidence = confidence;
    }

    pub fn set_lang(&mut self, lang: impl Into<String>) {
        self.lang = lang.into();
    }

    pub fn set_created_by_ref(&mut self, creator: Identifier) {
        self.created_by_ref = Some(creator);
    }

    pub fn set_revoked(&mut self, revoked: bool) {
        self.revoked = revoked;
    }

    pub fn add_label(&mut self, label: impl Into<String>) {
        self.labels.push(label.into());
    }

    pub fn set_extension(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extensions.insert(key.into(), value.into());
    }

    pub fn add_external_reference(&mut self, reference: ExternalReference) {
        self.external_references.push(reference);
    }

    pub fn add_marking_ref(&mut self, marking: Identifier) {
        self.object_marking_refs.push(marking);
    }

    pub fn add_granular_marking(&mut self, marking: GranularMarking) {
        self.granular_markings.push(marking);
    }

    /// Stamps `modified` with the clock's current time.
    pub fn touch(&mut self, clock: &dyn Clock) {
        self.modified = clock.now();
    }
}

/// Common fields of cyber-observable objects.
///
/// Observables are facts about an artifact, so they carry no timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableCommon {
    #[serde(default = "default_spec_version")]
    pub spec_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_marking_refs: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub granular_markings: Vec<GranularMarking>,
    #[serde(default, skip_serializing_if = "Blank::is_blank")]
    pub defanged: bool,
    /// Open extension map keyed by extension name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Default for ObservableCommon {
    fn default() -> Self {
        Self {
            spec_version: default_spec_version(),
            object_marking_refs: Vec::new(),
            granular_markings: Vec::new(),
            defanged: false,
            extensions: BTreeMap::new(),
        }
    }
}

impl ObservableCommon {
    pub fn add_marking_ref(&mut self, marking: Identifier) {
        self.object_marking_refs.push(marking);
    }

    pub fn add_granular_marking(&mut self, marking: GranularMarking) {
        self.granular_markings.push(marking);
    }

    pub fn set_extension(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.extensions.insert(name.into(), value);
    }
}

/// Common fields of relationship objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipCommon {
    #[serde(default = "default_spec_version")]
    pub spec_version: String,
    #[serde(default, skip_serializing_if = "Blank::is_blank")]
    pub created: Timestamp,
    #[serde(default, skip_serializing_if = "Blank::is_blank")]
    pub modified: Timestamp,
}

impl Default for RelationshipCommon {
    fn default() -> Self {
        Self {
            spec_version: default_spec_version(),
            created: Timestamp::epoch(),
            modified: Timestamp::epoch(),
        }
    }
}

impl RelationshipCommon {
    pub fn set_timestamps(&mut self, created: Timestamp, modified: Timestamp) {
        self.created = created;
        self.modified = modified;
    }
}

/// Borrowed view of whichever family block an object carries.
#[derive(Debug, Clone, Copy)]
pub enum PropertyBlock<'a> {
    Domain(&'a DomainCommon),
    Observable(&'a ObservableCommon),
    Relationship(&'a RelationshipCommon),
}

impl<'a> PropertyBlock<'a> {
    pub fn spec_version(self) -> &'a str {
        match self {
            PropertyBlock::Domain(b) => &b.spec_version,
            PropertyBlock::Observable(b) => &b.spec_version,
            PropertyBlock::Relationship(b) => &b.spec_version,
        }
    }

    pub fn family(self) -> ObjectFamily {
        match self {
            PropertyBlock::Domain(_) => ObjectFamily::Domain,
            PropertyBlock::Observable(_) => ObjectFamily::Observable,
            PropertyBlock::Relationship(_) => ObjectFamily::Relationship,
        }
    }
}

/// Mutable view of whichever family block an object carries.
#[derive(Debug)]
pub enum PropertyBlockMut<'a> {
    Domain(&'a mut DomainCommon),
    Observable(&'a mut ObservableCommon),
    Relationship(&'a mut RelationshipCommon),
}

/// Implemented by the three family blocks.
pub trait AsBlock {
    fn as_block(&self) -> PropertyBlock<'_>;
    fn as_block_mut(&mut self) -> PropertyBlockMut<'_>;
}

impl AsBlock for DomainCommon {
    fn as_block(&self) -> PropertyBlock<'_> {
        PropertyBlock::Domain(self)
    }

    fn as_block_mut(&mut self) -> PropertyBlockMut<'_> {
        PropertyBlockMut::Domain(self)
    }
}

impl AsBlock for ObservableCommon {
    fn as_block(&self) -> PropertyBlock<'_> {
        PropertyBlock::Observable(self)
    }

    fn as_block_mut(&mut self) -> PropertyBlockMut<'_> {
        PropertyBlockMut::Observable(self)
    }
}

impl AsBlock for RelationshipCommon {
    fn as_block(&self) -> PropertyBlock<'_> {
        PropertyBlock::Relationship(self)
    }

    fn as_block_mut(&mut self) -> PropertyBlockMut<'_> {
        PropertyBlockMut::Relationship(self)
    }
}

/// The contract shared by every concrete object shape.
pub trait CommonFields {
    fn base(&self) -> &BaseIdentity;
    fn block(&self) -> PropertyBlock<'_>;
    fn block_mut(&mut self) -> PropertyBlockMut<'_>;

    fn kind(&self) -> ObjectKind {
        self.base().kind()
    }

    fn id(&self) -> &Identifier {
        self.base().id()
    }

    fn family(&self) -> ObjectFamily {
        self.block().family()
    }

    fn spec_version(&self) -> &str {
        self.block().spec_version()
    }

    fn domain_common(&self) -> Option<&DomainCommon> {
        match self.block() {
            PropertyBlock::Domain(b) => Some(b),
            _ => None,
        }
    }

    fn observable_common(&self) -> Option<&ObservableCommon> {
        match self.block() {
            PropertyBlock::Observable(b) => Some(b),
            _ => None,
        }
    }

    fn relationship_common(&self) -> Option<&RelationshipCommon> {
        match self.block() {
            PropertyBlock::Relationship(b) => Some(b),
            _ => None,
        }
    }
}
