//! Data model types for STIX objects.
//!
//! This module contains the core types for representing threat-intel objects:
//! - Kinds (type discriminators) and families
//! - Identifiers (`type--token` references)
//! - Timestamps and the injected clock
//! - Shared property blocks
//! - The object catalog and its sum type

#[macro_use]
mod macros;

pub mod common;
pub mod domain;
pub mod id;
pub mod kind;
pub mod object;
pub mod observable;
pub mod relationship;
pub mod timestamp;

pub use common::{
    field_name, AsBlock, BaseIdentity, Blank, CommonFields, DomainCommon, ExternalReference,
    GranularMarking, KillChainPhase, ObservableCommon, PropertyBlock, PropertyBlockMut,
    RelationshipCommon, DEFAULT_SPEC_VERSION,
};
pub use domain::{
    AttackPattern, Campaign, CourseOfAction, Grouping, Identity, Incident, Indicator,
    Infrastructure, IntrusionSet, Location, Malware, MalwareAnalysis, Note, ObservedData,
    Opinion, Report, ThreatActor, Tool, Vulnerability,
};
pub use id::{Identifier, SEPARATOR, STIX_NAMESPACE};
pub use kind::{ObjectFamily, ObjectKind};
pub use object::StixObject;
pub use observable::{
    id_contributing_properties, Artifact, AutonomousSystem, Directory, DomainName, EmailAddr,
    EmailMessage, File, Ipv4Addr, Ipv6Addr, MacAddr, Mutex, NetworkTraffic, Process, Software,
    Url, UserAccount, WindowsRegistryKey, WindowsRegistryValue, X509Certificate,
};
pub use relationship::{Relationship, Sighting};
pub use timestamp::{Clock, FixedClock, SystemClock, Timestamp};
