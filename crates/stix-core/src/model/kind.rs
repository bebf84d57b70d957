//! Object type discriminators.
//!
//! Every STIX object carries a `type` string drawn from a closed set of names.
//! The same names prefix identifiers (`malware--…`), so this enumeration is
//! shared by the identifier parser, the object catalog and the decoder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MalformedIdentifier;

/// The family an object type belongs to.
///
/// The family decides which shared property block an object carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectFamily {
    /// Domain objects (SDOs): versioned analytical records.
    Domain,
    /// Cyber-observable objects (SCOs): unversioned technical artifacts.
    Observable,
    /// Relationship objects (SROs): typed edges and sightings.
    Relationship,
    /// Meta objects: only referenced by identifier, never decoded here.
    Meta,
}

macro_rules! object_kinds {
    ($( $variant:ident => $name:literal, $family:ident; )*) => {
        /// Closed enumeration of object type names.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ObjectKind {
            $( $variant, )*
        }

        impl ObjectKind {
            /// Every known kind, in declaration order.
            pub const ALL: &'static [ObjectKind] = &[ $( ObjectKind::$variant, )* ];

            /// Returns the wire name (e.g. `"ipv4-addr"`).
            pub fn as_str(self) -> &'static str {
                match self {
                    $( ObjectKind::$variant => $name, )*
                }
            }

            /// Returns the family this kind belongs to.
            pub fn family(self) -> ObjectFamily {
                match self {
                    $( ObjectKind::$variant => ObjectFamily::$family, )*
                }
            }

            /// Looks up a kind by its wire name.
            pub fn from_name(name: &str) -> Option<ObjectKind> {
                match name {
                    $( $name => Some(ObjectKind::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

object_kinds! {
    AttackPattern => "attack-pattern", Domain;
    Campaign => "campaign", Domain;
    CourseOfAction => "course-of-action", Domain;
    Grouping => "grouping", Domain;
    Identity => "identity", Domain;
    Incident => "incident", Domain;
    Indicator => "indicator", Domain;
    Infrastructure => "infrastructure", Domain;
    IntrusionSet => "intrusion-set", Domain;
    Location => "location", Domain;
    Malware => "malware", Domain;
    MalwareAnalysis => "malware-analysis", Domain;
    Note => "note", Domain;
    ObservedData => "observed-data", Domain;
    Opinion => "opinion", Domain;
    Report => "report", Domain;
    ThreatActor => "threat-actor", Domain;
    Tool => "tool", Domain;
    Vulnerability => "vulnerability", Domain;

    Artifact => "artifact", Observable;
    AutonomousSystem => "autonomous-system", Observable;
    Directory => "directory", Observable;
    DomainName => "domain-name", Observable;
    EmailAddr => "email-addr", Observable;
    EmailMessage => "email-message", Observable;
    File => "file", Observable;
    Ipv4Addr => "ipv4-addr", Observable;
    Ipv6Addr => "ipv6-addr", Observable;
    MacAddr => "mac-addr", Observable;
    Mutex => "mutex", Observable;
    NetworkTraffic => "network-traffic", Observable;
    Process => "process", Observable;
    Software => "software", Observable;
    Url => "url", Observable;
    UserAccount => "user-account", Observable;
    WindowsRegistryKey => "windows-registry-key", Observable;
    X509Certificate => "x509-certificate", Observable;

    Relationship => "relationship", Relationship;
    Sighting => "sighting", Relationship;

    MarkingDefinition => "marking-definition", Meta;
    LanguageContent => "language-content", Meta;
    ExtensionDefinition => "extension-definition", Meta;
    Bundle => "bundle", Meta;
}

impl ObjectKind {
    /// Returns true for relationship-family kinds (`relationship`, `sighting`).
    pub fn is_relationship(self) -> bool {
        self.family() == ObjectFamily::Relationship
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unknown name is reported as [`MalformedIdentifier::UnknownKind`] with
/// the name itself as both the value and the kind.
impl FromStr for ObjectKind {
    type Err = MalformedIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectKind::from_name(s).ok_or_else(|| MalformedIdentifier::UnknownKind {
            value: s.to_string(),
            kind: s.to_string(),
        })
    }
}

impl Serialize for ObjectKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ObjectKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
