//! The closed sum type over every object shape.

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::domain::*;
use crate::model::observable::*;
use crate::model::relationship::*;
use crate::model::{
    id_contributing_properties, BaseIdentity, CommonFields, DomainCommon, Identifier,
    ObjectFamily, ObjectKind, ObservableCommon, PropertyBlock, PropertyBlockMut,
    RelationshipCommon,
};
use crate::render::{Render, Renderer};
use crate::sanitize::Sanitize;
use crate::validate::{CheckFields, Checker};

macro_rules! catalog {
    ($( $variant:ident ),* $(,)?) => {
        /// Any object in the catalog.
        ///
        /// Encodes exactly as the inner shape (no wrapper); decoding dispatches
        /// on the embedded `type` field.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum StixObject {
            $( $variant($variant), )*
        }

        impl StixObject {
            /// Returns true if `kind` has a concrete shape in the catalog.
            pub fn has_shape(kind: ObjectKind) -> bool {
                matches!(kind, $( ObjectKind::$variant )|*)
            }

            /// Returns the shared contract of the inner shape.
            pub fn fields(&self) -> &dyn CommonFields {
                match self {
                    $( StixObject::$variant(o) => o, )*
                }
            }

            fn fields_mut(&mut self) -> &mut dyn CommonFields {
                match self {
                    $( StixObject::$variant(o) => o, )*
                }
            }

            /// Deserializes `value` as the shape for `kind`.
            ///
            /// Returns `None` if `kind` has no shape.
            pub(crate) fn from_value(
                kind: ObjectKind,
                value: serde_json::Value,
            ) -> Option<Result<Self, serde_json::Error>> {
                match kind {
                    $(
                        ObjectKind::$variant => Some(
                            serde_json::from_value::<$variant>(value).map(StixObject::$variant),
                        ),
                    )*
                    _ => None,
                }
            }

            pub(crate) fn check_fields(&self, checker: &mut Checker) {
                match self {
                    $( StixObject::$variant(o) => o.check_fields(checker), )*
                }
            }

            pub(crate) fn sanitize_fields(&mut self) {
                match self {
                    $( StixObject::$variant(o) => o.sanitize(), )*
                }
            }

            pub(crate) fn render_fields(&self, out: &mut Renderer) {
                match self {
                    $( StixObject::$variant(o) => o.render(out), )*
                }
            }
        }

        $(
            impl From<$variant> for StixObject {
                fn from(object: $variant) -> Self {
                    StixObject::$variant(object)
                }
            }
        )*
    };
}

catalog! {
    AttackPattern,
    Campaign,
    CourseOfAction,
    Grouping,
    Identity,
    Incident,
    Indicator,
    Infrastructure,
    IntrusionSet,
    Location,
    Malware,
    MalwareAnalysis,
    Note,
    ObservedData,
    Opinion,
    Report,
    ThreatActor,
    Tool,
    Vulnerability,
    Artifact,
    AutonomousSystem,
    Directory,
    DomainName,
    EmailAddr,
    EmailMessage,
    File,
    Ipv4Addr,
    Ipv6Addr,
    MacAddr,
    Mutex,
    NetworkTraffic,
    Process,
    Software,
    Url,
    UserAccount,
    WindowsRegistryKey,
    X509Certificate,
    Relationship,
    Sighting,
}

impl StixObject {
    pub fn base(&self) -> &BaseIdentity {
        self.fields().base()
    }

    pub fn kind(&self) -> ObjectKind {
        self.fields().kind()
    }

    pub fn id(&self) -> &Identifier {
        self.fields().id()
    }

    pub fn family(&self) -> ObjectFamily {
        self.fields().family()
    }

    pub fn spec_version(&self) -> &str {
        self.fields().spec_version()
    }

    pub fn block(&self) -> PropertyBlock<'_> {
        self.fields().block()
    }

    pub fn block_mut(&mut self) -> PropertyBlockMut<'_> {
        self.fields_mut().block_mut()
    }

    pub fn domain_common(&self) -> Option<&DomainCommon> {
        self.fields().domain_common()
    }

    pub fn domain_common_mut(&mut self) -> Option<&mut DomainCommon> {
        match self.block_mut() {
            PropertyBlockMut::Domain(b) => Some(b),
            _ => None,
        }
    }

    pub fn observable_common(&self) -> Option<&ObservableCommon> {
        self.fields().observable_common()
    }

    pub fn relationship_common(&self) -> Option<&RelationshipCommon> {
        self.fields().relationship_common()
    }

    /// Computes the UUIDv5 identifier for an observable from its
    /// ID-contributing properties.
    ///
    /// Returns `None` for non-observables, for kinds without contributing
    /// properties, and when none of them is populated.
    pub fn deterministic_id(&self) -> Option<Identifier> {
        let kind = self.kind();
        if kind.family() != ObjectFamily::Observable {
            return None;
        }
        let names = id_contributing_properties(kind);
        let serde_json::Value::Object(record) = serde_json::to_value(self).ok()? else {
            return None;
        };
        let contributing: serde_json::Map<String, serde_json::Value> = record
            .into_iter()
            .filter(|(key, _)| names.contains(&key.as_str()))
            .collect();
        if contributing.is_empty() {
            return None;
        }
        Some(Identifier::deterministic(kind, &serde_json::Value::Object(contributing)))
    }
}

impl<'de> Deserialize<'de> for StixObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| D::Error::custom("object has no `type` discriminator"))?;
        let kind = ObjectKind::from_name(tag)
            .ok_or_else(|| D::Error::custom(format!("unknown object type {tag:?}")))?;
        match StixObject::from_value(kind, value) {
            Some(result) => result.map_err(D::Error::custom),
            None => Err(D::Error::custom(format!("object type {kind} has no shape"))),
        }
    }
}
