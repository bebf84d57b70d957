//! Relationship objects (SROs).
//!
//! Edges between two objects. They carry only [`RelationshipCommon`].

use crate::model::{Identifier, RelationshipCommon, Timestamp};

stix_objects! {
    block relationship_common: RelationshipCommon;

    /// A typed edge from `source_ref` to `target_ref`.
    Relationship {
        relationship_type: String,
        description: String,
        source_ref: Identifier,
        target_ref: Identifier,
        start_time: Option<Timestamp>,
        stop_time: Option<Timestamp>,
    }

    /// The belief that something in CTI was seen.
    Sighting {
        description: String,
        first_seen: Option<Timestamp>,
        last_seen: Option<Timestamp>,
        count: i64,
        sighting_of_ref: Identifier,
        observed_data_refs: Vec<Identifier>,
        where_sighted_refs: Vec<Identifier>,
        summary: bool,
    }
}

impl Relationship {
    /// Creates an edge of the given type between two objects.
    pub fn link(
        relationship_type: impl Into<String>,
        source_ref: Identifier,
        target_ref: Identifier,
    ) -> Self {
        let mut rel = Self::new();
        rel.relationship_type = relationship_type.into();
        rel.source_ref = source_ref;
        rel.target_ref = target_ref;
        rel
    }
}

impl Sighting {
    /// Creates a sighting of the given object.
    pub fn of(sighting_of_ref: Identifier) -> Self {
        let mut sighting = Self::new();
        sighting.sighting_of_ref = sighting_of_ref;
        sighting
    }
}
