//! Type-specific rules.

use std::collections::BTreeMap;

use crate::error::ValidationRule;
use crate::model::{Identifier, Location, StixObject};
use crate::validate::rules::check_window;
use crate::validate::Checker;

const MAX_COUNT: i64 = 999_999_999;

pub(crate) fn check_object(object: &StixObject, checker: &mut Checker) {
    if let Some(common) = object.domain_common() {
        check_range(checker, "confidence", common.confidence, 0, 100);
    }

    match object {
        StixObject::AttackPattern(o) => require_text(checker, "name", &o.name),
        StixObject::Campaign(o) => {
            require_text(checker, "name", &o.name);
            check_window(
                ("first_seen", o.first_seen.as_ref()),
                ("last_seen", o.last_seen.as_ref()),
                checker,
            );
        }
        StixObject::CourseOfAction(o) => require_text(checker, "name", &o.name),
        StixObject::Grouping(o) => require_text(checker, "context", &o.context),
        StixObject::Identity(o) => require_text(checker, "name", &o.name),
        StixObject::Incident(_) => {}
        StixObject::Indicator(o) => {
            require_text(checker, "pattern", &o.pattern);
            require_text(checker, "pattern_type", &o.pattern_type);
            if o.valid_from.is_none() {
                checker.fail("valid_from", ValidationRule::RequiredField, "valid_from is required");
            }
            check_window(
                ("valid_from", o.valid_from.as_ref()),
                ("valid_until", o.valid_until.as_ref()),
                checker,
            );
        }
        StixObject::Infrastructure(o) => {
            require_text(checker, "name", &o.name);
            check_window(
                ("first_seen", o.first_seen.as_ref()),
                ("last_seen", o.last_seen.as_ref()),
                checker,
            );
        }
        StixObject::IntrusionSet(o) => {
            require_text(checker, "name", &o.name);
            check_window(
                ("first_seen", o.first_seen.as_ref()),
                ("last_seen", o.last_seen.as_ref()),
                checker,
            );
        }
        StixObject::Location(o) => check_location(o, checker),
        StixObject::Malware(o) => {
            if o.is_family {
                require_text(checker, "name", &o.name);
            }
            check_window(
                ("first_seen", o.first_seen.as_ref()),
                ("last_seen", o.last_seen.as_ref()),
                checker,
            );
        }
        StixObject::MalwareAnalysis(o) => {
            require_text(checker, "product", &o.product);
            check_window(
                ("analysis_started", o.analysis_started.as_ref()),
                ("analysis_ended", o.analysis_ended.as_ref()),
                checker,
            );
        }
        StixObject::Note(o) => require_text(checker, "content", &o.content),
        StixObject::ObservedData(o) => {
            check_range(checker, "number_observed", o.number_observed, 0, MAX_COUNT);
            check_window(
                ("first_observed", o.first_observed.as_ref()),
                ("last_observed", o.last_observed.as_ref()),
                checker,
            );
        }
        StixObject::Opinion(o) => require_text(checker, "opinion", &o.opinion),
        StixObject::Report(o) => require_text(checker, "name", &o.name),
        StixObject::ThreatActor(o) => {
            require_text(checker, "name", &o.name);
            check_window(
                ("first_seen", o.first_seen.as_ref()),
                ("last_seen", o.last_seen.as_ref()),
                checker,
            );
        }
        StixObject::Tool(o) => require_text(checker, "name", &o.name),
        StixObject::Vulnerability(o) => require_text(checker, "name", &o.name),

        StixObject::Artifact(o) => {
            if !o.payload_bin.is_empty() && !o.url.is_empty() {
                checker.fail(
                    "url",
                    ValidationRule::RequiredField,
                    "payload_bin and url are mutually exclusive",
                );
            }
        }
        StixObject::AutonomousSystem(o) => {
            check_range(checker, "number", o.number, 0, i64::from(u32::MAX))
        }
        StixObject::Directory(o) => require_text(checker, "path", &o.path),
        StixObject::DomainName(o) => require_text(checker, "value", &o.value),
        StixObject::EmailAddr(o) => require_text(checker, "value", &o.value),
        StixObject::EmailMessage(_) => {}
        StixObject::File(o) => {
            if o.name.is_empty() && o.hashes.is_empty() {
                checker.fail(
                    "name",
                    ValidationRule::RequiredField,
                    "one of name or hashes is required",
                );
            }
            check_range(checker, "size", o.size, 0, i64::MAX);
        }
        StixObject::Ipv4Addr(o) => require_text(checker, "value", &o.value),
        StixObject::Ipv6Addr(o) => require_text(checker, "value", &o.value),
        StixObject::MacAddr(o) => require_text(checker, "value", &o.value),
        StixObject::Mutex(o) => require_text(checker, "name", &o.name),
        StixObject::NetworkTraffic(o) => {
            for (field, port) in [("src_port", o.src_port), ("dst_port", o.dst_port)] {
                if let Some(port) = port {
                    check_range(checker, field, port, 0, 65_535);
                }
            }
            check_window(("start", o.start.as_ref()), ("end", o.end.as_ref()), checker);
        }
        StixObject::Process(_) => {}
        StixObject::Software(o) => require_text(checker, "name", &o.name),
        StixObject::Url(o) => require_text(checker, "value", &o.value),
        StixObject::UserAccount(_) => {}
        StixObject::WindowsRegistryKey(_) => {}
        StixObject::X509Certificate(o) => {
            check_window(
                ("validity_not_before", o.validity_not_before.as_ref()),
                ("validity_not_after", o.validity_not_after.as_ref()),
                checker,
            );
        }

        StixObject::Relationship(o) => {
            require_text(checker, "relationship_type", &o.relationship_type);
            check_endpoint(checker, "source_ref", &o.source_ref);
            check_endpoint(checker, "target_ref", &o.target_ref);
            check_window(
                ("start_time", o.start_time.as_ref()),
                ("stop_time", o.stop_time.as_ref()),
                checker,
            );
        }
        StixObject::Sighting(o) => {
            require_id(checker, "sighting_of_ref", &o.sighting_of_ref);
            check_range(checker, "count", o.count, 0, MAX_COUNT);
            check_window(
                ("first_seen", o.first_seen.as_ref()),
                ("last_seen", o.last_seen.as_ref()),
                checker,
            );
        }
    }

    if let Some(common) = object.observable_common() {
        check_extension_names(&common.extensions, checker);
    }
}

fn require_text(checker: &mut Checker, field: &str, value: &str) {
    if value.is_empty() {
        checker.fail(field, ValidationRule::RequiredField, format!("{field} is required"));
    }
}

fn require_id(checker: &mut Checker, field: &str, value: &Identifier) {
    if value.is_empty() {
        checker.fail(field, ValidationRule::RequiredField, format!("{field} is required"));
    }
}

/// Relationship endpoints must be present and must not be edges themselves.
fn check_endpoint(checker: &mut Checker, field: &str, value: &Identifier) {
    require_id(checker, field, value);
    if let Some(kind) = value.kind() {
        if kind.is_relationship() {
            checker.fail(
                field,
                ValidationRule::ReferenceKind,
                format!("{field} cannot reference a {kind} object"),
            );
        }
    }
}

fn check_range(checker: &mut Checker, field: &str, value: i64, min: i64, max: i64) {
    if !(min..=max).contains(&value) {
        checker.fail(field, ValidationRule::OutOfRange, format!("{value} outside {min}..={max}"));
    }
}

fn check_location(o: &Location, checker: &mut Checker) {
    match (o.latitude, o.longitude) {
        (Some(lat), Some(long)) => {
            if !(-90.0..=90.0).contains(&lat) {
                checker.fail(
                    "latitude",
                    ValidationRule::OutOfRange,
                    format!("{lat} outside -90..=90"),
                );
            }
            if !(-180.0..=180.0).contains(&long) {
                checker.fail(
                    "longitude",
                    ValidationRule::OutOfRange,
                    format!("{long} outside -180..=180"),
                );
            }
        }
        (Some(_), None) => {
            checker.fail("longitude", ValidationRule::RequiredField, "latitude requires longitude")
        }
        (None, Some(_)) => {
            checker.fail("latitude", ValidationRule::RequiredField, "longitude requires latitude")
        }
        (None, None) => {
            if o.precision.is_some() {
                checker.fail(
                    "precision",
                    ValidationRule::RequiredField,
                    "precision requires latitude and longitude",
                );
            }
            if o.region.is_empty() && o.country.is_empty() {
                checker.fail(
                    "region",
                    ValidationRule::RequiredField,
                    "one of region, country or latitude/longitude is required",
                );
            }
        }
    }
    if let Some(precision) = o.precision {
        if precision < 0.0 {
            checker.fail(
                "precision",
                ValidationRule::OutOfRange,
                format!("{precision} is negative"),
            );
        }
    }
}

/// Extension names are either `extension-definition--…` ids or
/// `*-ext` predefined names.
fn check_extension_names(extensions: &BTreeMap<String, serde_json::Value>, checker: &mut Checker) {
    for name in extensions.keys() {
        if name.ends_with("-ext") {
            continue;
        }
        if let Err(e) = Identifier::parse(name) {
            checker.fail(
                format!("extensions.{name}"),
                ValidationRule::MalformedIdentifier,
                e.to_string(),
            );
        }
    }
}
