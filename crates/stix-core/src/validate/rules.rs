//! Base identity and shared-block rules.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationRule;
use crate::model::{
    DomainCommon, ObjectKind, ObservableCommon, PropertyBlock, RelationshipCommon, StixObject,
    Timestamp,
};
use crate::validate::{Checker, FieldCheck};

lazy_static! {
    static ref SPEC_VERSION: Regex = Regex::new(r"^[0-9a-z.]+$").unwrap();
    static ref LANG: Regex = Regex::new(r"^[a-zA-Z]+$").unwrap();
    static ref SELECTOR: Regex = Regex::new(r"^/?[a-z0-9_]+(/[a-z0-9_]+)*$").unwrap();
}

pub(crate) fn check_base(object: &StixObject, checker: &mut Checker) {
    let kind = object.kind();
    match object.id().check() {
        Ok(id_kind) if id_kind == kind => {}
        Ok(id_kind) => checker.fail(
            "id",
            ValidationRule::IdKindMismatch,
            format!("id names {id_kind} but the object is {kind}"),
        ),
        Err(e) => checker.fail("id", ValidationRule::MalformedIdentifier, e.to_string()),
    }
}

pub(crate) fn check_block(block: PropertyBlock<'_>, checker: &mut Checker) {
    match block {
        PropertyBlock::Domain(b) => check_domain_common(b, checker),
        PropertyBlock::Observable(b) => check_observable_common(b, checker),
        PropertyBlock::Relationship(b) => check_relationship_common(b, checker),
    }
}

fn check_domain_common(b: &DomainCommon, checker: &mut Checker) {
    check_spec_version(&b.spec_version, checker);
    if !b.lang.is_empty() {
        check_lang("lang", &b.lang, checker);
    }
    check_modified(&b.created, &b.modified, checker);
    b.created_by_ref.check_field("created_by_ref", checker);
    b.external_references.check_field("external_references", checker);
    b.object_marking_refs.check_field("object_marking_refs", checker);
    b.granular_markings.check_field("granular_markings", checker);
}

fn check_observable_common(b: &ObservableCommon, checker: &mut Checker) {
    check_spec_version(&b.spec_version, checker);
    b.object_marking_refs.check_field("object_marking_refs", checker);
    b.granular_markings.check_field("granular_markings", checker);
}

/// Relationship objects must carry both timestamps.
fn check_relationship_common(b: &RelationshipCommon, checker: &mut Checker) {
    check_spec_version(&b.spec_version, checker);
    for (field, value) in [("created", &b.created), ("modified", &b.modified)] {
        if value.is_unset() {
            checker.fail(field, ValidationRule::TimestampUnset, format!("{field} is required"));
        }
    }
    check_modified(&b.created, &b.modified, checker);
}

fn check_spec_version(value: &str, checker: &mut Checker) {
    if !SPEC_VERSION.is_match(value) {
        checker.fail(
            "spec_version",
            ValidationRule::SpecVersionFormat,
            format!("{value:?} does not match [0-9a-z.]+"),
        );
    }
}

fn check_modified(created: &Timestamp, modified: &Timestamp, checker: &mut Checker) {
    if !created.is_unset() && !modified.is_unset() && modified < created {
        checker.fail(
            "modified",
            ValidationRule::TimestampOrder,
            format!("modified {modified} is before created {created}"),
        );
    }
}

pub(crate) fn check_lang(path: &str, value: &str, checker: &mut Checker) {
    if !LANG.is_match(value) {
        checker.fail(
            path,
            ValidationRule::LangFormat,
            format!("{value:?} does not match [a-zA-Z]+"),
        );
    }
}

pub(crate) fn check_selector(path: &str, value: &str, checker: &mut Checker) {
    if !SELECTOR.is_match(value) {
        checker.fail(
            path,
            ValidationRule::SelectorFormat,
            format!("{value:?} is not a /-separated path of [a-z0-9_] segments"),
        );
    }
}

/// Ensures `earlier` is not after `later` when both are present.
pub(crate) fn check_window(
    earlier: (&str, Option<&Timestamp>),
    later: (&str, Option<&Timestamp>),
    checker: &mut Checker,
) {
    if let ((first_name, Some(first)), (last_name, Some(last))) = (earlier, later) {
        if last < first {
            checker.fail(
                last_name,
                ValidationRule::TimestampOrder,
                format!("{last_name} {last} is before {first_name} {first}"),
            );
        }
    }
}

/// Returns the kinds a reference field may point at, or `None` if any kind is
/// allowed.
fn allowed_kinds(field: &str) -> Option<&'static [ObjectKind]> {
    use ObjectKind::*;

    let kinds: &'static [ObjectKind] = match field {
        "created_by_ref" => &[Identity],
        "object_marking_refs" | "marking_ref" => &[MarkingDefinition],
        "observed_data_refs" => &[ObservedData],
        "where_sighted_refs" => &[Identity, Location],
        "operating_system_refs" | "operating_system_ref" | "installed_software_refs"
        | "host_vm_ref" => &[Software],
        "sample_refs" | "sample_ref" => &[File, Artifact],
        "from_ref" | "sender_ref" | "to_refs" | "cc_refs" | "bcc_refs" => &[EmailAddr],
        "belongs_to_ref" | "creator_user_ref" => &[UserAccount],
        "belongs_to_refs" => &[AutonomousSystem],
        "resolves_to_refs" => &[Ipv4Addr, Ipv6Addr, MacAddr, DomainName],
        "src_ref" | "dst_ref" => &[Ipv4Addr, Ipv6Addr, MacAddr, DomainName],
        "raw_email_ref" | "content_ref" | "src_payload_ref" | "dst_payload_ref" => &[Artifact],
        "encapsulates_refs" | "encapsulated_by_ref" | "opened_connection_refs" => {
            &[NetworkTraffic]
        }
        "parent_directory_ref" => &[Directory],
        "image_ref" => &[File],
        "parent_ref" | "child_refs" => &[Process],
        _ => return None,
    };
    Some(kinds)
}

/// Strips the record prefix and index suffix from a field path:
/// `granular_markings[0].marking_ref` -> `marking_ref`,
/// `object_marking_refs[2]` -> `object_marking_refs`.
fn leaf_name(path: &str) -> &str {
    let leaf = path.rsplit('.').next().unwrap_or(path);
    leaf.split('[').next().unwrap_or(leaf)
}

pub(crate) fn check_reference_kind(path: &str, kind: ObjectKind, checker: &mut Checker) {
    let Some(allowed) = allowed_kinds(leaf_name(path)) else {
        return;
    };
    if !allowed.contains(&kind) {
        let names: Vec<&str> = allowed.iter().map(|k| k.as_str()).collect();
        checker.fail(
            path,
            ValidationRule::ReferenceKind,
            format!("references {kind}, expected {}", names.join(" or ")),
        );
    }
}
