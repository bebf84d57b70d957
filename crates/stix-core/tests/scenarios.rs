//! End-to-end scenarios across the model, validator, sanitizer and codec.

use serde_json::{json, Value};
use stix_core::codec::{decode, decode_any, decode_collection, encode, encode_collection};
use stix_core::error::{DecodeError, ValidationRule};
use stix_core::model::{
    ExternalReference, FixedClock, GranularMarking, Identifier, Indicator, ObjectFamily,
    ObjectKind, PropertyBlockMut, Relationship, StixObject, Timestamp, Url,
};
use stix_core::render::render;
use stix_core::sanitize::sanitize;
use stix_core::validate::{is_valid, validate};

fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).unwrap()
}

fn shaped_kinds() -> impl Iterator<Item = ObjectKind> {
    ObjectKind::ALL.iter().copied().filter(|k| StixObject::has_shape(*k))
}

fn id(kind: ObjectKind) -> String {
    Identifier::new(kind).to_string()
}

const NOW: &str = "2024-03-15T14:30:00Z";

/// The fields each kind cannot do without.
fn required_fields(kind: ObjectKind) -> Value {
    match kind {
        ObjectKind::AttackPattern
        | ObjectKind::Campaign
        | ObjectKind::CourseOfAction
        | ObjectKind::Identity
        | ObjectKind::Infrastructure
        | ObjectKind::IntrusionSet
        | ObjectKind::Report
        | ObjectKind::ThreatActor
        | ObjectKind::Tool
        | ObjectKind::Vulnerability
        | ObjectKind::Mutex
        | ObjectKind::Software
        | ObjectKind::File => json!({ "name": "required" }),
        ObjectKind::Grouping => json!({ "context": "suspicious-activity" }),
        ObjectKind::Indicator => json!({
            "pattern": "[ipv4-addr:value = '198.51.100.1']",
            "pattern_type": "stix",
            "valid_from": NOW,
        }),
        ObjectKind::Location => json!({ "region": "europe" }),
        ObjectKind::MalwareAnalysis => json!({ "product": "sandbox" }),
        ObjectKind::Note => json!({ "content": "seen twice" }),
        ObjectKind::Opinion => json!({ "opinion": "agree" }),
        ObjectKind::Directory => json!({ "path": "C:\\Windows" }),
        ObjectKind::DomainName
        | ObjectKind::EmailAddr
        | ObjectKind::Ipv4Addr
        | ObjectKind::Ipv6Addr
        | ObjectKind::MacAddr
        | ObjectKind::Url => json!({ "value": "example" }),
        ObjectKind::Relationship => json!({
            "relationship_type": "uses",
            "source_ref": id(ObjectKind::IntrusionSet),
            "target_ref": id(ObjectKind::Malware),
            "created": NOW,
            "modified": NOW,
        }),
        ObjectKind::Sighting => json!({
            "sighting_of_ref": id(ObjectKind::Indicator),
            "created": NOW,
            "modified": NOW,
        }),
        _ => json!({}),
    }
}

/// Every optional type-specific field of each kind, set to a non-blank value.
///
/// Values are written in their canonical wire form so the encoded output can
/// be compared member by member.
fn optional_fields(kind: ObjectKind) -> Value {
    let first = "2024-01-01T00:00:00Z";
    let last = "2025-06-30T12:00:00Z";
    let phases = json!([{ "kill_chain_name": "mitre-attack", "phase_name": "execution" }]);
    match kind {
        ObjectKind::AttackPattern => json!({
            "description": "spear phishing",
            "aliases": ["T1566"],
            "kill_chain_phases": phases,
        }),
        ObjectKind::Campaign => json!({
            "description": "a campaign",
            "aliases": ["Dust"],
            "first_seen": first,
            "last_seen": last,
            "objective": "exfiltration",
        }),
        ObjectKind::CourseOfAction => json!({ "description": "patch" }),
        ObjectKind::Grouping => json!({
            "name": "cluster",
            "description": "related",
            "object_refs": [id(ObjectKind::Indicator)],
        }),
        ObjectKind::Identity => json!({
            "description": "a vendor",
            "roles": ["analyst"],
            "identity_class": "organization",
            "sectors": ["technology"],
            "contact_information": "soc@example.test",
        }),
        ObjectKind::Incident => json!({
            "name": "breach",
            "description": "an incident",
            "kill_chain_phases": phases,
        }),
        ObjectKind::Indicator => json!({
            "name": "bad ip",
            "description": "c2",
            "indicator_types": ["malicious-activity"],
            "pattern_version": "2.1",
            "valid_until": last,
            "kill_chain_phases": phases,
        }),
        ObjectKind::Infrastructure => json!({
            "description": "c2 servers",
            "infrastructure_types": ["command-and-control"],
            "aliases": ["c2"],
            "kill_chain_phases": phases,
            "first_seen": first,
            "last_seen": last,
        }),
        ObjectKind::IntrusionSet => json!({
            "description": "a set",
            "aliases": ["APT-X"],
            "first_seen": first,
            "last_seen": last,
            "goals": ["espionage"],
            "resource_level": "government",
            "primary_motivation": "ideology",
            "secondary_motivations": ["dominance"],
        }),
        ObjectKind::Location => json!({
            "name": "Paris",
            "description": "capital",
            "latitude": 48.8566,
            "longitude": -91.81594160177767,
            "precision": 1000.5,
            "country": "fr",
            "administrative_area": "Ile-de-France",
            "city": "Paris",
            "street_address": "1 Rue",
            "postal_code": "75001",
        }),
        ObjectKind::Malware => json!({
            "name": "Poison Ivy",
            "description": "a rat",
            "malware_types": ["remote-access-trojan"],
            "is_family": true,
            "aliases": ["pivy"],
            "kill_chain_phases": phases,
            "first_seen": first,
            "last_seen": last,
            "operating_system_refs": [id(ObjectKind::Software)],
            "architecture_execution_envs": ["x86"],
            "implementation_languages": ["c"],
            "capabilities": ["persists-after-system-reboot"],
            "sample_refs": [id(ObjectKind::File)],
        }),
        ObjectKind::MalwareAnalysis => json!({
            "version": "1.0",
            "host_vm_ref": id(ObjectKind::Software),
            "operating_system_ref": id(ObjectKind::Software),
            "installed_software_refs": [id(ObjectKind::Software)],
            "configuration_version": "3",
            "modules": ["pe"],
            "analysis_engine_version": "5.1",
            "analysis_definition_version": "2024.1",
            "submitted": first,
            "analysis_started": first,
            "analysis_ended": last,
            "result_name": "pivy",
            "result": "malicious",
            "analysis_sco_refs": [id(ObjectKind::File)],
            "sample_ref": id(ObjectKind::File),
        }),
        ObjectKind::Note => json!({
            "abstract": "summary",
            "authors": ["analyst"],
            "object_refs": [id(ObjectKind::Campaign)],
        }),
        ObjectKind::ObservedData => json!({
            "first_observed": first,
            "last_observed": last,
            "number_observed": 3,
            "object_refs": [id(ObjectKind::Ipv4Addr)],
        }),
        ObjectKind::Opinion => json!({
            "explanation": "confirmed",
            "authors": ["analyst"],
            "object_refs": [id(ObjectKind::Report)],
        }),
        ObjectKind::Report => json!({
            "description": "quarterly",
            "report_types": ["threat-report"],
            "published": last,
            "object_refs": [id(ObjectKind::Campaign)],
        }),
        ObjectKind::ThreatActor => json!({
            "description": "an actor",
            "threat_actor_types": ["nation-state"],
            "aliases": ["Bear"],
            "first_seen": first,
            "last_seen": last,
            "roles": ["agent"],
            "goals": ["espionage"],
            "sophistication": "expert",
            "resource_level": "government",
            "primary_motivation": "ideology",
            "secondary_motivations": ["coercion"],
            "personal_motivations": ["revenge"],
        }),
        ObjectKind::Tool => json!({
            "description": "remote admin",
            "tool_types": ["remote-access"],
            "aliases": ["vnc"],
            "kill_chain_phases": phases,
            "tool_version": "4.1",
        }),
        ObjectKind::Vulnerability => json!({ "description": "overflow" }),

        ObjectKind::Artifact => json!({
            "mime_type": "application/zip",
            "payload_bin": "UEsDBA==",
            "hashes": { "SHA-256": "6db12788c37247f2" },
            "encryption_algorithm": "mime-type-indicated",
            "decryption_key": "infected",
        }),
        ObjectKind::AutonomousSystem => json!({ "number": 15139, "name": "Slime", "rir": "ARIN" }),
        ObjectKind::Directory => json!({
            "path_enc": "cGF0aA==",
            "ctime": first,
            "mtime": last,
            "atime": last,
            "contains_refs": [id(ObjectKind::File)],
        }),
        ObjectKind::DomainName => json!({ "resolves_to_refs": [id(ObjectKind::Ipv4Addr)] }),
        ObjectKind::EmailAddr => json!({
            "display_name": "John Doe",
            "belongs_to_ref": id(ObjectKind::UserAccount),
        }),
        ObjectKind::EmailMessage => json!({
            "is_multipart": true,
            "date": first,
            "content_type": "text/plain",
            "from_ref": id(ObjectKind::EmailAddr),
            "sender_ref": id(ObjectKind::EmailAddr),
            "to_refs": [id(ObjectKind::EmailAddr)],
            "cc_refs": [id(ObjectKind::EmailAddr)],
            "bcc_refs": [id(ObjectKind::EmailAddr)],
            "message_id": "<1@example.test>",
            "subject": "invoice",
            "received_lines": ["from mx.example.test"],
            "additional_header_fields": { "X-Mailer": "mutt" },
            "body": "see attached",
            "raw_email_ref": id(ObjectKind::Artifact),
        }),
        ObjectKind::File => json!({
            "hashes": { "MD5": "8e2e2d2b" },
            "size": 25536,
            "name_enc": "utf-8",
            "magic_number_hex": "4D5A",
            "mime_type": "application/x-dosexec",
            "ctime": first,
            "mtime": last,
            "atime": last,
            "parent_directory_ref": id(ObjectKind::Directory),
            "contains_refs": [id(ObjectKind::File)],
            "content_ref": id(ObjectKind::Artifact),
        }),
        ObjectKind::Ipv4Addr | ObjectKind::Ipv6Addr => json!({
            "resolves_to_refs": [id(ObjectKind::MacAddr)],
            "belongs_to_refs": [id(ObjectKind::AutonomousSystem)],
        }),
        ObjectKind::NetworkTraffic => json!({
            "start": first,
            "end": last,
            "is_active": true,
            "src_ref": id(ObjectKind::Ipv4Addr),
            "dst_ref": id(ObjectKind::DomainName),
            "src_port": 0,
            "dst_port": 443,
            "protocols": ["ipv4", "tcp"],
            "src_byte_count": 147600,
            "dst_byte_count": 716000,
            "src_packets": 100,
            "dst_packets": 200,
            "ipfix": { "minimumIpTotalLength": 32, "maximumIpTotalLength": 2556 },
            "src_payload_ref": id(ObjectKind::Artifact),
            "dst_payload_ref": id(ObjectKind::Artifact),
            "encapsulates_refs": [id(ObjectKind::NetworkTraffic)],
            "encapsulated_by_ref": id(ObjectKind::NetworkTraffic),
        }),
        ObjectKind::Process => json!({
            "is_hidden": true,
            "pid": 1221,
            "created_time": first,
            "cwd": "/tmp",
            "command_line": "./gedit-bin --new-window",
            "environment_variables": { "HOME": "/root" },
            "opened_connection_refs": [id(ObjectKind::NetworkTraffic)],
            "creator_user_ref": id(ObjectKind::UserAccount),
            "image_ref": id(ObjectKind::File),
            "parent_ref": id(ObjectKind::Process),
            "child_refs": [id(ObjectKind::Process)],
        }),
        ObjectKind::Software => json!({
            "cpe": "cpe:2.3:a:example:word:2002:*:*:*:*:*:*:*",
            "swid": "com.example.word",
            "languages": ["en"],
            "vendor": "Example",
            "version": "2002",
        }),
        ObjectKind::UserAccount => json!({
            "user_id": "1001",
            "credential": "hunter2",
            "account_login": "jdoe",
            "account_type": "unix",
            "display_name": "John Doe",
            "is_service_account": true,
            "is_privileged": true,
            "can_escalate_privs": true,
            "is_disabled": true,
            "account_created": first,
            "account_expires": last,
            "credential_last_changed": first,
            "account_first_login": first,
            "account_last_login": last,
        }),
        ObjectKind::WindowsRegistryKey => json!({
            "key": "HKEY_LOCAL_MACHINE\\System\\Foo",
            "values": [{ "name": "Foo", "data": "qwerty", "data_type": "REG_SZ" }],
            "modified_time": first,
            "creator_user_ref": id(ObjectKind::UserAccount),
            "number_of_subkeys": 2,
        }),
        ObjectKind::X509Certificate => json!({
            "is_self_signed": true,
            "hashes": { "SHA-256": "6db12788c37247f2" },
            "version": "3",
            "serial_number": "36:f7:d4:32",
            "signature_algorithm": "md5WithRSAEncryption",
            "issuer": "C=ZA, O=Thawte",
            "validity_not_before": first,
            "validity_not_after": last,
            "subject": "C=US, O=Example",
            "subject_public_key_algorithm": "rsaEncryption",
            "subject_public_key_modulus": "00:c5:f8",
            "subject_public_key_exponent": 65537,
            "x509_v3_extensions": { "basicConstraints": "CA:TRUE" },
        }),

        ObjectKind::Relationship => json!({
            "description": "uses it",
            "start_time": first,
            "stop_time": last,
        }),
        ObjectKind::Sighting => json!({
            "description": "seen",
            "first_seen": first,
            "last_seen": last,
            "count": 7,
            "observed_data_refs": [id(ObjectKind::ObservedData)],
            "where_sighted_refs": [id(ObjectKind::Identity)],
            "summary": true,
        }),
        _ => json!({}),
    }
}

/// Decodes a record of `kind` built from the given member sets.
fn build(kind: ObjectKind, parts: &[Value]) -> StixObject {
    let mut record = serde_json::Map::new();
    record.insert("type".to_string(), json!(kind.as_str()));
    record.insert("id".to_string(), json!(id(kind)));
    for part in parts {
        if let Value::Object(members) = part {
            record.extend(members.clone());
        }
    }
    decode_any(&serde_json::to_vec(&record).unwrap()).unwrap()
}

/// The smallest record of each kind that carries every required field.
fn minimal(kind: ObjectKind) -> StixObject {
    build(kind, &[required_fields(kind)])
}

/// A record of each kind with every type-specific field set.
fn populated(kind: ObjectKind) -> StixObject {
    build(kind, &[required_fields(kind), optional_fields(kind)])
}

fn populate_block(object: &mut StixObject) {
    let marking = Identifier::new(ObjectKind::MarkingDefinition);
    let mut granular = GranularMarking::new(marking.clone(), ["description", "labels/0"]);
    granular.lang = "en".to_string();

    match object.block_mut() {
        PropertyBlockMut::Domain(common) => {
            common.set_timestamps(ts("2024-01-01T00:00:00Z"), ts("2024-02-01T12:00:00Z"));
            common.set_created_by_ref(Identifier::new(ObjectKind::Identity));
            common.set_confidence(85);
            common.set_lang("en");
            common.add_label("apt");
            let mut reference = ExternalReference::new("capec");
            reference.description = "reference description".to_string();
            reference.url = "https://capec.mitre.org/data/definitions/163.html".to_string();
            reference.external_id = "CAPEC-163".to_string();
            reference.hashes.insert("SHA-256".to_string(), "6db12788c37247f2".to_string());
            common.add_external_reference(reference);
            common.add_marking_ref(marking);
            common.add_granular_marking(granular);
            common.set_extension("x-source", "feed");
        }
        PropertyBlockMut::Observable(common) => {
            common.add_marking_ref(marking);
            common.add_granular_marking(granular);
            common.set_extension("x-acme-ext", json!({ "score": 7, "tags": ["a", "b"] }));
        }
        PropertyBlockMut::Relationship(common) => {
            common.set_timestamps(ts("2024-01-01T00:00:00Z"), ts("2024-02-01T12:00:00Z"));
        }
    }
}

#[test]
fn relationship_uses_scenario() {
    let mut rel = Relationship::link(
        "uses",
        Identifier::new(ObjectKind::IntrusionSet),
        Identifier::new(ObjectKind::Malware),
    );
    rel.relationship_common
        .set_timestamps(ts("2016-04-06T20:06:37Z"), ts("2016-04-06T20:06:37Z"));
    let object = StixObject::from(rel.clone());
    assert!(validate(&object).is_ok());

    let bytes = encode(&object).unwrap();
    assert_eq!(decode("relationship", &bytes).unwrap(), object);

    rel.target_ref = Identifier::from_raw("malware--");
    let errors = validate(&rel.into()).unwrap_err();
    assert!(errors.has_field("target_ref"));
    assert!(errors.has_rule(ValidationRule::MalformedIdentifier));
}

#[test]
fn indicator_confidence_bounds() {
    let StixObject::Indicator(mut indicator) = minimal(ObjectKind::Indicator) else {
        panic!("expected an indicator");
    };
    indicator.domain_common.set_confidence(150);
    let errors = validate(&indicator.clone().into()).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].field, "confidence");
    assert_eq!(errors.errors()[0].rule, ValidationRule::OutOfRange);

    indicator.domain_common.set_confidence(0);
    assert!(is_valid(&indicator.into()));
}

#[test]
fn uppercase_spec_version_rejected() {
    let mut indicator = Indicator::new();
    indicator.domain_common.spec_version = "2.1A".to_string();
    let errors = validate(&indicator.into()).unwrap_err();
    assert!(errors.has_field("spec_version"));
    assert!(errors.has_rule(ValidationRule::SpecVersionFormat));
}

#[test]
fn sanitize_twice_only_moves_modified() {
    let mut object = minimal(ObjectKind::Report);
    if let StixObject::Report(report) = &mut object {
        report.description = "  <b>Q1</b> & \u{7}summary  ".to_string();
    }
    let once = sanitize(&object, &FixedClock(ts("2024-05-01T00:00:00Z")));
    let mut twice = sanitize(&once, &FixedClock(ts("2024-06-01T00:00:00Z")));

    let StixObject::Report(report) = &once else {
        panic!("expected a report");
    };
    assert_eq!(report.description, "&lt;b&gt;Q1&lt;/b&gt; &amp; summary");
    assert_eq!(once.domain_common().unwrap().modified, ts("2024-05-01T00:00:00Z"));

    assert_ne!(twice, once);
    twice.domain_common_mut().unwrap().modified = once.domain_common().unwrap().modified;
    assert_eq!(twice, once);
}

#[test]
fn sanitize_keeps_patterns_verbatim() {
    let object = minimal(ObjectKind::Indicator);
    let cleaned = sanitize(&object, &FixedClock(ts("2024-05-01T00:00:00Z")));
    let (StixObject::Indicator(before), StixObject::Indicator(after)) = (&object, &cleaned)
    else {
        panic!("expected indicators");
    };
    assert_eq!(after.pattern, before.pattern);
}

#[test]
fn decode_rejects_mismatched_tag() {
    let object = minimal(ObjectKind::Relationship);
    let bytes = encode(&object).unwrap();
    assert!(matches!(decode("sighting", &bytes), Err(DecodeError::Malformed { .. })));
}

#[test]
fn decode_rejects_unknown_tag() {
    let bytes = encode(&minimal(ObjectKind::Url)).unwrap();
    assert_eq!(
        decode("bogus-kind", &bytes),
        Err(DecodeError::UnknownType { tag: "bogus-kind".to_string() })
    );
}

#[test]
fn every_shape_roundtrips_fully_populated() {
    for kind in shaped_kinds() {
        let mut object = populated(kind);
        populate_block(&mut object);
        let bytes = encode(&object).unwrap();
        let decoded = decode(kind.as_str(), &bytes).unwrap_or_else(|e| panic!("{kind}: {e}"));
        assert_eq!(decoded, object, "{kind}");
        assert_eq!(decoded.family(), kind.family());
    }
}

#[test]
fn every_optional_field_reaches_the_wire() {
    for kind in shaped_kinds() {
        let encoded: Value = serde_json::from_slice(&encode(&populated(kind)).unwrap()).unwrap();
        let Value::Object(expected) = optional_fields(kind) else {
            panic!("{kind}: fixture is not a record");
        };
        for (field, value) in &expected {
            assert_eq!(encoded.get(field), Some(value), "{kind}.{field}");
        }
    }
}

#[test]
fn populated_shapes_validate() {
    for kind in shaped_kinds() {
        if let Err(errors) = validate(&populated(kind)) {
            panic!("{kind}: {errors}");
        }
    }
}

#[test]
fn required_fields_alone_validate() {
    for kind in shaped_kinds() {
        let object = minimal(kind);
        if let Err(errors) = validate(&object) {
            panic!("{kind}: {errors}");
        }
    }
}

#[test]
fn populated_blocks_validate() {
    for kind in shaped_kinds() {
        let mut object = minimal(kind);
        populate_block(&mut object);
        if let Err(errors) = validate(&object) {
            panic!("{kind}: {errors}");
        }
    }
}

#[test]
fn new_objects_carry_matching_ids() {
    for kind in shaped_kinds() {
        let object = minimal(kind);
        assert_eq!(object.id().kind(), Some(kind));
        assert_eq!(object.spec_version(), "2.1");
        let expect_domain_block = kind.family() == ObjectFamily::Domain;
        assert_eq!(object.domain_common().is_some(), expect_domain_block, "{kind}");
    }
}

#[test]
fn mixed_collection_with_duplicates() {
    let mut url = Url::new();
    url.value = "https://example.test/payload".to_string();
    let url = StixObject::from(url);
    let indicator = minimal(ObjectKind::Indicator);

    let mut elements: Vec<Value> = [&url, &indicator, &url]
        .iter()
        .map(|o| serde_json::to_value(o).unwrap())
        .collect();
    elements.push(json!({ "type": "x-unknown", "id": "x-unknown--1" }));
    let bytes = serde_json::to_vec(&elements).unwrap();

    let decoded = decode_collection(&bytes).unwrap();
    assert_eq!(decoded.len(), 4);
    assert_eq!(decoded[0].as_ref().unwrap(), &url);
    assert_eq!(decoded[1].as_ref().unwrap(), &indicator);
    assert!(matches!(decoded[2], Err(DecodeError::DuplicateId { .. })));
    assert!(decoded[3].as_ref().unwrap_err().is_unknown_type());

    let again = encode_collection(&[url.clone(), indicator.clone()]).unwrap();
    let ok: Vec<StixObject> = decode_collection(&again)
        .unwrap()
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(ok, vec![url, indicator]);
}

#[test]
fn render_lists_identity_first() {
    let text = render(&minimal(ObjectKind::Note), 0);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("type: note"));
    assert!(lines.next().unwrap().starts_with("id: note--"));
    assert!(text.contains("content: seen twice\n"));
}
