//! Cyber-observable objects (SCOs).
//!
//! Immutable facts about technical artifacts. All carry [`ObservableCommon`];
//! none carry created/modified timestamps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Identifier, ObjectKind, ObservableCommon, Timestamp};

/// One value stored under a Windows registry key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowsRegistryValue {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data_type: String,
}

stix_objects! {
    block observable_common: ObservableCommon;

    /// An array of bytes, inline or by URL.
    Artifact {
        mime_type: String,
        payload_bin: String,
        url: String,
        hashes: BTreeMap<String, String>,
        encryption_algorithm: String,
        decryption_key: String,
    }

    /// An autonomous system.
    AutonomousSystem {
        number: i64,
        name: String,
        rir: String,
    }

    /// A file system directory.
    Directory {
        path: String,
        path_enc: String,
        ctime: Option<Timestamp>,
        mtime: Option<Timestamp>,
        atime: Option<Timestamp>,
        contains_refs: Vec<Identifier>,
    }

    /// A network domain name.
    DomainName {
        value: String,
        resolves_to_refs: Vec<Identifier>,
    }

    /// An email address.
    EmailAddr {
        value: String,
        display_name: String,
        belongs_to_ref: Option<Identifier>,
    }

    /// An email message.
    EmailMessage {
        is_multipart: bool,
        date: Option<Timestamp>,
        content_type: String,
        from_ref: Option<Identifier>,
        sender_ref: Option<Identifier>,
        to_refs: Vec<Identifier>,
        cc_refs: Vec<Identifier>,
        bcc_refs: Vec<Identifier>,
        message_id: String,
        subject: String,
        received_lines: Vec<String>,
        additional_header_fields: BTreeMap<String, String>,
        body: String,
        raw_email_ref: Option<Identifier>,
    }

    /// A computer file.
    File {
        hashes: BTreeMap<String, String>,
        size: i64,
        name: String,
        name_enc: String,
        magic_number_hex: String,
        mime_type: String,
        ctime: Option<Timestamp>,
        mtime: Option<Timestamp>,
        atime: Option<Timestamp>,
        parent_directory_ref: Option<Identifier>,
        contains_refs: Vec<Identifier>,
        content_ref: Option<Identifier>,
    }

    /// One or more IPv4 addresses in CIDR notation.
    Ipv4Addr {
        value: String,
        resolves_to_refs: Vec<Identifier>,
        belongs_to_refs: Vec<Identifier>,
    }

    /// One or more IPv6 addresses in CIDR notation.
    Ipv6Addr {
        value: String,
        resolves_to_refs: Vec<Identifier>,
        belongs_to_refs: Vec<Identifier>,
    }

    /// A media access control address.
    MacAddr {
        value: String,
    }

    /// A mutual exclusion object.
    Mutex {
        name: String,
    }

    /// A network connection between a source and a destination.
    NetworkTraffic {
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        is_active: bool,
        src_ref: Option<Identifier>,
        dst_ref: Option<Identifier>,
        src_port: Option<i64>,
        dst_port: Option<i64>,
        protocols: Vec<String>,
        src_byte_count: i64,
        dst_byte_count: i64,
        src_packets: i64,
        dst_packets: i64,
        ipfix: BTreeMap<String, serde_json::Value>,
        src_payload_ref: Option<Identifier>,
        dst_payload_ref: Option<Identifier>,
        encapsulates_refs: Vec<Identifier>,
        encapsulated_by_ref: Option<Identifier>,
    }

    /// An instance of a running program.
    Process {
        is_hidden: bool,
        pid: i64,
        created_time: Option<Timestamp>,
        cwd: String,
        command_line: String,
        environment_variables: BTreeMap<String, String>,
        opened_connection_refs: Vec<Identifier>,
        creator_user_ref: Option<Identifier>,
        image_ref: Option<Identifier>,
        parent_ref: Option<Identifier>,
        child_refs: Vec<Identifier>,
    }

    /// A software product.
    Software {
        name: String,
        cpe: String,
        swid: String,
        languages: Vec<String>,
        vendor: String,
        version: String,
    }

    /// A uniform resource locator.
    Url {
        value: String,
    }

    /// A user account on a system or service.
    UserAccount {
        user_id: String,
        credential: String,
        account_login: String,
        account_type: String,
        display_name: String,
        is_service_account: bool,
        is_privileged: bool,
        can_escalate_privs: bool,
        is_disabled: bool,
        account_created: Option<Timestamp>,
        account_expires: Option<Timestamp>,
        credential_last_changed: Option<Timestamp>,
        account_first_login: Option<Timestamp>,
        account_last_login: Option<Timestamp>,
    }

    /// A Windows registry key.
    WindowsRegistryKey {
        key: String,
        values: Vec<WindowsRegistryValue>,
        modified_time: Option<Timestamp>,
        creator_user_ref: Option<Identifier>,
        number_of_subkeys: i64,
    }

    /// An X.509 v3 certificate.
    X509Certificate {
        is_self_signed: bool,
        hashes: BTreeMap<String, String>,
        version: String,
        serial_number: String,
        signature_algorithm: String,
        issuer: String,
        validity_not_before: Option<Timestamp>,
        validity_not_after: Option<Timestamp>,
        subject: String,
        subject_public_key_algorithm: String,
        subject_public_key_modulus: String,
        subject_public_key_exponent: Option<i64>,
        x509_v3_extensions: BTreeMap<String, String>,
    }
}

/// Returns the properties whose values determine a deterministic identifier.
///
/// An empty slice means the kind has no contributing properties and uses a
/// random identifier.
pub fn id_contributing_properties(kind: ObjectKind) -> &'static [&'static str] {
    match kind {
        ObjectKind::Artifact => &["hashes", "payload_bin"],
        ObjectKind::AutonomousSystem => &["number"],
        ObjectKind::Directory => &["path"],
        ObjectKind::DomainName => &["value"],
        ObjectKind::EmailAddr => &["value"],
        ObjectKind::EmailMessage => &["from_ref", "subject", "body"],
        ObjectKind::File => &["hashes", "name", "extensions", "parent_directory_ref"],
        ObjectKind::Ipv4Addr => &["value"],
        ObjectKind::Ipv6Addr => &["value"],
        ObjectKind::MacAddr => &["value"],
        ObjectKind::Mutex => &["name"],
        ObjectKind::NetworkTraffic => &[
            "start",
            "end",
            "src_ref",
            "dst_ref",
            "src_port",
            "dst_port",
            "protocols",
            "extensions",
        ],
        ObjectKind::Software => &["name", "cpe", "swid", "vendor", "version"],
        ObjectKind::Url => &["value"],
        ObjectKind::UserAccount => &["account_type", "user_id", "account_login"],
        ObjectKind::WindowsRegistryKey => &["key", "values"],
        ObjectKind::X509Certificate => &["hashes", "serial_number"],
        _ => &[],
    }
}
