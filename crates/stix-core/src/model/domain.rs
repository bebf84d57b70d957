//! Domain objects (SDOs).
//!
//! Conceptual and analytical records. All carry [`DomainCommon`] for
//! versioning, timestamps, labels and markings.

use crate::model::{DomainCommon, Identifier, KillChainPhase, Timestamp};

stix_objects! {
    block domain_common: DomainCommon;

    /// A type of TTP describing how adversaries attempt to compromise targets.
    AttackPattern {
        name: String,
        description: String,
        aliases: Vec<String>,
        kill_chain_phases: Vec<KillChainPhase>,
    }

    /// A grouping of adversarial behaviors over a period of time.
    Campaign {
        name: String,
        description: String,
        aliases: Vec<String>,
        first_seen: Option<Timestamp>,
        last_seen: Option<Timestamp>,
        objective: String,
    }

    /// A recommendation for preventing or responding to an attack.
    CourseOfAction {
        name: String,
        description: String,
    }

    /// A set of objects sharing a context.
    Grouping {
        name: String,
        description: String,
        context: String,
        object_refs: Vec<Identifier>,
    }

    /// An individual, organization or group.
    Identity {
        name: String,
        description: String,
        roles: Vec<String>,
        identity_class: String,
        sectors: Vec<String>,
        contact_information: String,
    }

    /// A security incident.
    Incident {
        name: String,
        description: String,
        kill_chain_phases: Vec<KillChainPhase>,
    }

    /// A pattern that can be used to detect suspicious or malicious activity.
    Indicator {
        name: String,
        description: String,
        indicator_types: Vec<String>,
        pattern: String,
        pattern_type: String,
        pattern_version: String,
        valid_from: Option<Timestamp>,
        valid_until: Option<Timestamp>,
        kill_chain_phases: Vec<KillChainPhase>,
    }

    /// Systems, software services and resources used by an adversary or defender.
    Infrastructure {
        name: String,
        description: String,
        infrastructure_types: Vec<String>,
        aliases: Vec<String>,
        kill_chain_phases: Vec<KillChainPhase>,
        first_seen: Option<Timestamp>,
        last_seen: Option<Timestamp>,
    }

    /// Adversarial behaviors orchestrated by a single organization.
    IntrusionSet {
        name: String,
        description: String,
        aliases: Vec<String>,
        first_seen: Option<Timestamp>,
        last_seen: Option<Timestamp>,
        goals: Vec<String>,
        resource_level: String,
        primary_motivation: String,
        secondary_motivations: Vec<String>,
    }

    /// A geographic location.
    Location {
        name: String,
        description: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
        precision: Option<f64>,
        region: String,
        country: String,
        administrative_area: String,
        city: String,
        street_address: String,
        postal_code: String,
    }

    /// Malicious code, either a family or a single instance.
    Malware {
        name: String,
        description: String,
        malware_types: Vec<String>,
        is_family: bool,
        aliases: Vec<String>,
        kill_chain_phases: Vec<KillChainPhase>,
        first_seen: Option<Timestamp>,
        last_seen: Option<Timestamp>,
        operating_system_refs: Vec<Identifier>,
        architecture_execution_envs: Vec<String>,
        implementation_languages: Vec<String>,
        capabilities: Vec<String>,
        sample_refs: Vec<Identifier>,
    }

    /// The result of a static or dynamic analysis of a malware sample.
    MalwareAnalysis {
        product: String,
        version: String,
        host_vm_ref: Option<Identifier>,
        operating_system_ref: Option<Identifier>,
        installed_software_refs: Vec<Identifier>,
        configuration_version: String,
        modules: Vec<String>,
        analysis_engine_version: String,
        analysis_definition_version: String,
        submitted: Option<Timestamp>,
        analysis_started: Option<Timestamp>,
        analysis_ended: Option<Timestamp>,
        result_name: String,
        result: String,
        analysis_sco_refs: Vec<Identifier>,
        sample_ref: Option<Identifier>,
    }

    /// Analyst commentary attached to other objects.
    Note {
        r#abstract: String,
        content: String,
        authors: Vec<String>,
        object_refs: Vec<Identifier>,
    }

    /// Raw observations of cyber-observable objects.
    ObservedData {
        first_observed: Option<Timestamp>,
        last_observed: Option<Timestamp>,
        number_observed: i64,
        object_refs: Vec<Identifier>,
    }

    /// An assessment of the correctness of other objects.
    Opinion {
        explanation: String,
        authors: Vec<String>,
        opinion: String,
        object_refs: Vec<Identifier>,
    }

    /// A collection of threat intelligence on one or more topics.
    Report {
        name: String,
        description: String,
        report_types: Vec<String>,
        published: Option<Timestamp>,
        object_refs: Vec<Identifier>,
    }

    /// An actual individual, group or organization operating with malicious intent.
    ThreatActor {
        name: String,
        description: String,
        threat_actor_types: Vec<String>,
        aliases: Vec<String>,
        first_seen: Option<Timestamp>,
        last_seen: Option<Timestamp>,
        roles: Vec<String>,
        goals: Vec<String>,
        sophistication: String,
        resource_level: String,
        primary_motivation: String,
        secondary_motivations: Vec<String>,
        personal_motivations: Vec<String>,
    }

    /// Legitimate software that can be used by threat actors.
    Tool {
        name: String,
        description: String,
        tool_types: Vec<String>,
        aliases: Vec<String>,
        kill_chain_phases: Vec<KillChainPhase>,
        tool_version: String,
    }

    /// A mistake in software that can be used to gain unauthorized access.
    Vulnerability {
        name: String,
        description: String,
    }
}
