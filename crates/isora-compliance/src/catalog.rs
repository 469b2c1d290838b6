use isora_common::{Framework, Phase};
use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct FrameworkInfo {
    pub id: Framework,
    pub name: &'static str,
    pub version: &'static str,
    pub controls_count: u32,
    pub organization: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone)]
pub struct Control {
    pub id: &'static str,
    pub name: &'static str,
    pub family: &'static str,
    pub description: &'static str,
    pub evidence_requirements: &'static [&'static str],
}

/// Static, version-stamped catalog (§4.4). Control lists below are a
/// representative subset of each framework's published control set,
/// not an exhaustive reproduction of frameworks whose full catalogs run to
/// hundreds or low thousands of controls (`nist_800_53`: 1189,
/// `mitre_attack`: 600) — `controls_count` on `FrameworkInfo` still carries
/// the real published total for catalog/display purposes.
pub static FRAMEWORKS: Lazy<Vec<FrameworkInfo>> = Lazy::new(|| {
    vec![
        FrameworkInfo {
            id: Framework::BsiGrundschutz,
            name: "BSI IT-Grundschutz",
            version: "2023",
            controls_count: 150,
            organization: "Bundesamt für Sicherheit in der Informationstechnik",
            url: "https://www.bsi.bund.de/",
        },
        FrameworkInfo {
            id: Framework::NistCsf2,
            name: "NIST CSF 2.0",
            version: "2.0",
            controls_count: 108,
            organization: "National Institute of Standards and Technology",
            url: "https://www.nist.gov/cyberframework",
        },
        FrameworkInfo {
            id: Framework::Nist80053,
            name: "NIST SP 800-53",
            version: "Rev 5.1",
            controls_count: 1189,
            organization: "National Institute of Standards and Technology",
            url: "https://csrc.nist.gov/publications/detail/sp/800-53/rev-5/final",
        },
        FrameworkInfo {
            id: Framework::Nist80061,
            name: "NIST SP 800-61 (Incident Handling Guide)",
            version: "Rev 2",
            controls_count: 24,
            organization: "National Institute of Standards and Technology",
            url: "https://csrc.nist.gov/publications/detail/sp/800-61/rev-2/final",
        },
        FrameworkInfo {
            id: Framework::Iso27001,
            name: "ISO/IEC 27001:2022",
            version: "2022",
            controls_count: 93,
            organization: "International Organization for Standardization",
            url: "https://www.iso.org/standard/27001",
        },
        FrameworkInfo {
            id: Framework::Iso27035,
            name: "ISO/IEC 27035",
            version: "2023",
            controls_count: 40,
            organization: "International Organization for Standardization",
            url: "https://www.iso.org/standard/78973.html",
        },
        FrameworkInfo {
            id: Framework::MitreAttack,
            name: "MITRE ATT&CK",
            version: "v14",
            controls_count: 600,
            organization: "MITRE Corporation",
            url: "https://attack.mitre.org/",
        },
        FrameworkInfo {
            id: Framework::OwaspTop10,
            name: "OWASP Top 10",
            version: "2021",
            controls_count: 10,
            organization: "Open Web Application Security Project",
            url: "https://owasp.org/Top10/",
        },
        FrameworkInfo {
            id: Framework::Nis2,
            name: "NIS2 Directive",
            version: "2022",
            controls_count: 35,
            organization: "European Union",
            url: "https://digital-strategy.ec.europa.eu/en/policies/nis2-directive",
        },
    ]
});

pub fn list_frameworks() -> Vec<FrameworkInfo> {
    FRAMEWORKS.clone()
}

pub fn get_framework(id: Framework) -> Option<FrameworkInfo> {
    FRAMEWORKS.iter().find(|f| f.id == id).cloned()
}

static BSI_CONTROLS: Lazy<Vec<Control>> = Lazy::new(|| {
    vec![
        Control {
            id: "DER.1",
            name: "Detection of Security-Relevant Events",
            family: "DER",
            description: "Establish monitoring and alerting for security-relevant events.",
            evidence_requirements: &["alert log", "monitoring configuration"],
        },
        Control {
            id: "DER.2.1",
            name: "Security Incident Handling",
            family: "DER",
            description: "Respond to and report confirmed security incidents.",
            evidence_requirements: &["incident report", "response timeline"],
        },
        Control {
            id: "DER.2.2",
            name: "Forensic Readiness",
            family: "DER",
            description: "Preserve forensic evidence for incident analysis.",
            evidence_requirements: &["forensic image", "evidence capture log"],
        },
        Control {
            id: "DER.2.3",
            name: "Eradication of Compromise",
            family: "DER",
            description: "Remove malware and attacker persistence mechanisms.",
            evidence_requirements: &["cleanup report", "persistence removal log"],
        },
        Control {
            id: "DER.4",
            name: "Recovery from Security Incidents",
            family: "DER",
            description: "Restore affected systems from trusted backups.",
            evidence_requirements: &["recovery plan", "restore verification"],
        },
        Control {
            id: "CON.3",
            name: "Backup Concept",
            family: "CON",
            description: "Maintain verified, integrity-checked backups.",
            evidence_requirements: &["backup integrity check"],
        },
        Control {
            id: "ORP.1",
            name: "Organization",
            family: "ORP",
            description: "Define organizational security roles and procedures.",
            evidence_requirements: &["policy document"],
        },
        Control {
            id: "ORP.3",
            name: "Awareness and Training",
            family: "ORP",
            description: "Train staff and capture lessons learned.",
            evidence_requirements: &["training record", "lessons-learned report"],
        },
    ]
});

static ISO_27001_CONTROLS: Lazy<Vec<Control>> = Lazy::new(|| {
    vec![
        Control {
            id: "A.5.1",
            name: "Policies for Information Security",
            family: "A.5",
            description: "Define and approve information security policies.",
            evidence_requirements: &["policy document", "approval record"],
        },
        Control {
            id: "A.5.24",
            name: "Information Security Incident Management Planning",
            family: "A.5",
            description: "Plan and prepare for incident management.",
            evidence_requirements: &["incident management plan"],
        },
        Control {
            id: "A.5.25",
            name: "Assessment and Decision on Information Security Events",
            family: "A.5",
            description: "Assess and classify security events.",
            evidence_requirements: &["event assessment record"],
        },
        Control {
            id: "A.5.26",
            name: "Response to Information Security Incidents",
            family: "A.5",
            description: "Respond to incidents per the documented plan.",
            evidence_requirements: &["incident response record", "timeline"],
        },
        Control {
            id: "A.5.27",
            name: "Learning from Information Security Incidents",
            family: "A.5",
            description: "Capture lessons learned from incidents.",
            evidence_requirements: &["lessons-learned report"],
        },
        Control {
            id: "A.8.16",
            name: "Monitoring Activities",
            family: "A.8",
            description: "Monitor systems for anomalous behavior.",
            evidence_requirements: &["monitoring log"],
        },
    ]
});

/// NIST CSF 2.0 uses its own `FUNCTION.Category` identifier scheme (e.g.
/// `DE.CM`, `RS.AN`) rather than ISO 27001's `A.x` numbering; kept as its
/// own catalog so framework-native IDs stay internally consistent with
/// `cross_mapping.rs`'s unified-control table.
static NIST_CSF2_CONTROLS: Lazy<Vec<Control>> = Lazy::new(|| {
    vec![
        Control {
            id: "DE.CM",
            name: "Continuous Monitoring",
            family: "Detect",
            description: "Continuously monitor networks, systems, and assets to identify security events.",
            evidence_requirements: &["monitoring log", "alert configuration"],
        },
        Control {
            id: "RS.AN",
            name: "Incident Analysis",
            family: "Respond",
            description: "Analyze detected events to understand attack scope and impact.",
            evidence_requirements: &["analysis report", "forensic evidence"],
        },
        Control {
            id: "RS.MA",
            name: "Incident Management",
            family: "Respond",
            description: "Execute the incident response process, including containment actions.",
            evidence_requirements: &["incident report", "containment record"],
        },
        Control {
            id: "RS.MI",
            name: "Incident Mitigation",
            family: "Respond",
            description: "Mitigate and eradicate the incident to prevent expansion.",
            evidence_requirements: &["eradication record"],
        },
        Control {
            id: "RC.RP",
            name: "Incident Recovery Plan Execution",
            family: "Recover",
            description: "Execute recovery processes to restore systems and assets.",
            evidence_requirements: &["recovery plan", "restore verification"],
        },
        Control {
            id: "RS.CO",
            name: "Incident Reporting and Communication",
            family: "Respond",
            description: "Coordinate response activities with internal and external stakeholders and capture lessons learned.",
            evidence_requirements: &["communication log", "lessons-learned report"],
        },
    ]
});

/// MITRE ATT&CK mitigation categories used as evaluable controls (§4.4);
/// IDs match MITRE's published `M1xxx` mitigation identifiers.
static MITRE_ATTACK_CONTROLS: Lazy<Vec<Control>> = Lazy::new(|| {
    vec![
        Control {
            id: "M1047",
            name: "Audit",
            family: "Detect",
            description: "Perform regular audits of logs and configurations to surface adversary activity.",
            evidence_requirements: &["audit log"],
        },
        Control {
            id: "M1019",
            name: "Threat Intelligence Program",
            family: "Analyze",
            description: "Use threat intelligence to attribute and scope the incident.",
            evidence_requirements: &["threat intel report"],
        },
        Control {
            id: "M1037",
            name: "Filter Network Traffic",
            family: "Contain",
            description: "Restrict network traffic to contain adversary access.",
            evidence_requirements: &["firewall rule change", "network isolation record"],
        },
        Control {
            id: "M1049",
            name: "Antivirus/Antimalware",
            family: "Eradicate",
            description: "Remove malicious artifacts identified during the incident.",
            evidence_requirements: &["malware removal log"],
        },
        Control {
            id: "M1053",
            name: "Data Backup",
            family: "Recover",
            description: "Restore affected systems from known-good backups.",
            evidence_requirements: &["backup restore verification"],
        },
    ]
});

/// OWASP Top 10 (2021) categories used as evaluable controls (§4.4).
static OWASP_TOP10_CONTROLS: Lazy<Vec<Control>> = Lazy::new(|| {
    vec![
        Control {
            id: "A09:2021",
            name: "Security Logging and Monitoring Failures",
            family: "Detect",
            description: "Ensure sufficient logging and monitoring exist to detect the incident class.",
            evidence_requirements: &["logging configuration", "monitoring log"],
        },
        Control {
            id: "A05:2021",
            name: "Security Misconfiguration",
            family: "Contain",
            description: "Correct the misconfiguration that enabled or widened the incident.",
            evidence_requirements: &["configuration change record"],
        },
        Control {
            id: "A06:2021",
            name: "Vulnerable and Outdated Components",
            family: "Eradicate",
            description: "Patch or replace the vulnerable component exploited in the incident.",
            evidence_requirements: &["patch record", "dependency update"],
        },
        Control {
            id: "A08:2021",
            name: "Software and Data Integrity Failures",
            family: "Recover",
            description: "Verify the integrity of restored software and data before returning to service.",
            evidence_requirements: &["integrity verification record"],
        },
        Control {
            id: "A01:2021",
            name: "Broken Access Control",
            family: "PostIncident",
            description: "Review and close access-control gaps surfaced by the incident.",
            evidence_requirements: &["access review record"],
        },
    ]
});

/// NIS2 Directive obligations used as evaluable controls (§4.4, §4.6);
/// IDs match the Directive's article numbers.
static NIS2_CONTROLS: Lazy<Vec<Control>> = Lazy::new(|| {
    vec![
        Control {
            id: "Art.21",
            name: "Cybersecurity Risk-Management Measures",
            family: "Risk Management",
            description: "Maintain monitoring and risk-management measures proportionate to the entity's exposure.",
            evidence_requirements: &["risk assessment", "monitoring log"],
        },
        Control {
            id: "Art.23",
            name: "Incident Reporting Obligations",
            family: "Reporting",
            description: "Meet the early warning, notification, and final report deadlines for significant incidents.",
            evidence_requirements: &["early warning record", "notification record", "final report"],
        },
    ]
});

/// NIST SP 800-61 Rev 2 incident-handling-guide activities used as
/// evaluable controls (§4.4).
static NIST_80061_CONTROLS: Lazy<Vec<Control>> = Lazy::new(|| {
    vec![
        Control {
            id: "IH-3.1",
            name: "Detection and Analysis",
            family: "Detection",
            description: "Detect the incident through monitoring, alerting, and user reports.",
            evidence_requirements: &["alert log", "precursor/indicator record"],
        },
        Control {
            id: "IH-3.2",
            name: "Incident Documentation",
            family: "Detection",
            description: "Document the incident as it is handled, including timeline and actions taken.",
            evidence_requirements: &["incident log"],
        },
        Control {
            id: "IH-3.3",
            name: "Incident Prioritization",
            family: "Analysis",
            description: "Prioritize the incident based on functional, information, and recoverability impact.",
            evidence_requirements: &["prioritization record"],
        },
        Control {
            id: "IH-3.6",
            name: "Evidence Gathering and Handling",
            family: "Analysis",
            description: "Gather and preserve evidence with a documented chain of custody.",
            evidence_requirements: &["chain-of-custody record", "evidence capture log"],
        },
        Control {
            id: "IH-3.7",
            name: "Identifying the Attacking Hosts",
            family: "Analysis",
            description: "Identify attacking hosts where feasible and useful to the response.",
            evidence_requirements: &["attribution notes"],
        },
        Control {
            id: "IH-3.5",
            name: "Containment Strategy",
            family: "Containment",
            description: "Select and apply a containment strategy appropriate to the incident category.",
            evidence_requirements: &["containment decision record"],
        },
        Control {
            id: "IH-3.8",
            name: "Eradication and Recovery",
            family: "Eradication",
            description: "Eliminate the incident's components and prepare for recovery.",
            evidence_requirements: &["eradication record"],
        },
        Control {
            id: "IH-3.9",
            name: "Recovery Validation",
            family: "Recovery",
            description: "Restore systems to normal operation and validate they function correctly.",
            evidence_requirements: &["recovery validation record"],
        },
        Control {
            id: "IH-4.1",
            name: "Lessons Learned",
            family: "Post-Incident",
            description: "Hold a lessons-learned meeting and record follow-up actions.",
            evidence_requirements: &["lessons-learned report"],
        },
        Control {
            id: "IH-4.2",
            name: "Using Collected Incident Data",
            family: "Post-Incident",
            description: "Use incident data to inform risk assessments and future preparedness.",
            evidence_requirements: &["incident metrics report"],
        },
    ]
});

pub fn all_controls(framework: Framework) -> Vec<Control> {
    match framework {
        Framework::BsiGrundschutz => BSI_CONTROLS.clone(),
        Framework::Iso27001 | Framework::Iso27035 | Framework::Nist80053 => ISO_27001_CONTROLS.clone(),
        Framework::NistCsf2 => NIST_CSF2_CONTROLS.clone(),
        Framework::MitreAttack => MITRE_ATTACK_CONTROLS.clone(),
        Framework::OwaspTop10 => OWASP_TOP10_CONTROLS.clone(),
        Framework::Nis2 => NIS2_CONTROLS.clone(),
        Framework::Nist80061 => NIST_80061_CONTROLS.clone(),
    }
}

/// Phase-to-controls mapping (mandatory subset in the second element).
pub fn phase_mapping(framework: Framework, phase: Phase) -> (Vec<&'static str>, Vec<&'static str>) {
    match framework {
        Framework::BsiGrundschutz => match phase {
            Phase::Detection => (vec!["DER.1"], vec!["DER.1"]),
            Phase::Analysis => (vec!["DER.2.2"], vec!["DER.2.2"]),
            Phase::Containment => (vec!["DER.2.1"], vec!["DER.2.1"]),
            Phase::Eradication => (vec!["DER.2.3"], vec!["DER.2.3"]),
            Phase::Recovery => (vec!["DER.4", "CON.3"], vec!["DER.4"]),
            Phase::PostIncident => (vec!["ORP.3"], vec![]),
        },
        Framework::Iso27001 | Framework::Iso27035 | Framework::Nist80053 => match phase {
            Phase::Detection => (vec!["A.8.16", "A.5.25"], vec!["A.8.16"]),
            Phase::Analysis => (vec!["A.5.25"], vec!["A.5.25"]),
            Phase::Containment | Phase::Eradication => (vec!["A.5.26"], vec!["A.5.26"]),
            Phase::Recovery => (vec!["A.5.26"], vec![]),
            Phase::PostIncident => (vec!["A.5.27"], vec![]),
        },
        Framework::NistCsf2 => match phase {
            Phase::Detection => (vec!["DE.CM"], vec!["DE.CM"]),
            Phase::Analysis => (vec!["RS.AN"], vec!["RS.AN"]),
            Phase::Containment => (vec!["RS.MA"], vec!["RS.MA"]),
            Phase::Eradication => (vec!["RS.MI"], vec!["RS.MI"]),
            Phase::Recovery => (vec!["RC.RP"], vec!["RC.RP"]),
            Phase::PostIncident => (vec!["RS.CO"], vec![]),
        },
        Framework::MitreAttack => match phase {
            Phase::Detection => (vec!["M1047"], vec!["M1047"]),
            Phase::Analysis => (vec!["M1019"], vec!["M1019"]),
            Phase::Containment => (vec!["M1037"], vec!["M1037"]),
            Phase::Eradication => (vec!["M1049"], vec!["M1049"]),
            Phase::Recovery => (vec!["M1053"], vec!["M1053"]),
            Phase::PostIncident => (vec!["M1019"], vec![]),
        },
        Framework::OwaspTop10 => match phase {
            Phase::Detection => (vec!["A09:2021"], vec!["A09:2021"]),
            Phase::Analysis => (vec![], vec![]),
            Phase::Containment => (vec!["A05:2021"], vec!["A05:2021"]),
            Phase::Eradication => (vec!["A06:2021"], vec!["A06:2021"]),
            Phase::Recovery => (vec!["A08:2021"], vec!["A08:2021"]),
            Phase::PostIncident => (vec!["A01:2021"], vec![]),
        },
        Framework::Nis2 => match phase {
            Phase::Detection => (vec!["Art.21"], vec!["Art.21"]),
            Phase::Analysis => (vec![], vec![]),
            Phase::Containment => (vec!["Art.23"], vec!["Art.23"]),
            Phase::Eradication => (vec![], vec![]),
            Phase::Recovery => (vec![], vec![]),
            Phase::PostIncident => (vec!["Art.23"], vec![]),
        },
        Framework::Nist80061 => match phase {
            Phase::Detection => (vec!["IH-3.1", "IH-3.2"], vec!["IH-3.1"]),
            Phase::Analysis => (vec!["IH-3.3", "IH-3.6", "IH-3.7"], vec!["IH-3.6"]),
            Phase::Containment => (vec!["IH-3.5"], vec!["IH-3.5"]),
            Phase::Eradication => (vec!["IH-3.8"], vec!["IH-3.8"]),
            Phase::Recovery => (vec!["IH-3.9"], vec!["IH-3.9"]),
            Phase::PostIncident => (vec!["IH-4.1", "IH-4.2"], vec!["IH-4.1"]),
        },
    }
}

pub fn controls_for_phase(framework: Framework, phase: Phase) -> Vec<Control> {
    let (ids, _) = phase_mapping(framework, phase);
    all_controls(framework)
        .into_iter()
        .filter(|c| ids.contains(&c.id))
        .collect()
}

/// Declarative `control → required checklist item IDs` binding (§4.5 step 1).
pub fn checklist_binding(control_id: &str) -> Option<Vec<&'static str>> {
    let map: &[(&str, &[&str])] = &[
        ("DER.1", &["DET-001", "DET-002", "DET-003"]),
        ("DER.2.1", &["DET-004", "DET-005", "DET-006"]),
        ("DER.2.2", &["ANA-001", "ANA-002"]),
        ("DER.2.3", &["ERA-001", "ERA-002", "ERA-003"]),
        ("DER.4", &["REC-001", "REC-002", "REC-003"]),
        ("CON.3", &["REC-001", "REC-004"]),
        ("A.5.25", &["ANA-001", "ANA-002"]),
        ("A.5.26", &["DET-004", "DET-005", "CON-001"]),
        ("DE.CM", &["DET-001", "DET-002", "DET-003"]),
        ("RS.AN", &["ANA-001", "ANA-002"]),
        ("RS.MA", &["DET-004", "DET-005", "CON-001"]),
    ];
    map.iter().find(|(id, _)| *id == control_id).map(|(_, items)| items.to_vec())
}

/// Per-control keyword set for the keyword-matching fallback (§4.5 step 2).
pub fn control_keywords(control_id: &str) -> Option<Vec<&'static str>> {
    let map: &[(&str, &[&str])] = &[
        ("DER.1", &["alert", "detection", "log", "monitor"]),
        ("DER.2.1", &["incident", "report", "response", "timeline"]),
        ("DER.2.2", &["memory", "forensic", "evidence", "capture", "image"]),
        ("DER.2.3", &["cleanup", "removal", "malware", "persistence"]),
        ("DER.4", &["recovery", "backup", "restore", "continuity"]),
        ("CON.3", &["backup", "restore", "integrity"]),
        ("ORP.1", &["organization", "policy", "procedure"]),
        ("ORP.3", &["training", "awareness", "lesson"]),
        ("A.5.1", &["policy", "approval"]),
        ("A.5.24", &["plan", "preparation"]),
        ("A.5.25", &["assessment", "classification", "event"]),
        ("A.5.26", &["incident", "response", "timeline"]),
        ("A.5.27", &["lesson", "review", "improvement"]),
        ("A.8.16", &["monitor", "log", "anomaly"]),
        ("RS.MI", &["mitigate", "eradicate", "malware"]),
        ("RC.RP", &["recovery", "restore", "continuity"]),
        ("RS.CO", &["communication", "report", "lesson"]),
        ("M1047", &["audit", "log", "configuration"]),
        ("M1019", &["threat", "intelligence", "attribution"]),
        ("M1037", &["network", "filter", "isolation"]),
        ("M1049", &["antivirus", "antimalware", "removal"]),
        ("M1053", &["backup", "restore"]),
        ("A09:2021", &["logging", "monitoring", "alert"]),
        ("A05:2021", &["configuration", "misconfiguration"]),
        ("A06:2021", &["patch", "component", "vulnerable"]),
        ("A08:2021", &["integrity", "verification"]),
        ("A01:2021", &["access", "control", "review"]),
        ("Art.21", &["risk", "monitor", "assessment"]),
        ("Art.23", &["notification", "report", "deadline"]),
        ("IH-3.1", &["alert", "detection", "precursor", "indicator"]),
        ("IH-3.2", &["documentation", "log", "timeline"]),
        ("IH-3.3", &["priority", "impact", "classification"]),
        ("IH-3.6", &["evidence", "chain of custody", "capture"]),
        ("IH-3.7", &["attribution", "attacker", "host"]),
        ("IH-3.5", &["containment", "isolation", "strategy"]),
        ("IH-3.8", &["eradication", "removal", "cleanup"]),
        ("IH-3.9", &["recovery", "restore", "validation"]),
        ("IH-4.1", &["lesson", "review", "meeting"]),
        ("IH-4.2", &["metrics", "preparedness", "risk"]),
    ];
    map.iter().find(|(id, _)| *id == control_id).map(|(_, kws)| kws.to_vec())
}

/// Mandatory subset for a given phase+framework (the second element of
/// `phase_mapping`).
pub fn mandatory_controls(framework: Framework, phase: Phase) -> Vec<&'static str> {
    phase_mapping(framework, phase).1
}

pub fn canned_recommendation(control_id: &str) -> &'static str {
    match control_id {
        "DER.1" => "Deploy centralized log monitoring with alerting thresholds.",
        "DER.2.1" => "Document an incident response runbook with defined escalation timelines.",
        "DER.2.2" => "Adopt a forensic evidence capture procedure (memory + disk imaging).",
        "DER.2.3" => "Formalize a malware eradication and persistence-removal checklist.",
        "DER.4" => "Validate backup restoration quarterly against a recovery time objective.",
        "CON.3" => "Implement automated backup integrity verification.",
        "ORP.1" => "Publish and version-control organizational security policies.",
        "ORP.3" => "Run recurring security awareness training with lessons-learned capture.",
        "A.5.1" => "Formally approve and publish an information security policy set.",
        "A.5.24" => "Draft and rehearse an incident management plan.",
        "A.5.25" => "Define event-assessment criteria and a classification matrix.",
        "A.5.26" => "Establish a documented incident response procedure with timelines.",
        "A.5.27" => "Capture and act on lessons learned after every incident.",
        "A.8.16" => "Deploy monitoring covering networks, systems, and applications.",
        "DE.CM" => "Stand up continuous monitoring across networks, systems, and assets.",
        "RS.AN" => "Establish an incident analysis workflow with defined scope and impact assessment.",
        "RS.MA" => "Formalize incident management execution with clear containment ownership.",
        "RS.MI" => "Document mitigation and eradication procedures for the incident category.",
        "RC.RP" => "Validate recovery plan execution against a recovery time objective.",
        "RS.CO" => "Establish stakeholder communication and lessons-learned capture after incidents.",
        "M1047" => "Expand audit coverage of logs and configurations.",
        "M1019" => "Feed threat intelligence into incident analysis and attribution.",
        "M1037" => "Apply network traffic filtering to contain adversary access.",
        "M1049" => "Deploy antivirus/antimalware tooling to remove identified artifacts.",
        "M1053" => "Maintain verified backups for incident recovery.",
        "A09:2021" => "Close logging and monitoring gaps that delayed detection.",
        "A05:2021" => "Remediate the misconfiguration that enabled or widened the incident.",
        "A06:2021" => "Patch or replace the vulnerable component exploited in the incident.",
        "A08:2021" => "Verify integrity of restored software and data before returning to service.",
        "A01:2021" => "Close access-control gaps surfaced during the incident.",
        "Art.21" => "Strengthen risk-management measures proportionate to the entity's exposure.",
        "Art.23" => "Track early warning, notification, and final report deadlines explicitly.",
        "IH-3.1" => "Improve detection coverage for precursors and indicators.",
        "IH-3.2" => "Document the incident timeline and actions taken as they occur.",
        "IH-3.3" => "Define a consistent incident prioritization methodology.",
        "IH-3.6" => "Establish an evidence-gathering procedure with a documented chain of custody.",
        "IH-3.7" => "Document attribution findings where feasible.",
        "IH-3.5" => "Select and document a containment strategy for each incident category.",
        "IH-3.8" => "Formalize eradication steps ahead of recovery.",
        "IH-3.9" => "Validate recovery against defined acceptance criteria before closing the incident.",
        "IH-4.1" => "Hold a lessons-learned meeting and track follow-up actions.",
        "IH-4.2" => "Feed incident metrics back into risk assessments and preparedness planning.",
        _ => "Review control requirements and document a remediation plan.",
    }
}
