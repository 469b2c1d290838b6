use serde::{Deserialize, Serialize};

/// Closed enum of compliance frameworks (§3.3). Note that `nist_800_53`,
/// `nist_800_61`, and `owasp_top_10` are catalogued and independently
/// evaluable but do not participate in the cross-framework `UnifiedControl`
/// mapping table, which only spans the six frameworks named in §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framework {
    BsiGrundschutz,
    NistCsf2,
    Nist80053,
    Nist80061,
    Iso27001,
    Iso27035,
    MitreAttack,
    OwaspTop10,
    Nis2,
}

impl Framework {
    pub fn id(&self) -> &'static str {
        match self {
            Framework::BsiGrundschutz => "bsi_grundschutz",
            Framework::NistCsf2 => "nist_csf_2",
            Framework::Nist80053 => "nist_800_53",
            Framework::Nist80061 => "nist_800_61",
            Framework::Iso27001 => "iso_27001",
            Framework::Iso27035 => "iso_27035",
            Framework::MitreAttack => "mitre_attack",
            Framework::OwaspTop10 => "owasp_top_10",
            Framework::Nis2 => "nis2",
        }
    }

    pub fn from_id(id: &str) -> Option<Framework> {
        Some(match id {
            "bsi_grundschutz" => Framework::BsiGrundschutz,
            "nist_csf_2" => Framework::NistCsf2,
            "nist_800_53" => Framework::Nist80053,
            "nist_800_61" => Framework::Nist80061,
            "iso_27001" => Framework::Iso27001,
            "iso_27035" => Framework::Iso27035,
            "mitre_attack" => Framework::MitreAttack,
            "owasp_top_10" => Framework::OwaspTop10,
            "nis2" => Framework::Nis2,
            _ => return None,
        })
    }

    /// Frameworks eligible for cross-framework unified-control mapping (§4.4).
    pub fn cross_mapped() -> [Framework; 6] {
        [
            Framework::BsiGrundschutz,
            Framework::Iso27001,
            Framework::Iso27035,
            Framework::NistCsf2,
            Framework::MitreAttack,
            Framework::Nis2,
        ]
    }

    pub fn all() -> [Framework; 9] {
        [
            Framework::BsiGrundschutz,
            Framework::NistCsf2,
            Framework::Nist80053,
            Framework::Nist80061,
            Framework::Iso27001,
            Framework::Iso27035,
            Framework::MitreAttack,
            Framework::OwaspTop10,
            Framework::Nis2,
        ]
    }
}

/// The six IR lifecycle phases (§3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Detection,
    Analysis,
    Containment,
    Eradication,
    Recovery,
    PostIncident,
}

impl Phase {
    pub fn id(&self) -> &'static str {
        match self {
            Phase::Detection => "detection",
            Phase::Analysis => "analysis",
            Phase::Containment => "containment",
            Phase::Eradication => "eradication",
            Phase::Recovery => "recovery",
            Phase::PostIncident => "post_incident",
        }
    }

    pub fn from_id(id: &str) -> Option<Phase> {
        Some(match id {
            "detection" => Phase::Detection,
            "analysis" => Phase::Analysis,
            "containment" => Phase::Containment,
            "eradication" => Phase::Eradication,
            "recovery" => Phase::Recovery,
            "post_incident" => Phase::PostIncident,
            _ => return None,
        })
    }

    pub fn all() -> [Phase; 6] {
        [
            Phase::Detection,
            Phase::Analysis,
            Phase::Containment,
            Phase::Eradication,
            Phase::Recovery,
            Phase::PostIncident,
        ]
    }
}
