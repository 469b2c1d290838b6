use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Essential vs. important entity classification (NIS2 Art. 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NIS2EntityType {
    Essential,
    Important,
}

impl NIS2EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NIS2EntityType::Essential => "essential",
            NIS2EntityType::Important => "important",
        }
    }
}

/// Closed NIS2 sector enum (Annex I essential sectors + Annex II important
/// sectors). Each sector has a default entity type in `SECTOR_ENTITY_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NIS2Sector {
    Energy,
    Transport,
    Banking,
    Health,
    DrinkingWater,
    DigitalInfrastructure,
    PublicAdministration,
    Space,
    Postal,
    WasteManagement,
    Chemicals,
    Food,
    Manufacturing,
    DigitalProviders,
    Research,
}

impl NIS2Sector {
    pub const ALL: [NIS2Sector; 15] = [
        NIS2Sector::Energy,
        NIS2Sector::Transport,
        NIS2Sector::Banking,
        NIS2Sector::Health,
        NIS2Sector::DrinkingWater,
        NIS2Sector::DigitalInfrastructure,
        NIS2Sector::PublicAdministration,
        NIS2Sector::Space,
        NIS2Sector::Postal,
        NIS2Sector::WasteManagement,
        NIS2Sector::Chemicals,
        NIS2Sector::Food,
        NIS2Sector::Manufacturing,
        NIS2Sector::DigitalProviders,
        NIS2Sector::Research,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NIS2Sector::Energy => "energy",
            NIS2Sector::Transport => "transport",
            NIS2Sector::Banking => "banking",
            NIS2Sector::Health => "health",
            NIS2Sector::DrinkingWater => "drinking_water",
            NIS2Sector::DigitalInfrastructure => "digital_infrastructure",
            NIS2Sector::PublicAdministration => "public_administration",
            NIS2Sector::Space => "space",
            NIS2Sector::Postal => "postal",
            NIS2Sector::WasteManagement => "waste_management",
            NIS2Sector::Chemicals => "chemicals",
            NIS2Sector::Food => "food",
            NIS2Sector::Manufacturing => "manufacturing",
            NIS2Sector::DigitalProviders => "digital_providers",
            NIS2Sector::Research => "research",
        }
    }

    /// Title-cased display name, e.g. for `get_all_sectors`.
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Default entity type per sector (Annex I sectors are essential, Annex II
/// sectors are important); falls back to `Important` for any sector missing
/// an explicit entry.
pub static SECTOR_ENTITY_TYPE: Lazy<HashMap<NIS2Sector, NIS2EntityType>> = Lazy::new(|| {
    HashMap::from([
        (NIS2Sector::Energy, NIS2EntityType::Essential),
        (NIS2Sector::Transport, NIS2EntityType::Essential),
        (NIS2Sector::Banking, NIS2EntityType::Essential),
        (NIS2Sector::Health, NIS2EntityType::Essential),
        (NIS2Sector::DrinkingWater, NIS2EntityType::Essential),
        (NIS2Sector::DigitalInfrastructure, NIS2EntityType::Essential),
        (NIS2Sector::PublicAdministration, NIS2EntityType::Essential),
        (NIS2Sector::Space, NIS2EntityType::Essential),
        (NIS2Sector::Postal, NIS2EntityType::Important),
        (NIS2Sector::WasteManagement, NIS2EntityType::Important),
        (NIS2Sector::Chemicals, NIS2EntityType::Important),
        (NIS2Sector::Food, NIS2EntityType::Important),
        (NIS2Sector::Manufacturing, NIS2EntityType::Important),
        (NIS2Sector::DigitalProviders, NIS2EntityType::Important),
        (NIS2Sector::Research, NIS2EntityType::Important),
    ])
});

pub fn get_entity_type_for_sector(sector: NIS2Sector) -> NIS2EntityType {
    SECTOR_ENTITY_TYPE.get(&sector).copied().unwrap_or(NIS2EntityType::Important)
}

/// Severity classification attached to the incident notification stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NIS2IncidentSeverity {
    Minor,
    Significant,
    Major,
    Critical,
}

impl NIS2IncidentSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            NIS2IncidentSeverity::Minor => "minor",
            NIS2IncidentSeverity::Significant => "significant",
            NIS2IncidentSeverity::Major => "major",
            NIS2IncidentSeverity::Critical => "critical",
        }
    }
}

/// Per-submission-stage lifecycle state; every stage starts `Pending` and
/// moves to `Submitted` exactly once (a resubmission overwrites the record
/// in place rather than introducing a further state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NIS2NotificationStatus {
    Pending,
    Submitted,
}

impl NIS2NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NIS2NotificationStatus::Pending => "pending",
            NIS2NotificationStatus::Submitted => "submitted",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NIS2ContactPerson {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NIS2IncidentImpact {
    pub affected_users: Option<u64>,
    pub affected_services: Vec<String>,
    pub geographic_scope: String,
    pub economic_impact: String,
}

/// EU member state ISO-2 code -> (name, national CSIRT). Not exhaustive of
/// all 27 member states; callers needing a missing state should extend this
/// table rather than work around its absence.
pub static EU_MEMBER_STATES: Lazy<HashMap<&'static str, (&'static str, &'static str)>> = Lazy::new(|| {
    HashMap::from([
        ("DE", ("Germany", "BSI CERT-Bund")),
        ("FR", ("France", "ANSSI CERT-FR")),
        ("IT", ("Italy", "CSIRT Italia")),
        ("ES", ("Spain", "INCIBE-CERT")),
        ("NL", ("Netherlands", "NCSC-NL")),
        ("PL", ("Poland", "CERT Polska")),
        ("BE", ("Belgium", "CERT.be")),
        ("SE", ("Sweden", "CERT-SE")),
        ("AT", ("Austria", "CERT.at")),
        ("IE", ("Ireland", "NCSC-IE")),
        ("FI", ("Finland", "NCSC-FI")),
        ("DK", ("Denmark", "CFCS")),
        ("PT", ("Portugal", "CNCS CERT.PT")),
        ("GR", ("Greece", "NCSA-GR")),
        ("CZ", ("Czechia", "GovCERT.CZ")),
        ("RO", ("Romania", "DNSC CERT-RO")),
        ("HU", ("Hungary", "NBSZ NKI")),
        ("LU", ("Luxembourg", "CIRCL")),
    ])
});

pub fn get_csirt_for_member_state(member_state: &str) -> Option<&'static str> {
    EU_MEMBER_STATES.get(member_state.to_uppercase().as_str()).map(|(_, csirt)| *csirt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essential_sectors_classify_as_essential() {
        for sector in [
            NIS2Sector::Energy,
            NIS2Sector::Transport,
            NIS2Sector::Banking,
            NIS2Sector::Health,
            NIS2Sector::DrinkingWater,
            NIS2Sector::DigitalInfrastructure,
            NIS2Sector::PublicAdministration,
            NIS2Sector::Space,
        ] {
            assert_eq!(get_entity_type_for_sector(sector), NIS2EntityType::Essential);
        }
    }

    #[test]
    fn important_sectors_classify_as_important() {
        for sector in [
            NIS2Sector::Postal,
            NIS2Sector::WasteManagement,
            NIS2Sector::Chemicals,
            NIS2Sector::Food,
            NIS2Sector::Manufacturing,
            NIS2Sector::DigitalProviders,
            NIS2Sector::Research,
        ] {
            assert_eq!(get_entity_type_for_sector(sector), NIS2EntityType::Important);
        }
    }

    #[test]
    fn every_sector_has_an_entity_type_entry() {
        for sector in NIS2Sector::ALL {
            assert!(SECTOR_ENTITY_TYPE.contains_key(&sector));
        }
    }

    #[test]
    fn germany_csirt_lookup() {
        assert_eq!(get_csirt_for_member_state("de"), Some("BSI CERT-Bund"));
        assert_eq!(EU_MEMBER_STATES.get("DE").unwrap().0, "Germany");
    }
}
