use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of IOC value types. Detection precedence (IP, CVE, hash-by-length,
/// email, URL, domain, else unknown) lives in `isora-ioc`, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IocType {
    Ip,
    Domain,
    Hostname,
    Url,
    Md5,
    Sha1,
    Sha256,
    Email,
    Cve,
    Mutex,
    FilePath,
    Process,
    RegistryKey,
    Unknown,
}

impl IocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IocType::Ip => "ip",
            IocType::Domain => "domain",
            IocType::Hostname => "hostname",
            IocType::Url => "url",
            IocType::Md5 => "md5",
            IocType::Sha1 => "sha1",
            IocType::Sha256 => "sha256",
            IocType::Email => "email",
            IocType::Cve => "cve",
            IocType::Mutex => "mutex",
            IocType::FilePath => "file_path",
            IocType::Process => "process",
            IocType::RegistryKey => "registry_key",
            IocType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IocStatus {
    Active,
    Expired,
    Suppressed,
}

/// Ordered `critical > high > medium > low > clean > unknown`. The ordering is
/// load-bearing: merge, scheduler update, and enrichment bucketing all compare
/// via this rank rather than duplicating the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    Unknown,
    Clean,
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    /// Base contribution to the §4.1 risk-score formula.
    pub fn risk_base(&self) -> f64 {
        match self {
            ThreatLevel::Critical => 80.0,
            ThreatLevel::High => 60.0,
            ThreatLevel::Medium => 40.0,
            ThreatLevel::Low => 20.0,
            ThreatLevel::Unknown => 10.0,
            ThreatLevel::Clean => 0.0,
        }
    }

    /// Weight used by the enrichment aggregator's weighted vote (§4.3). `None`
    /// for `Unknown`, which abstains from the vote entirely.
    pub fn vote_weight(&self) -> Option<f64> {
        match self {
            ThreatLevel::Critical => Some(100.0),
            ThreatLevel::High => Some(75.0),
            ThreatLevel::Medium => Some(50.0),
            ThreatLevel::Low => Some(25.0),
            ThreatLevel::Clean => Some(0.0),
            ThreatLevel::Unknown => None,
        }
    }

    pub fn from_bucket(score: f64) -> ThreatLevel {
        if score >= 80.0 {
            ThreatLevel::Critical
        } else if score >= 60.0 {
            ThreatLevel::High
        } else if score >= 40.0 {
            ThreatLevel::Medium
        } else if score >= 10.0 {
            ThreatLevel::Low
        } else {
            ThreatLevel::Clean
        }
    }
}

/// The canonical IOC record. `Value`/`Type` identity is `(normalize(Value), Type)`;
/// normalization and validation live in `isora-ioc`, this crate only owns the shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ioc {
    pub value: String,
    pub ioc_type: IocType,
    pub status: IocStatus,
    pub threat_level: ThreatLevel,
    pub confidence: f64,
    pub risk_score: f64,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub source: String,
    pub source_ref: String,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub country: Option<String>,
    pub asn: Option<String>,
    pub mitre_techniques: Vec<String>,
    pub related_actors: Vec<String>,
    pub related_campaigns: Vec<String>,
    pub enrichment_data: HashMap<String, serde_json::Value>,
}

pub const MAX_TAGS: usize = 20;
pub const MAX_CATEGORIES: usize = 10;
pub const MAX_MITRE_TECHNIQUES: usize = 15;
pub const MAX_RELATED_ACTORS: usize = 10;
pub const MAX_RELATED_CAMPAIGNS: usize = 10;

impl Ioc {
    pub fn new(value: impl Into<String>, ioc_type: IocType) -> Self {
        Ioc {
            value: value.into(),
            ioc_type,
            status: IocStatus::Active,
            threat_level: ThreatLevel::Unknown,
            confidence: 0.5,
            risk_score: 0.0,
            tags: Vec::new(),
            categories: Vec::new(),
            source: String::new(),
            source_ref: String::new(),
            first_seen: None,
            last_seen: None,
            country: None,
            asn: None,
            mitre_techniques: Vec::new(),
            related_actors: Vec::new(),
            related_campaigns: Vec::new(),
            enrichment_data: HashMap::new(),
        }
    }
}
