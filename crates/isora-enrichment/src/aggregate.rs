use isora_common::{IocType, ThreatLevel};
use isora_ioc::enrich_with_mitre;

use crate::source::SourceResult;

#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    pub threat_level: ThreatLevel,
    pub risk_score: f64,
    pub confidence: f64,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub country: Option<String>,
    pub asn: Option<String>,
    pub isp: Option<String>,
    pub recommended_actions: Vec<String>,
    pub mitre_techniques: Vec<String>,
    pub is_cached: bool,
}

/// Weighted-vote aggregation across per-source results (§4.3 steps 1-5).
/// `unknown`-level results abstain from both the weighted sum and the
/// confidence denominator.
pub fn aggregate(results: &[SourceResult], ioc_type: IocType) -> AggregateResult {
    let voters: Vec<&SourceResult> = results
        .iter()
        .filter(|r| r.available && r.threat_level.is_some_and(|l| l.vote_weight().is_some()))
        .collect();

    if voters.is_empty() {
        return AggregateResult {
            threat_level: ThreatLevel::Unknown,
            risk_score: 0.0,
            confidence: 0.0,
            ..Default::default()
        };
    }

    let weighted_sum: f64 = voters
        .iter()
        .map(|r| r.threat_level.unwrap().vote_weight().unwrap() * r.confidence)
        .sum();
    let confidence_sum: f64 = voters.iter().map(|r| r.confidence).sum();

    let risk_score = if confidence_sum > 0.0 {
        weighted_sum / confidence_sum
    } else {
        0.0
    };

    let threat_level = bucket_threat_level(risk_score);
    let confidence = (confidence_sum / voters.len() as f64).min(1.0);

    let mut tags = Vec::new();
    let mut categories = Vec::new();
    let mut country = None;
    let mut asn = None;
    let mut isp = None;

    for result in results.iter().filter(|r| r.available) {
        for t in &result.tags {
            if !tags.contains(t) {
                tags.push(t.clone());
            }
        }
        for c in &result.categories {
            if !categories.contains(c) {
                categories.push(c.clone());
            }
        }
        if country.is_none() {
            country = result.country.clone();
        }
        if asn.is_none() {
            asn = result.asn.clone();
        }
        if isp.is_none() {
            isp = result.isp.clone();
        }
    }

    let recommended_actions = recommend_actions(threat_level, ioc_type, &tags);
    let mitre_techniques = enrich_with_mitre(&tags);

    AggregateResult {
        threat_level,
        risk_score,
        confidence,
        tags,
        categories,
        country,
        asn,
        isp,
        recommended_actions,
        mitre_techniques,
        is_cached: false,
    }
}

/// `[80,100]→critical, [60,80)→high, [40,60)→medium, [10,40)→low, else clean` (§4.3 step 3).
fn bucket_threat_level(score: f64) -> ThreatLevel {
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

fn recommend_actions(level: ThreatLevel, ioc_type: IocType, tags: &[String]) -> Vec<String> {
    let mut actions: Vec<String> = match level {
        ThreatLevel::Critical => vec![
            "Block immediately at perimeter".to_string(),
            "Escalate to incident response".to_string(),
        ],
        ThreatLevel::High => vec!["Block at perimeter".to_string(), "Investigate related activity".to_string()],
        ThreatLevel::Medium => vec!["Monitor closely".to_string(), "Consider blocking if repeated".to_string()],
        ThreatLevel::Low => vec!["Log for situational awareness".to_string()],
        _ => vec!["No action required".to_string()],
    };

    if ioc_type == IocType::Ip {
        let lower_tags: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        if lower_tags.iter().any(|t| t.contains("tor_exit") || t.contains("vpn")) {
            actions.push("Apply anonymization-service-specific access policy".to_string());
        }
    }

    let high_or_above = matches!(level, ThreatLevel::High | ThreatLevel::Critical);
    match ioc_type {
        IocType::Md5 | IocType::Sha1 | IocType::Sha256 => {
            actions.push("Submit hash to EDR for fleet-wide search".to_string());
            if high_or_above {
                actions.push("Add hash to EDR blocklist".to_string());
            }
        }
        IocType::Domain | IocType::Hostname => {
            actions.push("Add domain to DNS watchlist".to_string());
            if high_or_above {
                actions.push("Add domain to DNS sinkhole".to_string());
            }
        }
        _ => {}
    }

    actions
}
