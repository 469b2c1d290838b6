use isora_common::Ioc;

const HIGH_RISK_TAG_MARKERS: &[&str] = &[
    "ransomware",
    "c2",
    "apt",
    "malware",
    "trojan",
    "botnet",
    "phishing",
    "exploit",
    "backdoor",
    "rat",
];

/// Closed 7-step risk-score formula (§4.1), clamped to `[0,100]`.
pub fn calculate_risk_score(ioc: &Ioc) -> f64 {
    let mut score = ioc.threat_level.risk_base();

    score += (ioc.confidence - 0.5) * 20.0;

    let sources = source_count(&ioc.source);
    score += (2.0 * sources as f64).min(10.0);

    score += (3.0 * ioc.related_actors.len() as f64).min(9.0);
    score += (3.0 * ioc.related_campaigns.len() as f64).min(9.0);

    score += (2.0 * ioc.mitre_techniques.len() as f64).min(6.0);

    if ioc.tags.iter().any(|t| {
        let lower = t.to_lowercase();
        HIGH_RISK_TAG_MARKERS.iter().any(|m| lower.contains(m))
    }) {
        score += 5.0;
    }

    score.clamp(0.0, 100.0)
}

fn source_count(source: &str) -> usize {
    if source.trim().is_empty() {
        0
    } else {
        source.split(',').filter(|s| !s.trim().is_empty()).count()
    }
}
