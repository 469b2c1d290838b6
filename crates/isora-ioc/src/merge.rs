use std::collections::{HashMap, HashSet};

use isora_common::ioc::{MAX_CATEGORIES, MAX_MITRE_TECHNIQUES, MAX_RELATED_ACTORS, MAX_RELATED_CAMPAIGNS, MAX_TAGS};
use isora_common::Ioc;

use crate::normalize::normalize_ioc_value;

/// Commutative, idempotent merge of two records already known to share
/// `(normalize(value), type)` identity (§4.1).
pub fn merge(a: &Ioc, b: &Ioc) -> Ioc {
    let mut out = a.clone();

    out.threat_level = a.threat_level.max(b.threat_level);
    out.confidence = a.confidence.max(b.confidence);

    out.tags = union_capped(&a.tags, &b.tags, MAX_TAGS);
    out.categories = union_capped(&a.categories, &b.categories, MAX_CATEGORIES);
    out.mitre_techniques = union_capped(&a.mitre_techniques, &b.mitre_techniques, MAX_MITRE_TECHNIQUES);
    out.related_actors = union_capped(&a.related_actors, &b.related_actors, MAX_RELATED_ACTORS);
    out.related_campaigns = union_capped(&a.related_campaigns, &b.related_campaigns, MAX_RELATED_CAMPAIGNS);

    out.source = merge_sources(&a.source, &b.source);

    out.first_seen = min_opt(a.first_seen, b.first_seen);
    out.last_seen = max_opt(a.last_seen, b.last_seen);

    out.country = a.country.clone().or_else(|| b.country.clone());
    out.asn = a.asn.clone().or_else(|| b.asn.clone());

    let mut enrichment = a.enrichment_data.clone();
    for (k, v) in &b.enrichment_data {
        enrichment.insert(k.clone(), v.clone());
    }
    out.enrichment_data = enrichment;

    out
}

fn union_capped(a: &[String], b: &[String], cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in a.iter().chain(b.iter()) {
        if seen.insert(item.clone()) {
            out.push(item.clone());
        }
        if out.len() >= cap {
            break;
        }
    }
    out
}

fn merge_sources(a: &str, b: &str) -> String {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for part in a.split(',').chain(b.split(',')) {
        let p = part.trim();
        if p.is_empty() {
            continue;
        }
        if seen.insert(p.to_string()) {
            out.push(p.to_string());
        }
    }
    out.join(",")
}

fn min_opt<T: Ord + Copy>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}

fn max_opt<T: Ord + Copy>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}

/// Group by `(normalize(value), type)` and left-fold `merge` within each group.
pub fn deduplicate_iocs(iocs: Vec<Ioc>) -> Vec<Ioc> {
    let mut groups: HashMap<(String, &'static str), Ioc> = HashMap::new();
    let mut order: Vec<(String, &'static str)> = Vec::new();

    for ioc in iocs {
        let key = (normalize_ioc_value(&ioc.value, ioc.ioc_type), ioc.ioc_type.as_str());
        match groups.get(&key) {
            Some(existing) => {
                let merged = merge(existing, &ioc);
                groups.insert(key, merged);
            }
            None => {
                order.push(key.clone());
                groups.insert(key, ioc);
            }
        }
    }

    order.into_iter().filter_map(|k| groups.remove(&k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use isora_common::{IocStatus, IocType, ThreatLevel};

    fn sample(source: &str, level: ThreatLevel) -> Ioc {
        let mut ioc = Ioc::new("8.8.8.8", IocType::Ip);
        ioc.status = IocStatus::Active;
        ioc.threat_level = level;
        ioc.source = source.to_string();
        ioc
    }

    #[test]
    fn merge_is_commutative() {
        let a = sample("misp", ThreatLevel::Medium);
        let b = sample("otx", ThreatLevel::High);

        let ab = merge(&a, &b);
        let ba = merge(&b, &a);

        assert_eq!(ab.threat_level, ba.threat_level);
        assert_eq!(ab.threat_level, ThreatLevel::High);

        let mut ab_sources: Vec<&str> = ab.source.split(',').collect();
        let mut ba_sources: Vec<&str> = ba.source.split(',').collect();
        ab_sources.sort();
        ba_sources.sort();
        assert_eq!(ab_sources, ba_sources);
    }

    #[test]
    fn merge_is_idempotent() {
        let a = sample("misp", ThreatLevel::Medium);
        let merged = merge(&a, &a);
        assert_eq!(merged.threat_level, a.threat_level);
        assert_eq!(merged.source, a.source);
    }

    #[test]
    fn dedup_groups_by_normalized_identity() {
        let mut a = sample("misp", ThreatLevel::Low);
        a.value = "192.168.001.001".to_string();
        let mut b = sample("otx", ThreatLevel::High);
        b.value = "192.168.1.1".to_string();

        let result = deduplicate_iocs(vec![a, b]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].threat_level, ThreatLevel::High);
    }
}
