//! Multi-source enrichment aggregation (§4.3): weighted-vote threat scoring
//! across provider results, recommendation synthesis, and a TTL cache.

pub mod aggregate;
pub mod cache;
pub mod probe;
pub mod source;

pub use aggregate::{aggregate, AggregateResult};
pub use cache::EnrichmentCache;
pub use isora_ioc::detect_type;
pub use probe::SourceProbe;
pub use source::{default_sources_for, Source, SourceResult};

use chrono::Utc;
use isora_common::IocType;

/// End-to-end enrichment call: detect type if unspecified, resolve the
/// source set, check the cache, else query every source concurrently and
/// aggregate (§4.3).
pub async fn enrich(
    value: &str,
    ioc_type: Option<IocType>,
    sources: Option<&[(Source, &dyn SourceProbe)]>,
    cache: Option<&EnrichmentCache>,
) -> AggregateResult {
    let ioc_type = ioc_type.unwrap_or_else(|| detect_type(value));
    let now = Utc::now();

    if let Some(cache) = cache {
        if let Some(hit) = cache.get(value, ioc_type, now) {
            return hit;
        }
    }

    let results: Vec<SourceResult> = match sources {
        Some(probes) => {
            let futures = probes.iter().map(|(_, probe)| probe.query(value, ioc_type));
            futures::future::join_all(futures).await
        }
        None => {
            // No probes supplied: the default source set is applicable but
            // none are wired, so every source is unavailable.
            default_sources_for(ioc_type)
                .into_iter()
                .map(|_| SourceResult::unavailable("no probe configured"))
                .collect()
        }
    };

    let aggregated = aggregate(&results, ioc_type);

    if let Some(cache) = cache {
        cache.put(value, ioc_type, aggregated.clone(), now);
    }

    aggregated
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysHigh;

    #[async_trait::async_trait]
    impl SourceProbe for AlwaysHigh {
        async fn query(&self, _value: &str, _ioc_type: IocType) -> SourceResult {
            SourceResult {
                available: true,
                threat_level: Some(isora_common::ThreatLevel::High),
                confidence: 0.9,
                ..Default::default()
            }
        }
    }

    #[tokio::test]
    async fn enrich_without_probes_yields_unknown() {
        let result = enrich("8.8.8.8", Some(IocType::Ip), None, None).await;
        assert_eq!(result.threat_level, isora_common::ThreatLevel::Unknown);
    }

    #[tokio::test]
    async fn enrich_aggregates_available_probe() {
        let probe = AlwaysHigh;
        let sources: Vec<(Source, &dyn SourceProbe)> = vec![(Source::VirusTotal, &probe)];
        let result = enrich("8.8.8.8", Some(IocType::Ip), Some(&sources), None).await;
        assert_eq!(result.threat_level, isora_common::ThreatLevel::High);
    }
}
