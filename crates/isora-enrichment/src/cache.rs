use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use isora_common::IocType;

use crate::aggregate::AggregateResult;

/// Process-local, non-durable `(value, type) → (result, timestamp)` cache
/// with a configurable TTL (default 24h) (§4.3). Concurrent-safe via
/// `DashMap`.
pub struct EnrichmentCache {
    entries: DashMap<(String, IocType), (AggregateResult, DateTime<Utc>)>,
    ttl: Duration,
}

impl EnrichmentCache {
    pub fn new(ttl: Duration) -> Self {
        EnrichmentCache {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn default_ttl() -> Self {
        EnrichmentCache::new(Duration::hours(24))
    }

    pub fn get(&self, value: &str, ioc_type: IocType, now: DateTime<Utc>) -> Option<AggregateResult> {
        let key = (value.to_string(), ioc_type);
        let entry = self.entries.get(&key)?;
        let (result, stored_at) = entry.value();
        if now - *stored_at > self.ttl {
            drop(entry);
            self.entries.remove(&key);
            return None;
        }
        let mut cached = result.clone();
        cached.is_cached = true;
        Some(cached)
    }

    pub fn put(&self, value: &str, ioc_type: IocType, result: AggregateResult, now: DateTime<Utc>) {
        self.entries.insert((value.to_string(), ioc_type), (result, now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isora_common::ThreatLevel;

    fn sample() -> AggregateResult {
        AggregateResult {
            threat_level: ThreatLevel::High,
            risk_score: 70.0,
            ..Default::default()
        }
    }

    #[test]
    fn hit_within_ttl_marks_cached() {
        let cache = EnrichmentCache::new(Duration::hours(1));
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        cache.put("8.8.8.8", IocType::Ip, sample(), now);

        let hit = cache.get("8.8.8.8", IocType::Ip, now + Duration::minutes(30));
        assert!(hit.is_some());
        assert!(hit.unwrap().is_cached);
    }

    #[test]
    fn miss_after_ttl_expires() {
        let cache = EnrichmentCache::new(Duration::hours(1));
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        cache.put("8.8.8.8", IocType::Ip, sample(), now);

        let miss = cache.get("8.8.8.8", IocType::Ip, now + Duration::hours(2));
        assert!(miss.is_none());
    }
}
