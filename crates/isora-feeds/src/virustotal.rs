use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use isora_common::{Ioc, IocType, ThreatLevel};

use crate::adapter::{FeedAdapter, FeedConfig};
use crate::error::FeedError;

const SELF_RATE_LIMIT_SECS: u64 = 15;

/// Not designed for bulk ingestion (`fetch_since` is a no-op per §4.2);
/// self-rate-limits lookups to one request per 15s on the free tier via an
/// internal timestamp gate, not a provider-returned backoff.
pub struct VirusTotalAdapter {
    config: FeedConfig,
    client: reqwest::Client,
    last_request: Mutex<Option<Instant>>,
}

impl VirusTotalAdapter {
    pub fn new(config: FeedConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        VirusTotalAdapter {
            config,
            client,
            last_request: Mutex::new(None),
        }
    }

    async fn gate(&self) -> Result<(), FeedError> {
        let wait = {
            let mut last = self.last_request.lock().unwrap();
            let wait = last
                .map(|t| SELF_RATE_LIMIT_SECS.saturating_sub(t.elapsed().as_secs()))
                .unwrap_or(0);
            *last = Some(Instant::now());
            wait
        };
        if wait > 0 {
            tokio::time::sleep(std::time::Duration::from_secs(wait)).await;
        }
        Ok(())
    }

    fn lookup_path(&self, value: &str, ioc_type: IocType) -> Option<String> {
        let base = self.config.base_url.trim_end_matches('/');
        match ioc_type {
            IocType::Ip => Some(format!("{base}/ip_addresses/{value}")),
            IocType::Domain | IocType::Hostname => Some(format!("{base}/domains/{value}")),
            IocType::Url => {
                let id = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(value.as_bytes());
                Some(format!("{base}/urls/{id}"))
            }
            IocType::Md5 | IocType::Sha1 | IocType::Sha256 => Some(format!("{base}/files/{value}")),
            _ => None,
        }
    }
}

#[async_trait]
impl FeedAdapter for VirusTotalAdapter {
    async fn test_connection(&self) -> Result<(), FeedError> {
        let resp = self
            .client
            .get(format!("{}/users/me", self.config.base_url.trim_end_matches('/')))
            .header("x-apikey", &self.config.api_key)
            .send()
            .await
            .map_err(|e| FeedError::ConnectionError(e.to_string()))?;

        if resp.status().as_u16() == 401 {
            return Err(FeedError::AuthError("invalid VirusTotal API key".to_string()));
        }
        Ok(())
    }

    async fn fetch_since(&self, _since: Option<DateTime<Utc>>, _limit: usize) -> Result<Vec<Ioc>, FeedError> {
        Ok(Vec::new())
    }

    async fn lookup_one(&self, value: &str, ioc_type: Option<IocType>) -> Result<Option<Ioc>, FeedError> {
        let ioc_type = ioc_type.unwrap_or_else(|| isora_ioc::detect_type(value));
        let path = match self.lookup_path(value, ioc_type) {
            Some(p) => p,
            None => return Ok(None),
        };

        self.gate().await?;

        let resp = self
            .client
            .get(path)
            .header("x-apikey", &self.config.api_key)
            .send()
            .await
            .map_err(|e| FeedError::ConnectionError(e.to_string()))?;

        if resp.status().as_u16() == 404 {
            return Ok(None);
        }
        if resp.status().as_u16() == 429 {
            return Err(FeedError::RateLimit { retry_after: SELF_RATE_LIMIT_SECS });
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FeedError::ParseError(e.to_string()))?;

        Ok(parse_lookup(&raw, value, ioc_type))
    }

    async fn close(&mut self) {}
}

/// Threat level from `malicious+suspicious / total` detection ratio (§4.2).
fn threat_level_from_ratio(malicious: u32, suspicious: u32, total: u32) -> ThreatLevel {
    if total == 0 {
        return ThreatLevel::Unknown;
    }
    let ratio = (malicious + suspicious) as f64 / total as f64;
    if ratio > 0.5 {
        ThreatLevel::Critical
    } else if ratio > 0.3 {
        ThreatLevel::High
    } else if ratio > 0.1 {
        ThreatLevel::Medium
    } else if ratio > 0.0 {
        ThreatLevel::Low
    } else {
        ThreatLevel::Clean
    }
}

fn parse_lookup(raw: &serde_json::Value, value: &str, ioc_type: IocType) -> Option<Ioc> {
    let attrs = raw.get("data")?.get("attributes")?;
    let stats = attrs.get("last_analysis_stats")?;

    let malicious = stats.get("malicious").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    let suspicious = stats.get("suspicious").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    let harmless = stats.get("harmless").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    let undetected = stats.get("undetected").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    let total = malicious + suspicious + harmless + undetected;

    let mut ioc = Ioc::new(value, ioc_type);
    ioc.source = "virustotal".to_string();
    ioc.threat_level = threat_level_from_ratio(malicious, suspicious, total);
    ioc.confidence = if total > 0 { 0.8 } else { 0.3 };

    if !matches!(ioc_type, IocType::Md5 | IocType::Sha1 | IocType::Sha256) {
        if let Some(tags) = attrs.get("tags").and_then(|t| t.as_array()) {
            ioc.tags = tags.iter().filter_map(|v| v.as_str().map(String::from)).collect();
        }
    }

    Some(ioc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_ratio_buckets_threat_level() {
        assert_eq!(threat_level_from_ratio(60, 0, 100), ThreatLevel::Critical);
        assert_eq!(threat_level_from_ratio(35, 0, 100), ThreatLevel::High);
        assert_eq!(threat_level_from_ratio(15, 0, 100), ThreatLevel::Medium);
        assert_eq!(threat_level_from_ratio(5, 0, 100), ThreatLevel::Low);
        assert_eq!(threat_level_from_ratio(0, 0, 100), ThreatLevel::Clean);
        assert_eq!(threat_level_from_ratio(0, 0, 0), ThreatLevel::Unknown);
    }

    #[test]
    fn file_lookup_does_not_populate_mitre_techniques() {
        let raw = serde_json::json!({
            "data": {"attributes": {
                "last_analysis_stats": {"malicious": 60, "suspicious": 0, "harmless": 30, "undetected": 10},
                "tags": ["packed"]
            }}
        });
        let ioc = parse_lookup(&raw, &"a".repeat(64), IocType::Sha256).unwrap();
        assert!(ioc.mitre_techniques.is_empty());
        assert!(ioc.tags.is_empty());
    }
}
