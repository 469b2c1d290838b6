use async_trait::async_trait;
use chrono::{DateTime, Utc};
use isora_common::{Ioc, IocType, ThreatLevel};
use isora_ioc::detect_type;

use crate::adapter::{FeedAdapter, FeedConfig};
use crate::error::FeedError;

const ELEVATED_ADVERSARY_MARKERS: &[&str] = &["apt", "lazarus", "cozy bear", "fancy bear"];

/// Closed indicator-type map; unmapped indicator types fall back to the
/// shared type-detection heuristic (§4.2).
fn otx_type_map(indicator_type: &str) -> Option<IocType> {
    match indicator_type {
        "IPv4" | "IPv6" => Some(IocType::Ip),
        "domain" | "hostname" => Some(IocType::Domain),
        "URL" | "URI" => Some(IocType::Url),
        "FileHash-MD5" => Some(IocType::Md5),
        "FileHash-SHA1" => Some(IocType::Sha1),
        "FileHash-SHA256" => Some(IocType::Sha256),
        "email" => Some(IocType::Email),
        "CVE" => Some(IocType::Cve),
        _ => None,
    }
}

pub struct OtxAdapter {
    config: FeedConfig,
    client: reqwest::Client,
}

impl OtxAdapter {
    pub fn new(config: FeedConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        OtxAdapter { config, client }
    }

    fn headers(&self) -> (&'static str, String) {
        ("X-OTX-API-KEY", self.config.api_key.clone())
    }
}

#[async_trait]
impl FeedAdapter for OtxAdapter {
    async fn test_connection(&self) -> Result<(), FeedError> {
        let (h, key) = self.headers();
        let resp = self
            .client
            .get(format!("{}/api/v1/user/me", self.config.base_url.trim_end_matches('/')))
            .header(h, key)
            .send()
            .await
            .map_err(|e| FeedError::ConnectionError(e.to_string()))?;

        if resp.status().as_u16() == 401 {
            return Err(FeedError::AuthError("invalid OTX API key".to_string()));
        }
        Ok(())
    }

    async fn fetch_since(&self, since: Option<DateTime<Utc>>, limit: usize) -> Result<Vec<Ioc>, FeedError> {
        let (h, key) = self.headers();
        let path = match since {
            Some(ts) => format!(
                "{}/api/v1/pulses/subscribed?modified_since={}&limit={}",
                self.config.base_url.trim_end_matches('/'),
                ts.to_rfc3339(),
                limit
            ),
            None => format!(
                "{}/api/v1/pulses/subscribed?limit={}",
                self.config.base_url.trim_end_matches('/'),
                limit
            ),
        };

        let resp = self
            .client
            .get(path)
            .header(h, key)
            .send()
            .await
            .map_err(|e| FeedError::ConnectionError(e.to_string()))?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(FeedError::from_provider_text(&text, 60));
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FeedError::ParseError(e.to_string()))?;

        Ok(parse_pulses(&raw))
    }

    async fn lookup_one(&self, value: &str, ioc_type: Option<IocType>) -> Result<Option<Ioc>, FeedError> {
        let ioc_type = ioc_type.unwrap_or_else(|| detect_type(value));
        let (h, key) = self.headers();

        let resp = self
            .client
            .get(format!(
                "{}/api/v1/indicators/{}/{}/general",
                self.config.base_url.trim_end_matches('/'),
                otx_section(ioc_type),
                value
            ))
            .header(h, key)
            .send()
            .await
            .map_err(|e| FeedError::ConnectionError(e.to_string()))?;

        if resp.status().as_u16() == 404 {
            return Ok(None);
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FeedError::ParseError(e.to_string()))?;

        Ok(parse_indicator_lookup(&raw, value, ioc_type))
    }

    async fn close(&mut self) {}
}

fn otx_section(ioc_type: IocType) -> &'static str {
    match ioc_type {
        IocType::Ip => "IPv4",
        IocType::Domain | IocType::Hostname => "domain",
        IocType::Url => "url",
        IocType::Md5 | IocType::Sha1 | IocType::Sha256 => "file",
        IocType::Cve => "cve",
        _ => "domain",
    }
}

fn elevated_if_apt_adversary(adversary: Option<&str>) -> ThreatLevel {
    match adversary {
        Some(name) => {
            let lower = name.to_lowercase();
            if ELEVATED_ADVERSARY_MARKERS.iter().any(|m| lower.contains(m)) {
                ThreatLevel::High
            } else {
                ThreatLevel::Medium
            }
        }
        None => ThreatLevel::Medium,
    }
}

fn parse_pulses(raw: &serde_json::Value) -> Vec<Ioc> {
    let mut out = Vec::new();
    let pulses = raw
        .get("results")
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default();

    for pulse in pulses {
        let tags: Vec<String> = pulse
            .get("tags")
            .and_then(|t| t.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).take(10).collect())
            .unwrap_or_default();

        let mut categories: Vec<String> = pulse
            .get("targeted_countries")
            .and_then(|v| v.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
            .unwrap_or_default();
        categories.extend(
            pulse
                .get("industries")
                .and_then(|v| v.as_array())
                .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect::<Vec<_>>())
                .unwrap_or_default(),
        );

        let adversary = pulse.get("adversary").and_then(|v| v.as_str());
        let threat_level = elevated_if_apt_adversary(adversary);

        let attack_ids: Vec<String> = pulse
            .get("attack_ids")
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|entry| {
                        if let Some(id) = entry.as_str() {
                            Some(id.to_string())
                        } else if entry.is_object() {
                            let id = entry.get("id").and_then(|v| v.as_str())?;
                            let name = entry.get("name").and_then(|v| v.as_str());
                            Some(match name {
                                Some(n) => format!("{} - {}", id, n),
                                None => id.to_string(),
                            })
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let indicators = pulse
            .get("indicators")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        for indicator in indicators {
            let indicator_type = indicator.get("type").and_then(|v| v.as_str()).unwrap_or("");
            let value = match indicator.get("indicator").and_then(|v| v.as_str()) {
                Some(v) => v,
                None => continue,
            };
            let ioc_type = match otx_type_map(indicator_type) {
                Some(t) => t,
                None => {
                    let detected = detect_type(value);
                    if detected == IocType::Unknown {
                        continue;
                    }
                    detected
                }
            };

            let mut ioc = Ioc::new(value, ioc_type);
            ioc.source = "otx".to_string();
            ioc.confidence = 0.7;
            ioc.threat_level = threat_level;
            ioc.tags = tags.clone();
            ioc.categories = categories.clone();
            if let Some(a) = adversary {
                ioc.related_actors.push(a.to_string());
            }
            ioc.mitre_techniques = attack_ids.clone();
            out.push(ioc);
        }
    }

    out
}

fn parse_indicator_lookup(raw: &serde_json::Value, value: &str, ioc_type: IocType) -> Option<Ioc> {
    let pulse_info = raw.get("pulse_info")?;
    let pulses = pulse_info.get("pulses").and_then(|p| p.as_array())?;
    let pulse_count = pulses.len();
    if pulse_count == 0 {
        return None;
    }

    let mut ioc = Ioc::new(value, ioc_type);
    ioc.source = "otx".to_string();
    ioc.threat_level = if pulse_count > 10 {
        ThreatLevel::High
    } else if pulse_count > 5 {
        ThreatLevel::Medium
    } else {
        ThreatLevel::Low
    };
    ioc.confidence = (0.5 + pulse_count as f64 * 0.05).min(0.9);

    for pulse in pulses.iter().take(10) {
        if let Some(tags) = pulse.get("tags").and_then(|t| t.as_array()) {
            for t in tags.iter().filter_map(|v| v.as_str()) {
                if !ioc.tags.contains(&t.to_string()) {
                    ioc.tags.push(t.to_string());
                }
            }
        }
        if let Some(adv) = pulse.get("adversary").and_then(|v| v.as_str()) {
            if !ioc.related_actors.contains(&adv.to_string()) {
                ioc.related_actors.push(adv.to_string());
            }
        }
    }

    Some(ioc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevates_threat_level_for_known_apt_adversaries() {
        assert_eq!(elevated_if_apt_adversary(Some("Lazarus Group")), ThreatLevel::High);
        assert_eq!(elevated_if_apt_adversary(Some("Unknown Crew")), ThreatLevel::Medium);
    }

    #[test]
    fn unmapped_indicator_falls_back_to_detection_and_drops_unknown() {
        let raw = serde_json::json!({
            "results": [{
                "tags": ["malware"],
                "adversary": "Fancy Bear",
                "attack_ids": ["T1071"],
                "indicators": [
                    {"type": "SomeWeirdType", "indicator": "evil.com"},
                    {"type": "SomeWeirdType", "indicator": "!!!not-an-ioc!!!"}
                ]
            }]
        });

        let iocs = parse_pulses(&raw);
        assert_eq!(iocs.len(), 1);
        assert_eq!(iocs[0].value, "evil.com");
        assert_eq!(iocs[0].threat_level, ThreatLevel::High);
    }

    #[test]
    fn lookup_confidence_caps_at_point_nine() {
        let raw = serde_json::json!({
            "pulse_info": {"pulses": (0..20).map(|_| serde_json::json!({})).collect::<Vec<_>>()}
        });
        let ioc = parse_indicator_lookup(&raw, "evil.com", IocType::Domain).unwrap();
        assert_eq!(ioc.confidence, 0.9);
        assert_eq!(ioc.threat_level, ThreatLevel::High);
    }
}
