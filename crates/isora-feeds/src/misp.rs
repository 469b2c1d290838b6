use async_trait::async_trait;
use chrono::{DateTime, Utc};
use isora_common::{Ioc, IocType, ThreatLevel};
use isora_ioc::detect_type;

use crate::adapter::{FeedAdapter, FeedConfig};
use crate::error::FeedError;

/// Searches `events` where `to_ids=true` and `published=true` (§4.2). Event
/// tags (minus `misp-galaxy:*`) propagate to every IOC emitted from that
/// event; galaxy clusters feed the related-entity buckets.
pub struct MispAdapter {
    config: FeedConfig,
    client: reqwest::Client,
}

impl MispAdapter {
    pub fn new(config: FeedConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        MispAdapter { config, client }
    }

    fn event_url(&self) -> String {
        format!("{}/events/restSearch", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl FeedAdapter for MispAdapter {
    async fn test_connection(&self) -> Result<(), FeedError> {
        let resp = self
            .client
            .get(format!("{}/servers/getVersion", self.config.base_url.trim_end_matches('/')))
            .header("Authorization", &self.config.api_key)
            .send()
            .await
            .map_err(|e| FeedError::ConnectionError(e.to_string()))?;

        if resp.status().as_u16() == 401 || resp.status().as_u16() == 403 {
            return Err(FeedError::AuthError("invalid MISP API key".to_string()));
        }
        if !resp.status().is_success() {
            return Err(FeedError::ApiError(format!("unexpected status {}", resp.status())));
        }
        Ok(())
    }

    async fn fetch_since(&self, since: Option<DateTime<Utc>>, limit: usize) -> Result<Vec<Ioc>, FeedError> {
        let mut body = serde_json::json!({
            "to_ids": true,
            "published": true,
            "limit": limit,
        });
        if let Some(ts) = since {
            body["timestamp"] = serde_json::json!(ts.timestamp());
        }

        let resp = self
            .client
            .post(self.event_url())
            .header("Authorization", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| FeedError::ConnectionError(e.to_string()))?;

        if resp.status().as_u16() == 401 || resp.status().as_u16() == 403 {
            return Err(FeedError::AuthError("invalid MISP API key".to_string()));
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FeedError::ParseError(e.to_string()))?;

        Ok(parse_event_search(&raw))
    }

    async fn lookup_one(&self, value: &str, ioc_type: Option<IocType>) -> Result<Option<Ioc>, FeedError> {
        let resp = self
            .client
            .post(format!("{}/attributes/restSearch", self.config.base_url.trim_end_matches('/')))
            .header("Authorization", &self.config.api_key)
            .json(&serde_json::json!({"value": value}))
            .send()
            .await
            .map_err(|e| FeedError::ConnectionError(e.to_string()))?;

        let raw: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FeedError::ParseError(e.to_string()))?;

        let ioc_type = ioc_type.unwrap_or_else(|| detect_type(value));
        Ok(parse_attribute_search(&raw, value, ioc_type))
    }

    async fn close(&mut self) {}
}

fn threat_level_from_misp(level: Option<&str>) -> ThreatLevel {
    match level {
        Some("1") => ThreatLevel::High,
        Some("2") => ThreatLevel::Medium,
        Some("3") => ThreatLevel::Low,
        _ => ThreatLevel::Unknown,
    }
}

/// Map a MITRE galaxy cluster value `misp-galaxy:mitre-attack-pattern="Name - Txxxx[.nnn]"`
/// into `"Txxxx[.nnn] - Name"`.
fn map_mitre_galaxy_value(value: &str) -> Option<String> {
    let (name, id) = value.rsplit_once(" - ")?;
    let id = id.trim();
    if id.starts_with('T') && id.chars().nth(1).map(|c| c.is_ascii_digit()).unwrap_or(false) {
        Some(format!("{} - {}", id, name.trim()))
    } else {
        None
    }
}

struct EventGalaxies {
    actors: Vec<String>,
    campaigns: Vec<String>,
    mitre: Vec<String>,
}

fn extract_event_galaxies(event: &serde_json::Value) -> EventGalaxies {
    let mut out = EventGalaxies {
        actors: Vec::new(),
        campaigns: Vec::new(),
        mitre: Vec::new(),
    };

    let galaxies = event
        .get("Galaxy")
        .and_then(|g| g.as_array())
        .cloned()
        .unwrap_or_default();

    for galaxy in galaxies {
        let galaxy_type = galaxy.get("type").and_then(|t| t.as_str()).unwrap_or("");
        let clusters = galaxy
            .get("GalaxyCluster")
            .and_then(|c| c.as_array())
            .cloned()
            .unwrap_or_default();

        for cluster in clusters {
            let value = cluster.get("value").and_then(|v| v.as_str()).unwrap_or("");
            if value.is_empty() {
                continue;
            }
            if galaxy_type.contains("mitre-attack-pattern") {
                if let Some(mapped) = map_mitre_galaxy_value(value) {
                    out.mitre.push(mapped);
                }
            } else {
                match galaxy_type {
                    "threat-actor" => out.actors.push(value.to_string()),
                    "campaign" | "mitre-intrusion-set" => out.campaigns.push(value.to_string()),
                    _ => {}
                }
            }
        }
    }

    out
}

fn extract_event_tags(event: &serde_json::Value) -> Vec<String> {
    event
        .get("Tag")
        .and_then(|t| t.as_array())
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.get("name").and_then(|n| n.as_str()))
                .filter(|n| !n.starts_with("misp-galaxy:"))
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn attribute_to_ioc(attr: &serde_json::Value, event_tags: &[String], galaxies: &EventGalaxies) -> Option<Ioc> {
    let value = attr.get("value").and_then(|v| v.as_str())?;
    let ioc_type = detect_type(value);
    let to_ids = attr.get("to_ids").and_then(|v| v.as_bool()).unwrap_or(false);

    let mut ioc = Ioc::new(value, ioc_type);
    ioc.source = "misp".to_string();
    ioc.confidence = if to_ids { 0.8 } else { 0.5 };
    ioc.tags = isora_ioc::sanitize_tags(event_tags, 64);
    ioc.related_actors = galaxies.actors.clone();
    ioc.related_campaigns = galaxies.campaigns.clone();
    ioc.mitre_techniques = galaxies.mitre.clone();
    Some(ioc)
}

fn parse_event_search(raw: &serde_json::Value) -> Vec<Ioc> {
    let mut out = Vec::new();
    let responses = raw
        .get("response")
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default();

    for wrapper in responses {
        let event = match wrapper.get("Event") {
            Some(e) => e,
            None => continue,
        };
        let threat_level = threat_level_from_misp(event.get("threat_level_id").and_then(|v| v.as_str()));
        let event_tags = extract_event_tags(event);
        let galaxies = extract_event_galaxies(event);

        let mut attributes = event
            .get("Attribute")
            .and_then(|a| a.as_array())
            .cloned()
            .unwrap_or_default();

        for obj in event.get("Object").and_then(|o| o.as_array()).into_iter().flatten() {
            if let Some(obj_attrs) = obj.get("Attribute").and_then(|a| a.as_array()) {
                attributes.extend(obj_attrs.iter().cloned());
            }
        }

        for attr in &attributes {
            let to_ids = attr.get("to_ids").and_then(|v| v.as_bool()).unwrap_or(false);
            if !to_ids {
                continue;
            }
            if let Some(mut ioc) = attribute_to_ioc(attr, &event_tags, &galaxies) {
                ioc.threat_level = threat_level;
                out.push(ioc);
            }
        }
    }

    out
}

fn parse_attribute_search(raw: &serde_json::Value, value: &str, ioc_type: IocType) -> Option<Ioc> {
    let attributes = raw
        .get("response")
        .and_then(|r| r.get("Attribute"))
        .and_then(|a| a.as_array())?;

    if attributes.is_empty() {
        return None;
    }

    let mut ioc = Ioc::new(value, ioc_type);
    ioc.source = "misp".to_string();
    ioc.confidence = 0.6;
    Some(ioc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_mitre_galaxy_cluster_value() {
        assert_eq!(
            map_mitre_galaxy_value("Application Layer Protocol - T1071"),
            Some("T1071 - Application Layer Protocol".to_string())
        );
    }

    #[test]
    fn threat_level_mapping_matches_misp_numeric_scale() {
        assert_eq!(threat_level_from_misp(Some("1")), ThreatLevel::High);
        assert_eq!(threat_level_from_misp(Some("2")), ThreatLevel::Medium);
        assert_eq!(threat_level_from_misp(Some("3")), ThreatLevel::Low);
        assert_eq!(threat_level_from_misp(Some("4")), ThreatLevel::Unknown);
        assert_eq!(threat_level_from_misp(None), ThreatLevel::Unknown);
    }

    #[test]
    fn parses_event_search_response_into_iocs() {
        let raw = serde_json::json!({
            "response": [{
                "Event": {
                    "threat_level_id": "2",
                    "Tag": [{"name": "tlp:green"}, {"name": "misp-galaxy:mitre-attack-pattern"}],
                    "Galaxy": [],
                    "Attribute": [
                        {"value": "evil.com", "to_ids": true},
                        {"value": "benign.com", "to_ids": false}
                    ]
                }
            }]
        });

        let iocs = parse_event_search(&raw);
        assert_eq!(iocs.len(), 1);
        assert_eq!(iocs[0].value, "evil.com");
        assert_eq!(iocs[0].threat_level, ThreatLevel::Medium);
        assert!(iocs[0].tags.contains(&"tlp:green".to_string()));
        assert!(!iocs[0].tags.iter().any(|t| t.starts_with("misp-galaxy:")));
    }
}
