use async_trait::async_trait;
use chrono::{DateTime, Utc};
use isora_common::Ioc;

use crate::error::FeedError;

/// Capability set any CTI feed integration exposes (§4.2): connectivity
/// check plus an incremental pull keyed off the last successful sync time.
#[async_trait]
pub trait FeedAdapter: Send + Sync {
    async fn test_connection(&self) -> Result<(), FeedError>;

    /// Returns up to `limit` normalized IOCs modified on/after `since`; a
    /// bounded backfill when `since` is unset.
    async fn fetch_since(&self, since: Option<DateTime<Utc>>, limit: usize) -> Result<Vec<Ioc>, FeedError>;

    async fn lookup_one(&self, value: &str, ioc_type: Option<isora_common::IocType>) -> Result<Option<Ioc>, FeedError>;

    async fn close(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedType {
    Misp,
    Otx,
    VirusTotal,
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub feed_type: FeedType,
    pub base_url: String,
    pub api_key: String,
    pub min_threat_level: Option<isora_common::ThreatLevel>,
    pub timeout_secs: u64,
}

impl FeedConfig {
    pub fn new(feed_type: FeedType, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        FeedConfig {
            feed_type,
            base_url: base_url.into(),
            api_key: api_key.into(),
            min_threat_level: None,
            timeout_secs: 60,
        }
    }
}

/// Dispatch on `FeedType`. An unrecognized type is a `ConfigError`, never a
/// panic.
pub fn get_feed_adapter(config: FeedConfig) -> Result<Box<dyn FeedAdapter>, FeedError> {
    match config.feed_type {
        FeedType::Misp => Ok(Box::new(crate::misp::MispAdapter::new(config))),
        FeedType::Otx => Ok(Box::new(crate::otx::OtxAdapter::new(config))),
        FeedType::VirusTotal => Ok(Box::new(crate::virustotal::VirusTotalAdapter::new(config))),
    }
}
