use chrono::{DateTime, Utc};
use isora_common::{Ioc, IocType};
use isora_ioc::{deduplicate_iocs, filter_iocs, merge};

use crate::adapter::{get_feed_adapter, FeedConfig};
use crate::error::FeedError;

const FETCH_LIMIT: usize = 5000;
const SINGLE_FEED_RETRIES: u32 = 3;
const SINGLE_FEED_BASE_DELAY_SECS: u64 = 300;
const SYNC_ALL_RETRIES: u32 = 2;
const SYNC_ALL_BASE_DELAY_SECS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Success,
    Error,
    RateLimited,
}

/// Persisted per-feed sync bookkeeping (§4.10). The scheduler mutates this
/// in place; durable persistence is the caller's repository concern.
#[derive(Debug, Clone)]
pub struct FeedRecord {
    pub enabled: bool,
    pub config: FeedRecordConfig,
    pub last_sync: Option<DateTime<Utc>>,
    pub last_sync_status: Option<SyncStatus>,
    pub last_sync_count: u64,
    pub consecutive_failures: u32,
    pub next_attempt_after: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct FeedRecordConfig {
    pub feed: FeedConfig,
    pub min_confidence: f64,
    pub allowed_ioc_types: Vec<IocType>,
}

/// Existing-IOC lookup the scheduler uses to decide create vs. merge-update.
/// Modeled as a trait so the scheduler stays storage-agnostic (§5: no
/// transaction type is defined by this core).
#[async_trait::async_trait]
pub trait IocRepository: Send + Sync {
    async fn find_by_value_and_type(&self, value: &str, ioc_type: IocType) -> Result<Option<Ioc>, FeedError>;
    async fn upsert(&self, ioc: Ioc) -> Result<(), FeedError>;
}

pub struct SyncOutcome {
    pub status: SyncStatus,
    pub iocs_new: u64,
    pub iocs_updated: u64,
    pub iocs_skipped: u64,
}

/// Run a single feed's sync per §4.10 steps 1-7, without the retry wrapper
/// (the caller applies retry/backoff policy around this call).
pub async fn sync_one_feed(
    record: &mut FeedRecord,
    repo: &dyn IocRepository,
    now: DateTime<Utc>,
) -> Result<SyncOutcome, FeedError> {
    let adapter = get_feed_adapter(record.config.feed.clone())?;
    adapter.test_connection().await?;

    let fetched = adapter.fetch_since(record.last_sync, FETCH_LIMIT).await?;
    let filtered = filter_iocs(fetched, record.config.min_confidence, &record.config.allowed_ioc_types);
    let deduped = deduplicate_iocs(filtered);

    let (iocs_new, iocs_updated, iocs_skipped) = upsert_batch(deduped, repo, now).await;

    record.last_sync = Some(now);
    record.last_sync_status = Some(SyncStatus::Success);
    record.last_sync_count = iocs_new + iocs_updated;
    record.consecutive_failures = 0;
    record.next_attempt_after = None;

    Ok(SyncOutcome {
        status: SyncStatus::Success,
        iocs_new,
        iocs_updated,
        iocs_skipped,
    })
}

/// Create-or-merge each IOC into `repo`, per §4.10 step 5. A lookup or write
/// failure skips that IOC rather than aborting the rest of the batch.
/// Returns `(iocs_new, iocs_updated, iocs_skipped)`.
async fn upsert_batch(deduped: Vec<Ioc>, repo: &dyn IocRepository, now: DateTime<Utc>) -> (u64, u64, u64) {
    let mut iocs_new = 0u64;
    let mut iocs_updated = 0u64;
    let mut iocs_skipped = 0u64;

    for mut ioc in deduped {
        let existing = match repo.find_by_value_and_type(&ioc.value, ioc.ioc_type).await {
            Ok(existing) => existing,
            Err(err) => {
                log::warn!("skipping IOC {}: repository lookup failed: {err}", ioc.value);
                iocs_skipped += 1;
                continue;
            }
        };

        let (to_store, is_update) = match existing {
            Some(stored) => {
                let mut merged = merge(&stored, &ioc);
                merged.last_seen = Some(now);
                if ioc.threat_level > stored.threat_level {
                    merged.threat_level = ioc.threat_level;
                }
                (merged, true)
            }
            None => {
                ioc.last_seen = Some(now);
                (ioc, false)
            }
        };

        match repo.upsert(to_store).await {
            Ok(()) if is_update => iocs_updated += 1,
            Ok(()) => iocs_new += 1,
            Err(err) => {
                log::warn!("skipping IOC upsert: repository write failed: {err}");
                iocs_skipped += 1;
            }
        }
    }

    (iocs_new, iocs_updated, iocs_skipped)
}

/// Apply the §4.10 retry/backoff policy around one feed's sync attempt.
/// `base_delay` and `max_retries` let `sync_all_feeds` reuse this with its
/// own (looser) budget.
pub async fn sync_one_feed_with_retry(
    record: &mut FeedRecord,
    repo: &dyn IocRepository,
    now: DateTime<Utc>,
    max_retries: u32,
    base_delay_secs: u64,
) -> SyncOutcome {
    let mut attempt = 0;
    loop {
        match sync_one_feed(record, repo, now).await {
            Ok(outcome) => return outcome,
            Err(FeedError::RateLimit { retry_after }) => {
                record.last_sync_status = Some(SyncStatus::RateLimited);
                record.next_attempt_after = Some(now + chrono::Duration::seconds(retry_after as i64));
                return SyncOutcome {
                    status: SyncStatus::RateLimited,
                    iocs_new: 0,
                    iocs_updated: 0,
                    iocs_skipped: 0,
                };
            }
            Err(err @ (FeedError::AuthError(_) | FeedError::ConnectionError(_))) => {
                record.consecutive_failures += 1;
                record.last_sync_status = Some(SyncStatus::Error);
                attempt += 1;
                if attempt > max_retries {
                    log::error!("feed sync exhausted retries: {err}");
                    return SyncOutcome {
                        status: SyncStatus::Error,
                        iocs_new: 0,
                        iocs_updated: 0,
                        iocs_skipped: 0,
                    };
                }
                log::warn!("feed sync attempt {attempt} failed, retrying in {base_delay_secs}s: {err}");
            }
            Err(err) => {
                record.consecutive_failures += 1;
                record.last_sync_status = Some(SyncStatus::Error);
                log::error!("feed sync unexpected error: {err}");
                return SyncOutcome {
                    status: SyncStatus::Error,
                    iocs_new: 0,
                    iocs_updated: 0,
                    iocs_skipped: 0,
                };
            }
        }
    }
}

/// Default single-feed retry budget per §4.10: 3 retries, 300s base delay.
pub async fn sync_feed(record: &mut FeedRecord, repo: &dyn IocRepository, now: DateTime<Utc>) -> SyncOutcome {
    sync_one_feed_with_retry(record, repo, now, SINGLE_FEED_RETRIES, SINGLE_FEED_BASE_DELAY_SECS).await
}

/// Periodic task-plane entry point: iterate all enabled feeds with the
/// looser sync-all retry budget (2 retries, 600s base delay). A single
/// feed's failure never aborts the batch.
pub async fn sync_all_feeds(records: &mut [FeedRecord], repo: &dyn IocRepository, now: DateTime<Utc>) -> Vec<SyncOutcome> {
    let mut outcomes = Vec::with_capacity(records.len());
    for record in records.iter_mut() {
        if !record.enabled {
            continue;
        }
        let outcome = sync_one_feed_with_retry(record, repo, now, SYNC_ALL_RETRIES, SYNC_ALL_BASE_DELAY_SECS).await;
        outcomes.push(outcome);
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::FeedType;
    use isora_common::ThreatLevel;
    use std::sync::Mutex;

    struct FakeRepo {
        stored: Mutex<std::collections::HashMap<String, Ioc>>,
    }

    #[async_trait::async_trait]
    impl IocRepository for FakeRepo {
        async fn find_by_value_and_type(&self, value: &str, ioc_type: IocType) -> Result<Option<Ioc>, FeedError> {
            Ok(self.stored.lock().unwrap().get(&format!("{value}:{}", ioc_type.as_str())).cloned())
        }
        async fn upsert(&self, ioc: Ioc) -> Result<(), FeedError> {
            self.stored
                .lock()
                .unwrap()
                .insert(format!("{}:{}", ioc.value, ioc.ioc_type.as_str()), ioc);
            Ok(())
        }
    }

    /// Always fails upserts, to exercise the `iocs_skipped` accounting path.
    struct FailingRepo;

    #[async_trait::async_trait]
    impl IocRepository for FailingRepo {
        async fn find_by_value_and_type(&self, _value: &str, _ioc_type: IocType) -> Result<Option<Ioc>, FeedError> {
            Ok(None)
        }
        async fn upsert(&self, _ioc: Ioc) -> Result<(), FeedError> {
            Err(FeedError::StoreError("connection refused".to_string()))
        }
    }

    fn test_record() -> FeedRecord {
        FeedRecord {
            enabled: true,
            config: FeedRecordConfig {
                feed: FeedConfig::new(FeedType::VirusTotal, "https://example.invalid", "key"),
                min_confidence: 0.0,
                allowed_ioc_types: Vec::new(),
            },
            last_sync: None,
            last_sync_status: None,
            last_sync_count: 0,
            consecutive_failures: 0,
            next_attempt_after: None,
        }
    }

    #[tokio::test]
    async fn connection_errors_exhaust_retries_and_increment_consecutive_failures() {
        // example.invalid never resolves, so every attempt deterministically
        // fails with ConnectionError and the retry/backoff path runs for real.
        let mut record = test_record();
        record.consecutive_failures = 2;
        let repo = FakeRepo {
            stored: Mutex::new(std::collections::HashMap::new()),
        };

        let outcome = sync_one_feed_with_retry(&mut record, &repo, Utc::now(), 3, 0).await;

        assert_eq!(outcome.status, SyncStatus::Error);
        assert_eq!(record.last_sync_status, Some(SyncStatus::Error));
        assert_eq!(record.consecutive_failures, 2 + 4);
    }

    #[tokio::test]
    async fn repo_roundtrips_new_and_updated_iocs() {
        let repo = FakeRepo {
            stored: Mutex::new(std::collections::HashMap::new()),
        };
        let mut ioc = Ioc::new("8.8.8.8", IocType::Ip);
        ioc.threat_level = ThreatLevel::Low;

        let (new1, updated1, skipped1) = upsert_batch(vec![ioc.clone()], &repo, Utc::now()).await;
        assert_eq!((new1, updated1, skipped1), (1, 0, 0));

        ioc.threat_level = ThreatLevel::High;
        let (new2, updated2, skipped2) = upsert_batch(vec![ioc], &repo, Utc::now()).await;
        assert_eq!((new2, updated2, skipped2), (0, 1, 0));

        let found = repo.find_by_value_and_type("8.8.8.8", IocType::Ip).await.unwrap();
        assert_eq!(found.unwrap().threat_level, ThreatLevel::High);
    }

    #[tokio::test]
    async fn failing_repository_increments_iocs_skipped_rather_than_aborting() {
        let repo = FailingRepo;
        let iocs = vec![Ioc::new("1.1.1.1", IocType::Ip), Ioc::new("2.2.2.2", IocType::Ip)];

        let (new, updated, skipped) = upsert_batch(iocs, &repo, Utc::now()).await;
        assert_eq!((new, updated, skipped), (0, 0, 2));
    }
}
