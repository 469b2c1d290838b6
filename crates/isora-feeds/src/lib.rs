//! CTI feed adapters (MISP, OTX, VirusTotal) and the background sync
//! scheduler (§4.2, §4.10).

pub mod adapter;
pub mod error;
pub mod misp;
pub mod otx;
pub mod scheduler;
pub mod virustotal;

pub use adapter::{get_feed_adapter, FeedAdapter, FeedConfig, FeedType};
pub use error::FeedError;
pub use scheduler::{sync_all_feeds, sync_feed, FeedRecord, FeedRecordConfig, IocRepository, SyncOutcome, SyncStatus};
