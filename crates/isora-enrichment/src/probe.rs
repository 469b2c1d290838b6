use async_trait::async_trait;
use isora_common::IocType;

use crate::source::SourceResult;

/// One enrichment provider's query surface. Kept minimal and source-agnostic
/// so this crate does not depend on any specific HTTP client wiring; callers
/// supply the concrete probes (commonly backed by `isora-feeds` adapters or
/// direct provider clients).
#[async_trait]
pub trait SourceProbe: Send + Sync {
    async fn query(&self, value: &str, ioc_type: IocType) -> SourceResult;
}
