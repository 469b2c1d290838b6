use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use isora_common::Plan;
use log::{error, warn};

use crate::plan_limits::{limits_for, IP_LIMIT_PER_MINUTE, WINDOW_HOUR_SECS, WINDOW_MINUTE_SECS};
use crate::store::RateLimitStore;

pub const PREFIX_PLAN_CACHE: &str = "ratelimit:meta";

fn tenant_hour_key(tenant_id: &str) -> String {
    format!("ratelimit:sw:tenant:{tenant_id}:hour")
}
fn tenant_minute_key(tenant_id: &str) -> String {
    format!("ratelimit:sw:tenant:{tenant_id}:minute")
}
fn ip_key(ip: &str) -> String {
    format!("ratelimit:sw:ip:{ip}:minute")
}
fn endpoint_key(path: &str, ip: &str) -> String {
    format!("ratelimit:sw:endpoint:{path}:ip:{ip}")
}
fn plan_cache_key(tenant_id: &str) -> String {
    format!("{PREFIX_PLAN_CACHE}:{tenant_id}:plan")
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Epoch seconds at which the window resets.
    pub reset_at: i64,
    /// Present (`Some`) only on rejection.
    pub retry_after: Option<u64>,
}

impl RateLimitResult {
    /// Renders the four standard headers (§6.1). `Retry-After` is present
    /// only when the request was rejected.
    pub fn headers(&self) -> HashMap<&'static str, String> {
        let mut h = HashMap::new();
        h.insert("X-RateLimit-Limit", self.limit.to_string());
        h.insert("X-RateLimit-Remaining", self.remaining.to_string());
        h.insert("X-RateLimit-Reset", self.reset_at.to_string());
        if let Some(retry_after) = self.retry_after {
            h.insert("Retry-After", retry_after.to_string());
        }
        h
    }
}

/// Request fields the limiter needs; assembled by the pipeline (C9) from the
/// incoming HTTP request and the decoded (unchecked) token.
pub struct RateLimitRequest<'a> {
    pub tenant_id: Option<&'a str>,
    pub ip: &'a str,
    pub path: &'a str,
    pub plan: Plan,
    pub is_super_admin: bool,
}

pub struct RateLimitService<S: RateLimitStore> {
    store: S,
    /// `(path, window_seconds, cap)` — closed, small; checked linearly since
    /// only a handful of endpoint overrides ever exist at once.
    endpoint_limits: Vec<(String, u64, u32)>,
    bypass_super_admin: bool,
}

impl<S: RateLimitStore> RateLimitService<S> {
    pub fn new(store: S, bypass_super_admin: bool) -> Self {
        RateLimitService {
            store,
            endpoint_limits: Vec::new(),
            bypass_super_admin,
        }
    }

    pub fn with_endpoint_limit(mut self, path: impl Into<String>, window_secs: u64, cap: u32) -> Self {
        self.endpoint_limits.push((path.into(), window_secs, cap));
        self
    }

    fn endpoint_limit_for(&self, path: &str) -> Option<(u64, u32)> {
        self.endpoint_limits
            .iter()
            .find(|(p, _, _)| p == path)
            .map(|(_, w, c)| (*w, *c))
    }

    /// Evaluate admission for one request (§4.8 evaluation order). Never
    /// returns an `Err` for "rejected" — rejection is `Ok(result)` with
    /// `allowed = false`. Errors here are store/infra failures that the
    /// caller is expected to treat as fail-open (see `pipeline::rate_limit_gate`).
    pub async fn check_rate_limit(
        &self,
        req: &RateLimitRequest<'_>,
    ) -> Result<RateLimitResult, crate::store::StoreError> {
        if req.is_super_admin && self.bypass_super_admin {
            return Ok(RateLimitResult {
                allowed: true,
                limit: u32::MAX,
                remaining: u32::MAX,
                reset_at: now_secs() as i64,
                retry_after: None,
            });
        }

        if let Some((window, cap)) = self.endpoint_limit_for(req.path) {
            let key = endpoint_key(req.path, req.ip);
            return self.check_sliding_window(&key, window, cap).await;
        }

        if let Some(tenant_id) = req.tenant_id {
            let (minute_cap, hour_cap) = limits_for(req.plan);

            let minute = self
                .check_sliding_window(&tenant_minute_key(tenant_id), WINDOW_MINUTE_SECS, minute_cap)
                .await?;
            if !minute.allowed {
                return Ok(minute);
            }

            let hour = self
                .check_sliding_window(&tenant_hour_key(tenant_id), WINDOW_HOUR_SECS, hour_cap)
                .await?;
            if !hour.allowed {
                return Ok(hour);
            }

            // Return whichever of the two allowed results is more restrictive.
            return Ok(if minute.remaining <= hour.remaining { minute } else { hour });
        }

        self.check_sliding_window(&ip_key(req.ip), WINDOW_MINUTE_SECS, IP_LIMIT_PER_MINUTE)
            .await
    }

    /// The §4.8 sliding-window algorithm, parameterized over wall-clock time
    /// so tests can pin `now` precisely.
    async fn check_sliding_window(
        &self,
        key: &str,
        window_secs: u64,
        cap: u32,
    ) -> Result<RateLimitResult, crate::store::StoreError> {
        self.check_sliding_window_at(key, window_secs, cap, now_secs())
            .await
    }

    async fn check_sliding_window_at(
        &self,
        key: &str,
        window_secs: u64,
        cap: u32,
        now: f64,
    ) -> Result<RateLimitResult, crate::store::StoreError> {
        let window = window_secs as f64;
        self.store.trim(key, now - window).await?;
        let count = self.store.count(key).await?;

        if count as u32 >= cap {
            let oldest = self.store.oldest_score(key).await?.unwrap_or(now);
            let retry_after = ((oldest + window - now) as i64 + 1).max(1) as u64;
            Ok(RateLimitResult {
                allowed: false,
                limit: cap,
                remaining: 0,
                reset_at: (now + retry_after as f64) as i64,
                retry_after: Some(retry_after),
            })
        } else {
            self.store.add(key, now, &now.to_string()).await?;
            self.store.expire(key, window_secs + 60).await?;
            Ok(RateLimitResult {
                allowed: true,
                limit: cap,
                remaining: cap - count as u32 - 1,
                reset_at: (now + window) as i64,
                retry_after: None,
            })
        }
    }

    /// `tenant_id -> plan`, cached for 5 minutes (§3.6). The database
    /// fallback is represented as a caller-supplied closure since persistence
    /// is out of scope for this core.
    pub async fn tenant_plan<F, Fut>(
        &self,
        tenant_id: &str,
        db_lookup: F,
    ) -> Result<Plan, crate::store::StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Option<Plan>>,
    {
        let key = plan_cache_key(tenant_id);
        if let Some(cached) = self.store.get(&key).await? {
            return Ok(Plan::from_str_or_free(&cached));
        }

        let plan = db_lookup().await.unwrap_or(Plan::Free);
        self.store.setex(&key, 300, plan.as_str()).await?;
        Ok(plan)
    }

    pub async fn get_tenant_usage(
        &self,
        tenant_id: &str,
    ) -> Result<(u64, u64), crate::store::StoreError> {
        let minute = self.store.count(&tenant_minute_key(tenant_id)).await?;
        let hour = self.store.count(&tenant_hour_key(tenant_id)).await?;
        Ok((minute, hour))
    }

    pub async fn reset_tenant_limits(&self, tenant_id: &str) -> Result<(), crate::store::StoreError> {
        self.store.del(&tenant_minute_key(tenant_id)).await?;
        self.store.del(&tenant_hour_key(tenant_id)).await?;
        Ok(())
    }
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Fail-open wrapper (§4.8, §9): any store error during admission is logged
/// and treated as an allow with no headers attached, never a blocked or
/// user-visible-5xx request. This is the behavior seed test #7 pins.
pub async fn check_rate_limit_fail_open<S: RateLimitStore>(
    service: &RateLimitService<S>,
    req: &RateLimitRequest<'_>,
) -> Option<RateLimitResult> {
    match service.check_rate_limit(req).await {
        Ok(result) => {
            if !result.allowed {
                warn!(
                    "rate limit exceeded: ip={} tenant={:?} path={}",
                    req.ip, req.tenant_id, req.path
                );
            }
            Some(result)
        }
        Err(e) => {
            error!("rate limit check failed, failing open: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::InMemoryStore;

    fn svc() -> RateLimitService<InMemoryStore> {
        RateLimitService::new(InMemoryStore::default(), true)
    }

    #[tokio::test]
    async fn admits_up_to_cap_then_rejects_with_exact_retry_after() {
        let service = svc();
        for t in 0..5 {
            let r = service
                .check_sliding_window_at("k", 60, 5, t as f64)
                .await
                .unwrap();
            assert!(r.allowed, "request at t={t} should be admitted");
        }

        let rejected = service.check_sliding_window_at("k", 60, 5, 5.0).await.unwrap();
        assert!(!rejected.allowed);
        // oldest=0, window=60, now=5 -> ceil-ish (0+60-5)+1 = 56
        assert_eq!(rejected.retry_after, Some(56));

        let admitted_again = service.check_sliding_window_at("k", 60, 5, 61.0).await.unwrap();
        assert!(admitted_again.allowed);
    }

    #[tokio::test]
    async fn tenant_check_returns_more_restrictive_remaining() {
        let service = svc();
        let req = RateLimitRequest {
            tenant_id: Some("t1"),
            ip: "1.2.3.4",
            path: "/api/v1/iocs",
            plan: Plan::Free,
            is_super_admin: false,
        };
        let result = service.check_rate_limit(&req).await.unwrap();
        assert!(result.allowed);
    }

    #[tokio::test]
    async fn super_admin_bypass_allows_unconditionally() {
        let service = svc();
        let req = RateLimitRequest {
            tenant_id: Some("t1"),
            ip: "1.2.3.4",
            path: "/api/v1/iocs",
            plan: Plan::Free,
            is_super_admin: true,
        };
        let result = service.check_rate_limit(&req).await.unwrap();
        assert!(result.allowed);
        assert_eq!(result.limit, u32::MAX);
    }

    #[tokio::test]
    async fn fail_open_on_store_error() {
        let service = RateLimitService::new(crate::store::test_support::FailingStore, true);
        let req = RateLimitRequest {
            tenant_id: Some("t1"),
            ip: "1.2.3.4",
            path: "/api/v1/iocs",
            plan: Plan::Free,
            is_super_admin: false,
        };
        let outcome = check_rate_limit_fail_open(&service, &req).await;
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn reset_tenant_limits_clears_both_keys() {
        let service = svc();
        service
            .check_sliding_window_at(&tenant_minute_key("t1"), 60, 5, 0.0)
            .await
            .unwrap();
        service.reset_tenant_limits("t1").await.unwrap();
        let (minute, hour) = service.get_tenant_usage("t1").await.unwrap();
        assert_eq!(minute, 0);
        assert_eq!(hour, 0);
    }
}
