use std::collections::HashMap;
use std::future::Future;

use isora_common::Plan;
use isora_ratelimit::{check_rate_limit_fail_open, client_ip, RateLimitRequest, RateLimitService, RateLimitStore};
use isora_tenant::{decode_unchecked, Claims};

/// Everything the gate needs, assembled by the caller from the incoming
/// request (§4.9 step 2).
pub struct GateRequest<'a> {
    pub forwarded_for: Option<&'a str>,
    pub real_ip: Option<&'a str>,
    pub peer: Option<&'a str>,
    pub path: &'a str,
    pub bearer_token: Option<&'a str>,
    pub jwt_secret: &'a str,
}

#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub allowed: bool,
    pub headers: HashMap<&'static str, String>,
    /// Best-effort tenant ID from the unchecked token, if any, for downstream
    /// logging; never an authorization decision.
    pub tenant_id: Option<String>,
}

fn fail_open(tenant_id: Option<String>) -> GateOutcome {
    GateOutcome {
        allowed: true,
        headers: HashMap::new(),
        tenant_id,
    }
}

/// The rate-limit stage of the pipeline (§4.9 step 2): extracts client IP,
/// best-effort-decodes the token, looks up plan, consults the limiter, and
/// attaches headers. Wrapped in its own top-level fail-open guard — any
/// unexpected error anywhere in this stage (token decode, store error, plan
/// lookup) results in the request proceeding unimpeded with no headers
/// attached, logged at `error` level. Never a user-visible failure.
pub async fn rate_limit_gate<S, F, Fut>(
    service: &RateLimitService<S>,
    req: &GateRequest<'_>,
    db_plan_lookup: F,
) -> GateOutcome
where
    S: RateLimitStore,
    F: FnOnce(&str) -> Fut,
    Fut: Future<Output = Option<Plan>>,
{
    let ip = client_ip(req.forwarded_for, req.real_ip, req.peer);

    let claims: Option<Claims> = req.bearer_token.and_then(|tok| decode_unchecked(tok, req.jwt_secret));
    let tenant_id = claims.as_ref().and_then(|c| c.tenant_id.clone());
    let is_super_admin = claims.as_ref().map(|c| c.is_super_admin).unwrap_or(false);

    let plan = match &tenant_id {
        Some(tid) => match service.tenant_plan(tid, || db_plan_lookup(tid)).await {
            Ok(plan) => plan,
            Err(e) => {
                log::error!("rate limit plan lookup failed, failing open: {e}");
                return fail_open(tenant_id);
            }
        },
        None => Plan::Free,
    };

    let rl_request = RateLimitRequest {
        tenant_id: tenant_id.as_deref(),
        ip: &ip,
        path: req.path,
        plan,
        is_super_admin,
    };

    match check_rate_limit_fail_open(service, &rl_request).await {
        Some(result) => GateOutcome {
            allowed: result.allowed,
            headers: result.headers(),
            tenant_id,
        },
        None => fail_open(tenant_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use isora_ratelimit::StoreError;
    use std::collections::BTreeMap;
    use tokio::sync::Mutex;

    /// Minimal in-process sorted-set double, local to this crate's tests
    /// (isora-ratelimit's own equivalent fixture is private to its crate).
    #[derive(Default)]
    struct InMemoryStore {
        sets: Mutex<std::collections::HashMap<String, BTreeMap<String, f64>>>,
        strings: Mutex<std::collections::HashMap<String, String>>,
    }

    #[async_trait]
    impl RateLimitStore for InMemoryStore {
        async fn trim(&self, key: &str, cutoff: f64) -> Result<(), StoreError> {
            let mut sets = self.sets.lock().await;
            if let Some(set) = sets.get_mut(key) {
                set.retain(|_, score| *score >= cutoff);
            }
            Ok(())
        }
        async fn count(&self, key: &str) -> Result<u64, StoreError> {
            let sets = self.sets.lock().await;
            Ok(sets.get(key).map(|s| s.len() as u64).unwrap_or(0))
        }
        async fn oldest_score(&self, key: &str) -> Result<Option<f64>, StoreError> {
            let sets = self.sets.lock().await;
            Ok(sets.get(key).and_then(|s| s.values().cloned().fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))))
        }
        async fn add(&self, key: &str, score: f64, member: &str) -> Result<(), StoreError> {
            let mut sets = self.sets.lock().await;
            sets.entry(key.to_string()).or_default().insert(member.to_string(), score);
            Ok(())
        }
        async fn expire(&self, _key: &str, _seconds: u64) -> Result<(), StoreError> {
            Ok(())
        }
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.strings.lock().await.get(key).cloned())
        }
        async fn setex(&self, key: &str, _seconds: u64, value: &str) -> Result<(), StoreError> {
            self.strings.lock().await.insert(key.to_string(), value.to_string());
            Ok(())
        }
        async fn del(&self, key: &str) -> Result<(), StoreError> {
            self.sets.lock().await.remove(key);
            Ok(())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl RateLimitStore for FailingStore {
        async fn trim(&self, _key: &str, _cutoff: f64) -> Result<(), StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn count(&self, _key: &str) -> Result<u64, StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn oldest_score(&self, _key: &str) -> Result<Option<f64>, StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn add(&self, _key: &str, _score: f64, _member: &str) -> Result<(), StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn expire(&self, _key: &str, _seconds: u64) -> Result<(), StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn setex(&self, _key: &str, _seconds: u64, _value: &str) -> Result<(), StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn del(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError("simulated outage".into()))
        }
    }

    fn gate_req<'a>(token: Option<&'a str>) -> GateRequest<'a> {
        GateRequest {
            forwarded_for: Some("1.2.3.4"),
            real_ip: None,
            peer: None,
            path: "/api/v1/iocs",
            bearer_token: token,
            jwt_secret: "secret",
        }
    }

    #[tokio::test]
    async fn unauthenticated_request_is_admitted_under_ip_cap() {
        let service = RateLimitService::new(InMemoryStore::default(), true);
        let outcome = rate_limit_gate(&service, &gate_req(None), |_| async { None }).await;
        assert!(outcome.allowed);
        assert!(outcome.headers.contains_key("X-RateLimit-Limit"));
        assert_eq!(outcome.tenant_id, None);
    }

    #[tokio::test]
    async fn store_failure_fails_open_with_no_headers() {
        let service = RateLimitService::new(FailingStore, true);
        let outcome = rate_limit_gate(&service, &gate_req(None), |_| async { None }).await;
        assert!(outcome.allowed);
        assert!(outcome.headers.is_empty());
    }
}
