use std::future::Future;

use isora_tenant::{context_from_claims, decode_unchecked, scope, TenantContext};

/// Paths excluded from tenant-context binding entirely (§4.9 step 3): health
/// checks, docs, and auth endpoints never need a bound tenant.
const EXCLUDED_PATHS: &[&str] = &["/health", "/healthz", "/docs", "/openapi.json"];
const EXCLUDED_PREFIXES: &[&str] = &["/api/v1/auth/sso/"];

pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_PATHS.contains(&path) || EXCLUDED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Runs `fut` with a best-effort `TenantContext` bound for its duration
/// (§4.9 step 3), unless `path` is excluded or no context can be built from
/// the token. Binding is removed on every exit path by construction: `scope`
/// only holds the task-local for the lifetime of `fut`.
pub async fn bind_tenant_context<F, T>(
    path: &str,
    bearer_token: Option<&str>,
    jwt_secret: &str,
    header_tenant_override: Option<&str>,
    fut: F,
) -> T
where
    F: Future<Output = T>,
{
    if is_excluded(path) {
        return fut.await;
    }

    let ctx = bearer_token
        .and_then(|tok| decode_unchecked(tok, jwt_secret))
        .and_then(|claims| context_from_claims(&claims, header_tenant_override));

    match ctx {
        Some(ctx) => scope(ctx, fut).await,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isora_tenant::current;

    #[tokio::test]
    async fn excluded_path_never_binds_a_context() {
        let result = bind_tenant_context("/health", None, "secret", None, async {
            current().is_ok()
        })
        .await;
        assert!(!result);
    }

    #[tokio::test]
    async fn excluded_sso_prefix_never_binds_a_context() {
        let result = bind_tenant_context("/api/v1/auth/sso/callback", None, "secret", None, async {
            current().is_ok()
        })
        .await;
        assert!(!result);
    }

    #[tokio::test]
    async fn missing_token_proceeds_without_binding() {
        let result = bind_tenant_context("/api/v1/iocs", None, "secret", None, async { current().is_ok() }).await;
        assert!(!result);
    }

    #[tokio::test]
    async fn context_not_visible_after_scope_exits() {
        bind_tenant_context("/api/v1/iocs", None, "secret", None, async {}).await;
        assert!(current().is_err());
    }
}
