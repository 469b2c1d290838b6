use std::collections::HashSet;
use std::future::Future;

use isora_common::CoreError;

/// One of `owner|admin|manager|lead|member` (§3.1). The token claim itself is
/// an open string; role enforcement narrows to this closed set wherever it
/// actually branches.
pub const ROLES: &[&str] = &["owner", "admin", "manager", "lead", "member"];

/// Per-request tenant identity (§3.1, §4.7). Lives only for the duration of a
/// request; never constructed once and reused across requests.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: String,
    pub user_id: String,
    pub org_role: String,
    pub is_super_admin: bool,
    pub available_tenants: HashSet<String>,
}

impl TenantContext {
    pub fn new(tenant_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        TenantContext {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
            org_role: "member".to_string(),
            is_super_admin: false,
            available_tenants: HashSet::new(),
        }
    }

    /// Apply a requested tenant override via `X-Tenant-ID`. A super admin may
    /// switch to any tenant; a regular member only to one in their
    /// `available_tenants` set (§4.7).
    pub fn with_override(mut self, requested: &str) -> Result<Self, CoreError> {
        if self.is_super_admin || self.available_tenants.contains(requested) {
            self.tenant_id = requested.to_string();
            Ok(self)
        } else {
            Err(CoreError::TenantForbidden {
                requested: requested.to_string(),
            })
        }
    }
}

tokio::task_local! {
    /// Task-local, NOT thread-local (§5, §9): a multiplexed async runtime may
    /// resume unrelated requests on the same worker thread, so thread-local
    /// storage would leak tenant identity across requests. `scope` below is
    /// the only way to populate this for the lifetime of a future.
    static CURRENT: TenantContext;
}

/// Run `fut` with `ctx` bound as the current tenant context. The binding is
/// visible only within `fut` and any task it directly awaits into; it cannot
/// leak to sibling tasks spawned independently.
pub async fn scope<F, T>(ctx: TenantContext, fut: F) -> T
where
    F: Future<Output = T>,
{
    CURRENT.scope(ctx, fut).await
}

/// Read the currently-bound tenant context, or `TenantContextMissing` if none
/// is bound (i.e. called outside of `scope`, or on an excluded path).
pub fn current() -> Result<TenantContext, CoreError> {
    CURRENT
        .try_with(|ctx| ctx.clone())
        .map_err(|_| CoreError::TenantContextMissing)
}

/// Whether a repository equality filter on `tenant_id` should be injected for
/// the currently-bound context (§4.7): unconditionally, unless the caller is
/// a super admin performing a deliberately cross-tenant operation.
pub fn current_filter(allow_cross_tenant: bool) -> Result<Option<String>, CoreError> {
    let ctx = current()?;
    if ctx.is_super_admin && allow_cross_tenant {
        Ok(None)
    } else {
        Ok(Some(ctx.tenant_id))
    }
}
