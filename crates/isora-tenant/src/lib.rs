//! Tenant identity: JWT claim extraction and the task-local context slot that
//! carries tenant identity through a request's lifetime without leaking
//! across tasks multiplexed onto the same worker thread (§4.7, §5, §9).

pub mod context;
pub mod jwt;

pub use context::{current, current_filter, scope, TenantContext};
pub use jwt::{context_from_claims, decode_unchecked, decode_validated, Claims};
