use thiserror::Error;

/// Closed error taxonomy for the ISORA core. Every subsystem-specific error type
/// (feed adapters, storage, rate limiter) converts into this at the point it
/// crosses into a feature-service boundary so a single mapping function can
/// derive an HTTP status and machine-readable code.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("insufficient role for this operation")]
    InsufficientRole,

    #[error("tenant {requested} is not accessible to this user")]
    TenantForbidden { requested: String },

    #[error("rate limit exceeded")]
    RateLimitExceeded {
        limit: u32,
        retry_after: u64,
        reset_at: i64,
    },

    #[error("request schema invalid: {0}")]
    SchemaInvalid(String),

    #[error("invalid {ioc_type} value: {reason}")]
    IocValueInvalid { ioc_type: String, reason: String },

    #[error("unknown framework: {0}")]
    UnknownFramework(String),

    #[error("unknown IR phase: {0}")]
    UnknownPhase(String),

    #[error("tenant context missing")]
    TenantContextMissing,

    #[error("assessment not found")]
    AssessmentNotFound,

    #[error("control not found: {0}")]
    ControlNotFound(String),

    #[error("no NIS2 notification found for incident {0}")]
    NotificationNotFound(String),

    #[error("scan not found")]
    ScanNotFound,

    #[error("feed authentication failed: {0}")]
    FeedAuthError(String),

    #[error("feed connection failed: {0}")]
    FeedConnectionError(String),

    #[error("feed API error: {0}")]
    FeedApiError(String),

    #[error("failed to parse feed response: {0}")]
    FeedParseError(String),

    #[error("feed rate limited, retry after {retry_after}s")]
    FeedRateLimit { retry_after: u64 },

    #[error("feed configuration error: {0}")]
    FeedConfigError(String),

    #[error("conflicting write")]
    ConflictingWrite,

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Machine-readable error code, stable across releases; always present on a
/// feature-service-level error response per the external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

/// HTTP status mapping. The core exposes only the mapping function; it never
/// serializes an HTTP response itself (router wiring is out of scope).
pub fn http_status(err: &CoreError) -> u16 {
    match err {
        CoreError::Unauthenticated
        | CoreError::InvalidToken
        | CoreError::TokenExpired => 401,
        CoreError::InsufficientRole | CoreError::TenantForbidden { .. } => 403,
        CoreError::RateLimitExceeded { .. } => 429,
        CoreError::SchemaInvalid(_)
        | CoreError::IocValueInvalid { .. }
        | CoreError::UnknownFramework(_)
        | CoreError::UnknownPhase(_) => 400,
        CoreError::TenantContextMissing
        | CoreError::AssessmentNotFound
        | CoreError::ControlNotFound(_)
        | CoreError::NotificationNotFound(_)
        | CoreError::ScanNotFound => 404,
        CoreError::ConflictingWrite => 409,
        CoreError::FeedAuthError(_)
        | CoreError::FeedConnectionError(_)
        | CoreError::FeedApiError(_)
        | CoreError::FeedParseError(_)
        | CoreError::FeedRateLimit { .. }
        | CoreError::FeedConfigError(_) => 502,
        CoreError::StorageUnavailable(_) | CoreError::Internal(_) => 500,
    }
}

pub fn error_code(err: &CoreError) -> ErrorCode {
    ErrorCode(match err {
        CoreError::Unauthenticated => "UNAUTHENTICATED",
        CoreError::InvalidToken => "INVALID_TOKEN",
        CoreError::TokenExpired => "TOKEN_EXPIRED",
        CoreError::InsufficientRole => "INSUFFICIENT_ROLE",
        CoreError::TenantForbidden { .. } => "TENANT_FORBIDDEN",
        CoreError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
        CoreError::SchemaInvalid(_) => "SCHEMA_INVALID",
        CoreError::IocValueInvalid { .. } => "IOC_VALUE_INVALID",
        CoreError::UnknownFramework(_) => "UNKNOWN_FRAMEWORK",
        CoreError::UnknownPhase(_) => "UNKNOWN_PHASE",
        CoreError::TenantContextMissing => "TENANT_CONTEXT_MISSING",
        CoreError::AssessmentNotFound => "ASSESSMENT_NOT_FOUND",
        CoreError::ControlNotFound(_) => "CONTROL_NOT_FOUND",
        CoreError::NotificationNotFound(_) => "NOTIFICATION_NOT_FOUND",
        CoreError::ScanNotFound => "SCAN_NOT_FOUND",
        CoreError::FeedAuthError(_) => "FEED_AUTH_ERROR",
        CoreError::FeedConnectionError(_) => "FEED_CONNECTION_ERROR",
        CoreError::FeedApiError(_) => "FEED_API_ERROR",
        CoreError::FeedParseError(_) => "FEED_PARSE_ERROR",
        CoreError::FeedRateLimit { .. } => "FEED_RATE_LIMIT",
        CoreError::FeedConfigError(_) => "FEED_CONFIG_ERROR",
        CoreError::ConflictingWrite => "CONFLICTING_WRITE",
        CoreError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
        CoreError::Internal(_) => "INTERNAL",
    })
}
