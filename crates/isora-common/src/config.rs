use std::env;
use std::time::Duration;

/// Process-wide configuration (§6.3). A single closed struct populated from
/// the environment; no string-keyed bag reaches the core path.
#[derive(Debug, Clone)]
pub struct Settings {
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub jwt_expiration_hours: u64,
    pub jwt_refresh_expiration_days: u64,

    pub database_url: String,
    pub redis_url: String,

    pub cors_origins: Vec<String>,

    pub rate_limit_enabled: bool,
    pub rate_limit_bypass_super_admin: bool,

    pub nvd_api_key: Option<String>,

    pub feed_sync_interval: Duration,
    pub feed_sync_max_retries: u32,
    pub feed_sync_all_max_retries: u32,

    pub enrichment_cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            jwt_secret: String::new(),
            jwt_algorithm: "HS256".to_string(),
            jwt_expiration_hours: 1,
            jwt_refresh_expiration_days: 30,
            database_url: String::new(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            cors_origins: Vec::new(),
            rate_limit_enabled: true,
            rate_limit_bypass_super_admin: true,
            nvd_api_key: None,
            feed_sync_interval: Duration::from_secs(3600),
            feed_sync_max_retries: 3,
            feed_sync_all_max_retries: 2,
            enrichment_cache_ttl: Duration::from_secs(86_400),
        }
    }
}

impl Settings {
    /// Load settings from the environment, falling back to defaults for
    /// anything unset: an explicit `Default` overlaid with explicit env
    /// reads, never a generic deserialize-from-map.
    pub fn from_env() -> Settings {
        let mut settings = Settings::default();

        if let Ok(v) = env::var("JWT_SECRET") {
            settings.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_ALGORITHM") {
            settings.jwt_algorithm = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRATION_HOURS") {
            if let Ok(n) = v.parse() {
                settings.jwt_expiration_hours = n;
            }
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRATION_DAYS") {
            if let Ok(n) = v.parse() {
                settings.jwt_refresh_expiration_days = n;
            }
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            settings.database_url = v;
        }
        if let Ok(v) = env::var("REDIS_URL") {
            settings.redis_url = v;
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            settings.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("RATE_LIMIT_ENABLED") {
            settings.rate_limit_enabled = parse_bool(&v, settings.rate_limit_enabled);
        }
        if let Ok(v) = env::var("RATE_LIMIT_BYPASS_SUPER_ADMIN") {
            settings.rate_limit_bypass_super_admin =
                parse_bool(&v, settings.rate_limit_bypass_super_admin);
        }
        if let Ok(v) = env::var("NVD_API_KEY") {
            settings.nvd_api_key = Some(v);
        }
        if let Ok(v) = env::var("FEED_SYNC_INTERVAL_SECONDS") {
            if let Ok(n) = v.parse() {
                settings.feed_sync_interval = Duration::from_secs(n);
            }
        }
        if let Ok(v) = env::var("FEED_SYNC_MAX_RETRIES") {
            if let Ok(n) = v.parse() {
                settings.feed_sync_max_retries = n;
            }
        }
        if let Ok(v) = env::var("FEED_SYNC_ALL_MAX_RETRIES") {
            if let Ok(n) = v.parse() {
                settings.feed_sync_all_max_retries = n;
            }
        }
        if let Ok(v) = env::var("ENRICHMENT_CACHE_TTL_SECONDS") {
            if let Ok(n) = v.parse() {
                settings.enrichment_cache_ttl = Duration::from_secs(n);
            }
        }

        settings
    }
}

fn parse_bool(v: &str, default: bool) -> bool {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Excluded paths that bypass tenant-context binding and rate limiting
/// entirely (§4.9 step 3).
pub const EXCLUDED_PATHS: &[&str] = &[
    "/health",
    "/",
    "/api/docs",
    "/api/redoc",
    "/api/openapi.json",
    "/api/v1/auth/login",
    "/api/v1/auth/register",
    "/api/v1/auth/refresh",
    "/api/v1/auth/sso",
];

pub const EXCLUDED_PREFIXES: &[&str] = &["/api/v1/auth/sso/"];

pub fn is_path_excluded(path: &str) -> bool {
    EXCLUDED_PATHS.contains(&path) || EXCLUDED_PREFIXES.iter().any(|p| path.starts_with(p))
}
