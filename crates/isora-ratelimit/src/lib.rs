//! Sliding-window admission control (§4.8) over an external sorted-set
//! key-value store, with a fail-open guarantee on any store error.

pub mod plan_limits;
pub mod service;
pub mod store;

pub use service::{check_rate_limit_fail_open, RateLimitRequest, RateLimitResult, RateLimitService};
pub use store::{RateLimitStore, RedisStore, StoreError};

/// Extract client IP per §4.9 step 2: prefer the leftmost `X-Forwarded-For`
/// entry, then `X-Real-IP`, then the direct peer address, else the literal
/// `"unknown"`.
pub fn client_ip(forwarded_for: Option<&str>, real_ip: Option<&str>, peer: Option<&str>) -> String {
    if let Some(ff) = forwarded_for {
        if let Some(first) = ff.split(',').next() {
            let trimmed = first.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    if let Some(ip) = real_ip {
        if !ip.trim().is_empty() {
            return ip.trim().to_string();
        }
    }
    if let Some(ip) = peer {
        return ip.to_string();
    }
    "unknown".to_string()
}

#[cfg(test)]
mod client_ip_tests {
    use super::client_ip;

    #[test]
    fn prefers_forwarded_for_leftmost() {
        assert_eq!(
            client_ip(Some("1.1.1.1, 2.2.2.2"), Some("3.3.3.3"), Some("4.4.4.4")),
            "1.1.1.1"
        );
    }

    #[test]
    fn falls_back_to_real_ip() {
        assert_eq!(client_ip(None, Some("3.3.3.3"), Some("4.4.4.4")), "3.3.3.3");
    }

    #[test]
    fn falls_back_to_peer_then_unknown() {
        assert_eq!(client_ip(None, None, Some("4.4.4.4")), "4.4.4.4");
        assert_eq!(client_ip(None, None, None), "unknown");
    }
}
