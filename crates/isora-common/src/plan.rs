use serde::{Deserialize, Serialize};

/// Organization subscription plan. Closed enum backing the rate limiter's
/// plan→limits table (§4.8); never a free-form string on the admission path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Free,
    Pro,
    Enterprise,
    Unlimited,
}

impl Plan {
    pub fn from_str_or_free(s: &str) -> Plan {
        match s {
            "pro" => Plan::Pro,
            "enterprise" => Plan::Enterprise,
            "unlimited" => Plan::Unlimited,
            _ => Plan::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Enterprise => "enterprise",
            Plan::Unlimited => "unlimited",
        }
    }
}

impl Default for Plan {
    fn default() -> Self {
        Plan::Free
    }
}
