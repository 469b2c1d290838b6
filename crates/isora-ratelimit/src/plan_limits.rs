use isora_common::Plan;

/// `(per_minute, per_hour)` caps. Closed configuration keyed by plan (§4.8);
/// never a runtime-editable map on the admission path.
pub fn limits_for(plan: Plan) -> (u32, u32) {
    match plan {
        Plan::Free => (30, 500),
        Plan::Pro => (120, 5_000),
        Plan::Enterprise => (600, 50_000),
        Plan::Unlimited => (u32::MAX, u32::MAX),
    }
}

/// Unauthenticated per-IP default (§3.6, §4.8 step 5).
pub const IP_LIMIT_PER_MINUTE: u32 = 20;

pub const WINDOW_MINUTE_SECS: u64 = 60;
pub const WINDOW_HOUR_SECS: u64 = 3600;
