use chrono::{DateTime, Duration, Utc};

/// The three authoritative deadlines derived from detection time (§3.5):
/// early warning at +24h, notification at +72h, final report at +30d.
#[derive(Debug, Clone, Copy)]
pub struct Deadlines {
    pub early_warning: DateTime<Utc>,
    pub notification: DateTime<Utc>,
    pub final_report: DateTime<Utc>,
}

/// Pure function of `detection_time`; deadlines never move once a
/// notification is created, regardless of what gets submitted later.
pub fn calculate_deadlines(detection_time: DateTime<Utc>) -> Deadlines {
    Deadlines {
        early_warning: detection_time + Duration::hours(24),
        notification: detection_time + Duration::hours(72),
        final_report: detection_time + Duration::days(30),
    }
}

/// Status of a single deadline stage as returned by `get_deadlines`.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineStatus {
    pub deadline: DateTime<Utc>,
    pub submitted: bool,
    pub overdue: bool,
    /// `None` once submitted; otherwise the clamped-to-zero remaining duration.
    pub remaining_hours: Option<f64>,
}

pub(crate) fn deadline_status(deadline: DateTime<Utc>, submitted: bool, now: DateTime<Utc>) -> DeadlineStatus {
    let remaining_hours = if submitted {
        None
    } else {
        let hours = (deadline - now).num_milliseconds() as f64 / 3_600_000.0;
        Some(hours.max(0.0))
    };

    DeadlineStatus {
        deadline,
        submitted,
        overdue: now > deadline && !submitted,
        remaining_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn seed_test_3_nis2_deadlines() {
        let detection = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let deadlines = calculate_deadlines(detection);

        assert_eq!(deadlines.early_warning, Utc.with_ymd_and_hms(2024, 6, 2, 10, 0, 0).unwrap());
        assert_eq!(deadlines.notification, Utc.with_ymd_and_hms(2024, 6, 4, 10, 0, 0).unwrap());
        assert_eq!(deadlines.final_report, Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn seed_test_3_overdue_with_no_submission() {
        let detection = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let deadlines = calculate_deadlines(detection);
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 11, 0, 0).unwrap();

        let status = deadline_status(deadlines.early_warning, false, now);
        assert!(status.overdue);
        assert_eq!(status.remaining_hours, Some(0.0));
    }

    #[test]
    fn submitted_stage_has_no_remaining_duration() {
        let deadline = Utc.with_ymd_and_hms(2024, 6, 2, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let status = deadline_status(deadline, true, now);
        assert!(!status.overdue);
        assert_eq!(status.remaining_hours, None);
    }
}
