//! NIS2 notification engine (§3.5/§4.6): pure deadline arithmetic plus the
//! three-stage (early warning / incident notification / final report)
//! submission state machine, keyed by incident ID.

pub mod deadlines;
pub mod manager;
pub mod report;
pub mod types;

pub use deadlines::{calculate_deadlines, DeadlineStatus, Deadlines};
pub use manager::{
    EarlyWarning, EarlyWarningInput, FinalReport, FinalReportInput, FullNotification,
    IncidentDeadlines, IncidentNotification, IncidentNotificationInput, NIS2DirectiveManager,
    Notification,
};
pub use report::{export_notification_report, ReportFormat};
pub use types::{
    get_csirt_for_member_state, get_entity_type_for_sector, NIS2ContactPerson, NIS2EntityType,
    NIS2IncidentImpact, NIS2IncidentSeverity, NIS2NotificationStatus, NIS2Sector,
    EU_MEMBER_STATES,
};

/// Static sector reference table (`get_all_sectors`): id, display name, and
/// default entity type for every closed sector.
pub struct SectorInfo {
    pub id: &'static str,
    pub name: String,
    pub entity_type: &'static str,
}

pub fn get_all_sectors() -> Vec<SectorInfo> {
    types::NIS2Sector::ALL
        .iter()
        .map(|sector| SectorInfo {
            id: sector.as_str(),
            name: sector.display_name(),
            entity_type: get_entity_type_for_sector(*sector).as_str(),
        })
        .collect()
}

/// Static member-state reference table (`get_member_states`).
pub fn get_member_states() -> Vec<(&'static str, &'static str, &'static str)> {
    EU_MEMBER_STATES.iter().map(|(code, (name, csirt))| (*code, *name, *csirt)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_all_sectors_covers_all_fifteen() {
        let sectors = get_all_sectors();
        assert_eq!(sectors.len(), 15);
        assert!(sectors.iter().any(|s| s.id == "digital_infrastructure" && s.entity_type == "essential"));
    }

    #[test]
    fn get_member_states_includes_germany() {
        let states = get_member_states();
        assert!(states.iter().any(|(code, name, _)| *code == "DE" && *name == "Germany"));
    }
}
