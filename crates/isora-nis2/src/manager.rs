use chrono::{DateTime, Utc};
use dashmap::DashMap;
use isora_common::CoreError;
use serde::Serialize;
use uuid::Uuid;

use crate::deadlines::{calculate_deadlines, deadline_status, DeadlineStatus};
use crate::types::{
    NIS2ContactPerson, NIS2EntityType, NIS2IncidentImpact, NIS2IncidentSeverity,
    NIS2NotificationStatus, NIS2Sector,
};

fn generate_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", hex[..12].to_uppercase())
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub notification_id: String,
    pub incident_id: String,
    pub entity_type: NIS2EntityType,
    pub sector: NIS2Sector,
    pub organization_name: String,
    pub member_state: String,
    pub detection_time: DateTime<Utc>,
    pub early_warning_deadline: DateTime<Utc>,
    pub notification_deadline: DateTime<Utc>,
    pub final_report_deadline: DateTime<Utc>,
    pub primary_contact: NIS2ContactPerson,
    pub technical_contact: Option<NIS2ContactPerson>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EarlyWarning {
    pub warning_id: String,
    pub notification_id: String,
    pub incident_id: String,
    pub submitted_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub suspected_cause: Option<String>,
    pub cross_border_suspected: bool,
    pub initial_assessment: String,
    pub status: NIS2NotificationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncidentNotification {
    pub notification_id: String,
    pub parent_notification_id: String,
    pub incident_id: String,
    pub early_warning_id: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub incident_description: String,
    pub severity: NIS2IncidentSeverity,
    pub incident_type: String,
    pub root_cause_preliminary: Option<String>,
    pub impact: NIS2IncidentImpact,
    pub mitigation_measures: Vec<String>,
    pub containment_status: String,
    pub status: NIS2NotificationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalReport {
    pub report_id: String,
    pub notification_id: String,
    pub incident_id: String,
    pub incident_notification_id: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub incident_description: String,
    pub root_cause_analysis: String,
    pub threat_type: String,
    pub attack_techniques: Vec<String>,
    pub total_impact_assessment: String,
    pub services_affected: Vec<String>,
    pub recovery_time_hours: Option<f64>,
    pub lessons_learned: String,
    pub preventive_measures: Vec<String>,
    pub security_improvements: Vec<String>,
    pub other_csirts_notified: Vec<String>,
    pub enisa_notified: bool,
    pub status: NIS2NotificationStatus,
}

/// Everything known about an incident's NIS2 notification, joined (`get_notification`).
#[derive(Debug, Clone, Serialize)]
pub struct FullNotification {
    pub notification: Notification,
    pub early_warning: Option<EarlyWarning>,
    pub incident_notification: Option<IncidentNotification>,
    pub final_report: Option<FinalReport>,
}

/// Deadline status for all three stages of one incident (`get_deadlines`).
#[derive(Debug, Clone)]
pub struct IncidentDeadlines {
    pub early_warning: DeadlineStatus,
    pub notification: DeadlineStatus,
    pub final_report: DeadlineStatus,
}

pub struct EarlyWarningInput {
    pub suspected_cause: Option<String>,
    pub cross_border_suspected: bool,
    pub initial_assessment: String,
}

pub struct IncidentNotificationInput {
    pub incident_description: String,
    pub severity: NIS2IncidentSeverity,
    pub incident_type: String,
    pub impact: NIS2IncidentImpact,
    pub mitigation_measures: Vec<String>,
    pub containment_status: String,
    pub root_cause_preliminary: Option<String>,
}

pub struct FinalReportInput {
    pub incident_description: String,
    pub root_cause_analysis: String,
    pub threat_type: String,
    pub attack_techniques: Vec<String>,
    pub total_impact_assessment: String,
    pub services_affected: Vec<String>,
    pub lessons_learned: String,
    pub preventive_measures: Vec<String>,
    pub security_improvements: Vec<String>,
    pub recovery_time_hours: Option<f64>,
    pub other_csirts_notified: Vec<String>,
    pub enisa_notified: bool,
}

/// In-memory NIS2 notification state machine, keyed by incident ID. A real
/// deployment would back this with tenant-scoped storage; this core models
/// only the state-machine semantics.
#[derive(Debug, Default)]
pub struct NIS2DirectiveManager {
    notifications: DashMap<String, Notification>,
    early_warnings: DashMap<String, EarlyWarning>,
    incident_notifications: DashMap<String, IncidentNotification>,
    final_reports: DashMap<String, FinalReport>,
}

impl NIS2DirectiveManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_notification(
        &self,
        incident_id: impl Into<String>,
        entity_type: NIS2EntityType,
        sector: NIS2Sector,
        organization_name: impl Into<String>,
        member_state: impl Into<String>,
        detection_time: DateTime<Utc>,
        primary_contact: NIS2ContactPerson,
        technical_contact: Option<NIS2ContactPerson>,
    ) -> Notification {
        let incident_id = incident_id.into();
        let deadlines = calculate_deadlines(detection_time);

        let notification = Notification {
            notification_id: generate_id("NIS2"),
            incident_id: incident_id.clone(),
            entity_type,
            sector,
            organization_name: organization_name.into(),
            member_state: member_state.into(),
            detection_time,
            early_warning_deadline: deadlines.early_warning,
            notification_deadline: deadlines.notification,
            final_report_deadline: deadlines.final_report,
            primary_contact,
            technical_contact,
            created_at: Utc::now(),
        };

        log::info!("NIS2 notification {} created for incident {}", notification.notification_id, notification.incident_id);
        self.notifications.insert(incident_id, notification.clone());
        notification
    }

    /// Submits or resubmits the early warning. A second call for the same
    /// incident overwrites the stored warning rather than erroring.
    pub fn submit_early_warning(&self, incident_id: &str, input: EarlyWarningInput) -> Result<EarlyWarning, CoreError> {
        let notification = self.notifications.get(incident_id).ok_or_else(|| {
            log::warn!("early warning submitted for unknown incident {incident_id}");
            CoreError::NotificationNotFound(incident_id.to_string())
        })?;

        let warning = EarlyWarning {
            warning_id: generate_id("EW"),
            notification_id: notification.notification_id.clone(),
            incident_id: incident_id.to_string(),
            submitted_at: Utc::now(),
            deadline: notification.early_warning_deadline,
            suspected_cause: input.suspected_cause,
            cross_border_suspected: input.cross_border_suspected,
            initial_assessment: input.initial_assessment,
            status: NIS2NotificationStatus::Submitted,
        };

        self.early_warnings.insert(incident_id.to_string(), warning.clone());
        Ok(warning)
    }

    /// Requires the parent notification; the early warning is an optional
    /// predecessor recorded by ID if present.
    pub fn submit_incident_notification(
        &self,
        incident_id: &str,
        input: IncidentNotificationInput,
    ) -> Result<IncidentNotification, CoreError> {
        let notification = self
            .notifications
            .get(incident_id)
            .ok_or_else(|| CoreError::NotificationNotFound(incident_id.to_string()))?;

        let early_warning_id = self.early_warnings.get(incident_id).map(|ew| ew.warning_id.clone());

        let record = IncidentNotification {
            notification_id: generate_id("IN"),
            parent_notification_id: notification.notification_id.clone(),
            incident_id: incident_id.to_string(),
            early_warning_id,
            submitted_at: Utc::now(),
            deadline: notification.notification_deadline,
            incident_description: input.incident_description,
            severity: input.severity,
            incident_type: input.incident_type,
            root_cause_preliminary: input.root_cause_preliminary,
            impact: input.impact,
            mitigation_measures: input.mitigation_measures,
            containment_status: input.containment_status,
            status: NIS2NotificationStatus::Submitted,
        };

        self.incident_notifications.insert(incident_id.to_string(), record.clone());
        Ok(record)
    }

    /// Requires the parent notification; the incident notification is an
    /// optional predecessor recorded by ID if present.
    pub fn submit_final_report(&self, incident_id: &str, input: FinalReportInput) -> Result<FinalReport, CoreError> {
        let notification = self
            .notifications
            .get(incident_id)
            .ok_or_else(|| CoreError::NotificationNotFound(incident_id.to_string()))?;

        let incident_notification_id = self.incident_notifications.get(incident_id).map(|n| n.notification_id.clone());

        let report = FinalReport {
            report_id: generate_id("FR"),
            notification_id: notification.notification_id.clone(),
            incident_id: incident_id.to_string(),
            incident_notification_id,
            submitted_at: Utc::now(),
            deadline: notification.final_report_deadline,
            incident_description: input.incident_description,
            root_cause_analysis: input.root_cause_analysis,
            threat_type: input.threat_type,
            attack_techniques: input.attack_techniques,
            total_impact_assessment: input.total_impact_assessment,
            services_affected: input.services_affected,
            recovery_time_hours: input.recovery_time_hours,
            lessons_learned: input.lessons_learned,
            preventive_measures: input.preventive_measures,
            security_improvements: input.security_improvements,
            other_csirts_notified: input.other_csirts_notified,
            enisa_notified: input.enisa_notified,
            status: NIS2NotificationStatus::Submitted,
        };

        self.final_reports.insert(incident_id.to_string(), report.clone());
        Ok(report)
    }

    pub fn get_notification(&self, incident_id: &str) -> Option<FullNotification> {
        let notification = self.notifications.get(incident_id)?.value().clone();
        Some(FullNotification {
            notification,
            early_warning: self.early_warnings.get(incident_id).map(|r| r.value().clone()),
            incident_notification: self.incident_notifications.get(incident_id).map(|r| r.value().clone()),
            final_report: self.final_reports.get(incident_id).map(|r| r.value().clone()),
        })
    }

    pub fn get_deadlines(&self, incident_id: &str) -> Option<IncidentDeadlines> {
        let notification = self.notifications.get(incident_id)?;
        let now = Utc::now();

        Some(IncidentDeadlines {
            early_warning: deadline_status(
                notification.early_warning_deadline,
                self.early_warnings.contains_key(incident_id),
                now,
            ),
            notification: deadline_status(
                notification.notification_deadline,
                self.incident_notifications.contains_key(incident_id),
                now,
            ),
            final_report: deadline_status(
                notification.final_report_deadline,
                self.final_reports.contains_key(incident_id),
                now,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn contact() -> NIS2ContactPerson {
        NIS2ContactPerson {
            name: "Max Mustermann".to_string(),
            email: "max@example.de".to_string(),
            phone: "+49 123 456789".to_string(),
            role: "CISO".to_string(),
        }
    }

    fn impact() -> NIS2IncidentImpact {
        NIS2IncidentImpact {
            affected_users: Some(100),
            affected_services: vec!["email".to_string()],
            geographic_scope: "national".to_string(),
            economic_impact: "significant".to_string(),
        }
    }

    #[test]
    fn create_notification_assigns_prefixed_id_and_deadlines() {
        let manager = NIS2DirectiveManager::new();
        let detection = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let notification = manager.create_notification(
            "inc-1",
            NIS2EntityType::Essential,
            NIS2Sector::DigitalInfrastructure,
            "Test GmbH",
            "DE",
            detection,
            contact(),
            None,
        );

        assert!(notification.notification_id.starts_with("NIS2-"));
        assert_eq!(notification.notification_id.len(), "NIS2-".len() + 12);
        assert_eq!(notification.early_warning_deadline, detection + chrono::Duration::hours(24));
    }

    #[test]
    fn submit_without_parent_notification_fails() {
        let manager = NIS2DirectiveManager::new();
        let result = manager.submit_early_warning(
            "missing",
            EarlyWarningInput {
                suspected_cause: None,
                cross_border_suspected: false,
                initial_assessment: String::new(),
            },
        );
        assert!(matches!(result, Err(CoreError::NotificationNotFound(id)) if id == "missing"));
    }

    #[test]
    fn resubmitting_early_warning_overwrites_rather_than_errors() {
        let manager = NIS2DirectiveManager::new();
        manager.create_notification(
            "inc-2",
            NIS2EntityType::Essential,
            NIS2Sector::DigitalInfrastructure,
            "Test GmbH",
            "DE",
            Utc::now(),
            contact(),
            None,
        );

        let first = manager
            .submit_early_warning(
                "inc-2",
                EarlyWarningInput {
                    suspected_cause: Some("malicious".to_string()),
                    cross_border_suspected: false,
                    initial_assessment: "first pass".to_string(),
                },
            )
            .unwrap();
        let second = manager
            .submit_early_warning(
                "inc-2",
                EarlyWarningInput {
                    suspected_cause: Some("malicious".to_string()),
                    cross_border_suspected: true,
                    initial_assessment: "revised".to_string(),
                },
            )
            .unwrap();

        assert_ne!(first.warning_id, second.warning_id);
        assert_eq!(manager.get_notification("inc-2").unwrap().early_warning.unwrap().warning_id, second.warning_id);
    }

    #[test]
    fn incident_notification_records_early_warning_as_optional_predecessor() {
        let manager = NIS2DirectiveManager::new();
        manager.create_notification(
            "inc-3",
            NIS2EntityType::Essential,
            NIS2Sector::DigitalInfrastructure,
            "Test GmbH",
            "DE",
            Utc::now(),
            contact(),
            None,
        );

        let without_warning = manager
            .submit_incident_notification(
                "inc-3",
                IncidentNotificationInput {
                    incident_description: "desc".to_string(),
                    severity: NIS2IncidentSeverity::Significant,
                    incident_type: "ransomware".to_string(),
                    impact: impact(),
                    mitigation_measures: vec!["isolated hosts".to_string()],
                    containment_status: "ongoing".to_string(),
                    root_cause_preliminary: None,
                },
            )
            .unwrap();
        assert_eq!(without_warning.early_warning_id, None);

        let warning = manager
            .submit_early_warning(
                "inc-3",
                EarlyWarningInput {
                    suspected_cause: None,
                    cross_border_suspected: false,
                    initial_assessment: String::new(),
                },
            )
            .unwrap();
        let with_warning = manager
            .submit_incident_notification(
                "inc-3",
                IncidentNotificationInput {
                    incident_description: "desc".to_string(),
                    severity: NIS2IncidentSeverity::Significant,
                    incident_type: "ransomware".to_string(),
                    impact: impact(),
                    mitigation_measures: vec![],
                    containment_status: "ongoing".to_string(),
                    root_cause_preliminary: None,
                },
            )
            .unwrap();
        assert_eq!(with_warning.early_warning_id, Some(warning.warning_id));
    }

    #[test]
    fn get_deadlines_reports_submitted_stage_with_no_remaining_duration() {
        let manager = NIS2DirectiveManager::new();
        manager.create_notification(
            "inc-4",
            NIS2EntityType::Essential,
            NIS2Sector::DigitalInfrastructure,
            "Test GmbH",
            "DE",
            Utc::now(),
            contact(),
            None,
        );
        manager
            .submit_early_warning(
                "inc-4",
                EarlyWarningInput {
                    suspected_cause: None,
                    cross_border_suspected: false,
                    initial_assessment: String::new(),
                },
            )
            .unwrap();

        let deadlines = manager.get_deadlines("inc-4").unwrap();
        assert!(deadlines.early_warning.submitted);
        assert_eq!(deadlines.early_warning.remaining_hours, None);
        assert!(!deadlines.notification.submitted);
    }
}
