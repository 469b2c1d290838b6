use serde::Serialize;

use crate::manager::FullNotification;
use crate::types::EU_MEMBER_STATES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
}

/// Renders a joined notification record as Markdown or JSON.
pub fn export_notification_report(full: &FullNotification, format: ReportFormat) -> String {
    match format {
        ReportFormat::Json => export_json(full),
        ReportFormat::Markdown => export_markdown(full),
    }
}

fn export_markdown(full: &FullNotification) -> String {
    let n = &full.notification;
    let member_state_name = EU_MEMBER_STATES.get(n.member_state.as_str()).map(|(name, _)| *name).unwrap_or(n.member_state.as_str());

    let mut out = String::new();
    out.push_str("# NIS2 Notification Report\n\n");
    out.push_str(&format!("**Incident ID:** {}\n", n.incident_id));
    out.push_str(&format!("**Organization:** {}\n", n.organization_name));
    out.push_str(&format!("**Member State:** {}\n", member_state_name));
    out.push_str(&format!("**Sector:** {}\n", n.sector.as_str()));
    out.push_str(&format!("**Entity Type:** {}\n\n", n.entity_type.as_str()));

    out.push_str("## Deadlines\n\n");
    out.push_str(&format!("- Early Warning (24h): {}\n", n.early_warning_deadline.to_rfc3339()));
    out.push_str(&format!("- Notification (72h): {}\n", n.notification_deadline.to_rfc3339()));
    out.push_str(&format!("- Final Report (30d): {}\n\n", n.final_report_deadline.to_rfc3339()));

    if let Some(ew) = &full.early_warning {
        out.push_str("## Early Warning\n\n");
        out.push_str(&format!("**Status:** {}\n", ew.status.as_str()));
        out.push_str(&format!("**Submitted:** {}\n", ew.submitted_at.to_rfc3339()));
        out.push_str(&format!("**Suspected Cause:** {}\n", ew.suspected_cause.as_deref().unwrap_or("Unknown")));
        out.push_str(&format!("**Cross-border:** {}\n\n", if ew.cross_border_suspected { "Yes" } else { "No" }));
    }

    if let Some(inn) = &full.incident_notification {
        out.push_str("## Incident Notification\n\n");
        out.push_str(&format!("**Status:** {}\n", inn.status.as_str()));
        out.push_str(&format!("**Submitted:** {}\n", inn.submitted_at.to_rfc3339()));
        out.push_str(&format!("**Severity:** {}\n", inn.severity.as_str()));
        out.push_str(&format!("**Type:** {}\n\n", inn.incident_type));
        out.push_str(&format!("### Description\n{}\n\n", inn.incident_description));
    }

    if let Some(fr) = &full.final_report {
        out.push_str("## Final Report\n\n");
        out.push_str(&format!("**Status:** {}\n", fr.status.as_str()));
        out.push_str(&format!("**Submitted:** {}\n\n", fr.submitted_at.to_rfc3339()));
        out.push_str(&format!("### Root Cause Analysis\n{}\n\n", fr.root_cause_analysis));
        out.push_str(&format!("### Lessons Learned\n{}\n\n", fr.lessons_learned));
    }

    out
}

#[derive(Serialize)]
struct NotificationReportJson<'a> {
    incident_id: &'a str,
    notification_id: &'a str,
    organization_name: &'a str,
    member_state: &'a str,
    sector: &'static str,
    entity_type: &'static str,
    early_warning_submitted: bool,
    incident_notification_submitted: bool,
    final_report_submitted: bool,
}

fn export_json(full: &FullNotification) -> String {
    let n = &full.notification;
    let report = NotificationReportJson {
        incident_id: &n.incident_id,
        notification_id: &n.notification_id,
        organization_name: &n.organization_name,
        member_state: &n.member_state,
        sector: n.sector.as_str(),
        entity_type: n.entity_type.as_str(),
        early_warning_submitted: full.early_warning.is_some(),
        incident_notification_submitted: full.incident_notification.is_some(),
        final_report_submitted: full.final_report.is_some(),
    };
    serde_json::to_string_pretty(&report).expect("notification report fields are always serializable")
}
