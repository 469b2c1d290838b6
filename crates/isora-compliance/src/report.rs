use std::collections::HashMap;

use isora_common::{Framework, Phase};

use crate::evaluator::{ComplianceStatus, FrameworkResult};

#[derive(Debug, Clone)]
pub struct GapEntry {
    pub framework: Framework,
    pub phase: Phase,
    pub control_id: String,
    pub control_name: String,
    pub recommendation: Option<String>,
    pub priority: &'static str,
}

#[derive(Debug, Clone)]
pub struct ComplianceReport {
    pub incident_id: String,
    pub generated_by: String,
    pub frameworks_evaluated: Vec<Framework>,
    pub total_controls: usize,
    pub compliant_count: usize,
    pub partial_count: usize,
    pub gap_count: usize,
    pub overall_score: f64,
    pub gaps: Vec<GapEntry>,
}

/// Flatten per-phase-per-framework results into a single report and
/// recompute aggregate statistics (§4.6's sibling operation for C5).
pub fn generate_compliance_report(
    incident_id: impl Into<String>,
    generated_by: impl Into<String>,
    phase_results: &HashMap<Phase, HashMap<Framework, FrameworkResult>>,
) -> ComplianceReport {
    let mut frameworks_evaluated = Vec::new();
    let mut total_controls = 0;
    let mut compliant_count = 0;
    let mut partial_count = 0;
    let mut gap_count = 0;
    let mut gaps = Vec::new();

    for (phase, framework_results) in phase_results {
        for (framework, result) in framework_results {
            if !frameworks_evaluated.contains(framework) {
                frameworks_evaluated.push(*framework);
            }
            total_controls += result.total_controls;
            compliant_count += result.compliant_count;
            partial_count += result.partial_count;
            gap_count += result.gap_count;

            for check in &result.checks {
                if check.status == ComplianceStatus::Gap {
                    gaps.push(GapEntry {
                        framework: *framework,
                        phase: *phase,
                        control_id: check.control_id.clone(),
                        control_name: check.control_name.clone(),
                        recommendation: check.recommendation.clone(),
                        priority: check.remediation_priority,
                    });
                }
            }
        }
    }

    let overall_score = if total_controls > 0 {
        ((compliant_count as f64 + partial_count as f64 * 0.5) / total_controls as f64 * 100.0 * 10.0).round() / 10.0
    } else {
        0.0
    };

    ComplianceReport {
        incident_id: incident_id.into(),
        generated_by: generated_by.into(),
        frameworks_evaluated,
        total_controls,
        compliant_count,
        partial_count,
        gap_count,
        overall_score,
        gaps,
    }
}
