use std::collections::HashMap;

use isora_common::{Framework, Phase};

use crate::catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceStatus {
    Compliant,
    Partial,
    Gap,
    NotEvaluated,
}

#[derive(Debug, Clone)]
pub struct ComplianceCheck {
    pub control_id: String,
    pub control_name: String,
    pub status: ComplianceStatus,
    pub evidence_provided: Vec<String>,
    pub recommendation: Option<String>,
    pub remediation_priority: &'static str,
}

#[derive(Debug, Clone)]
pub struct EvaluationInput<'a> {
    pub completed_actions: &'a [String],
    pub evidence_collected: &'a [String],
    pub documentation_provided: &'a [String],
}

/// Evaluate one control per §4.5 steps 1-5.
fn evaluate_control(framework: Framework, phase: Phase, control: &catalog::Control, input: &EvaluationInput) -> ComplianceCheck {
    let status = match catalog::checklist_binding(control.id) {
        Some(required) => {
            let matched = required.iter().filter(|item| input.completed_actions.iter().any(|a| a == *item)).count();
            if matched == required.len() {
                ComplianceStatus::Compliant
            } else if matched > 0 {
                ComplianceStatus::Partial
            } else {
                ComplianceStatus::Gap
            }
        }
        None => evaluate_by_keywords(control.id, input),
    };

    let evidence_provided = match catalog::control_keywords(control.id) {
        Some(keywords) => input
            .evidence_collected
            .iter()
            .filter(|e| {
                let lower = e.to_lowercase();
                keywords.iter().any(|kw| lower.contains(kw))
            })
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let recommendation = if status != ComplianceStatus::Compliant {
        Some(catalog::canned_recommendation(control.id).to_string())
    } else {
        None
    };

    let mandatory = catalog::mandatory_controls(framework, phase);
    let remediation_priority = if mandatory.contains(&control.id) { "high" } else { "medium" };

    ComplianceCheck {
        control_id: control.id.to_string(),
        control_name: control.name.to_string(),
        status,
        evidence_provided,
        recommendation,
        remediation_priority,
    }
}

/// Keyword-matching fallback (§4.5 step 2).
fn evaluate_by_keywords(control_id: &str, input: &EvaluationInput) -> ComplianceStatus {
    let keywords = match catalog::control_keywords(control_id) {
        Some(kws) => kws,
        None => return ComplianceStatus::NotEvaluated,
    };

    let text = input
        .completed_actions
        .iter()
        .chain(input.evidence_collected.iter())
        .chain(input.documentation_provided.iter())
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let matches = keywords.iter().filter(|kw| text.contains(*kw)).count();

    if matches >= keywords.len() {
        ComplianceStatus::Compliant
    } else if matches > 0 {
        ComplianceStatus::Partial
    } else {
        ComplianceStatus::Gap
    }
}

#[derive(Debug, Clone)]
pub struct FrameworkResult {
    pub framework: Framework,
    pub compliant: bool,
    pub score: f64,
    pub total_controls: usize,
    pub compliant_count: usize,
    pub partial_count: usize,
    pub gap_count: usize,
    pub not_evaluated_count: usize,
    pub checks: Vec<ComplianceCheck>,
}

/// Per-framework statistics and §3.4 score (§4.5): a framework is
/// `compliant` overall iff `gap_count == 0`.
pub fn validate_framework(framework: Framework, phase: Phase, input: &EvaluationInput) -> FrameworkResult {
    let controls = catalog::controls_for_phase(framework, phase);
    let checks: Vec<ComplianceCheck> = controls.iter().map(|c| evaluate_control(framework, phase, c, input)).collect();

    let total = checks.len();
    let compliant_count = checks.iter().filter(|c| c.status == ComplianceStatus::Compliant).count();
    let partial_count = checks.iter().filter(|c| c.status == ComplianceStatus::Partial).count();
    let gap_count = checks.iter().filter(|c| c.status == ComplianceStatus::Gap).count();
    let not_evaluated_count = checks.iter().filter(|c| c.status == ComplianceStatus::NotEvaluated).count();

    let score = if total > 0 {
        ((compliant_count as f64 + partial_count as f64 * 0.5) / total as f64 * 100.0 * 10.0).round() / 10.0
    } else {
        0.0
    };

    FrameworkResult {
        framework,
        compliant: gap_count == 0,
        score,
        total_controls: total,
        compliant_count,
        partial_count,
        gap_count,
        not_evaluated_count,
        checks,
    }
}

/// Default framework set `{bsi_grundschutz, iso_27001, nist_csf_2}` (§4.5).
/// A single framework's evaluation failure is isolated into a zero-score
/// error result rather than aborting the batch.
pub fn default_frameworks() -> Vec<Framework> {
    vec![Framework::BsiGrundschutz, Framework::Iso27001, Framework::NistCsf2]
}

pub fn validate_phase_compliance(phase: Phase, frameworks: Option<&[Framework]>, input: &EvaluationInput) -> HashMap<Framework, FrameworkResult> {
    let frameworks: Vec<Framework> = frameworks.map(|f| f.to_vec()).unwrap_or_else(default_frameworks);
    frameworks.into_iter().map(|fw| (fw, validate_framework(fw, phase, input))).collect()
}

/// Run across all six IR phases, skipping phases with no supplied data.
pub fn validate_all_phases(
    phase_inputs: &HashMap<Phase, EvaluationInput>,
    frameworks: Option<&[Framework]>,
) -> HashMap<Phase, HashMap<Framework, FrameworkResult>> {
    phase_inputs
        .iter()
        .map(|(phase, input)| (*phase, validate_phase_compliance(*phase, frameworks, input)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checklist_binding_path_is_compliant_when_all_items_present() {
        let input = EvaluationInput {
            completed_actions: &["DET-001".to_string(), "DET-002".to_string(), "DET-003".to_string()],
            evidence_collected: &[],
            documentation_provided: &[],
        };
        let control = catalog::all_controls(Framework::BsiGrundschutz)
            .into_iter()
            .find(|c| c.id == "DER.1")
            .unwrap();
        let check = evaluate_control(Framework::BsiGrundschutz, Phase::Detection, &control, &input);
        assert_eq!(check.status, ComplianceStatus::Compliant);
        assert!(check.recommendation.is_none());
    }

    #[test]
    fn partial_completion_yields_partial_status() {
        let input = EvaluationInput {
            completed_actions: &["DET-001".to_string()],
            evidence_collected: &[],
            documentation_provided: &[],
        };
        let control = catalog::all_controls(Framework::BsiGrundschutz)
            .into_iter()
            .find(|c| c.id == "DER.1")
            .unwrap();
        let check = evaluate_control(Framework::BsiGrundschutz, Phase::Detection, &control, &input);
        assert_eq!(check.status, ComplianceStatus::Partial);
    }

    #[test]
    fn statistics_partition_equals_total() {
        let input = EvaluationInput {
            completed_actions: &["DET-001".to_string(), "DET-002".to_string(), "DET-003".to_string()],
            evidence_collected: &[],
            documentation_provided: &[],
        };
        let result = validate_framework(Framework::BsiGrundschutz, Phase::Detection, &input);
        assert_eq!(
            result.compliant_count + result.partial_count + result.gap_count,
            result.total_controls
        );
        assert!(result.score >= 0.0 && result.score <= 100.0);
    }

    #[test]
    fn status_partition_sums_to_total_across_frameworks() {
        let input = EvaluationInput {
            completed_actions: &[],
            evidence_collected: &["incident response timeline documented".to_string()],
            documentation_provided: &[],
        };
        for framework in [Framework::BsiGrundschutz, Framework::Iso27001, Framework::NistCsf2] {
            for phase in Phase::all() {
                let result = validate_framework(framework, phase, &input);
                assert_eq!(
                    result.compliant_count + result.partial_count + result.gap_count + result.not_evaluated_count,
                    result.total_controls
                );
            }
        }
    }
}
