use std::collections::HashMap;

use isora_common::{Framework, Phase};
use once_cell::sync::Lazy;

use crate::catalog;

/// A unified control spans native IDs across the cross-mapped frameworks
/// (§4.4); only `Framework::cross_mapped()` participates.
#[derive(Debug, Clone)]
pub struct UnifiedControl {
    pub unified_id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub phase: Phase,
    pub framework_controls: &'static [(Framework, &'static [&'static str])],
}

pub static UNIFIED_CONTROLS: Lazy<Vec<UnifiedControl>> = Lazy::new(|| {
    vec![
        UnifiedControl {
            unified_id: "incident_response",
            name: "Incident Response Handling",
            category: "response",
            phase: Phase::Containment,
            framework_controls: &[
                (Framework::BsiGrundschutz, &["DER.2.1"]),
                (Framework::Iso27001, &["A.5.26"]),
                (Framework::Iso27035, &["A.5.26"]),
                (Framework::NistCsf2, &["RS.MA"]),
                (Framework::MitreAttack, &[]),
                (Framework::Nis2, &["Art.23"]),
            ],
        },
        UnifiedControl {
            unified_id: "detection_monitoring",
            name: "Security Event Detection",
            category: "detection",
            phase: Phase::Detection,
            framework_controls: &[
                (Framework::BsiGrundschutz, &["DER.1"]),
                (Framework::Iso27001, &["A.8.16"]),
                (Framework::Iso27035, &["A.8.16"]),
                (Framework::NistCsf2, &["DE.CM"]),
                (Framework::MitreAttack, &[]),
                (Framework::Nis2, &["Art.21"]),
            ],
        },
        UnifiedControl {
            unified_id: "forensic_evidence",
            name: "Forensic Evidence Preservation",
            category: "analysis",
            phase: Phase::Analysis,
            framework_controls: &[
                (Framework::BsiGrundschutz, &["DER.2.2"]),
                (Framework::Iso27001, &["A.5.25"]),
                (Framework::Iso27035, &["A.5.25"]),
                (Framework::NistCsf2, &["RS.AN"]),
                (Framework::MitreAttack, &[]),
                (Framework::Nis2, &[]),
            ],
        },
        UnifiedControl {
            unified_id: "recovery_continuity",
            name: "Recovery and Continuity",
            category: "recovery",
            phase: Phase::Recovery,
            framework_controls: &[
                (Framework::BsiGrundschutz, &["DER.4", "CON.3"]),
                (Framework::Iso27001, &["A.5.26"]),
                (Framework::Iso27035, &["A.5.26"]),
                (Framework::NistCsf2, &["RC.RP"]),
                (Framework::MitreAttack, &[]),
                (Framework::Nis2, &[]),
            ],
        },
        UnifiedControl {
            unified_id: "post_incident_review",
            name: "Post-Incident Review and Reporting",
            category: "post_incident",
            phase: Phase::PostIncident,
            framework_controls: &[
                (Framework::BsiGrundschutz, &["ORP.3"]),
                (Framework::Iso27001, &["A.5.27"]),
                (Framework::Iso27035, &["A.5.27"]),
                (Framework::NistCsf2, &[]),
                (Framework::MitreAttack, &[]),
                (Framework::Nis2, &["Art.23"]),
            ],
        },
    ]
});

pub fn controls_for_phase_unified(phase: Phase) -> Vec<UnifiedControl> {
    UNIFIED_CONTROLS.iter().filter(|c| c.phase == phase).cloned().collect()
}

/// `equivalent_controls(framework, control_id) -> map<framework, [control_id]>` (§4.4).
pub fn equivalent_controls(framework: Framework, control_id: &str) -> HashMap<Framework, Vec<String>> {
    let mut out = HashMap::new();
    for unified in UNIFIED_CONTROLS.iter() {
        let native = unified
            .framework_controls
            .iter()
            .find(|(fw, _)| *fw == framework)
            .map(|(_, ids)| *ids)
            .unwrap_or(&[]);

        if native.contains(&control_id) {
            for (fw, ids) in unified.framework_controls {
                if *fw != framework && !ids.is_empty() {
                    out.insert(*fw, ids.iter().map(|s| s.to_string()).collect());
                }
            }
        }
    }
    out
}

/// Merged view of a single control joined with its evaluation metadata and
/// cross-framework equivalents (§4.4).
#[derive(Debug, Clone)]
pub struct ControlDetails {
    pub control: catalog::Control,
    pub checklist_items: Option<Vec<&'static str>>,
    pub keywords: Option<Vec<&'static str>>,
    pub recommendation: &'static str,
    pub equivalents: HashMap<Framework, Vec<String>>,
}

/// `control_details(framework, control_id) -> merged view with all cross-refs`.
/// Returns `None` if `control_id` isn't in `framework`'s catalog.
pub fn control_details(framework: Framework, control_id: &str) -> Option<ControlDetails> {
    let control = catalog::all_controls(framework).into_iter().find(|c| c.id == control_id)?;
    Some(ControlDetails {
        checklist_items: catalog::checklist_binding(control.id),
        keywords: catalog::control_keywords(control.id),
        recommendation: catalog::canned_recommendation(control.id),
        equivalents: equivalent_controls(framework, control.id),
        control,
    })
}

/// `compute_cross_framework_coverage`: a unified control is covered if any
/// native ID, in any listed framework, is present in that framework's
/// completed set (§4.5). Seed test #5: equivalent native IDs across two
/// frameworks count as one covered unified control, not two.
pub struct CoverageReport {
    pub covered: usize,
    pub total: usize,
    pub per_category: HashMap<&'static str, (usize, usize)>,
}

pub fn compute_cross_framework_coverage(completed_by_framework: &HashMap<Framework, Vec<String>>) -> CoverageReport {
    let mut covered = 0;
    let mut per_category: HashMap<&'static str, (usize, usize)> = HashMap::new();

    for unified in UNIFIED_CONTROLS.iter() {
        let entry = per_category.entry(unified.category).or_insert((0, 0));
        entry.1 += 1;

        let is_covered = unified.framework_controls.iter().any(|(fw, ids)| {
            completed_by_framework
                .get(fw)
                .map(|completed| ids.iter().any(|id| completed.iter().any(|c| c == id)))
                .unwrap_or(false)
        });

        if is_covered {
            covered += 1;
            entry.0 += 1;
        }
    }

    CoverageReport {
        covered,
        total: UNIFIED_CONTROLS.len(),
        per_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_test_5_equivalent_native_ids_count_as_one_unified_control() {
        let mut completed = HashMap::new();
        completed.insert(Framework::BsiGrundschutz, vec!["DER.2.1".to_string()]);
        completed.insert(Framework::Iso27001, vec!["A.5.26".to_string()]);

        let report = compute_cross_framework_coverage(&completed);
        assert_eq!(report.covered, 1);
    }

    #[test]
    fn control_details_merges_evaluation_metadata_and_equivalents() {
        let details = control_details(Framework::BsiGrundschutz, "DER.2.1").unwrap();
        assert_eq!(details.control.id, "DER.2.1");
        assert!(details.checklist_items.is_some());
        assert_eq!(details.equivalents.get(&Framework::Iso27001), Some(&vec!["A.5.26".to_string()]));
    }

    #[test]
    fn control_details_is_none_for_unknown_control() {
        assert!(control_details(Framework::BsiGrundschutz, "NOPE").is_none());
    }

    #[test]
    fn equivalent_controls_excludes_empty_framework_entries() {
        let equivalents = equivalent_controls(Framework::BsiGrundschutz, "DER.2.1");
        assert_eq!(equivalents.get(&Framework::Iso27001), Some(&vec!["A.5.26".to_string()]));
        assert!(!equivalents.contains_key(&Framework::MitreAttack));
    }
}
