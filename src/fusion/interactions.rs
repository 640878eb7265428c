use std::collections::HashSet;
use log::{debug, warn};

use super::Provenance;
use crate::advisory::AdvisoryInteraction;
use crate::interactions::InteractionWarning;

const DEFAULT_ADVISORY_SEVERITY: &str = "Moderate";

pub fn interaction_severity_rank(severity: &str) -> u8 {
    match severity.trim().to_lowercase().as_str() {
        "contraindicated" => 0,
        "major" | "high" => 1,
        "moderate" => 2,
        "minor" => 3,
        "low" => 4,
        _ => 2,
    }
}

/// Rule-engine warnings first, then advisory warnings for drug sets not
/// already covered, ordered by severity. Advisory warnings never replace
/// a rule-engine warning for the same drugs.
pub fn fuse_interactions(
    rule_warnings: Vec<InteractionWarning>,
    advisory: Option<&[AdvisoryInteraction]>,
) -> Vec<InteractionWarning> {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut fused = Vec::with_capacity(rule_warnings.len());

    for warning in rule_warnings {
        if seen.insert(warning.pair_key()) {
            fused.push(InteractionWarning { source: Provenance::KnowledgeBase, ..warning });
        }
    }
    let from_rules = fused.len();

    for record in advisory.unwrap_or_default() {
        if record.drugs.is_empty() {
            warn!("Ignoring advisory interaction without drug names");
            continue;
        }
        let warning = from_advisory(record);
        if seen.insert(warning.pair_key()) {
            fused.push(warning);
        }
    }

    // Stable: equal ranks keep rule-engine entries ahead of advisory ones.
    fused.sort_by_key(|w| interaction_severity_rank(&w.severity));

    debug!(
        "Fused interactions: {} from rules, {} from advisory",
        from_rules,
        fused.len() - from_rules
    );
    fused
}

fn from_advisory(record: &AdvisoryInteraction) -> InteractionWarning {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();

    InteractionWarning {
        drugs: record.drugs.clone(),
        warning: text(&record.clinical_effect),
        severity: record.severity.clone()
            .unwrap_or_else(|| DEFAULT_ADVISORY_SEVERITY.to_string()),
        mechanism: text(&record.mechanism),
        management: text(&record.management),
        evidence_level: text(&record.evidence_level),
        source: Provenance::Advisory,
    }
}
