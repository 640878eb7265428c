use serde::Serialize;
use std::cmp::Reverse;
use log::{debug, warn};

use super::{FusionPolicy, Provenance, DEFAULT_ADVISORY_PROBABILITY};
use crate::advisory::AdvisoryEffect;
use crate::knowledge::{FrequencyClass, Severity};
use crate::matching;
use crate::scoring::{ScoredEffect, MAX_PROBABILITY};

pub const NOT_FOUND_EFFECT: &str = "Drug Not Found";
pub const ADVISORY_FREQUENCY: &str = "AI Predicted";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedEffect {
    pub side_effect: String,
    pub probability: u32,
    pub severity: Severity,
    pub frequency: FrequencyClass,
    pub onset: String,
    pub mechanism: String,
    pub patient_specific_risk: String,
    pub management: String,
    pub requires_discontinuation: bool,
    pub source: Provenance,
    pub risk_factors_matched: Vec<String>,
}

impl FusedEffect {
    pub fn from_scored(effect: &ScoredEffect) -> Self {
        Self {
            side_effect: effect.side_effect.clone(),
            probability: effect.probability.min(MAX_PROBABILITY),
            severity: effect.severity.clone(),
            frequency: effect.frequency.clone(),
            onset: String::new(),
            mechanism: String::new(),
            patient_specific_risk: String::new(),
            management: String::new(),
            requires_discontinuation: false,
            source: Provenance::KnowledgeBase,
            risk_factors_matched: effect.risk_factors_matched.clone(),
        }
    }

    // Placeholder returned when the queried drug is unknown.
    pub fn not_found() -> Self {
        Self {
            side_effect: NOT_FOUND_EFFECT.to_string(),
            probability: 0,
            severity: Severity::Other("N/A".to_string()),
            frequency: FrequencyClass::Other("N/A".to_string()),
            onset: String::new(),
            mechanism: String::new(),
            patient_specific_risk: String::new(),
            management: String::new(),
            requires_discontinuation: false,
            source: Provenance::KnowledgeBase,
            risk_factors_matched: Vec::new(),
        }
    }

    fn take_advisory_text(&mut self, advisory: &AdvisoryEffect) {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        self.onset = advisory.onset_text().unwrap_or_default().to_string();
        self.mechanism = text(&advisory.mechanism);
        self.patient_specific_risk = text(&advisory.patient_specific_risk);
        self.management = text(&advisory.management);
        self.requires_discontinuation = advisory.requires_discontinuation.unwrap_or(false);
    }
}

pub struct EffectFusion {
    policy: FusionPolicy,
}

impl Default for EffectFusion {
    fn default() -> Self {
        Self::new(FusionPolicy::default())
    }
}

impl EffectFusion {
    pub fn new(policy: FusionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &FusionPolicy {
        &self.policy
    }

    /// Fuse both sources into at most `max_fused_effects` records ordered by
    /// probability, then severity. `advisory = None` means the advisory
    /// source was unavailable; knowledge-base effects pass through.
    pub fn fuse(&self, scored: &[ScoredEffect], advisory: Option<&[AdvisoryEffect]>) -> Vec<FusedEffect> {
        let mut fused: Vec<FusedEffect> = match advisory {
            None => scored.iter().map(FusedEffect::from_scored).collect(),
            Some(advisory) => self.merge(scored, advisory),
        };

        fused.sort_by_key(|e| (Reverse(e.probability), e.severity.rank()));
        fused.truncate(self.policy.max_fused_effects);
        fused
    }

    fn merge(&self, scored: &[ScoredEffect], advisory: &[AdvisoryEffect]) -> Vec<FusedEffect> {
        let lookup = advisory_lookup(advisory);
        let mut fused = Vec::with_capacity(scored.len() + advisory.len());
        let mut merged = 0;

        for effect in scored {
            let matched = lookup.iter()
                .find(|(name, _)| matching::names_match(&effect.side_effect, name))
                .map(|(_, record)| *record);

            match matched {
                Some(record) => {
                    fused.push(self.merge_one(effect, record));
                    merged += 1;
                }
                None => fused.push(FusedEffect::from_scored(effect)),
            }
        }

        let mut added = 0;
        let mut dropped = 0;
        for record in advisory {
            let Some(name) = usable_name(record) else {
                continue;
            };
            if fused.iter().any(|f| matching::names_match(name, &f.side_effect)) {
                continue;
            }

            let probability = record.probability_percent.unwrap_or(DEFAULT_ADVISORY_PROBABILITY);
            if probability < self.policy.advisory_only_min_probability {
                dropped += 1;
                continue;
            }

            let mut effect = FusedEffect {
                side_effect: name.to_string(),
                probability: probability.min(MAX_PROBABILITY),
                severity: record.severity.clone().unwrap_or_default(),
                frequency: FrequencyClass::Other(ADVISORY_FREQUENCY.to_string()),
                source: Provenance::Advisory,
                risk_factors_matched: Vec::new(),
                ..FusedEffect::not_found()
            };
            effect.take_advisory_text(record);
            fused.push(effect);
            added += 1;
        }

        debug!(
            "Fused effects: {} merged, {} knowledge-only, {} advisory-only, {} advisory below threshold",
            merged,
            scored.len() - merged,
            added,
            dropped
        );
        fused
    }

    fn merge_one(&self, effect: &ScoredEffect, record: &AdvisoryEffect) -> FusedEffect {
        let advisory_probability = record.probability_percent.unwrap_or(DEFAULT_ADVISORY_PROBABILITY);
        let blended = self.policy.blend(effect.probability, advisory_probability).round();

        let mut fused = FusedEffect {
            side_effect: usable_name(record).unwrap_or(effect.side_effect.as_str()).to_string(),
            probability: (blended.max(0.0) as u32).min(MAX_PROBABILITY),
            severity: record.severity.clone().unwrap_or_else(|| effect.severity.clone()),
            source: Provenance::Merged,
            ..FusedEffect::from_scored(effect)
        };
        fused.take_advisory_text(record);
        fused
    }
}

fn usable_name(record: &AdvisoryEffect) -> Option<&str> {
    record.effect.as_deref().filter(|n| !matching::normalize(n).is_empty())
}

// Normalized advisory names in first-seen order. A later record with the
// same name replaces the earlier one in place.
fn advisory_lookup(advisory: &[AdvisoryEffect]) -> Vec<(String, &AdvisoryEffect)> {
    let mut lookup: Vec<(String, &AdvisoryEffect)> = Vec::with_capacity(advisory.len());

    for record in advisory {
        let Some(name) = usable_name(record) else {
            warn!("Ignoring advisory effect without a name");
            continue;
        };
        let key = matching::normalize(name);
        match lookup.iter().position(|(existing, _)| *existing == key) {
            Some(i) => lookup[i].1 = record,
            None => lookup.push((key, record)),
        }
    }

    lookup
}
