use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use log::debug;

use crate::knowledge::{FrequencyClass, KnowledgeEffectRecord, Severity};
use crate::profile::PatientProfile;
use crate::tags::{RiskTagSet, ELDERLY, LONG_TERM_USE, YOUNG_ADULT};

// Scores never reach 100: the engine does not assert certainty.
pub const MAX_PROBABILITY: u32 = 99;

pub const RISK_FACTOR_WEIGHT: u32 = 12;

pub const LONG_TERM_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEffect {
    pub side_effect: String,
    pub probability: u32,
    pub frequency: FrequencyClass,
    pub severity: Severity,
    pub personalized: bool,
    pub risk_factors_matched: Vec<String>,
}

pub fn dosage_modifier(dosage: Option<u32>) -> u32 {
    match dosage {
        Some(mg) if mg > 1000 => 10,
        Some(mg) if mg > 500 => 5,
        _ => 0,
    }
}

pub fn add_course_tags(tags: &mut RiskTagSet, duration: Option<u32>) {
    if duration.map_or(false, |days| days > LONG_TERM_DAYS) {
        tags.insert(LONG_TERM_USE);
    }
}

/// Personalized probability for one effect.
///
/// Additive terms (base, dosage, shared risk tags, age) are summed first,
/// then scaled by severity and truncated, then capped at [`MAX_PROBABILITY`].
pub fn score(
    frequency: &FrequencyClass,
    tags: &RiskTagSet,
    effect_tags: &BTreeSet<String>,
    age: Option<u32>,
    severity: &Severity,
    dosage: Option<u32>,
) -> u32 {
    let mut score = frequency.base_probability() + dosage_modifier(dosage);

    let shared = effect_tags.iter().filter(|t| tags.contains(t)).count() as u32;
    score += RISK_FACTOR_WEIGHT * shared;

    if let Some(age) = age {
        if age >= 65 {
            score += if effect_tags.contains(ELDERLY) { 15 } else { 5 };
        } else if age <= 25 && effect_tags.contains(YOUNG_ADULT) {
            score += 10;
        }
    }

    let scaled = (score as f64 * severity.multiplier()) as u32;
    scaled.min(MAX_PROBABILITY)
}

pub fn score_records(
    records: &[KnowledgeEffectRecord],
    tags: &RiskTagSet,
    profile: &PatientProfile,
    limit: usize,
) -> Vec<ScoredEffect> {
    let personalized = !tags.is_empty();

    let mut effects: Vec<ScoredEffect> = records.iter()
        .map(|record| {
            let effect_tags = record.effect_tags();
            let probability = score(
                &record.frequency,
                tags,
                &effect_tags,
                profile.age,
                &record.severity,
                profile.dosage,
            );

            ScoredEffect {
                side_effect: record.side_effect.clone(),
                probability,
                frequency: record.frequency.clone(),
                severity: record.severity.clone(),
                personalized,
                risk_factors_matched: tags.iter()
                    .filter(|t| effect_tags.contains(*t))
                    .map(str::to_string)
                    .collect(),
            }
        })
        .collect();

    effects.sort_by_key(|e| (Reverse(e.probability), presort_rank(&e.severity)));
    effects.truncate(limit);

    debug!("Scored {} of {} knowledge base effects", effects.len(), records.len());
    effects
}

// Unrecognized severities sort with Mild here; fusion ranks them with Moderate.
fn presort_rank(severity: &Severity) -> u8 {
    match severity {
        Severity::Other(_) => Severity::Mild.rank(),
        known => known.rank(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn record(effect: &str, frequency: FrequencyClass, severity: Severity, risks: &str) -> KnowledgeEffectRecord {
        KnowledgeEffectRecord {
            drug_name: "Ibuprofen".to_string(),
            side_effect: effect.to_string(),
            frequency,
            severity,
            risk_factors: Some(risks.to_string()),
        }
    }

    #[test]
    fn test_elderly_severe_common_is_capped() {
        // 75 + 12 + 15 = 102, x1.3 = 132, capped
        let tags: RiskTagSet = ["elderly"].into_iter().collect();
        let p = score(&FrequencyClass::Common, &tags, &set(&["elderly"]), Some(70), &Severity::Severe, None);
        assert_eq!(p, 99);
    }

    #[test]
    fn test_flat_elderly_bonus_and_truncation() {
        // 8 + 5 = 13, x1.3 = 16.9 -> 16
        let p = score(&FrequencyClass::Rare, &RiskTagSet::new(), &set(&[]), Some(80), &Severity::Severe, None);
        assert_eq!(p, 16);

        // 35 + 12 = 47, x1.15 = 54.05 -> 54
        let tags: RiskTagSet = ["nsaid_use"].into_iter().collect();
        let p = score(&FrequencyClass::Uncommon, &tags, &set(&["nsaid_use", "smoking"]), Some(40), &Severity::Moderate, None);
        assert_eq!(p, 54);
    }

    #[test]
    fn test_young_adult_bonus_requires_effect_tag() {
        let tags: RiskTagSet = ["young_adult"].into_iter().collect();
        let with_tag = score(&FrequencyClass::Rare, &tags, &set(&["young_adult"]), Some(22), &Severity::Mild, None);
        let without = score(&FrequencyClass::Rare, &tags, &set(&[]), Some(22), &Severity::Mild, None);
        assert_eq!(with_tag, 8 + 12 + 10);
        assert_eq!(without, 8);
    }

    #[test]
    fn test_unknown_frequency_and_dosage() {
        let other = FrequencyClass::Other("Varies".to_string());
        assert_eq!(score(&other, &RiskTagSet::new(), &set(&[]), None, &Severity::Mild, Some(1200)), 60);
        assert_eq!(score(&other, &RiskTagSet::new(), &set(&[]), None, &Severity::Mild, Some(750)), 55);
        assert_eq!(score(&other, &RiskTagSet::new(), &set(&[]), None, &Severity::Mild, Some(500)), 50);
    }

    #[test]
    fn test_score_is_bounded_and_monotonic() {
        let frequencies = [FrequencyClass::Common, FrequencyClass::Uncommon, FrequencyClass::Rare];
        let severities = [Severity::Mild, Severity::Moderate, Severity::Severe];
        let effect_tags = set(&["elderly", "nsaid_use", "kidney_disease", "smoking"]);
        let all_tags = ["elderly", "nsaid_use", "kidney_disease", "smoking"];

        for frequency in &frequencies {
            for age in [None, Some(10), Some(22), Some(45), Some(90)] {
                let mut previous_by_dose = 0;
                for dosage in [None, Some(600), Some(2000)] {
                    let mut previous_by_severity = 0;
                    for severity in &severities {
                        let mut previous_by_tags = 0;
                        for n in 0..=all_tags.len() {
                            let tags: RiskTagSet = all_tags[..n].iter().copied().collect();
                            let p = score(frequency, &tags, &effect_tags, age, severity, dosage);
                            assert!(p <= MAX_PROBABILITY);
                            assert!(p >= previous_by_tags);
                            previous_by_tags = p;
                        }
                        let p = score(frequency, &RiskTagSet::new(), &effect_tags, age, severity, dosage);
                        assert!(p >= previous_by_severity);
                        previous_by_severity = p;
                    }
                    let p = score(frequency, &RiskTagSet::new(), &effect_tags, age, &Severity::Moderate, dosage);
                    assert!(p >= previous_by_dose);
                    previous_by_dose = p;
                }
            }
        }
    }

    #[test]
    fn test_long_term_tag() {
        let mut tags = RiskTagSet::new();
        add_course_tags(&mut tags, Some(30));
        assert!(tags.is_empty());
        add_course_tags(&mut tags, Some(31));
        assert!(tags.contains(LONG_TERM_USE));
    }

    #[test]
    fn test_score_records_sorted_and_limited() {
        let records = vec![
            record("Headache", FrequencyClass::Common, Severity::Mild, ""),
            record("GI bleeding", FrequencyClass::Uncommon, Severity::Severe, "elderly;nsaid_use"),
            record("Rash", FrequencyClass::Rare, Severity::Mild, ""),
            record("Dyspepsia", FrequencyClass::Common, Severity::Moderate, ""),
        ];
        let tags: RiskTagSet = ["nsaid_use"].into_iter().collect();
        let profile = PatientProfile { age: Some(40), ..Default::default() };

        let effects = score_records(&records, &tags, &profile, 3);
        let names: Vec<_> = effects.iter().map(|e| e.side_effect.as_str()).collect();
        // Dyspepsia 86, Headache 75, GI bleeding 61
        assert_eq!(names, vec!["Dyspepsia", "Headache", "GI bleeding"]);
        assert_eq!(effects[2].risk_factors_matched, vec!["nsaid_use"]);
        assert!(effects.iter().all(|e| e.personalized));
    }

    #[test]
    fn test_unrecognized_severity_sorts_with_mild() {
        // Both score 50: unrecognized labels do not jump ahead of Mild.
        let records = vec![
            record("Tremor", FrequencyClass::Other("x".to_string()), Severity::Other("Unknown".to_string()), ""),
            record("Dizziness", FrequencyClass::Other("x".to_string()), Severity::Mild, ""),
            record("Blurred vision", FrequencyClass::Other("x".to_string()), Severity::Other("Unknown".to_string()), ""),
        ];
        let effects = score_records(&records, &RiskTagSet::new(), &PatientProfile::default(), 8);
        let names: Vec<&str> = effects.iter().map(|e| e.side_effect.as_str()).collect();
        assert_eq!(names, vec!["Tremor", "Dizziness", "Blurred vision"]);
        assert!(!effects[0].personalized);
        assert_eq!(presort_rank(&Severity::Other("Unknown".to_string())), 2);
        assert_eq!(presort_rank(&Severity::Severe), 0);
    }
}
