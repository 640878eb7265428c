use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use log::{debug, info, warn};

use crate::advisory::{
    AdvisoryService, AdvisorySummary, EffectAnalysis, EffectRequest, InteractionAnalysis,
    RecordedAdvisory, TimedAdvisory,
};
use crate::config::Config;
use crate::error::AdrResult;
use crate::fusion::{fuse_interactions, EffectFusion, FusedEffect};
use crate::interactions::{default_rules, InteractionRuleSet, InteractionWarning};
use crate::knowledge::{CsvKnowledgeBase, DrugMatch, KnowledgeBase};
use crate::profile::PatientProfile;
use crate::scoring::{add_course_tags, score_records};
use crate::tags::TagExtractor;

pub const DISCLAIMER: &str = "For educational purposes only. Consult a healthcare provider.";

#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub drug_queried: String,
    // Knowledge-base name the query resolved to.
    pub drug_found: Option<String>,
    pub personalized: bool,
    pub user_risk_factors: Vec<String>,
    pub predictions: Vec<FusedEffect>,
    pub interactions: Vec<InteractionWarning>,
    pub ai_enhanced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AdvisorySummary>,
    pub critical_alerts: Vec<String>,
    pub disclaimer: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractionReport {
    pub medications: Vec<String>,
    pub interactions: Vec<InteractionWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_risk: Option<String>,
    pub critical_alerts: Vec<String>,
    pub recommendations: Vec<String>,
    pub ai_enhanced: bool,
}

pub struct Predictor {
    knowledge: Box<dyn KnowledgeBase>,
    extractor: TagExtractor,
    rules: InteractionRuleSet,
    fusion: EffectFusion,
    advisory: Option<TimedAdvisory>,
}

impl Predictor {
    pub fn new(
        knowledge: Box<dyn KnowledgeBase>,
        extractor: TagExtractor,
        rules: InteractionRuleSet,
        fusion: EffectFusion,
        advisory: Option<TimedAdvisory>,
    ) -> Self {
        Self { knowledge, extractor, rules, fusion, advisory }
    }

    pub fn from_config(config: &Config) -> AdrResult<Self> {
        let knowledge = CsvKnowledgeBase::from_path(&config.knowledge_base)?;

        let extractor = TagExtractor::new(config.vocabulary.clone().unwrap_or_default());
        let rules = InteractionRuleSet::new(
            config.interaction_rules.clone().unwrap_or_else(default_rules)
        );

        let advisory = if config.advisory.enabled {
            let recorded = RecordedAdvisory::new(
                config.advisory.effects_response.clone(),
                config.advisory.interactions_response.clone(),
            );
            info!("Advisory source enabled (timeout {}s)", config.advisory.timeout_secs);
            Some(TimedAdvisory::new(
                Arc::new(recorded),
                Duration::from_secs(config.advisory.timeout_secs),
            ))
        } else {
            info!("Advisory source disabled; using knowledge base only");
            None
        };

        Ok(Self::new(
            Box::new(knowledge),
            extractor,
            rules,
            EffectFusion::new(config.fusion.clone()),
            advisory,
        ))
    }

    pub fn drug_names(&self) -> Vec<String> {
        self.knowledge.drug_names()
    }

    pub fn lookup(&self, drug: &str) -> DrugMatch {
        self.knowledge.query(drug)
    }

    pub fn predict(&self, drug: &str, profile: &PatientProfile, use_advisory: bool) -> PredictionReport {
        info!("Predicting side effects for '{}'", drug);

        let found = self.knowledge.query(drug);
        let medications = profile.interaction_candidates(drug);
        let rule_warnings = self.rules.evaluate(&medications);
        let advisory = self.advisory.as_ref().filter(|_| use_advisory);

        let Some(matched_name) = found.matched_name.clone() else {
            warn!("'{}' is not in the knowledge base", drug);
            let interaction_analysis = advisory.and_then(|a| consult_interactions(a, &medications));
            return PredictionReport {
                drug_queried: drug.to_string(),
                drug_found: None,
                personalized: false,
                user_risk_factors: Vec::new(),
                predictions: vec![FusedEffect::not_found()],
                interactions: fuse_interactions(
                    rule_warnings,
                    interaction_analysis.as_ref().map(|a| a.interactions.as_slice()),
                ),
                ai_enhanced: false,
                ai_analysis: None,
                critical_alerts: Vec::new(),
                disclaimer: DISCLAIMER.to_string(),
                generated_at: Utc::now(),
            };
        };

        let mut tags = self.extractor.extract(profile);
        add_course_tags(&mut tags, profile.duration);

        let scored = score_records(
            &found.records,
            &tags,
            profile,
            self.fusion.policy().max_knowledge_effects,
        );

        let (effect_analysis, interaction_analysis) = match advisory {
            Some(advisory) => {
                let request = EffectRequest {
                    drug_name: drug.to_string(),
                    profile: profile.clone(),
                    knowledge_effects: scored.clone(),
                };
                consult_both(advisory, &request, &medications)
            }
            None => (None, None),
        };

        let predictions = self.fusion.fuse(
            &scored,
            effect_analysis.as_ref().map(|a| a.side_effects.as_slice()),
        );
        let interactions = fuse_interactions(
            rule_warnings,
            interaction_analysis.as_ref().map(|a| a.interactions.as_slice()),
        );

        let ai_analysis = effect_analysis.as_ref().map(AdvisorySummary::from_analysis);
        let critical_alerts = match (&ai_analysis, interaction_analysis) {
            (Some(_), Some(analysis)) => analysis.critical_alerts,
            _ => Vec::new(),
        };

        debug!(
            "'{}': {} predictions, {} interactions",
            matched_name,
            predictions.len(),
            interactions.len()
        );

        PredictionReport {
            drug_queried: drug.to_string(),
            drug_found: Some(matched_name),
            personalized: !tags.is_empty(),
            user_risk_factors: tags.to_vec(),
            predictions,
            interactions,
            ai_enhanced: effect_analysis.is_some(),
            ai_analysis,
            critical_alerts,
            disclaimer: DISCLAIMER.to_string(),
            generated_at: Utc::now(),
        }
    }

    pub fn check_interactions(&self, medications: &[String], use_advisory: bool) -> InteractionReport {
        info!("Checking interactions among {} medications", medications.len());

        let rule_warnings = self.rules.evaluate(medications);
        let analysis = self.advisory.as_ref()
            .filter(|_| use_advisory)
            .and_then(|a| consult_interactions(a, medications));

        let interactions = fuse_interactions(
            rule_warnings,
            analysis.as_ref().map(|a| a.interactions.as_slice()),
        );

        match analysis {
            Some(analysis) => InteractionReport {
                medications: medications.to_vec(),
                interactions,
                overall_risk: analysis.overall_risk,
                critical_alerts: analysis.critical_alerts,
                recommendations: analysis.recommendations,
                ai_enhanced: true,
            },
            None => InteractionReport {
                medications: medications.to_vec(),
                interactions,
                overall_risk: None,
                critical_alerts: Vec::new(),
                recommendations: Vec::new(),
                ai_enhanced: false,
            },
        }
    }
}

// Effects and interactions are requested concurrently; each is already
// bounded by the advisory timeout.
fn consult_both(
    advisory: &TimedAdvisory,
    request: &EffectRequest,
    medications: &[String],
) -> (Option<EffectAnalysis>, Option<InteractionAnalysis>) {
    thread::scope(|s| {
        let effects = s.spawn(|| settle("side-effect", advisory.predict_effects(request)));
        let interactions = s.spawn(|| consult_interactions(advisory, medications));
        (
            effects.join().unwrap_or(None),
            interactions.join().unwrap_or(None),
        )
    })
}

fn consult_interactions(advisory: &TimedAdvisory, medications: &[String]) -> Option<InteractionAnalysis> {
    if medications.len() < 2 {
        return None;
    }
    settle("interaction", advisory.predict_interactions(medications))
}

fn settle<T>(kind: &str, result: AdrResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Advisory {} analysis unavailable: {}", kind, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;
    use crate::advisory::{AdvisoryEffect, AdvisoryInteraction};
    use crate::error::AdrError;
    use crate::fusion::effects::NOT_FOUND_EFFECT;
    use crate::fusion::Provenance;
    use crate::knowledge::Severity;

    const SAMPLE: &str = "\
Drug_Name,Side_Effect,Frequency,Severity,Risk_Factors
Ibuprofen,Stomach upset,Common,Mild,elderly;gi_history
Ibuprofen,GI bleeding,Uncommon,Severe,elderly;anticoagulant_use;gi_history
Ibuprofen,Headache,Rare,Mild,
Metformin,Nausea,Common,Mild,
Metformin,Lactic acidosis,Rare,Severe,kidney_disease;elderly
";

    #[derive(Default)]
    struct Scripted {
        effects: Option<EffectAnalysis>,
        interactions: Option<InteractionAnalysis>,
        delay: Option<Duration>,
        effect_calls: AtomicUsize,
    }

    impl AdvisoryService for Scripted {
        fn predict_effects(&self, _request: &EffectRequest) -> AdrResult<EffectAnalysis> {
            self.effect_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                thread::sleep(delay);
            }
            self.effects.clone()
                .ok_or_else(|| AdrError::AdvisoryUnavailable("scripted".to_string()))
        }

        fn predict_interactions(&self, _medications: &[String]) -> AdrResult<InteractionAnalysis> {
            if let Some(delay) = self.delay {
                thread::sleep(delay);
            }
            self.interactions.clone()
                .ok_or_else(|| AdrError::AdvisoryUnavailable("scripted".to_string()))
        }
    }

    fn scripted() -> Scripted {
        Scripted {
            effects: Some(EffectAnalysis {
                drug_class: Some("NSAID".to_string()),
                side_effects: vec![
                    AdvisoryEffect {
                        effect: Some("GI Bleeding".to_string()),
                        probability_percent: Some(90),
                        severity: Some(Severity::Severe),
                        management: Some("Take with food".to_string()),
                        ..Default::default()
                    },
                    AdvisoryEffect {
                        effect: Some("Dizziness".to_string()),
                        probability_percent: Some(40),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }),
            interactions: Some(InteractionAnalysis {
                interactions: vec![AdvisoryInteraction {
                    drugs: vec!["Ibuprofen".to_string(), "Warfarin".to_string()],
                    severity: Some("Major".to_string()),
                    ..Default::default()
                }],
                overall_risk: Some("High".to_string()),
                critical_alerts: vec!["Avoid NSAIDs with warfarin".to_string()],
                recommendations: vec!["Consider acetaminophen".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn predictor(advisory: Option<Arc<dyn AdvisoryService>>, timeout: Duration) -> Predictor {
        let knowledge = CsvKnowledgeBase::from_reader(SAMPLE.as_bytes()).unwrap();
        Predictor::new(
            Box::new(knowledge),
            TagExtractor::default(),
            InteractionRuleSet::default(),
            EffectFusion::default(),
            advisory.map(|a| TimedAdvisory::new(a, timeout)),
        )
    }

    fn elderly_on_warfarin() -> PatientProfile {
        PatientProfile {
            age: Some(70),
            current_medications: vec!["Warfarin".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_knowledge_only_prediction() {
        let report = predictor(None, Duration::from_secs(5))
            .predict("ibuprofen", &elderly_on_warfarin(), true);

        assert_eq!(report.drug_found.as_deref(), Some("Ibuprofen"));
        assert!(report.personalized);
        assert_eq!(report.user_risk_factors, vec!["anticoagulant_use", "elderly"]);

        let probabilities: Vec<u32> = report.predictions.iter().map(|p| p.probability).collect();
        assert_eq!(probabilities, vec![99, 96, 13]);
        assert!(report.predictions.iter().all(|p| p.source == Provenance::KnowledgeBase));

        assert_eq!(report.interactions.len(), 1);
        assert!(!report.ai_enhanced);
        assert!(report.ai_analysis.is_none());
        assert!(report.critical_alerts.is_empty());
        assert_eq!(report.disclaimer, DISCLAIMER);
    }

    #[test]
    fn test_advisory_prediction_is_fused() {
        let report = predictor(Some(Arc::new(scripted())), Duration::from_secs(5))
            .predict("Ibuprofen", &elderly_on_warfarin(), true);

        let names: Vec<&str> = report.predictions.iter().map(|p| p.side_effect.as_str()).collect();
        assert_eq!(names, vec!["Stomach upset", "GI Bleeding", "Dizziness", "Headache"]);

        let merged = &report.predictions[1];
        assert_eq!(merged.probability, 92);
        assert_eq!(merged.source, Provenance::Merged);
        assert_eq!(merged.management, "Take with food");
        assert_eq!(report.predictions[2].source, Provenance::Advisory);

        // The advisory duplicate of the warfarin rule is dropped.
        assert_eq!(report.interactions.len(), 1);
        assert_eq!(report.interactions[0].source, Provenance::KnowledgeBase);

        assert!(report.ai_enhanced);
        assert_eq!(report.ai_analysis.as_ref().map(|a| a.drug_class.as_str()), Some("NSAID"));
        assert_eq!(report.critical_alerts, vec!["Avoid NSAIDs with warfarin"]);
    }

    #[test]
    fn test_unknown_drug_returns_sentinel() {
        let advisory = Arc::new(scripted());
        let profile = PatientProfile {
            age: Some(70),
            current_medications: vec!["Aspirin".to_string()],
            ..Default::default()
        };
        let report = predictor(Some(advisory.clone()), Duration::from_secs(5))
            .predict("Warfarin", &profile, true);

        assert!(report.drug_found.is_none());
        assert!(!report.personalized);
        assert!(report.user_risk_factors.is_empty());
        assert_eq!(report.predictions.len(), 1);
        assert_eq!(report.predictions[0].side_effect, NOT_FOUND_EFFECT);
        assert_eq!(report.predictions[0].probability, 0);
        assert!(!report.ai_enhanced);

        // Interactions are still screened; the effects call is skipped.
        assert!(report.interactions.iter().any(|w| w.warning.contains("bleeding")));
        assert_eq!(advisory.effect_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_slow_advisory_falls_back_to_knowledge_base() {
        let slow = Scripted { delay: Some(Duration::from_secs(2)), ..scripted() };
        let report = predictor(Some(Arc::new(slow)), Duration::from_millis(50))
            .predict("Ibuprofen", &elderly_on_warfarin(), true);

        assert!(!report.ai_enhanced);
        assert!(report.ai_analysis.is_none());
        assert!(report.critical_alerts.is_empty());
        assert_eq!(report.predictions.len(), 3);
        assert!(report.predictions.iter().all(|p| p.source == Provenance::KnowledgeBase));
    }

    #[test]
    fn test_advisory_calls_run_concurrently() {
        let slow = Scripted { delay: Some(Duration::from_millis(300)), ..scripted() };
        let predictor = predictor(Some(Arc::new(slow)), Duration::from_millis(500));

        let started = Instant::now();
        let report = predictor.predict("Ibuprofen", &elderly_on_warfarin(), true);
        let elapsed = started.elapsed();

        // Both answers arrived: fused effects and the interaction alerts.
        assert!(report.ai_enhanced);
        assert_eq!(report.predictions[1].source, Provenance::Merged);
        assert_eq!(report.critical_alerts, vec!["Avoid NSAIDs with warfarin"]);
        assert!(elapsed < Duration::from_millis(600), "took {:?}", elapsed);
    }

    #[test]
    fn test_advisory_can_be_skipped_per_request() {
        let advisory = Arc::new(scripted());
        let report = predictor(Some(advisory.clone()), Duration::from_secs(5))
            .predict("Ibuprofen", &elderly_on_warfarin(), false);

        assert!(!report.ai_enhanced);
        assert_eq!(advisory.effect_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_medications_means_no_interactions() {
        let report = predictor(Some(Arc::new(scripted())), Duration::from_secs(5))
            .predict("Metformin", &PatientProfile::default(), true);

        assert!(report.interactions.is_empty());
        assert!(!report.personalized);
        assert!(report.critical_alerts.is_empty());
    }

    #[test]
    fn test_check_interactions_with_advisory() {
        let meds = vec!["Warfarin".to_string(), "Ibuprofen".to_string()];
        let report = predictor(Some(Arc::new(scripted())), Duration::from_secs(5))
            .check_interactions(&meds, true);

        assert_eq!(report.interactions.len(), 1);
        assert_eq!(report.overall_risk.as_deref(), Some("High"));
        assert_eq!(report.recommendations, vec!["Consider acetaminophen"]);
        assert!(report.ai_enhanced);
    }

    #[test]
    fn test_check_interactions_rules_only() {
        let meds = vec!["Digoxin".to_string(), "Amiodarone".to_string()];
        let report = predictor(None, Duration::from_secs(5)).check_interactions(&meds, true);

        assert_eq!(report.interactions.len(), 1);
        assert!(report.overall_risk.is_none());
        assert!(!report.ai_enhanced);
    }
}
