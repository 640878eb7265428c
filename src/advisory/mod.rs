pub mod lenient;
pub mod parse;
pub mod recorded;
pub mod timed;

use serde::{Deserialize, Serialize};

use crate::error::AdrResult;
use crate::knowledge::Severity;
use crate::profile::PatientProfile;
use crate::scoring::ScoredEffect;

pub use recorded::RecordedAdvisory;
pub use timed::TimedAdvisory;

#[derive(Debug, Clone)]
pub struct EffectRequest {
    pub drug_name: String,
    pub profile: PatientProfile,
    // Knowledge-base predictions handed over as a baseline to validate.
    pub knowledge_effects: Vec<ScoredEffect>,
}

pub trait AdvisoryService: Send + Sync {
    fn predict_effects(&self, request: &EffectRequest) -> AdrResult<EffectAnalysis>;
    fn predict_interactions(&self, medications: &[String]) -> AdrResult<InteractionAnalysis>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryEffect {
    #[serde(deserialize_with = "lenient::text")]
    pub effect: Option<String>,
    #[serde(deserialize_with = "lenient::percent")]
    pub probability_percent: Option<u32>,
    #[serde(deserialize_with = "lenient::severity")]
    pub severity: Option<Severity>,
    #[serde(deserialize_with = "lenient::text")]
    pub onset_timing: Option<String>,
    // Older responses use `onset`; both keys may appear together.
    #[serde(deserialize_with = "lenient::text", skip_serializing)]
    pub onset: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub mechanism: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub patient_specific_risk: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub management: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub requires_discontinuation: Option<bool>,
}

impl AdvisoryEffect {
    pub fn onset_text(&self) -> Option<&str> {
        self.onset_timing.as_deref().or(self.onset.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryInteraction {
    #[serde(deserialize_with = "lenient::list")]
    pub drugs: Vec<String>,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub interaction_type: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub mechanism: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub clinical_effect: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub onset: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub evidence_level: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub management: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contraindications {
    #[serde(deserialize_with = "lenient::list")]
    pub absolute: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub relative: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringParameter {
    #[serde(deserialize_with = "lenient::text")]
    pub parameter: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub frequency: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAssessment {
    #[serde(deserialize_with = "lenient::text")]
    pub risk_level: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub benefit_risk_ratio: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub recommendation: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub alternative_drugs: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectAnalysis {
    #[serde(deserialize_with = "lenient::text")]
    pub drug_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub drug_class: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub mechanism_of_action: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub mechanism: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub half_life: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub metabolism: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub side_effects: Vec<AdvisoryEffect>,
    #[serde(deserialize_with = "lenient::object")]
    pub contraindications: Contraindications,
    #[serde(deserialize_with = "lenient::list")]
    pub black_box_warnings: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub monitoring_parameters: Vec<MonitoringParameter>,
    #[serde(deserialize_with = "lenient::object")]
    pub overall_risk_assessment: RiskAssessment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionAnalysis {
    #[serde(deserialize_with = "lenient::list")]
    pub medications_analyzed: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub interactions: Vec<AdvisoryInteraction>,
    #[serde(deserialize_with = "lenient::text")]
    pub overall_risk: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub critical_alerts: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisorySummary {
    pub drug_class: String,
    pub mechanism_of_action: String,
    pub half_life: String,
    pub metabolism: String,
    pub contraindications: Contraindications,
    pub black_box_warnings: Vec<String>,
    pub monitoring_parameters: Vec<MonitoringParameter>,
    pub overall_risk_assessment: RiskAssessment,
}

impl AdvisorySummary {
    pub fn from_analysis(analysis: &EffectAnalysis) -> Self {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();

        Self {
            drug_class: text(&analysis.drug_class),
            mechanism_of_action: analysis.mechanism_of_action.clone()
                .or_else(|| analysis.mechanism.clone())
                .unwrap_or_default(),
            half_life: text(&analysis.half_life),
            metabolism: text(&analysis.metabolism),
            contraindications: analysis.contraindications.clone(),
            black_box_warnings: analysis.black_box_warnings.clone(),
            monitoring_parameters: analysis.monitoring_parameters.clone(),
            overall_risk_assessment: analysis.overall_risk_assessment.clone(),
        }
    }
}
