pub mod rules;

use serde::{Deserialize, Serialize};
use log::debug;

use crate::fusion::Provenance;
use crate::matching;

pub use rules::default_rules;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRule {
    pub group_a: Vec<String>,
    pub group_b: Vec<String>,
    pub warning: String,
    #[serde(default = "default_rule_severity")]
    pub severity: String,
}

fn default_rule_severity() -> String {
    "High".to_string()
}

impl InteractionRule {
    pub fn new(group_a: &[&str], group_b: &[&str], warning: &str) -> Self {
        Self {
            group_a: group_a.iter().map(|k| k.to_string()).collect(),
            group_b: group_b.iter().map(|k| k.to_string()).collect(),
            warning: warning.to_string(),
            severity: default_rule_severity(),
        }
    }

    fn mentions(group: &[String], medication: &str) -> bool {
        group.iter().any(|keyword| matching::contains(medication, keyword))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionWarning {
    pub drugs: Vec<String>,
    pub warning: String,
    pub severity: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mechanism: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub management: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub evidence_level: String,
    pub source: Provenance,
}

impl InteractionWarning {
    // Case-insensitive, order-independent identity of the drugs involved.
    pub fn pair_key(&self) -> Vec<String> {
        let mut key: Vec<String> = self.drugs.iter().map(|d| matching::normalize(d)).collect();
        key.sort();
        key
    }
}

pub struct InteractionRuleSet {
    rules: Vec<InteractionRule>,
}

impl Default for InteractionRuleSet {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl InteractionRuleSet {
    pub fn new(rules: Vec<InteractionRule>) -> Self {
        Self { rules }
    }

    // One warning per rule whose two groups are both present. Rules are not
    // deduplicated against each other here.
    pub fn evaluate(&self, medications: &[String]) -> Vec<InteractionWarning> {
        if medications.len() < 2 {
            return Vec::new();
        }

        let warnings: Vec<InteractionWarning> = self.rules.iter()
            .filter(|rule| {
                medications.iter().any(|m| InteractionRule::mentions(&rule.group_a, m))
                    && medications.iter().any(|m| InteractionRule::mentions(&rule.group_b, m))
            })
            .map(|rule| InteractionWarning {
                drugs: medications.iter()
                    .filter(|m| {
                        InteractionRule::mentions(&rule.group_a, m)
                            || InteractionRule::mentions(&rule.group_b, m)
                    })
                    .cloned()
                    .collect(),
                warning: rule.warning.clone(),
                severity: rule.severity.clone(),
                mechanism: String::new(),
                management: String::new(),
                evidence_level: String::new(),
                source: Provenance::KnowledgeBase,
            })
            .collect();

        debug!("{} interaction rules fired for {} medications", warnings.len(), medications.len());
        warnings
    }
}
