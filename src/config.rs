use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AdrError, AdrResult};
use crate::fusion::FusionPolicy;
use crate::interactions::InteractionRule;
use crate::tags::{KeywordRule, RiskVocabulary};

const MAX_ADVISORY_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_knowledge_base")]
    pub knowledge_base: PathBuf,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default)]
    pub fusion: FusionPolicy,
    // Replaces the built-in risk tag tables when present.
    #[serde(default)]
    pub vocabulary: Option<RiskVocabulary>,
    // Replaces the built-in dangerous-pair table when present.
    #[serde(default)]
    pub interaction_rules: Option<Vec<InteractionRule>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
    pub effects_response: Option<PathBuf>,      // recorded side-effect response
    pub interactions_response: Option<PathBuf>, // recorded interaction response
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: 30,
            effects_response: None,
            interactions_response: None,
        }
    }
}

fn default_knowledge_base() -> PathBuf {
    PathBuf::from("data/drug_data.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            knowledge_base: default_knowledge_base(),
            advisory: AdvisoryConfig::default(),
            fusion: FusionPolicy::default(),
            vocabulary: None,
            interaction_rules: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> AdrResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AdrResult<()> {
        if self.knowledge_base.as_os_str().is_empty() {
            return Err(AdrError::InvalidConfig(
                "Knowledge base path must not be empty".to_string()
            ));
        }

        self.validate_advisory()?;
        self.validate_fusion()?;

        if let Some(vocabulary) = &self.vocabulary {
            validate_vocabulary(vocabulary)?;
        }

        if let Some(rules) = &self.interaction_rules {
            for (i, rule) in rules.iter().enumerate() {
                if rule.group_a.is_empty() || rule.group_b.is_empty() {
                    return Err(AdrError::InvalidConfig(
                        format!("Interaction rule {} needs keywords in both groups", i + 1)
                    ));
                }
                if rule.group_a.iter().chain(&rule.group_b).any(|k| k.trim().is_empty()) {
                    return Err(AdrError::InvalidConfig(
                        format!("Interaction rule {} has an empty keyword", i + 1)
                    ));
                }
            }
        }

        Ok(())
    }

    fn validate_advisory(&self) -> AdrResult<()> {
        let timeout = self.advisory.timeout_secs;
        if timeout == 0 || timeout > MAX_ADVISORY_TIMEOUT_SECS {
            return Err(AdrError::InvalidConfig(
                format!("Advisory timeout must be between 1 and {} seconds", MAX_ADVISORY_TIMEOUT_SECS)
            ));
        }
        Ok(())
    }

    fn validate_fusion(&self) -> AdrResult<()> {
        let fusion = &self.fusion;

        if fusion.knowledge_weight < 0.0 || fusion.advisory_weight < 0.0 {
            return Err(AdrError::InvalidConfig(
                "Fusion weights must be non-negative".to_string()
            ));
        }

        if (fusion.knowledge_weight + fusion.advisory_weight - 1.0).abs() > 1e-6 {
            return Err(AdrError::InvalidConfig(
                "Fusion weights must sum to 1.0".to_string()
            ));
        }

        if fusion.max_fused_effects == 0 || fusion.max_knowledge_effects == 0 {
            return Err(AdrError::InvalidConfig(
                "Effect limits must be positive".to_string()
            ));
        }

        if fusion.advisory_only_min_probability > 100 {
            return Err(AdrError::InvalidConfig(
                "Advisory-only threshold must be a percentage".to_string()
            ));
        }

        Ok(())
    }
}

fn validate_vocabulary(vocabulary: &RiskVocabulary) -> AdrResult<()> {
    let tables: [(&str, &[KeywordRule]); 4] = [
        ("conditions", &vocabulary.conditions),
        ("medications", &vocabulary.medications),
        ("allergies", &vocabulary.allergies),
        ("lifestyle", &vocabulary.lifestyle),
    ];

    for (table, rules) in tables {
        for rule in rules {
            if rule.keyword.trim().is_empty() {
                return Err(AdrError::InvalidConfig(
                    format!("Empty keyword in {} vocabulary", table)
                ));
            }
            if rule.tags.is_empty() {
                return Err(AdrError::InvalidConfig(
                    format!("Keyword '{}' in {} vocabulary maps to no tags", rule.keyword, table)
                ));
            }
        }
    }

    Ok(())
}
