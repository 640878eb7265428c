pub mod csv_base;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub use csv_base::CsvKnowledgeBase;

pub trait KnowledgeBase: Send + Sync {
    fn query(&self, drug_name: &str) -> DrugMatch;
    fn drug_names(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrugMatch {
    pub matched_name: Option<String>,
    pub records: Vec<KnowledgeEffectRecord>,
}

impl DrugMatch {
    pub fn not_found() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEffectRecord {
    #[serde(rename = "Drug_Name")]
    pub drug_name: String,
    #[serde(rename = "Side_Effect")]
    pub side_effect: String,
    #[serde(rename = "Frequency")]
    pub frequency: FrequencyClass,
    #[serde(rename = "Severity")]
    pub severity: Severity,
    #[serde(rename = "Risk_Factors", default)]
    pub risk_factors: Option<String>,
}

impl KnowledgeEffectRecord {
    // Risk tags annotated on this effect (`;`-separated in the source).
    pub fn effect_tags(&self) -> BTreeSet<String> {
        self.risk_factors
            .as_deref()
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FrequencyClass {
    Common,
    Uncommon,
    Rare,
    Other(String),
}

impl FrequencyClass {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "common" => FrequencyClass::Common,
            "uncommon" => FrequencyClass::Uncommon,
            "rare" => FrequencyClass::Rare,
            _ => FrequencyClass::Other(label.trim().to_string()),
        }
    }

    pub fn base_probability(&self) -> u32 {
        match self {
            FrequencyClass::Common => 75,
            FrequencyClass::Uncommon => 35,
            FrequencyClass::Rare => 8,
            FrequencyClass::Other(_) => 50,
        }
    }
}

impl From<String> for FrequencyClass {
    fn from(label: String) -> Self {
        FrequencyClass::parse(&label)
    }
}

impl From<FrequencyClass> for String {
    fn from(frequency: FrequencyClass) -> Self {
        frequency.to_string()
    }
}

impl fmt::Display for FrequencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyClass::Common => write!(f, "Common"),
            FrequencyClass::Uncommon => write!(f, "Uncommon"),
            FrequencyClass::Rare => write!(f, "Rare"),
            FrequencyClass::Other(label) => write!(f, "{}", label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Other(String),
}

impl Severity {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "mild" => Severity::Mild,
            "moderate" => Severity::Moderate,
            "severe" => Severity::Severe,
            _ => Severity::Other(label.trim().to_string()),
        }
    }

    // Sort rank, most severe first. Unrecognized labels rank with Moderate.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Severe => 0,
            Severity::Moderate | Severity::Other(_) => 1,
            Severity::Mild => 2,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Severity::Mild => 1.0,
            Severity::Moderate => 1.15,
            Severity::Severe => 1.3,
            Severity::Other(_) => 1.0,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Moderate
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        Severity::parse(&label)
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Mild => write!(f, "Mild"),
            Severity::Moderate => write!(f, "Moderate"),
            Severity::Severe => write!(f, "Severe"),
            Severity::Other(label) => write!(f, "{}", label),
        }
    }
}
