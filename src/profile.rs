use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{AdrError, AdrResult};

const MAX_AGE: u32 = 130;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientProfile {
    pub age: Option<u32>,
    #[serde(alias = "gender")]
    pub sex: Option<String>,
    pub weight: Option<f64>,       // kg
    pub medical_conditions: Vec<String>,
    pub current_medications: Vec<String>,
    pub allergies: Vec<String>,
    pub lifestyle: Vec<String>,
    pub dosage: Option<u32>,       // mg
    pub duration: Option<u32>,     // days
}

impl PatientProfile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> AdrResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let profile: PatientProfile = serde_json::from_str(&content)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> AdrResult<()> {
        if let Some(age) = self.age {
            if age > MAX_AGE {
                return Err(AdrError::InvalidProfile(
                    format!("Age {} is out of range (0-{})", age, MAX_AGE)
                ));
            }
        }

        if let Some(weight) = self.weight {
            if !(weight > 0.0) {
                return Err(AdrError::InvalidProfile(
                    "Weight must be positive".to_string()
                ));
            }
        }

        if self.dosage == Some(0) {
            return Err(AdrError::InvalidProfile(
                "Dosage must be positive".to_string()
            ));
        }

        if self.duration == Some(0) {
            return Err(AdrError::InvalidProfile(
                "Duration must be positive".to_string()
            ));
        }

        Ok(())
    }

    // Medications to screen for interactions with `drug`: the current
    // medication list followed by the queried drug. Empty when the patient
    // takes nothing else.
    pub fn interaction_candidates(&self, drug: &str) -> Vec<String> {
        if self.current_medications.is_empty() {
            return Vec::new();
        }
        let mut meds = self.current_medications.clone();
        meds.push(drug.to_string());
        meds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_json_with_missing_fields() {
        let json = r#"{"age": 70, "gender": "Female", "current_medications": ["Warfarin"]}"#;
        let profile: PatientProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.age, Some(70));
        assert_eq!(profile.sex.as_deref(), Some("Female"));
        assert!(profile.allergies.is_empty());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_zero_dosage_rejected() {
        let profile = PatientProfile { dosage: Some(0), ..Default::default() };
        assert!(matches!(profile.validate(), Err(AdrError::InvalidProfile(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let profile = PatientProfile { weight: Some(-4.0), ..Default::default() };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_interaction_candidates() {
        let profile = PatientProfile {
            current_medications: vec!["Warfarin".to_string()],
            ..Default::default()
        };
        assert_eq!(profile.interaction_candidates("Ibuprofen"), vec!["Warfarin", "Ibuprofen"]);
        assert!(PatientProfile::default().interaction_candidates("Ibuprofen").is_empty());
    }
}
