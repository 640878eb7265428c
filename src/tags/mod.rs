pub mod vocabulary;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use log::debug;

use crate::matching;
use crate::profile::PatientProfile;

pub use vocabulary::*;

pub const ELDERLY: &str = "elderly";
pub const CHILD: &str = "child";
pub const YOUNG_ADULT: &str = "young_adult";
pub const ALLERGY_HISTORY: &str = "allergy_history";
pub const LONG_TERM_USE: &str = "long_term_use";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskTagSet(BTreeSet<String>);

impl RiskTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, tag: S) -> bool {
        self.0.insert(tag.into())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for RiskTagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

pub struct TagExtractor {
    vocabulary: RiskVocabulary,
}

impl Default for TagExtractor {
    fn default() -> Self {
        Self::new(RiskVocabulary::default())
    }
}

impl TagExtractor {
    pub fn new(vocabulary: RiskVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn extract(&self, profile: &PatientProfile) -> RiskTagSet {
        let mut tags = RiskTagSet::new();

        if let Some(age) = profile.age {
            if let Some(band) = age_band(age) {
                tags.insert(band);
            }
        }

        if let Some(sex) = profile.sex.as_deref().and_then(normalize_sex) {
            tags.insert(sex);
        }

        apply_rules(&self.vocabulary.conditions, &profile.medical_conditions, &mut tags);
        apply_rules(&self.vocabulary.medications, &profile.current_medications, &mut tags);
        apply_rules(&self.vocabulary.allergies, &profile.allergies, &mut tags);
        apply_rules(&self.vocabulary.lifestyle, &profile.lifestyle, &mut tags);

        if !profile.allergies.is_empty() {
            tags.insert(ALLERGY_HISTORY);
        }

        debug!("Extracted {} risk tags: {:?}", tags.len(), tags.to_vec());
        tags
    }
}

fn age_band(age: u32) -> Option<&'static str> {
    if age >= 65 {
        Some(ELDERLY)
    } else if age <= 18 {
        Some(CHILD)
    } else if age <= 25 {
        Some(YOUNG_ADULT)
    } else {
        None
    }
}

fn normalize_sex(label: &str) -> Option<&'static str> {
    match matching::normalize(label).as_str() {
        "male" | "m" | "man" => Some("male"),
        "female" | "f" | "woman" => Some("female"),
        _ => None,
    }
}

fn apply_rules(rules: &[KeywordRule], entries: &[String], tags: &mut RiskTagSet) {
    for entry in entries {
        for rule in rules {
            if matching::contains(entry, &rule.keyword) {
                for tag in &rule.tags {
                    tags.insert(tag.as_str());
                }
            }
        }
    }
}
