use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub tags: Vec<String>,
}

impl KeywordRule {
    pub fn new(keyword: &str, tags: &[&str]) -> Self {
        Self {
            keyword: keyword.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVocabulary {
    pub conditions: Vec<KeywordRule>,
    pub medications: Vec<KeywordRule>,
    pub allergies: Vec<KeywordRule>,
    pub lifestyle: Vec<KeywordRule>,
}

impl Default for RiskVocabulary {
    fn default() -> Self {
        Self {
            conditions: default_conditions(),
            medications: default_medications(),
            allergies: default_allergies(),
            lifestyle: default_lifestyle(),
        }
    }
}

fn default_conditions() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new("diabetes", &["diabetes", "prediabetes"]),
        KeywordRule::new("heart disease", &["heart_disease", "cardiovascular"]),
        KeywordRule::new("kidney disease", &["kidney_disease"]),
        KeywordRule::new("liver disease", &["liver_disease"]),
        KeywordRule::new("asthma", &["asthma"]),
        KeywordRule::new("copd", &["copd"]),
        KeywordRule::new("hypertension", &["hypertension"]),
        KeywordRule::new("depression", &["depression_history", "psychiatric_disorder"]),
        KeywordRule::new("anxiety", &["psychiatric_disorder"]),
        KeywordRule::new("seizures", &["seizure_history"]),
        KeywordRule::new("epilepsy", &["seizure_history"]),
        KeywordRule::new("bleeding disorder", &["bleeding_disorder"]),
        KeywordRule::new("stomach ulcer", &["stomach_ulcer", "gerd"]),
        KeywordRule::new("gerd", &["gerd"]),
        KeywordRule::new("osteoporosis", &["osteoporosis"]),
        KeywordRule::new("glaucoma", &["glaucoma_history"]),
        KeywordRule::new("prostate enlargement", &["prostate_enlargement"]),
        KeywordRule::new("substance abuse", &["substance_abuse_history"]),
        KeywordRule::new("pregnancy", &["pregnant"]),
    ]
}

fn default_medications() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new("warfarin", &["anticoagulant_use"]),
        KeywordRule::new("aspirin", &["nsaid_use", "antiplatelet_use"]),
        KeywordRule::new("ibuprofen", &["nsaid_use"]),
        KeywordRule::new("naproxen", &["nsaid_use"]),
        KeywordRule::new("prednisone", &["steroid_use"]),
        KeywordRule::new("opioid", &["opioid_use"]),
        KeywordRule::new("hydrocodone", &["opioid_use"]),
        KeywordRule::new("oxycodone", &["opioid_use"]),
        KeywordRule::new("morphine", &["opioid_use"]),
        KeywordRule::new("fentanyl", &["opioid_use"]),
        KeywordRule::new("tramadol", &["opioid_use", "tramadol_use"]),
        KeywordRule::new("ssri", &["ssri_use"]),
        KeywordRule::new("sertraline", &["ssri_use"]),
        KeywordRule::new("fluoxetine", &["ssri_use"]),
        KeywordRule::new("escitalopram", &["ssri_use"]),
        KeywordRule::new("maoi", &["maoi_use"]),
        KeywordRule::new("benzodiazepine", &["benzodiazepine_use"]),
        KeywordRule::new("alprazolam", &["benzodiazepine_use"]),
        KeywordRule::new("diazepam", &["benzodiazepine_use"]),
        KeywordRule::new("lorazepam", &["benzodiazepine_use"]),
        KeywordRule::new("clonazepam", &["benzodiazepine_use"]),
        KeywordRule::new("diuretic", &["diuretic_use"]),
        KeywordRule::new("ace inhibitor", &["ace_inhibitor_use"]),
        KeywordRule::new("lisinopril", &["ace_inhibitor_use"]),
        KeywordRule::new("valproic acid", &["valproic_acid_use"]),
        KeywordRule::new("ppi", &["ppi_use"]),
        KeywordRule::new("omeprazole", &["ppi_use"]),
        KeywordRule::new("potassium", &["potassium_supplements"]),
    ]
}

fn default_allergies() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new("penicillin", &["penicillin_allergy"]),
        KeywordRule::new("aspirin", &["aspirin_allergy"]),
    ]
}

fn default_lifestyle() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new("alcohol", &["alcohol_use"]),
        KeywordRule::new("smoking", &["smoking"]),
        KeywordRule::new("sedentary", &["sedentary"]),
    ]
}
