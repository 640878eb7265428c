use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{EffectAnalysis, InteractionAnalysis};
use crate::error::{AdrError, AdrResult};

pub fn parse_effect_analysis(response: &str) -> AdrResult<EffectAnalysis> {
    parse_object(response)
}

pub fn parse_interaction_analysis(response: &str) -> AdrResult<InteractionAnalysis> {
    parse_object(response)
}

// Parse a model response that should be a single JSON object, tolerating
// prose or code fences around it.
fn parse_object<T: DeserializeOwned>(response: &str) -> AdrResult<T> {
    let value = match serde_json::from_str::<Value>(response.trim()) {
        Ok(value) => value,
        Err(_) => {
            let embedded = extract_object(response)?;
            serde_json::from_str::<Value>(embedded)
                .map_err(|e| AdrError::MalformedAdvisory(e.to_string()))?
        }
    };

    if !value.is_object() {
        return Err(AdrError::MalformedAdvisory(
            "Response is not a JSON object".to_string()
        ));
    }

    serde_json::from_value(value).map_err(|e| AdrError::MalformedAdvisory(e.to_string()))
}

fn extract_object(response: &str) -> AdrResult<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| AdrError::MalformedAdvisory("No JSON object found".to_string()))?;
    let end = response
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| AdrError::MalformedAdvisory("Unclosed JSON object".to_string()))?;
    Ok(&response[start..=end])
}
