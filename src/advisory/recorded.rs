use std::path::{Path, PathBuf};
use log::debug;

use super::parse::{parse_effect_analysis, parse_interaction_analysis};
use super::{AdvisoryService, EffectAnalysis, EffectRequest, InteractionAnalysis};
use crate::error::{AdrError, AdrResult};

#[derive(Debug, Clone, Default)]
pub struct RecordedAdvisory {
    effects_response: Option<PathBuf>,
    interactions_response: Option<PathBuf>,
}

impl RecordedAdvisory {
    pub fn new(effects_response: Option<PathBuf>, interactions_response: Option<PathBuf>) -> Self {
        Self { effects_response, interactions_response }
    }

    fn read(path: Option<&Path>, kind: &str) -> AdrResult<String> {
        let path = path.ok_or_else(|| {
            AdrError::AdvisoryUnavailable(format!("no recorded {} response", kind))
        })?;
        debug!("Reading recorded {} response from {:?}", kind, path);
        Ok(std::fs::read_to_string(path)?)
    }
}

impl AdvisoryService for RecordedAdvisory {
    fn predict_effects(&self, request: &EffectRequest) -> AdrResult<EffectAnalysis> {
        debug!(
            "Recorded advisory consulted for {} ({} baseline effects)",
            request.drug_name,
            request.knowledge_effects.len()
        );
        let response = Self::read(self.effects_response.as_deref(), "side-effect")?;
        parse_effect_analysis(&response)
    }

    fn predict_interactions(&self, medications: &[String]) -> AdrResult<InteractionAnalysis> {
        debug!("Recorded advisory consulted for {} medications", medications.len());
        let response = Self::read(self.interactions_response.as_deref(), "interaction")?;
        parse_interaction_analysis(&response)
    }
}
