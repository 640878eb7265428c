pub mod effects;
pub mod interactions;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use effects::{EffectFusion, FusedEffect};
pub use interactions::fuse_interactions;

pub const KNOWLEDGE_WEIGHT: f64 = 0.3;
pub const ADVISORY_WEIGHT: f64 = 0.7;
// Advisory-only effects below this probability are dropped.
pub const ADVISORY_ONLY_MIN_PROBABILITY: u32 = 15;
// Probability assumed for advisory effects that carry none.
pub const DEFAULT_ADVISORY_PROBABILITY: u32 = 50;
pub const MAX_FUSED_EFFECTS: usize = 10;
pub const MAX_KNOWLEDGE_EFFECTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    #[serde(rename = "ML Database")]
    KnowledgeBase,
    #[serde(rename = "AI Analysis")]
    Advisory,
    #[serde(rename = "ML+AI Merged")]
    Merged,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::KnowledgeBase => write!(f, "ML Database"),
            Provenance::Advisory => write!(f, "AI Analysis"),
            Provenance::Merged => write!(f, "ML+AI Merged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionPolicy {
    pub knowledge_weight: f64,
    pub advisory_weight: f64,
    pub advisory_only_min_probability: u32,
    pub max_fused_effects: usize,
    // How many scored knowledge-base effects enter fusion.
    pub max_knowledge_effects: usize,
}

impl Default for FusionPolicy {
    fn default() -> Self {
        Self {
            knowledge_weight: KNOWLEDGE_WEIGHT,
            advisory_weight: ADVISORY_WEIGHT,
            advisory_only_min_probability: ADVISORY_ONLY_MIN_PROBABILITY,
            max_fused_effects: MAX_FUSED_EFFECTS,
            max_knowledge_effects: MAX_KNOWLEDGE_EFFECTS,
        }
    }
}

impl FusionPolicy {
    pub fn blend(&self, knowledge: u32, advisory: u32) -> f64 {
        knowledge as f64 * self.knowledge_weight + advisory as f64 * self.advisory_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_blend() {
        let policy = FusionPolicy::default();
        assert_relative_eq!(policy.blend(60, 80), 74.0, epsilon = 1e-9);
        assert_relative_eq!(policy.blend(0, 100), 70.0, epsilon = 1e-9);
        assert_relative_eq!(policy.knowledge_weight + policy.advisory_weight, 1.0);
    }

    #[test]
    fn test_provenance_labels() {
        assert_eq!(serde_json::to_string(&Provenance::Merged).unwrap(), "\"ML+AI Merged\"");
        assert_eq!(Provenance::KnowledgeBase.to_string(), "ML Database");
        assert_eq!(Provenance::Advisory.to_string(), "AI Analysis");
    }
}
