use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const DEFAULT_THRESHOLD: f32 = 0.1;
pub const DEFAULT_FAQS_PATH: &str = "faqs.json";
pub const DEFAULT_INTERACTIONS_PATH: &str = "interactions.json";
pub const FALLBACK_MESSAGE: &str =
    "I'm sorry, I don't understand your question. Could you please rephrase it?";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub faqs_path: PathBuf,
    pub interactions_path: PathBuf,
    /// Minimum cosine similarity a candidate needs to be served.
    pub threshold: f32,
    pub fallback_message: String,
    /// When false, replies that fell back are served but not recorded.
    pub learn_fallbacks: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            faqs_path: PathBuf::from(DEFAULT_FAQS_PATH),
            interactions_path: PathBuf::from(DEFAULT_INTERACTIONS_PATH),
            threshold: DEFAULT_THRESHOLD,
            fallback_message: FALLBACK_MESSAGE.to_string(),
            learn_fallbacks: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }

        if self.fallback_message.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "fallback message must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
