use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_limit, RecommendError, Result};
use crate::feed::FeedBudget;
use crate::reputation::{validate_smoothing, DEFAULT_SMOOTHING};

/// Tunables of the recommender.
/// Every field has a default, so `{}` is a valid config.
///
/// ```json
/// {
///   "feed": {"total": 10, "following_slice": 6, "tag_slice": 4},
///   "reputation": {"smoothing": 5.0},
///   "likes": {"default_limit": 10},
///   "similar": {"default_limit": 10}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub feed: FeedBudget,
    pub reputation: ReputationConfig,
    pub likes: LimitConfig,
    pub similar: LimitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    /// Bayesian smoothing constant `m`, must be > 0
    pub smoothing: f64,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self { smoothing: DEFAULT_SMOOTHING }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    pub default_limit: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

impl RecommendConfig {
    pub fn validate(&self) -> Result<()> {
        self.feed.validate()?;
        validate_smoothing(self.reputation.smoothing)?;
        ensure_limit("likes.default_limit", self.likes.default_limit)?;
        ensure_limit("similar.default_limit", self.similar.default_limit)?;
        Ok(())
    }

    /// Parse and validate
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RecommendConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RecommendError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}
