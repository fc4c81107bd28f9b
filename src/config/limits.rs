//! Client-side input limits

use serde::Deserialize;

use super::error::ValidationError;

/// Limits checked before any backend call
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Minimum characters of an essay submitted for correction
    #[serde(default = "default_essay_min_chars")]
    pub essay_min_chars: usize,

    /// Largest document accepted for upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Rows fetched when listing history
    #[serde(default = "default_history_page_size")]
    pub history_page_size: usize,
}

impl LimitsConfig {
    /// Validate limits
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.essay_min_chars == 0 {
            return Err(ValidationError::InvalidLimit("essay_min_chars"));
        }
        if self.max_upload_bytes == 0 {
            return Err(ValidationError::InvalidLimit("max_upload_bytes"));
        }
        if self.history_page_size == 0 {
            return Err(ValidationError::InvalidLimit("history_page_size"));
        }
        Ok(())
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            essay_min_chars: default_essay_min_chars(),
            max_upload_bytes: default_max_upload_bytes(),
            history_page_size: default_history_page_size(),
        }
    }
}

fn default_essay_min_chars() -> usize {
    50
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_history_page_size() -> usize {
    100
}
