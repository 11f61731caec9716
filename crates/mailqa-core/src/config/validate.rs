//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::llm::Role;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.ingest.text_column.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ingest.text_column must not be empty".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "generation.max_tokens must be > 0".into(),
            ));
        }
        if !(-2.0..=2.0).contains(&self.generation.frequency_penalty) {
            return Err(ConfigError::ValidationError(
                "generation.frequency_penalty must be between -2.0 and 2.0".into(),
            ));
        }
        if Role::parse(&self.generation.instruction_role).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "generation.instruction_role must be system, assistant or user (got '{}')",
                self.generation.instruction_role
            )));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
