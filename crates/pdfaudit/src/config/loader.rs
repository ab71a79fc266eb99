use std::path::Path;

use crate::config::schema::{Config, MIN_DPI};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();

    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

/// Semantic checks the schema cannot express. Also applied after CLI
/// overrides, so it is public.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.worker_count == 0 {
        return Err(ConfigError::Validation {
            message: "worker_count must be at least 1".to_string(),
        });
    }

    if config.ocr.dpi < MIN_DPI {
        return Err(ConfigError::Validation {
            message: format!(
                "ocr.dpi must be at least {} (got {})",
                MIN_DPI, config.ocr.dpi
            ),
        });
    }

    if config.ocr.languages.iter().all(|l| l.trim().is_empty()) {
        return Err(ConfigError::Validation {
            message: "ocr.languages must name at least one language".to_string(),
        });
    }

    let classification = &config.classification;
    for (name, value) in [
        (
            "low_similarity_threshold",
            classification.low_similarity_threshold,
        ),
        ("empty_page_fraction", classification.empty_page_fraction),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation {
                message: format!("classification.{} must be within [0, 1] (got {})", name, value),
            });
        }
    }

    if config.report.filename.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "report.filename must not be empty".to_string(),
        });
    }

    Ok(())
}
