use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;
use crate::github::url::parse_repo_url;
use crate::secrets::has_secret_source;

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
        .map(|e| format!("{} at {}", e, e.instance_path()))
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Validate version
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    // The bind address must be a parseable socket address
    if config.bind_addr.parse::<std::net::SocketAddr>().is_err() {
        return Err(ConfigError::Validation {
            message: format!("Invalid bind_addr: {}", config.bind_addr),
        });
    }

    // The default master URL, if set, must be a valid GitHub repo URL
    if let Some(url) = &config.master_repo_url {
        if parse_repo_url(url).is_none() {
            return Err(ConfigError::InvalidRepoUrl {
                url: url.clone(),
                reason: "expected https://github.com/{owner}/{repo}".to_string(),
            });
        }
    }

    // A GitHub token source must be configured somewhere
    if !has_secret_source(
        config.github.token.as_deref(),
        config.github.token_file.as_deref(),
        config.github.token_env_var.as_deref(),
    ) {
        return Err(ConfigError::Validation {
            message: "No GitHub token source configured (token, token_file or token_env_var)"
                .to_string(),
        });
    }

    Ok(())
}
