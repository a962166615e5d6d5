pub mod catalog;
pub mod config;
pub mod estimate;
pub mod score;

use interiq_core::catalog::RateCatalog;
use interiq_core::config::{AppConfig, LoadOptions};
use serde::Serialize;
use serde_json::Value;

pub const EXIT_INVALID_INPUT: u8 = 2;
pub const EXIT_CATALOG_INVALID: u8 = 3;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            result: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    /// Success carrying a structured `result` alongside the message.
    pub fn with_result(command: &str, message: impl Into<String>, result: &impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => {
                let payload = CommandOutcome {
                    command: command.to_string(),
                    status: "ok".to_string(),
                    error_class: None,
                    message: message.into(),
                    result: Some(value),
                };
                Self { exit_code: 0, output: serialize_payload(payload) }
            }
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            result: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

/// Loads configuration and the catalog it points at, mapping failures to
/// command results.
pub(crate) fn load_catalog(command: &str) -> Result<(AppConfig, RateCatalog), CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("config validation failed: {error}"),
            EXIT_INVALID_INPUT,
        )
    })?;
    let catalog = RateCatalog::load_or_standard(config.catalog.path.as_deref()).map_err(|error| {
        CommandResult::failure(
            command,
            "catalog_validation",
            format!("rate catalog rejected: {error}"),
            EXIT_CATALOG_INVALID,
        )
    })?;
    Ok((config, catalog))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
