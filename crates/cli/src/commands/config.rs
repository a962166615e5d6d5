use std::env;
use std::fs;
use std::path::Path;

use anyhow::Context;
use interiq_core::config::{resolve_config_path, AppConfig, LoadOptions};
use serde::Serialize;
use toml::Value;

use crate::commands::{CommandResult, EXIT_INVALID_INPUT};

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_INVALID_INPUT,
            )
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = match config_file_path.as_deref().map(load_config_file_doc).transpose() {
        Ok(doc) => doc,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_file",
                format!("{error:#}"),
                EXIT_INVALID_INPUT,
            )
        }
    };
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let entries = vec![
        ConfigEntry {
            key: "database.url",
            value: config.database.url.clone(),
            source: source("database.url", &["INTERIQ_DATABASE_URL"]),
        },
        ConfigEntry {
            key: "database.max_connections",
            value: config.database.max_connections.to_string(),
            source: source("database.max_connections", &["INTERIQ_DATABASE_MAX_CONNECTIONS"]),
        },
        ConfigEntry {
            key: "database.timeout_secs",
            value: config.database.timeout_secs.to_string(),
            source: source("database.timeout_secs", &["INTERIQ_DATABASE_TIMEOUT_SECS"]),
        },
        ConfigEntry {
            key: "server.bind_address",
            value: config.server.bind_address.clone(),
            source: source("server.bind_address", &["INTERIQ_SERVER_BIND_ADDRESS"]),
        },
        ConfigEntry {
            key: "server.port",
            value: config.server.port.to_string(),
            source: source("server.port", &["INTERIQ_SERVER_PORT"]),
        },
        ConfigEntry {
            key: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            source: source(
                "server.graceful_shutdown_secs",
                &["INTERIQ_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            ),
        },
        ConfigEntry {
            key: "leads.store",
            value: config.leads.store.as_str().to_string(),
            source: source("leads.store", &["INTERIQ_LEADS_STORE"]),
        },
        ConfigEntry {
            key: "leads.memory_capacity",
            value: config.leads.memory_capacity.to_string(),
            source: source("leads.memory_capacity", &["INTERIQ_LEADS_MEMORY_CAPACITY"]),
        },
        ConfigEntry {
            key: "catalog.path",
            value: config
                .catalog
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<standard>".to_string()),
            source: source("catalog.path", &["INTERIQ_CATALOG_PATH"]),
        },
        ConfigEntry {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source("logging.level", &["INTERIQ_LOGGING_LEVEL", "INTERIQ_LOG_LEVEL"]),
        },
        ConfigEntry {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_ascii_lowercase(),
            source: source("logging.format", &["INTERIQ_LOGGING_FORMAT", "INTERIQ_LOG_FORMAT"]),
        },
    ];

    CommandResult::with_result(
        "config",
        "effective config (source precedence: env > file > default)",
        &entries,
    )
}

fn load_config_file_doc(path: &Path) -> anyhow::Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read config file `{}`", path.display()))?;
    raw.parse::<Value>()
        .with_context(|| format!("could not parse config file `{}`", path.display()))
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
