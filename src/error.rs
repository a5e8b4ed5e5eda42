use std::path::PathBuf;

use thiserror::Error;

use crate::command::ActionError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid flag '{name}': {reason}")]
    InvalidFlag { name: String, reason: String },

    #[error("Invalid command '{name}': {reason}")]
    InvalidCommand { name: String, reason: String },

    #[error("Failed to parse arguments for {scope}: {source}")]
    Tokenize {
        scope: String,
        source: clap::Error,
    },

    #[error("Invalid value '{value}' for flag '-{flag}': {reason}")]
    BadValue {
        flag: String,
        value: String,
        reason: String,
    },

    #[error("Invalid value '{value}' in environment variable {var}: {reason}")]
    EnvValue {
        var: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config value for '{key}': {reason}")]
    ConfigValue { key: String, reason: String },

    #[error("{}", invalid_value_message(.field, .value, .options))]
    InvalidValue {
        field: String,
        value: String,
        options: Vec<String>,
    },

    #[error("No action defined for command '{command}'")]
    NoAction { command: String },

    #[error("Action failed for {command}: {source}")]
    Action {
        command: String,
        source: ActionError,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

fn invalid_value_message(field: &str, value: &str, options: &[String]) -> String {
    if value.is_empty() {
        return format!("Invalid value for '{field}' VALUE: (empty)");
    }
    format!(
        "Invalid value for '{field}' VALUE not valid '{value}', VALID options are [{}]",
        options.join(" ")
    )
}

impl CliError {
    /// Errors that indicate a mistake in the CLI definition or an untrusted
    /// config document, rather than a bad user argument.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CliError::InvalidFlag { .. }
                | CliError::InvalidCommand { .. }
                | CliError::ConfigRead { .. }
                | CliError::ConfigParse { .. }
                | CliError::ConfigValue { .. }
        )
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
