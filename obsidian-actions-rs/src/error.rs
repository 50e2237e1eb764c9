//! Error types and exit codes for obsidian-actions.

use thiserror::Error;

/// Exit codes used by the command line tool.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_ARGUMENTS: i32 = 3;
    pub const EXECUTABLE_NOT_FOUND: i32 = 4;
    pub const REMOTE_ACTION_FAILED: i32 = 5;
}

/// Main error type for vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Contradictory or incomplete arguments, raised before anything is sent.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("xcall executable not found: {0}")]
    ExecutableNotFound(String),

    /// The plugin answered on its error channel.
    #[error("Remote action failed: {message}")]
    RemoteActionFailed { message: String, code: Option<i64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

impl VaultError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            VaultError::NotFound(_) => exit_code::NOT_FOUND,
            VaultError::InvalidArguments(_) => exit_code::INVALID_ARGUMENTS,
            VaultError::ExecutableNotFound(_) => exit_code::EXECUTABLE_NOT_FOUND,
            VaultError::RemoteActionFailed { .. } => exit_code::REMOTE_ACTION_FAILED,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Whether the plugin reported that the addressed item does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            VaultError::RemoteActionFailed { message, code } => {
                *code == Some(404) || message.to_lowercase().contains("not found")
            }
            _ => false,
        }
    }
}

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    GeneralError,
    NotFound,
    InvalidArguments,
    ExecutableNotFound,
    RemoteActionFailed,
}

impl ExitCode {
    /// Convert to exit code integer.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => exit_code::SUCCESS,
            ExitCode::GeneralError => exit_code::GENERAL_ERROR,
            ExitCode::NotFound => exit_code::NOT_FOUND,
            ExitCode::InvalidArguments => exit_code::INVALID_ARGUMENTS,
            ExitCode::ExecutableNotFound => exit_code::EXECUTABLE_NOT_FOUND,
            ExitCode::RemoteActionFailed => exit_code::REMOTE_ACTION_FAILED,
        }
    }
}
