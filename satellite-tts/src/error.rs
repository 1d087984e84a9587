use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    #[error("Mimic was not found at {}. Run install-mimic.sh to install it, or set `bin` to the mimic executable", .path.display())]
    BinaryNotFound { path: PathBuf },

    #[error("Command `{command}` failed: {reason}")]
    ProcessExecutionFailure { command: String, reason: String },

    #[error("Malformed duration in transcript token '{token}': {reason}")]
    MalformedTranscriptValue { token: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TtsError>;
