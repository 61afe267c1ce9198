use std::io;
use thiserror::Error;

/// Unified error type for the site generator
#[derive(Error, Debug)]
pub enum SitegenError {
    /// The completion endpoint could not produce a reply
    #[error("{0}")]
    Completion(String),

    /// The assistant reply did not hold exactly one fenced code block
    #[error("ambiguous or missing code block")]
    Format,

    /// A gallery submission was rejected before anything was written
    #[error("{0}")]
    Submission(String),

    /// Persistent store failures
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SitegenError {
    /// Message shown inline to the user when an interaction fails.
    pub fn user_message(&self) -> String {
        match self {
            SitegenError::Completion(detail) => {
                format!("Error while generating code. {}", detail)
            }
            SitegenError::Format => {
                "Something went wrong. Please try again or change the instructions.".to_string()
            }
            SitegenError::Submission(reason) | SitegenError::Input(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for SitegenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SitegenError::Completion(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            SitegenError::Completion(format!("Connection failed: {}", err))
        } else if err.is_status() {
            SitegenError::Completion(format!("API returned error status: {}", err))
        } else {
            SitegenError::Completion(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for SitegenError {
    fn from(err: serde_json::Error) -> Self {
        SitegenError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for SitegenError {
    fn from(err: serde_yml::Error) -> Self {
        SitegenError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<sqlx::Error> for SitegenError {
    fn from(err: sqlx::Error) -> Self {
        SitegenError::Store(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for SitegenError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        SitegenError::Input(format!("Readline error: {}", err))
    }
}
