//! Error types and handling for the `NearbyAI` application

use thiserror::Error;

/// Main error type for the `NearbyAI` application
#[derive(Error, Debug)]
pub enum NearbyAiError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Provider or agent communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Malformed provider payloads or agent text
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl NearbyAiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            NearbyAiError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            NearbyAiError::Api { .. } => {
                "Unable to reach the assistant. Please try again.".to_string()
            }
            NearbyAiError::Validation { message } => message.clone(),
            NearbyAiError::Parse { .. } => {
                "The assistant returned a response that could not be read.".to_string()
            }
            NearbyAiError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for NearbyAiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::parse(err.to_string())
        } else {
            Self::api(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = NearbyAiError::config("bad url");
        assert!(matches!(config_err, NearbyAiError::Config { .. }));

        let api_err = NearbyAiError::api("connection failed");
        assert!(matches!(api_err, NearbyAiError::Api { .. }));

        let validation_err = NearbyAiError::validation("invalid coordinates");
        assert!(matches!(validation_err, NearbyAiError::Validation { .. }));

        let parse_err = NearbyAiError::parse("no itinerary");
        assert!(matches!(parse_err, NearbyAiError::Parse { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = NearbyAiError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let api_err = NearbyAiError::api("test");
        assert!(api_err.user_message().contains("Unable to reach"));

        // validation messages are shown to the user as-is
        let validation_err = NearbyAiError::validation("Invalid coordinates!");
        assert_eq!(validation_err.user_message(), "Invalid coordinates!");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NearbyAiError = io_err.into();
        assert!(matches!(err, NearbyAiError::Io { .. }));
    }
}
