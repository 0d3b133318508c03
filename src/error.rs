//! Error types for fetching and parsing IAM policies

use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while fetching or parsing a project's IAM policy
#[derive(Debug, Error)]
pub enum PrincipalsError {
    /// The policy tool could not be started at all
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The policy tool ran but exited unsuccessfully; `stderr` is the
    /// tool's error output exactly as captured
    #[error("Error fetching IAM policy ({status}): {stderr}")]
    ExternalTool { status: ExitStatus, stderr: String },

    /// The policy tool printed something that is not UTF-8
    #[error("Policy output is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The policy tool printed something that is not a policy document
    #[error("Failed to parse IAM policy: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err: PrincipalsError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Failed to parse IAM policy"));
    }

    #[test]
    fn test_spawn_error_names_program() {
        let err = PrincipalsError::Spawn {
            program: "gcloud".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("gcloud"));
    }
}
