//! Policy Fetching
//!
//! Fetches a project's IAM policy by shelling out to the `gcloud` CLI.
//! Authentication is entirely gcloud's business:
//! - Local: `gcloud auth login`
//! - CI / GKE: whatever account gcloud is configured with

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::PrincipalsError;
use crate::policy::Policy;

/// Default name of the policy tool, resolved through PATH
pub const DEFAULT_GCLOUD_BIN: &str = "gcloud";

/// Anything that can produce the IAM policy of a project
#[async_trait]
pub trait PolicySource: Send + Sync {
    async fn fetch_policy(&self, project_id: &str) -> Result<Policy, PrincipalsError>;
}

/// `gcloud projects get-iam-policy` wrapper
#[derive(Debug, Clone)]
pub struct GcloudCli {
    program: String,
}

impl Default for GcloudCli {
    fn default() -> Self {
        Self::new(DEFAULT_GCLOUD_BIN)
    }
}

impl GcloudCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the tool for a given project
    pub fn args(project_id: &str) -> [&str; 4] {
        ["projects", "get-iam-policy", project_id, "--format=json"]
    }
}

#[async_trait]
impl PolicySource for GcloudCli {
    async fn fetch_policy(&self, project_id: &str) -> Result<Policy, PrincipalsError> {
        debug!(program = %self.program, project = %project_id, "Fetching IAM policy");

        let output = Command::new(&self.program)
            .args(Self::args(project_id))
            .output()
            .await
            .map_err(|source| PrincipalsError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PrincipalsError::ExternalTool {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8(output.stdout)?;
        debug!(bytes = stdout.len(), "Policy fetched");

        parse_policy(&stdout)
    }
}

/// Parse the JSON policy document printed by the tool
pub fn parse_policy(json: &str) -> Result<Policy, PrincipalsError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_request_json() {
        assert_eq!(
            GcloudCli::args("my-project"),
            ["projects", "get-iam-policy", "my-project", "--format=json"]
        );
    }

    #[test]
    fn test_default_program() {
        assert_eq!(GcloudCli::default().program(), "gcloud");
    }

    #[test]
    fn test_parse_policy_rejects_garbage() {
        let err = parse_policy("ERROR: not json").unwrap_err();
        assert!(matches!(err, PrincipalsError::Parse(_)));
    }

    #[test]
    fn test_parse_policy_accepts_empty_object() {
        assert_eq!(parse_policy("{}").unwrap(), Policy::default());
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let cli = GcloudCli::new("/nonexistent/gcloud-principals-test-bin");
        let err = cli.fetch_policy("my-project").await.unwrap_err();
        assert!(matches!(err, PrincipalsError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let cli = GcloudCli::new("false");
        let err = cli.fetch_policy("my-project").await.unwrap_err();
        match err {
            PrincipalsError::ExternalTool { status, .. } => assert!(!status.success()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stderr_is_passed_through_verbatim() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("gcloud");
        std::fs::write(
            &script,
            "#!/bin/sh\nprintf '  ERROR: denied\\n\\n' >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let cli = GcloudCli::new(script.to_string_lossy());
        match cli.fetch_policy("my-project").await.unwrap_err() {
            PrincipalsError::ExternalTool { stderr, .. } => {
                assert_eq!(stderr, "  ERROR: denied\n\n")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
