//! GCP Principals Library
//!
//! Fetches a project's IAM policy through the `gcloud` CLI and regroups it
//! from role -> members into principal -> roles.

pub mod error;
pub mod gcloud;
pub mod policy;
pub mod report;

pub use error::PrincipalsError;
pub use gcloud::{GcloudCli, PolicySource};
pub use policy::{invert, Policy, PrincipalRoles};
pub use report::{render, render_json, OutputFormat};

use tracing::{info, warn};

/// Fetch a project's policy and invert it
pub async fn list_principals(
    source: &dyn PolicySource,
    project_id: &str,
) -> Result<PrincipalRoles, PrincipalsError> {
    let policy = source.fetch_policy(project_id).await?;

    let missing_roles = policy.bindings().iter().filter(|b| b.role.is_none()).count();
    if missing_roles > 0 {
        warn!(count = missing_roles, "Policy has bindings without a role");
    }

    let mapping = invert(&policy);
    info!(
        project = %project_id,
        bindings = policy.bindings().len(),
        principals = mapping.len(),
        "Policy inverted"
    );

    Ok(mapping)
}
