//! Report Rendering
//!
//! Principals and their roles, each sorted ascending.

use clap::ValueEnum;
use serde_json::{Map, Value};

use crate::policy::{PrincipalRoles, Role};

/// Placeholder printed for a binding that had no role
pub const MISSING_ROLE: &str = "None";

/// Output format of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `principal:` header followed by `  - role` lines
    Text,
    /// JSON object of principal -> array of roles
    Json,
}

fn role_label(role: &Role) -> &str {
    role.as_deref().unwrap_or(MISSING_ROLE)
}

/// Render the mapping as text lines
///
/// ```text
/// alice@example.com:
///   - roles/editor
///   - roles/viewer
/// ```
pub fn render(mapping: &PrincipalRoles) -> Vec<String> {
    let mut lines = Vec::new();
    for (principal, roles) in mapping {
        lines.push(format!("{}:", principal));
        lines.extend(roles.iter().map(|role| format!("  - {}", role_label(role))));
    }
    lines
}

/// Render the mapping as a JSON object; a missing role becomes `null`
pub fn render_json(mapping: &PrincipalRoles) -> Value {
    let object: Map<String, Value> = mapping
        .iter()
        .map(|(principal, roles)| {
            let roles = roles
                .iter()
                .map(|role| role.clone().map_or(Value::Null, Value::String))
                .collect();
            (principal.clone(), Value::Array(roles))
        })
        .collect();
    Value::Object(object)
}
