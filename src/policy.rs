//! IAM Policy Model
//!
//! Types for the policy document printed by
//! `gcloud projects get-iam-policy --format=json`, and the inversion of its
//! role-centric bindings into a principal-centric mapping.
//!
//! Every field is optional on the wire. A missing `bindings` or `members`
//! list is treated as empty; a missing `role` is carried through as `None`.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// A role identifier, `None` when the binding carried no `role` field
pub type Role = Option<String>;

/// Principal identifier -> set of roles granted to it
pub type PrincipalRoles = BTreeMap<String, BTreeSet<Role>>;

// ============================================================
// Policy Document
// ============================================================

/// A project's IAM policy
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default)]
    pub bindings: Option<Vec<Binding>>,
    #[serde(default)]
    pub etag: Option<String>,
    #[serde(default)]
    pub version: Option<i32>,
}

impl Policy {
    /// Bindings in document order; absent and empty look the same
    pub fn bindings(&self) -> &[Binding] {
        self.bindings.as_deref().unwrap_or_default()
    }
}

/// One role granted to a list of members
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Binding {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub members: Option<Vec<String>>,
    #[serde(default)]
    pub condition: Option<Condition>,
}

impl Binding {
    pub fn members(&self) -> &[String] {
        self.members.as_deref().unwrap_or_default()
    }
}

/// IAM condition attached to a binding. Kept for fidelity; it does not
/// affect inversion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expression: Option<String>,
}

// ============================================================
// Members
// ============================================================

/// A member string split at its first colon
///
/// `user:alice@example.com` has kind `user` and principal
/// `alice@example.com`. A member with no colon is its own principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member<'a> {
    pub kind: Option<&'a str>,
    pub principal: &'a str,
}

impl<'a> Member<'a> {
    pub fn parse(member: &'a str) -> Self {
        match member.split_once(':') {
            Some((kind, principal)) => Self {
                kind: Some(kind),
                principal,
            },
            None => Self {
                kind: None,
                principal: member,
            },
        }
    }
}

/// Principal identifier of a member string
pub fn principal_of(member: &str) -> &str {
    Member::parse(member).principal
}

// ============================================================
// Inversion
// ============================================================

/// Invert role -> members bindings into principal -> roles
pub fn invert(policy: &Policy) -> PrincipalRoles {
    policy
        .bindings()
        .iter()
        .flat_map(|binding| {
            binding
                .members()
                .iter()
                .map(move |member| (principal_of(member), &binding.role))
        })
        .fold(PrincipalRoles::new(), |mut mapping, (principal, role)| {
            mapping
                .entry(principal.to_string())
                .or_default()
                .insert(role.clone());
            mapping
        })
}
