//! Project domain model and write-side inputs.
//!
//! # Invariants
//! - `user_id` never changes after creation.
//! - `name` is non-blank and `domain` is an absolute URL.
//! - `settings` is always a JSON object (possibly empty).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::user::UserId;
use super::validation::{validate_domain, validate_project_name, ValidationError};

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Free-form per-project settings blob.
pub type ProjectSettings = Map<String, Value>;

/// A tracked website owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub domain: String,
    pub user_id: UserId,
    pub settings: ProjectSettings,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Project {
    /// Builds a validated project owned by `owner`, stamped at `now`.
    pub fn create(owner: UserId, input: NewProject, now: i64) -> Result<Self, ValidationError> {
        input.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name,
            domain: input.domain,
            user_id: owner,
            settings: input.settings.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a validated patch in place and bumps `updated_at`.
    pub fn apply(&mut self, patch: &ProjectPatch, now: i64) -> Result<(), ValidationError> {
        patch.validate()?;
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(domain) = &patch.domain {
            self.domain = domain.clone();
        }
        if let Some(settings) = &patch.settings {
            self.settings = settings.clone();
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Input for `project.create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    /// Must already carry a scheme; the UI prepends `https://` when missing.
    pub domain: String,
    #[serde(default)]
    pub settings: Option<ProjectSettings>,
}

impl NewProject {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_project_name(&self.name)?;
        validate_domain(&self.domain)
    }
}

/// Partial update for `project.update`. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub settings: Option<ProjectSettings>,
}

impl ProjectPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_project_name(name)?;
        }
        if let Some(domain) = &self.domain {
            validate_domain(domain)?;
        }
        Ok(())
    }
}
