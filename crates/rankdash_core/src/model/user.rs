//! User domain model.
//!
//! Users are provisioned by the authentication collaborator; this core only
//! reads them and applies profile updates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::now_epoch_ms;

/// Stable identifier for a user.
pub type UserId = Uuid;

/// Subscription tier of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    #[default]
    Starter,
    Professional,
    Enterprise,
}

impl PlanType {
    /// Storage/wire label (`STARTER|PROFESSIONAL|ENTERPRISE`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "STARTER",
            Self::Professional => "PROFESSIONAL",
            Self::Enterprise => "ENTERPRISE",
        }
    }

    /// Parses a storage/wire label. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "STARTER" => Some(Self::Starter),
            "PROFESSIONAL" => Some(Self::Professional),
            "ENTERPRISE" => Some(Self::Enterprise),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Display name; absent until the user sets one.
    pub name: Option<String>,
    pub email: Option<String>,
    pub plan_type: PlanType,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    /// Creates a starter-plan user with a generated id.
    pub fn new(name: Option<String>, email: Option<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            plan_type: PlanType::Starter,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub plan_type: Option<PlanType>,
}
