use serde::{Deserialize, Serialize};

use crate::model::{LangCode, UserId};

/// The authenticated user's profile, as returned by the `me` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Me {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub language: LangCode,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl Me {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }

    /// Display name for menus: full name when present, username otherwise.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}
