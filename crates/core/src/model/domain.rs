use serde::{Deserialize, Serialize};

use crate::model::DomainId;

/// A domain groups subjects into a top-level catalog area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}
