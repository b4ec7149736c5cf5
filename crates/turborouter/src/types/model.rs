//! Model catalogue types

use serde::{Deserialize, Serialize};

use super::timestamp;

/// Response from the model listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsResponse {
    /// Available models
    #[serde(default)]
    pub data: Vec<Model>,

    /// Object type (usually "list")
    #[serde(default)]
    pub object: String,
}

/// A model offered through OpenRouter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    /// Model identifier (e.g. "anthropic/claude-3.5-sonnet")
    pub id: String,

    /// Object type (usually "model")
    #[serde(default)]
    pub object: String,

    /// Unix timestamp the model was added
    #[serde(default)]
    pub created: i64,

    /// Owning organisation
    #[serde(default)]
    pub owned_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub root: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub parent: Option<String>,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Maximum context window in tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,

    /// Access permissions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permission: Vec<ModelPermission>,
}

impl Model {
    /// Creation time as a UTC timestamp.
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp(self.created)
    }

    /// Display name, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Permission entry attached to a model.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPermission {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub allow_create_engine: bool,
    pub allow_sampling: bool,
    pub allow_logprobs: bool,
    pub allow_search_indices: bool,
    pub allow_view: bool,
    pub allow_fine_tuning: bool,
    pub organization: String,
    pub group: Option<String>,
    pub is_blocking: bool,
}
