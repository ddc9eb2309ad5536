//! Intent domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A named trigger category owned by one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Intent {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Unique per tenant. Also keys the flow that this intent triggers.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One training utterance belonging to exactly one intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IntentExample {
    pub id: Uuid,
    pub intent_id: Uuid,
    pub example_text: String,
}

/// An intent together with its example utterances, as consumed by the
/// classifier. Example order is irrelevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentWithExamples {
    pub name: String,
    pub examples: Vec<String>,
}

impl IntentWithExamples {
    pub fn new(name: impl Into<String>, examples: Vec<String>) -> Self {
        Self {
            name: name.into(),
            examples,
        }
    }
}

/// Request body for creating an intent, optionally with initial examples.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateIntentRequest {
    #[validate(length(min = 1, max = 100, message = "Intent name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    pub examples: Vec<String>,
}

/// Request body for adding an example to an intent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddExampleRequest {
    #[validate(length(min = 1, max = 500, message = "Example must be 1-500 characters"))]
    pub text: String,
}
