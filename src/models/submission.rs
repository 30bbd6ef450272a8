use chrono::{DateTime, Utc};
use rocket_okapi::okapi::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acknowledgement returned by the office once a request is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub reference: Uuid,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl Confirmation {
    pub fn new(message: impl Into<String>) -> Self {
        Confirmation {
            reference: Uuid::new_v4(),
            message: message.into(),
            received_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// The display text is whatever the receiving side reported.
    #[error("{0}")]
    SubmissionFailed(String),
}
