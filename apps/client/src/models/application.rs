#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One addressee of a batch application send.
///
/// A row is worth sending only when both fields are filled in; blank rows are
/// editing scratch space and get filtered out at submission time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub email: String,
    pub company_name: String,
}

impl Recipient {
    pub fn new(email: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            company_name: company_name.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.email.is_empty() && !self.company_name.is_empty()
    }
}

/// One line of the send history, exactly as the backend reports it.
/// A read-only projection — the client never mutates these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub company_name: String,
    pub recipient_email: String,
    pub sent_at: DateTime<Utc>,
    /// Free-form backend status ("Sent", "success", "failed", ...).
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "Sent".to_string()
}
