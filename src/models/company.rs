use serde::{Deserialize, Serialize};

use super::session::Session;

/// A client company that work sessions are recorded against.
///
/// Sessions keep creation order. Companies are never deleted, so positions
/// in the profile stay stable for the lifetime of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub company_name: String,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            company_name: name.into(),
            sessions: Vec::new(),
        }
    }

    /// The id the next session created for this company will get.
    pub fn next_session_id(&self) -> String {
        (self.sessions.len() + 1).to_string()
    }
}

/// One line of the company listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySummary {
    pub index: usize,
    pub name: String,
    pub session_count: usize,
}
