use serde::{Deserialize, Serialize};

/// A single timed unit of work for one company.
///
/// A session is **open** while `end_timestamp` is empty. Only the session
/// referenced by the profile's active pointer may be open.
///
/// Timestamps are kept as human-readable local time text. `start_epoch` and
/// `end_epoch` carry the same instants as seconds since the epoch and are used
/// for ordering and duration math; documents written before they existed
/// simply omit them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// 1-based position within the owning company, as text.
    pub session_id: String,
    /// What was done. Empty until clock-out.
    pub description: String,
    /// Pay rate in the profile currency per hour.
    pub pay: f64,
    pub start_timestamp: String,
    /// Empty while the session is open.
    #[serde(default)]
    pub end_timestamp: String,
    pub billing_status: BillingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_epoch: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_epoch: Option<i64>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.end_timestamp.is_empty()
    }
}

/// Billing state of a session.
///
/// - `Pending`: Not yet billed. The only state the tracker assigns.
/// - `Invoiced`: Included on an invoice
/// - `Paid`: Payment received
///
/// Any other stored value is preserved verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillingStatus {
    Pending,
    Invoiced,
    Paid,
    Other(String),
}

impl BillingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Invoiced => "Invoiced",
            Self::Paid => "Paid",
            Self::Other(s) => s,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Invoiced" => Self::Invoiced,
            "Paid" => Self::Paid,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for BillingStatus {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<BillingStatus> for String {
    fn from(status: BillingStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Identity of a session created or closed by the tracker, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRef {
    pub company_index: usize,
    pub session_index: usize,
    pub session_id: String,
    pub company_name: String,
    pub start_timestamp: String,
}
