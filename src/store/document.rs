//! On-disk shape of the profile.
//!
//! ```json
//! { "freelancer": { "name": "...", "companies": [...], "totalEarnings": 0.0,
//!                   "currency": "USD", "activeCompanyIndex": -1,
//!                   "activeSessionIndex": -1 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{ActiveRef, Company, FreelancerProfile, DEFAULT_CURRENCY, DEFAULT_NAME};

const NO_ACTIVE: i64 = -1;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct Document {
    pub freelancer: FreelancerRecord,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FreelancerRecord {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub total_earnings: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "no_active")]
    pub active_company_index: i64,
    #[serde(default = "no_active")]
    pub active_session_index: i64,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn no_active() -> i64 {
    NO_ACTIVE
}

impl From<&FreelancerProfile> for Document {
    fn from(profile: &FreelancerProfile) -> Self {
        let (company, session) = match profile.active {
            Some(at) => (at.company_index as i64, at.session_index as i64),
            None => (NO_ACTIVE, NO_ACTIVE),
        };
        Self {
            freelancer: FreelancerRecord {
                name: profile.name.clone(),
                companies: profile.companies.clone(),
                total_earnings: profile.total_earnings,
                currency: profile.currency.clone(),
                active_company_index: company,
                active_session_index: session,
            },
        }
    }
}

impl From<Document> for FreelancerProfile {
    fn from(document: Document) -> Self {
        let record = document.freelancer;
        // Either index negative means idle
        let active = match (
            usize::try_from(record.active_company_index),
            usize::try_from(record.active_session_index),
        ) {
            (Ok(company_index), Ok(session_index)) => Some(ActiveRef {
                company_index,
                session_index,
            }),
            _ => None,
        };
        Self {
            name: record.name,
            companies: record.companies,
            total_earnings: record.total_earnings,
            currency: record.currency,
            active,
        }
    }
}
