use serde::{Deserialize, Serialize};

use super::company::{Company, CompanySummary};
use super::session::Session;
use crate::clock::local_epoch;
use crate::error::{Result, TimecardError};

pub const DEFAULT_NAME: &str = "John Doe";
pub const DEFAULT_CURRENCY: &str = "USD";

/// Position of the open session within the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRef {
    pub company_index: usize,
    pub session_index: usize,
}

/// The root document: one freelancer, their companies and sessions.
///
/// `active` points at the single open session, if any. It is a positional
/// reference into `companies`; since companies and sessions are only ever
/// appended, positions do not shift once assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct FreelancerProfile {
    pub name: String,
    pub companies: Vec<Company>,
    /// Carried through the document as-is; no operation recomputes it.
    pub total_earnings: f64,
    pub currency: String,
    pub active: Option<ActiveRef>,
}

impl Default for FreelancerProfile {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_CURRENCY)
    }
}

impl FreelancerProfile {
    pub fn new(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            companies: Vec::new(),
            total_earnings: 0.0,
            currency: currency.into(),
            active: None,
        }
    }

    pub fn session(&self, at: ActiveRef) -> Option<&Session> {
        self.companies
            .get(at.company_index)?
            .sessions
            .get(at.session_index)
    }

    /// The open session referenced by the active pointer.
    pub fn active_session(&self) -> Option<(&Company, &Session)> {
        let at = self.active?;
        let company = self.companies.get(at.company_index)?;
        let session = company.sessions.get(at.session_index)?;
        Some((company, session))
    }

    /// Append a company and return its index. Surrounding whitespace is
    /// trimmed; a blank name is rejected.
    pub fn add_company(&mut self, name: &str) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TimecardError::validation("company name must not be empty"));
        }
        self.companies.push(Company::new(name));
        Ok(self.companies.len() - 1)
    }

    pub fn list_companies(&self) -> Vec<CompanySummary> {
        self.companies
            .iter()
            .enumerate()
            .map(|(index, c)| CompanySummary {
                index,
                name: c.company_name.clone(),
                session_count: c.sessions.len(),
            })
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.companies.iter().map(|c| c.sessions.len()).sum()
    }

    /// Positions of every session without an end timestamp.
    pub fn open_sessions(&self) -> Vec<ActiveRef> {
        self.companies
            .iter()
            .enumerate()
            .flat_map(|(ci, c)| {
                c.sessions
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.is_open())
                    .map(move |(si, _)| ActiveRef {
                        company_index: ci,
                        session_index: si,
                    })
            })
            .collect()
    }

    /// Whether the at-most-one-open-session invariant holds: either nothing
    /// is open and the pointer is clear, or exactly the pointed-at session is
    /// open.
    pub fn is_consistent(&self) -> bool {
        let open = self.open_sessions();
        match self.active {
            None => open.is_empty(),
            Some(at) => open == [at],
        }
    }

    /// Clear a pointer that does not reference an existing open session.
    /// Returns true when the pointer was changed.
    pub fn repair_active_pointer(&mut self) -> bool {
        let Some(at) = self.active else {
            return false;
        };
        match self.session(at) {
            Some(session) if session.is_open() => false,
            _ => {
                self.active = None;
                true
            }
        }
    }

    /// Close every open session other than the active one, ending each at
    /// its own start. With no pointer, the latest-starting open session is
    /// kept open and becomes active. Returns the number of sessions closed.
    pub fn close_stray_sessions(&mut self) -> usize {
        let open = self.open_sessions();
        let keep = match self.active {
            Some(at) => Some(at),
            None => open
                .iter()
                .copied()
                .filter_map(|at| self.session(at).map(|s| (at, s)))
                .max_by_key(|(_, s)| s.start_epoch.or_else(|| local_epoch(&s.start_timestamp)))
                .map(|(at, _)| at),
        };
        self.active = keep;

        let mut closed = 0;
        for at in open.into_iter().filter(|at| Some(*at) != keep) {
            let session = &mut self.companies[at.company_index].sessions[at.session_index];
            session.end_timestamp = session.start_timestamp.clone();
            session.end_epoch = session.start_epoch;
            closed += 1;
        }
        closed
    }
}
