//! Session lifecycle: the Idle ↔ Active state machine.
//!
//! The free functions [`start_session`] and [`clock_out`] transform an owned
//! profile in memory. [`Tracker`] pairs a profile with its [`RecordStore`] and
//! saves after every successful transition.
//!
//! Starting a session while another is open closes the open one first, with
//! its description left as it was. At most one session is ever open.

use crate::clock::{format_timestamp, Clock, SystemClock};
use crate::error::{Result, TimecardError};
use crate::models::*;
use crate::store::RecordStore;

/// Which company a new session is recorded against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanySelector {
    /// Position in the profile's company list.
    Existing(usize),
    /// Create a company with this name and use it.
    New(String),
}

/// Result of starting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    pub session: SessionRef,
    /// The session that was open when this one started, now closed.
    pub auto_closed: Option<SessionRef>,
}

/// Result of a clock-out request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockOutOutcome {
    /// Nothing was open; the profile is unchanged.
    NoActiveSession,
    Closed(ClosedSession),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedSession {
    pub session: SessionRef,
    pub end_timestamp: String,
    pub description: String,
}

/// Open a new session for the selected company and make it the active one.
///
/// The pay rate must be finite and non-negative. All input is validated before
/// the profile is touched.
pub fn start_session(
    profile: &mut FreelancerProfile,
    selector: CompanySelector,
    pay_rate: f64,
    clock: &impl Clock,
) -> Result<StartOutcome> {
    if !pay_rate.is_finite() || pay_rate < 0.0 {
        return Err(TimecardError::validation(format!(
            "pay rate must be a non-negative number, got {}",
            pay_rate
        )));
    }
    match &selector {
        CompanySelector::Existing(index) if *index >= profile.companies.len() => {
            return Err(TimecardError::validation(format!(
                "no company at position {} ({} companies)",
                index + 1,
                profile.companies.len()
            )));
        }
        CompanySelector::New(name) if name.trim().is_empty() => {
            return Err(TimecardError::validation("company name must not be empty"));
        }
        _ => {}
    }

    let now = clock.now();
    let timestamp = format_timestamp(&now);
    let epoch = now.timestamp();

    let auto_closed = close_active(profile, None, &timestamp, epoch).map(|closed| {
        tracing::info!(
            "Closed session {} for {} before starting a new one",
            closed.session.session_id,
            closed.session.company_name
        );
        closed.session
    });

    let company_index = match selector {
        CompanySelector::Existing(index) => index,
        CompanySelector::New(name) => {
            let index = profile.add_company(&name)?;
            tracing::info!("Added company {}", profile.companies[index].company_name);
            index
        }
    };

    let company = &mut profile.companies[company_index];
    let session_id = company.next_session_id();
    company.sessions.push(Session {
        session_id: session_id.clone(),
        description: String::new(),
        pay: pay_rate,
        start_timestamp: timestamp.clone(),
        end_timestamp: String::new(),
        billing_status: BillingStatus::Pending,
        start_epoch: Some(epoch),
        end_epoch: None,
    });
    let session_index = company.sessions.len() - 1;
    let company_name = company.company_name.clone();

    profile.active = Some(ActiveRef {
        company_index,
        session_index,
    });

    tracing::info!(
        "Started session {} for {} at {} ({}/h)",
        session_id,
        company_name,
        timestamp,
        pay_rate
    );

    Ok(StartOutcome {
        session: SessionRef {
            company_index,
            session_index,
            session_id,
            company_name,
            start_timestamp: timestamp,
        },
        auto_closed,
    })
}

/// Close the active session with the given description.
///
/// When idle this reports [`ClockOutOutcome::NoActiveSession`] and changes
/// nothing.
pub fn clock_out(
    profile: &mut FreelancerProfile,
    description: &str,
    clock: &impl Clock,
) -> ClockOutOutcome {
    let now = clock.now();
    let timestamp = format_timestamp(&now);
    match close_active(profile, Some(description), &timestamp, now.timestamp()) {
        Some(closed) => {
            tracing::info!(
                "Clocked out of session {} for {} at {}",
                closed.session.session_id,
                closed.session.company_name,
                closed.end_timestamp
            );
            ClockOutOutcome::Closed(closed)
        }
        None => ClockOutOutcome::NoActiveSession,
    }
}

/// End the session under the active pointer and clear the pointer.
/// `description` replaces the stored one when given.
fn close_active(
    profile: &mut FreelancerProfile,
    description: Option<&str>,
    timestamp: &str,
    epoch: i64,
) -> Option<ClosedSession> {
    // Clearing first leaves the profile idle even if the pointer dangles
    let at = profile.active.take()?;
    let company = profile.companies.get_mut(at.company_index)?;
    let company_name = company.company_name.clone();
    let session = company.sessions.get_mut(at.session_index)?;

    session.end_timestamp = timestamp.to_string();
    session.end_epoch = Some(epoch);
    if let Some(description) = description {
        session.description = description.to_string();
    }

    let closed = ClosedSession {
        session: SessionRef {
            company_index: at.company_index,
            session_index: at.session_index,
            session_id: session.session_id.clone(),
            company_name,
            start_timestamp: session.start_timestamp.clone(),
        },
        end_timestamp: session.end_timestamp.clone(),
        description: session.description.clone(),
    };
    Some(closed)
}

/// A profile bound to its store and clock. Every mutation is saved before
/// returning.
///
/// If a save fails the in-memory profile keeps the change and the error is
/// returned; calling [`Tracker::save`] again retries.
pub struct Tracker<C: Clock = SystemClock> {
    store: RecordStore,
    profile: FreelancerProfile,
    clock: C,
}

impl Tracker<SystemClock> {
    /// Load the profile from `store`, or start with `fallback()` if there is
    /// nothing usable on disk.
    pub fn open(store: RecordStore, fallback: impl FnOnce() -> FreelancerProfile) -> Self {
        let profile = store.load_or_else(fallback);
        Self::with_clock(store, profile, SystemClock)
    }
}

impl<C: Clock> Tracker<C> {
    pub fn with_clock(store: RecordStore, profile: FreelancerProfile, clock: C) -> Self {
        Self {
            store,
            profile,
            clock,
        }
    }

    pub fn profile(&self) -> &FreelancerProfile {
        &self.profile
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn save(&self) -> Result<()> {
        self.store.save(&self.profile)
    }

    pub fn add_company(&mut self, name: &str) -> Result<usize> {
        let index = self.profile.add_company(name)?;
        tracing::info!("Added company {}", self.profile.companies[index].company_name);
        self.save()?;
        Ok(index)
    }

    pub fn start_session(&mut self, selector: CompanySelector, pay_rate: f64) -> Result<StartOutcome> {
        let outcome = start_session(&mut self.profile, selector, pay_rate, &self.clock)?;
        self.save()?;
        Ok(outcome)
    }

    /// Close the active session. Saves only when something was closed.
    pub fn clock_out(&mut self, description: &str) -> Result<ClockOutOutcome> {
        let outcome = clock_out(&mut self.profile, description, &self.clock);
        if matches!(outcome, ClockOutOutcome::Closed(_)) {
            self.save()?;
        }
        Ok(outcome)
    }
}
