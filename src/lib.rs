//! Freelancer time tracking.
//!
//! A [`FreelancerProfile`](models::FreelancerProfile) holds client companies and
//! the work sessions recorded against them. At most one session is open at a
//! time; the [`tracker`] module owns the start/clock-out transitions and the
//! [`store`] module persists the whole profile as a single JSON document after
//! every change.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod report;
pub mod shell;
pub mod store;
pub mod tracker;

pub use error::{Result, TimecardError};
