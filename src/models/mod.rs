//! Domain models for timecard.
//!
//! - [`FreelancerProfile`]: The root document. Owns every company and the
//!   pointer to the one open session, if any.
//! - [`Company`]: A client. Sessions are appended in creation order and never
//!   removed.
//! - [`Session`]: One timed unit of work, open until it has an end timestamp.

mod company;
mod profile;
mod session;

pub use company::*;
pub use profile::*;
pub use session::*;
