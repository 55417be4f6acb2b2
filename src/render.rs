//! Plain-text rendering for the shell and CLI.

use crate::models::{CompanySummary, FreelancerProfile};
use crate::report::{ActiveSessionInfo, EarningsPoint, SessionView};

const SEPARATOR: &str = "---------------------------------";

/// Numbered company list, 1-based to match the menu prompt.
///
/// ```text
/// Available Jobs:
/// 1. Acme (2 sessions)
/// 2. Globex (0 sessions)
/// ```
pub fn render_companies(companies: &[CompanySummary]) -> String {
    let mut output = String::from("Available Jobs:\n");
    for c in companies {
        let noun = if c.session_count == 1 { "session" } else { "sessions" };
        output.push_str(&format!(
            "{}. {} ({} {})\n",
            c.index + 1,
            c.name,
            c.session_count,
            noun
        ));
    }
    output
}

pub fn render_status(active: Option<&ActiveSessionInfo>) -> String {
    match active {
        Some(info) => format!(
            "Active Session: {}\nStarted at: {}\n",
            info.company_name, info.start_timestamp
        ),
        None => "No active session.\n".to_string(),
    }
}

/// One block per session, each followed by a separator line.
pub fn render_sessions<'s, 'a: 's>(views: impl IntoIterator<Item = &'s SessionView<'a>>) -> String {
    let mut output = String::new();
    for view in views {
        let s = view.session;
        output.push_str(&format!("Company: {}\n", view.company_name));
        output.push_str(&format!("Description: {}\n", s.description));
        output.push_str(&format!("Start Time: {}\n", s.start_timestamp));
        let end = if s.is_open() { "(open)" } else { s.end_timestamp.as_str() };
        output.push_str(&format!("End Time: {}\n", end));
        output.push_str(&format!("Pay: {}\n", s.pay));
        output.push_str(SEPARATOR);
        output.push('\n');
    }
    output
}

/// Earnings table with a running total column.
pub fn render_earnings(profile: &FreelancerProfile, points: &[EarningsPoint]) -> String {
    if points.is_empty() {
        return "No completed sessions.\n".to_string();
    }
    let mut output = format!(
        "{:<26} {:<20} {:>7} {:>10} {:>10}\n",
        "Ended", "Company", "Hours", "Earned", "Total"
    );
    for p in points {
        output.push_str(&format!(
            "{:<26} {:<20} {:>7.2} {:>10.2} {:>10.2}\n",
            p.end_timestamp, p.company_name, p.hours, p.earnings, p.cumulative
        ));
    }
    let total = points.last().map(|p| p.cumulative).unwrap_or(0.0);
    output.push_str(&format!("Total earnings: {:.2} {}\n", total, profile.currency));
    output
}
