//! Read-only views over a profile: session history, the active session and
//! earnings.

use crate::clock::local_epoch;
use crate::models::{FreelancerProfile, Session};

/// A session joined with the name of the company it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionView<'a> {
    pub company_name: &'a str,
    pub company_index: usize,
    pub session: &'a Session,
}

/// An ordered, bounded selection of sessions. Can be iterated any number of
/// times.
#[derive(Debug, Clone, Default)]
pub struct RecentSessions<'a> {
    views: Vec<SessionView<'a>>,
}

impl<'a> RecentSessions<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, SessionView<'a>> {
        self.views.iter()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl<'s, 'a> IntoIterator for &'s RecentSessions<'a> {
    type Item = &'s SessionView<'a>;
    type IntoIter = std::slice::Iter<'s, SessionView<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ordering key for a session start.
///
/// Sessions with a known instant sort by it; sessions whose start text cannot
/// be read sort after all of them, by raw text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum StartKey<'a> {
    Instant(i64),
    Text(&'a str),
}

fn start_key(session: &Session) -> StartKey<'_> {
    session
        .start_epoch
        .or_else(|| local_epoch(&session.start_timestamp))
        .map(StartKey::Instant)
        .unwrap_or(StartKey::Text(&session.start_timestamp))
}

/// All sessions from all companies ordered by start time, oldest first,
/// truncated to `limit` entries. A `limit` of zero or below yields nothing.
///
/// Sessions with equal start times keep company order, then creation order.
pub fn recent_sessions(profile: &FreelancerProfile, limit: i64) -> RecentSessions<'_> {
    let Ok(limit) = usize::try_from(limit) else {
        return RecentSessions::default();
    };
    if limit == 0 {
        return RecentSessions::default();
    }

    let mut keyed: Vec<(StartKey<'_>, SessionView<'_>)> = profile
        .companies
        .iter()
        .enumerate()
        .flat_map(|(company_index, company)| {
            company.sessions.iter().map(move |session| {
                (
                    start_key(session),
                    SessionView {
                        company_name: &company.company_name,
                        company_index,
                        session,
                    },
                )
            })
        })
        .collect();

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.truncate(limit);

    RecentSessions {
        views: keyed.into_iter().map(|(_, view)| view).collect(),
    }
}

/// The open session as shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSessionInfo {
    pub company_name: String,
    pub start_timestamp: String,
}

pub fn active_session_info(profile: &FreelancerProfile) -> Option<ActiveSessionInfo> {
    let (company, session) = profile.active_session()?;
    Some(ActiveSessionInfo {
        company_name: company.company_name.clone(),
        start_timestamp: session.start_timestamp.clone(),
    })
}

/// Earnings for one closed session and the running total up to it.
#[derive(Debug, Clone, PartialEq)]
pub struct EarningsPoint {
    pub company_name: String,
    pub session_id: String,
    pub end_timestamp: String,
    pub hours: f64,
    pub earnings: f64,
    pub cumulative: f64,
}

/// Earnings for every closed session, ordered by end time, with a running
/// total.
///
/// Earnings are `hours worked × pay`. Sessions still open, or whose times
/// cannot be determined, are skipped. Negative durations count as zero.
pub fn earnings_timeline(profile: &FreelancerProfile) -> Vec<EarningsPoint> {
    let mut closed: Vec<(i64, f64, &str, &Session)> = profile
        .companies
        .iter()
        .flat_map(|company| {
            company
                .sessions
                .iter()
                .map(move |s| (company.company_name.as_str(), s))
        })
        .filter(|(_, s)| !s.is_open())
        .filter_map(|(name, s)| {
            let start = s.start_epoch.or_else(|| local_epoch(&s.start_timestamp))?;
            let end = s.end_epoch.or_else(|| local_epoch(&s.end_timestamp))?;
            let hours = end.saturating_sub(start).max(0) as f64 / 3600.0;
            Some((end, hours, name, s))
        })
        .collect();

    closed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut cumulative = 0.0;
    closed
        .into_iter()
        .map(|(_, hours, name, s)| {
            let earnings = hours * s.pay;
            cumulative += earnings;
            EarningsPoint {
                company_name: name.to_string(),
                session_id: s.session_id.clone(),
                end_timestamp: s.end_timestamp.clone(),
                hours,
                earnings,
                cumulative,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActiveRef, BillingStatus, Company};

    fn session(id: &str, start: &str, end: &str, pay: f64) -> Session {
        Session {
            session_id: id.to_string(),
            description: String::new(),
            pay,
            start_timestamp: start.to_string(),
            end_timestamp: end.to_string(),
            billing_status: BillingStatus::Pending,
            start_epoch: None,
            end_epoch: None,
        }
    }

    fn with_epochs(mut s: Session, start: i64, end: Option<i64>) -> Session {
        s.start_epoch = Some(start);
        s.end_epoch = end;
        s
    }

    #[test]
    fn orders_by_instant_not_by_text() {
        let mut profile = FreelancerProfile::default();
        let mut acme = Company::new("Acme");
        // "Tue" sorts before "Wed" as text but is the later day here
        acme.sessions.push(with_epochs(
            session("1", "Tue Oct 20 09:00:00 2026", "", 10.0),
            2_000,
            None,
        ));
        acme.sessions.push(with_epochs(
            session("2", "Wed Oct 14 09:00:00 2026", "x", 10.0),
            1_000,
            Some(1_500),
        ));
        profile.companies.push(acme);

        let recent = recent_sessions(&profile, 10);
        let ids: Vec<_> = recent.iter().map(|v| v.session.session_id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn unreadable_starts_sort_last_by_text() {
        let mut profile = FreelancerProfile::default();
        let mut acme = Company::new("Acme");
        acme.sessions.push(session("1", "zzz", "", 10.0));
        acme.sessions.push(session("2", "aaa", "", 10.0));
        acme.sessions
            .push(with_epochs(session("3", "later", "", 10.0), 5, None));
        profile.companies.push(acme);

        let recent = recent_sessions(&profile, 3);
        let ids: Vec<_> = recent.iter().map(|v| v.session.session_id.as_str()).collect();
        assert_eq!(ids, ["3", "2", "1"]);
    }

    #[test]
    fn non_positive_limit_is_empty() {
        let mut profile = FreelancerProfile::default();
        let mut acme = Company::new("Acme");
        acme.sessions.push(session("1", "Mon Oct 19 09:00:00 2026", "", 10.0));
        profile.companies.push(acme);

        assert!(recent_sessions(&profile, 0).is_empty());
        assert!(recent_sessions(&profile, -3).is_empty());
        assert_eq!(recent_sessions(&profile, 1).len(), 1);
    }

    #[test]
    fn view_can_be_iterated_twice() {
        let mut profile = FreelancerProfile::default();
        let mut acme = Company::new("Acme");
        acme.sessions.push(session("1", "Mon Oct 19 09:00:00 2026", "", 10.0));
        profile.companies.push(acme);

        let recent = recent_sessions(&profile, 5);
        assert_eq!(recent.iter().count(), 1);
        assert_eq!((&recent).into_iter().count(), 1);
    }

    #[test]
    fn active_info_reports_company_and_start() {
        let mut profile = FreelancerProfile::default();
        assert!(active_session_info(&profile).is_none());

        let mut acme = Company::new("Acme");
        acme.sessions.push(session("1", "Mon Oct 19 09:00:00 2026", "", 10.0));
        profile.companies.push(acme);
        profile.active = Some(ActiveRef {
            company_index: 0,
            session_index: 0,
        });

        let info = active_session_info(&profile).expect("active");
        assert_eq!(info.company_name, "Acme");
        assert_eq!(info.start_timestamp, "Mon Oct 19 09:00:00 2026");
    }

    #[test]
    fn earnings_accumulate_in_end_order() {
        let mut profile = FreelancerProfile::default();
        let mut acme = Company::new("Acme");
        // 2h at 30/h, ends last
        acme.sessions
            .push(with_epochs(session("1", "a", "b", 30.0), 0, Some(7_200 + 3_600)));
        let mut globex = Company::new("Globex");
        // 30min at 50/h, ends first
        globex
            .sessions
            .push(with_epochs(session("1", "a", "b", 50.0), 1_800, Some(3_600)));
        // open, ignored
        globex
            .sessions
            .push(with_epochs(session("2", "a", "", 50.0), 4_000, None));
        profile.companies.push(acme);
        profile.companies.push(globex);

        let timeline = earnings_timeline(&profile);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].company_name, "Globex");
        assert!((timeline[0].earnings - 25.0).abs() < 1e-9);
        assert_eq!(timeline[1].company_name, "Acme");
        assert!((timeline[1].hours - 3.0).abs() < 1e-9);
        assert!((timeline[1].cumulative - 115.0).abs() < 1e-9);
    }

    #[test]
    fn earnings_from_legacy_text_timestamps() {
        let mut profile = FreelancerProfile::default();
        let mut acme = Company::new("Acme");
        acme.sessions.push(session(
            "1",
            "Mon Oct 19 09:00:00 2026",
            "Mon Oct 19 10:30:00 2026",
            20.0,
        ));
        acme.sessions
            .push(session("2", "not a time", "Mon Oct 19 11:00:00 2026", 20.0));
        profile.companies.push(acme);

        let timeline = earnings_timeline(&profile);
        assert_eq!(timeline.len(), 1);
        assert!((timeline[0].earnings - 30.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_epochs_do_not_overflow() {
        let mut profile = FreelancerProfile::default();
        let mut acme = Company::new("Acme");
        acme.sessions
            .push(with_epochs(session("1", "a", "b", 1.0), i64::MIN, Some(i64::MAX)));
        acme.sessions
            .push(with_epochs(session("2", "a", "b", 1.0), i64::MAX, Some(i64::MIN)));
        profile.companies.push(acme);

        let timeline = earnings_timeline(&profile);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].hours, 0.0);
        assert!(timeline[1].hours > 0.0);
    }
}
