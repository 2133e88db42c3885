//! Productivity statistics
//!
//! Pure reductions over the session history:
//! - a single calendar day
//! - the week containing a reference date, with a per-weekday breakdown
//!
//! Records are grouped by the local date of their start timestamp.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;

use crate::session::SessionRecord;

/// Totals over a set of sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    /// Planned minutes of work sessions, completed or not
    pub work_minutes: u64,
    /// Planned minutes of break sessions, completed or not
    pub break_minutes: u64,
    /// Sessions that ran to the end
    pub completed_sessions: u32,
    /// All sessions
    pub total_sessions: u32,
    /// completed / total, 0 for an empty period
    pub completion_rate: f64,
}

impl PeriodTotals {
    /// Calculate totals from a list of sessions
    pub fn from_sessions<'a, I>(sessions: I) -> Self
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let mut totals = Self::default();

        for session in sessions {
            if session.kind.is_work() {
                totals.work_minutes += u64::from(session.duration_minutes);
            } else if session.kind.is_break() {
                totals.break_minutes += u64::from(session.duration_minutes);
            }
            if session.completed {
                totals.completed_sessions += 1;
            }
            totals.total_sessions += 1;
        }

        totals.completion_rate = if totals.total_sessions > 0 {
            f64::from(totals.completed_sessions) / f64::from(totals.total_sessions)
        } else {
            0.0
        };
        totals
    }
}

/// Statistics for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStats {
    pub date: NaiveDate,
    pub weekday: Weekday,
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

impl DayStats {
    pub fn for_day(sessions: &[SessionRecord], date: NaiveDate) -> Self {
        Self {
            date,
            weekday: date.weekday(),
            totals: PeriodTotals::from_sessions(sessions.iter().filter(|s| s.date() == date)),
        }
    }
}

/// Statistics for the week containing a reference date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekStats {
    /// First day of the week
    pub start: NaiveDate,
    /// Last day of the week, inclusive
    pub end: NaiveDate,
    #[serde(flatten)]
    pub totals: PeriodTotals,
    /// Work minutes divided by days that had any work
    pub average_work_per_active_day: u64,
    /// One entry per day, in week order
    pub by_day: Vec<DayStats>,
}

impl WeekStats {
    pub fn for_week(sessions: &[SessionRecord], reference: NaiveDate, week_start: Weekday) -> Self {
        let (start, end) = week_bounds(reference, week_start);

        let by_day: Vec<DayStats> = start
            .iter_days()
            .take(7)
            .map(|date| DayStats::for_day(sessions, date))
            .collect();

        let totals = PeriodTotals::from_sessions(
            sessions
                .iter()
                .filter(|s| (start..=end).contains(&s.date())),
        );

        let active_days = by_day.iter().filter(|d| d.totals.work_minutes > 0).count() as u64;
        let average_work_per_active_day = if active_days > 0 {
            totals.work_minutes / active_days
        } else {
            0
        };

        Self {
            start,
            end,
            totals,
            average_work_per_active_day,
            by_day,
        }
    }

    /// Whether `today` falls inside this week, last day included
    pub fn in_progress(&self, today: NaiveDate) -> bool {
        (self.start..=self.end).contains(&today)
    }
}

/// First and last day of the week containing `reference`
pub fn week_bounds(reference: NaiveDate, week_start: Weekday) -> (NaiveDate, NaiveDate) {
    let offset = (reference.weekday().num_days_from_monday() + 7
        - week_start.num_days_from_monday())
        % 7;
    let start = reference - Days::new(u64::from(offset));
    (start, start + Days::new(6))
}
