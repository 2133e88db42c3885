//! Session records and kinds
//!
//! A `SessionRecord` is one logged timer run. Records are written once and
//! never edited. A `SessionPlan` is what the operator asked for before the
//! countdown starts.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::timer::CountdownOutcome;

/// Kind of timer run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionKind {
    /// Focused work, a pomodoro or a custom length
    Work,
    /// Short break between pomodoros
    ShortBreak,
    /// Long break after a full cycle
    LongBreak,
    /// Break of custom length
    Break,
    /// Any other label found in the history file, kept verbatim
    Other(String),
}

impl SessionKind {
    pub fn as_str(&self) -> &str {
        match self {
            SessionKind::Work => "work",
            SessionKind::ShortBreak => "short-break",
            SessionKind::LongBreak => "long-break",
            SessionKind::Break => "break",
            SessionKind::Other(label) => label,
        }
    }

    pub fn is_work(&self) -> bool {
        matches!(self, SessionKind::Work)
    }

    pub fn is_break(&self) -> bool {
        matches!(
            self,
            SessionKind::ShortBreak | SessionKind::LongBreak | SessionKind::Break
        )
    }

    /// Label shown next to the running countdown
    pub fn countdown_label(&self) -> &'static str {
        if self.is_break() {
            "Break time"
        } else {
            "Work time"
        }
    }
}

impl From<String> for SessionKind {
    fn from(label: String) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "work" => SessionKind::Work,
            "short-break" | "short_break" => SessionKind::ShortBreak,
            "long-break" | "long_break" => SessionKind::LongBreak,
            "break" => SessionKind::Break,
            _ => SessionKind::Other(label),
        }
    }
}

impl From<SessionKind> for String {
    fn from(kind: SessionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to run: kind, planned minutes, and the task for work sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub kind: SessionKind,
    pub minutes: u32,
    pub task: Option<String>,
}

impl SessionPlan {
    pub fn work(minutes: u32, task: Option<String>) -> Self {
        Self {
            kind: SessionKind::Work,
            minutes,
            task: task.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn short_break(minutes: u32) -> Self {
        Self::rest(SessionKind::ShortBreak, minutes)
    }

    pub fn long_break(minutes: u32) -> Self {
        Self::rest(SessionKind::LongBreak, minutes)
    }

    pub fn custom_break(minutes: u32) -> Self {
        Self::rest(SessionKind::Break, minutes)
    }

    fn rest(kind: SessionKind, minutes: u32) -> Self {
        Self {
            kind,
            minutes,
            task: None,
        }
    }
}

/// One logged timer run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "type")]
    pub kind: SessionKind,
    /// Planned length in minutes
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    #[serde(rename = "task", default)]
    pub task_label: Option<String>,
    /// True when the countdown reached zero on its own
    pub completed: bool,
    /// When the session started
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Local>,
    /// Seconds actually counted down, only kept for interrupted sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<u64>,
}

impl SessionRecord {
    /// A record for a session that ran to completion
    pub fn completed(plan: &SessionPlan, started_at: DateTime<Local>) -> Self {
        Self {
            kind: plan.kind.clone(),
            duration_minutes: plan.minutes,
            task_label: plan.task.clone(),
            completed: true,
            timestamp: started_at,
            elapsed_seconds: None,
        }
    }

    /// A record for the countdown outcome of `plan`
    pub fn from_outcome(
        plan: &SessionPlan,
        started_at: DateTime<Local>,
        outcome: &CountdownOutcome,
    ) -> Self {
        match outcome {
            CountdownOutcome::Completed => Self::completed(plan, started_at),
            CountdownOutcome::Interrupted { elapsed } => Self {
                completed: false,
                elapsed_seconds: Some(elapsed.as_secs()),
                ..Self::completed(plan, started_at)
            },
        }
    }

    /// Local calendar day the session started on
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// RFC 3339 on write. On read, naive ISO-8601 timestamps are taken as local time.
pub(crate) mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Local>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Local>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Local));
        }
        let naive: NaiveDateTime = raw.parse().ok()?;
        Local.from_local_datetime(&naive).earliest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use std::time::Duration;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_kind_labels() {
        for (label, kind) in [
            ("work", SessionKind::Work),
            ("short-break", SessionKind::ShortBreak),
            ("long-break", SessionKind::LongBreak),
            ("break", SessionKind::Break),
        ] {
            assert_eq!(SessionKind::from(label.to_string()), kind);
            assert_eq!(kind.as_str(), label);
        }
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = SessionKind::from("Reading".to_string());
        assert_eq!(kind, SessionKind::Other("Reading".to_string()));
        assert_eq!(kind.as_str(), "Reading");
        assert!(!kind.is_work());
        assert!(!kind.is_break());
    }

    #[test]
    fn test_break_kinds() {
        assert!(SessionKind::ShortBreak.is_break());
        assert!(SessionKind::LongBreak.is_break());
        assert!(SessionKind::Break.is_break());
        assert!(!SessionKind::Work.is_break());
        assert_eq!(SessionKind::Break.countdown_label(), "Break time");
        assert_eq!(SessionKind::Work.countdown_label(), "Work time");
    }

    #[test]
    fn test_breaks_drop_task() {
        assert_eq!(SessionPlan::short_break(5).task, None);
        assert_eq!(SessionPlan::work(25, Some("  ".to_string())).task, None);
        assert_eq!(
            SessionPlan::work(25, Some("Write docs".to_string())).task.as_deref(),
            Some("Write docs")
        );
    }

    #[test]
    fn test_record_from_outcome() {
        let plan = SessionPlan::work(25, Some("Fix bug #123".to_string()));

        let done = SessionRecord::from_outcome(&plan, noon(), &CountdownOutcome::Completed);
        assert!(done.completed);
        assert_eq!(done.duration_minutes, 25);
        assert_eq!(done.elapsed_seconds, None);

        let stopped = SessionRecord::from_outcome(
            &plan,
            noon(),
            &CountdownOutcome::Interrupted {
                elapsed: Duration::from_secs(125),
            },
        );
        assert!(!stopped.completed);
        assert_eq!(stopped.duration_minutes, 25);
        assert_eq!(stopped.elapsed_seconds, Some(125));
        assert_eq!(stopped.task_label.as_deref(), Some("Fix bug #123"));
    }

    #[test]
    fn test_serialized_field_names() {
        let record = SessionRecord::completed(&SessionPlan::short_break(5), noon());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["type"], "short-break");
        assert_eq!(value["duration"], 5);
        assert!(value["task"].is_null());
        assert_eq!(value["completed"], true);
        assert!(value.get("elapsed_seconds").is_none());

        let back: SessionRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_naive_timestamp_reads_as_local() {
        let json = r#"{
            "type": "break",
            "duration": 5,
            "task": null,
            "completed": true,
            "timestamp": "2026-03-10T12:00:00.123456"
        }"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.kind, SessionKind::Break);
        assert_eq!(record.date(), noon().date_naive());
        assert_eq!(record.timestamp.hour(), 12);
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let json = r#"{"type":"work","duration":5,"task":null,"completed":true,"timestamp":"yesterday"}"#;
        assert!(serde_json::from_str::<SessionRecord>(json).is_err());
    }
}
