//! timefocus - Pomodoro timer with session history and productivity stats
//!
//! Pieces:
//! - `timer`: interruptible one-second countdown
//! - `store`: append-only JSON session history
//! - `stats`: daily and weekly reductions over the history
//! - `runner`: runs a planned session and records how it ended
//! - `prompt`: line prompts that Ctrl-C can cancel
//!
//! Commands:
//! - pomodoro: default-length work session, then an optional break
//! - work MINS: custom work session
//! - break: short, long or custom break
//! - stats: today's or this week's productivity
//! - history: list recorded sessions
//! - reset: delete all recorded sessions

pub mod display;
pub mod prompt;
pub mod runner;
pub mod session;
pub mod stats;
pub mod store;
pub mod timer;

pub use runner::{run_session, RunError};
pub use session::{SessionKind, SessionPlan, SessionRecord};
pub use stats::{DayStats, PeriodTotals, WeekStats};
pub use store::{HistoryStore, StoreError};
pub use timer::{Countdown, CountdownOutcome, TickDisplay, TimerError};
