//! Runs one planned session and records its outcome

use chrono::Local;
use std::future::Future;
use thiserror::Error;

use crate::session::{SessionPlan, SessionRecord};
use crate::store::{HistoryStore, StoreError};
use crate::timer::{Countdown, TickDisplay, TimerError};

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Count `plan` down, then append exactly one record for how it ended.
///
/// The duration and the store are both checked before the countdown starts,
/// so a bad history file is reported up front instead of after the session.
pub async fn run_session<I, D>(
    store: &HistoryStore,
    plan: &SessionPlan,
    interrupt: I,
    display: &mut D,
) -> Result<SessionRecord, RunError>
where
    I: Future<Output = ()>,
    D: TickDisplay + ?Sized,
{
    let countdown = Countdown::new(plan.minutes)?;
    store.load()?;

    let started_at = Local::now();
    tracing::info!(kind = %plan.kind, minutes = plan.minutes, "session started");

    let outcome = countdown.run(interrupt, display).await;
    let record = SessionRecord::from_outcome(plan, started_at, &outcome);
    store.append(record.clone())?;

    tracing::info!(
        kind = %record.kind,
        completed = record.completed,
        "session recorded"
    );
    Ok(record)
}
