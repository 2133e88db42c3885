//! Countdown engine
//!
//! Counts a session down at one-second resolution. Each wait is a
//! `select!` over the next tick, the deadline and an interrupt future, so an
//! interrupt is seen as soon as it fires rather than at the next tick.
//! Interruption is an outcome, not an error.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use timefocus_core::MAX_SESSION_MINUTES;
use tokio::time::{self, Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_secs(1);

/// Countdown errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Duration must be between 1 and {max} minutes (got {0})", max = MAX_SESSION_MINUTES)]
    InvalidDuration(u32),
}

/// How a countdown ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// The full duration elapsed
    Completed,
    /// The operator stopped it early
    Interrupted { elapsed: Duration },
}

impl CountdownOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CountdownOutcome::Completed)
    }
}

/// Receives countdown progress
pub trait TickDisplay {
    /// Called once per second with the time left
    fn tick(&mut self, remaining: Duration);

    /// Called exactly once when the countdown ends
    fn finish(&mut self, outcome: &CountdownOutcome);
}

/// A validated, not yet started countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total: Duration,
}

impl Countdown {
    pub fn new(minutes: u32) -> Result<Self, TimerError> {
        if !(1..=MAX_SESSION_MINUTES).contains(&minutes) {
            return Err(TimerError::InvalidDuration(minutes));
        }
        Ok(Self {
            total: Duration::from_secs(u64::from(minutes) * 60),
        })
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// Count down until the deadline passes or `interrupt` resolves
    pub async fn run<I, D>(&self, interrupt: I, display: &mut D) -> CountdownOutcome
    where
        I: Future<Output = ()>,
        D: TickDisplay + ?Sized,
    {
        let start = Instant::now();
        let deadline = start + self.total;

        let mut ticker = time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let expiry = time::sleep_until(deadline);
        tokio::pin!(interrupt, expiry);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = &mut interrupt => {
                    break CountdownOutcome::Interrupted { elapsed: start.elapsed() };
                }
                _ = &mut expiry => break CountdownOutcome::Completed,
                _ = ticker.tick() => {
                    display.tick(deadline.saturating_duration_since(Instant::now()));
                }
            }
        };

        tracing::debug!(?outcome, total_secs = self.total.as_secs(), "countdown finished");
        display.finish(&outcome);
        outcome
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler can't be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C, countdown can't be interrupted");
        std::future::pending::<()>().await;
    }
}
