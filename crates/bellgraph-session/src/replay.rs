use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use bellgraph_core::TraceEvent;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How long each kind of trace event stays highlighted during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub state_delay_ms: u64,
    pub transition_delay_ms: u64,
    pub contribution_delay_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            state_delay_ms: 1000,
            transition_delay_ms: 1000,
            contribution_delay_ms: 2000,
        }
    }
}

impl ReplayConfig {
    /// Replay config with no pauses at all.
    pub fn instant() -> Self {
        ReplayConfig {
            state_delay_ms: 0,
            transition_delay_ms: 0,
            contribution_delay_ms: 0,
        }
    }

    pub fn delay_for(&self, event: &TraceEvent) -> Duration {
        let millis = match event {
            TraceEvent::VisitingState { .. } => self.state_delay_ms,
            TraceEvent::VisitingTransition { .. } => self.transition_delay_ms,
            TraceEvent::ComputedContribution(_) => self.contribution_delay_ms,
        };
        Duration::from_millis(millis)
    }
}

/// Shared flag checked at every suspension point of a replay.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Suspension between two highlighted events. Lets the host repaint.
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

/// Blocks the current thread for the requested duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

impl<F> Pause for F
where
    F: FnMut(Duration),
{
    fn pause(&mut self, duration: Duration) {
        self(duration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    Completed { delivered: usize },
    Cancelled { delivered: usize },
}

impl ReplayOutcome {
    pub fn delivered(&self) -> usize {
        match self {
            ReplayOutcome::Completed { delivered } | ReplayOutcome::Cancelled { delivered } => {
                *delivered
            }
        }
    }
}

/// Feed a recorded sweep trace to `on_event`, pausing after each event.
/// The numbers were computed before replay started; cancelling only stops the display.
pub fn replay<P, F>(
    trace: &[TraceEvent],
    config: &ReplayConfig,
    pause: &mut P,
    cancel: &CancelToken,
    mut on_event: F,
) -> ReplayOutcome
where
    P: Pause + ?Sized,
    F: FnMut(&TraceEvent),
{
    for (delivered, event) in trace.iter().enumerate() {
        if cancel.is_cancelled() {
            debug!(delivered, total = trace.len(), "replay cancelled");
            return ReplayOutcome::Cancelled { delivered };
        }

        on_event(event);
        pause.pause(config.delay_for(event));
    }

    ReplayOutcome::Completed {
        delivered: trace.len(),
    }
}
