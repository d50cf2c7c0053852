//! The per-train task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

use crate::broadcast::{Broadcaster, TrainEvent, TrainState};

use super::plan::{Segment, SimulationPlan};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RunEnd {
    Completed,
    Cancelled,
}

/// State owned by one running train.
pub(super) struct TrainRun {
    pub train_id: String,
    pub plan: SimulationPlan,
    pub tick: Duration,
    pub reverse_on_loop: bool,
    pub broadcaster: Arc<Broadcaster>,
    pub cancel: watch::Receiver<bool>,
}

impl TrainRun {
    /// Run to completion or cancellation.
    ///
    /// Waits for `previous` first so an instance being replaced has
    /// published its terminal status before this one publishes anything.
    /// An instance cancelled while waiting publishes only `stopped`;
    /// otherwise it publishes `started` and `stopped`.
    pub async fn run(mut self, previous: Option<JoinHandle<RunEnd>>) -> RunEnd {
        if let Some(previous) = previous {
            // A panicked predecessor has nothing left to emit.
            let _ = previous.await;
        }
        if self.cancelled() {
            self.publish(TrainEvent::status(&self.train_id, TrainState::Stopped))
                .await;
            debug!(train = %self.train_id, "Train replaced before starting");
            return RunEnd::Cancelled;
        }

        self.publish(TrainEvent::status(&self.train_id, TrainState::Started))
            .await;
        debug!(train = %self.train_id, stations = self.plan.path().len(), "Train started");

        let end = self.drive().await;

        self.publish(TrainEvent::status(&self.train_id, TrainState::Stopped))
            .await;
        debug!(train = %self.train_id, ?end, "Train stopped");
        end
    }

    async fn drive(&mut self) -> RunEnd {
        let mut backwards = false;
        loop {
            for segment in self.plan.segments(backwards) {
                if self.ride(&segment).await == RunEnd::Cancelled {
                    return RunEnd::Cancelled;
                }
            }
            if !self.plan.looping() {
                return RunEnd::Completed;
            }
            if self.reverse_on_loop {
                backwards = !backwards;
            }
        }
    }

    /// Publish progress along one segment, from 0.0 to exactly 1.0.
    async fn ride(&mut self, segment: &Segment) -> RunEnd {
        if self.cancelled() {
            return RunEnd::Cancelled;
        }

        let started = Instant::now();
        let total = segment.duration.as_secs_f64();
        self.publish_progress(segment, 0.0).await;

        loop {
            if self.wait_tick().await == RunEnd::Cancelled {
                return RunEnd::Cancelled;
            }
            let progress = (started.elapsed().as_secs_f64() / total).min(1.0);
            self.publish_progress(segment, progress).await;
            if progress >= 1.0 {
                return RunEnd::Completed;
            }
        }
    }

    /// Sleep one tick, waking early on cancellation.
    async fn wait_tick(&mut self) -> RunEnd {
        tokio::select! {
            _ = sleep(self.tick) => {
                if self.cancelled() { RunEnd::Cancelled } else { RunEnd::Completed }
            }
            // A dropped sender means the registry entry is gone.
            _ = self.cancel.changed() => RunEnd::Cancelled,
        }
    }

    fn cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    async fn publish_progress(&self, segment: &Segment, progress: f64) {
        trace!(train = %self.train_id, origin = %segment.origin, progress, "Tick");
        self.publish(TrainEvent::segment_update(
            &self.train_id,
            &segment.origin,
            &segment.destination,
            progress,
        ))
        .await;
    }

    async fn publish(&self, event: TrainEvent) {
        // Delivery failures are handled inside the broadcaster.
        self.broadcaster.publish(&event).await;
    }
}
