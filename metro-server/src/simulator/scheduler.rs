//! Registry of running simulated trains.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::broadcast::Broadcaster;

use super::config::SimulationConfig;
use super::plan::SimulationPlan;
use super::run::{RunEnd, TrainRun};

struct RunningTrain {
    generation: u64,
    cancel: watch::Sender<bool>,
    handle: JoinHandle<RunEnd>,
}

impl RunningTrain {
    /// Signal cancellation and hand back the task handle.
    fn cancel(self) -> JoinHandle<RunEnd> {
        self.cancel.send_replace(true);
        self.handle
    }
}

#[derive(Default)]
struct Registry {
    trains: HashMap<String, RunningTrain>,
    next_generation: u64,
}

/// Starts, replaces and stops simulated trains.
///
/// At most one instance runs per train id. All registry changes happen
/// under one lock, and no lock is held while a task is awaited.
pub struct TrainScheduler {
    registry: Arc<Mutex<Registry>>,
    broadcaster: Arc<Broadcaster>,
    config: SimulationConfig,
}

impl TrainScheduler {
    pub fn new(broadcaster: Arc<Broadcaster>, config: SimulationConfig) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            broadcaster,
            config,
        }
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Start a train, replacing any instance already running under `train_id`.
    ///
    /// The replaced instance is cancelled and unregistered before the new
    /// one is registered; the new one emits nothing until the old one has
    /// emitted its terminal status. Returns whether a train was replaced.
    pub async fn start(&self, train_id: impl Into<String>, plan: SimulationPlan) -> bool {
        let train_id = train_id.into();
        let tick = self.config.effective_tick(plan.tick());

        let mut registry = self.registry.lock().await;
        let previous = registry.trains.remove(&train_id).map(RunningTrain::cancel);
        let replaced = previous.is_some();

        registry.next_generation += 1;
        let generation = registry.next_generation;
        let (cancel, cancel_rx) = watch::channel(false);

        let run = TrainRun {
            train_id: train_id.clone(),
            plan,
            tick,
            reverse_on_loop: self.config.reverse_on_loop,
            broadcaster: self.broadcaster.clone(),
            cancel: cancel_rx,
        };
        let registry_handle = Arc::clone(&self.registry);
        let id = train_id.clone();
        let handle = tokio::spawn(async move {
            let end = run.run(previous).await;
            if end == RunEnd::Completed {
                unregister(&registry_handle, &id, generation).await;
            }
            end
        });

        registry.trains.insert(
            train_id.clone(),
            RunningTrain {
                generation,
                cancel,
                handle,
            },
        );
        info!(train = %train_id, generation, replaced, "Simulation scheduled");
        replaced
    }

    /// Cancel and unregister a train. Returns whether it was running.
    pub async fn stop(&self, train_id: &str) -> bool {
        let removed = self.registry.lock().await.trains.remove(train_id);
        match removed {
            Some(train) => {
                // The task keeps running until it sees the signal and emits
                // its terminal status.
                drop(train.cancel());
                info!(train = %train_id, "Simulation stopped");
                true
            }
            None => false,
        }
    }

    /// Cancel every train. Returns how many were running.
    pub async fn stop_all(&self) -> usize {
        let trains: Vec<_> = self.registry.lock().await.trains.drain().collect();
        let count = trains.len();
        for (_, train) in trains {
            drop(train.cancel());
        }
        if count > 0 {
            info!(count, "All simulations stopped");
        }
        count
    }

    /// Snapshot of registered train ids, sorted.
    pub async fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.registry.lock().await.trains.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn is_running(&self, train_id: &str) -> bool {
        self.registry.lock().await.trains.contains_key(train_id)
    }
}

/// Remove a finished train, unless it has been replaced since.
async fn unregister(registry: &Mutex<Registry>, train_id: &str, generation: u64) {
    let mut registry = registry.lock().await;
    if registry
        .trains
        .get(train_id)
        .is_some_and(|t| t.generation == generation)
    {
        registry.trains.remove(train_id);
        debug!(train = %train_id, generation, "Finished train unregistered");
    }
}
