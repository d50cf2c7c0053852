//! Live train simulation.
//!
//! Each simulated train is a tokio task that replays a path segment by
//! segment, publishing progress to the [`Broadcaster`](crate::broadcast::Broadcaster)
//! once per tick until it finishes or is cancelled.

mod config;
mod error;
mod plan;
mod run;
mod scheduler;

pub use config::SimulationConfig;
pub use error::SimulationError;
pub use plan::{Segment, SimulationPlan, check_speed, segment_seconds};
pub use scheduler::TrainScheduler;
