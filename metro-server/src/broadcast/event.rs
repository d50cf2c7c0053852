//! Events streamed to subscribers.

use serde::{Deserialize, Serialize};

/// Lifecycle state carried by a status event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainState {
    Started,
    Stopped,
}

/// A message on the live train stream.
///
/// JSON is the reference wire encoding:
///
/// ```
/// use metro_server::broadcast::TrainEvent;
///
/// let event = TrainEvent::segment_update("T1", "KLCC", "Ampang Park", 0.5);
/// assert_eq!(
///     serde_json::to_string(&event).unwrap(),
///     r#"{"kind":"segment_update","trainId":"T1","origin":"KLCC","destination":"Ampang Park","progress":0.5}"#,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrainEvent {
    /// Position of a train along one segment, `progress` in `[0, 1]`.
    SegmentUpdate {
        #[serde(rename = "trainId")]
        train_id: String,
        origin: String,
        destination: String,
        progress: f64,
    },
    /// A train started or stopped.
    Status {
        #[serde(rename = "trainId")]
        train_id: String,
        state: TrainState,
    },
}

impl TrainEvent {
    pub fn segment_update(
        train_id: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        progress: f64,
    ) -> Self {
        TrainEvent::SegmentUpdate {
            train_id: train_id.into(),
            origin: origin.into(),
            destination: destination.into(),
            progress,
        }
    }

    pub fn status(train_id: impl Into<String>, state: TrainState) -> Self {
        TrainEvent::Status {
            train_id: train_id.into(),
            state,
        }
    }

    pub fn train_id(&self) -> &str {
        match self {
            TrainEvent::SegmentUpdate { train_id, .. } | TrainEvent::Status { train_id, .. } => {
                train_id
            }
        }
    }

    /// Clamp progress into `[0, 1]`; non-finite progress becomes 0.
    ///
    /// Used on updates relayed from external agents.
    pub fn sanitized(self) -> Self {
        match self {
            TrainEvent::SegmentUpdate {
                train_id,
                origin,
                destination,
                progress,
            } => TrainEvent::SegmentUpdate {
                train_id,
                origin,
                destination,
                progress: if progress.is_finite() {
                    progress.clamp(0.0, 1.0)
                } else {
                    0.0
                },
            },
            status => status,
        }
    }
}
