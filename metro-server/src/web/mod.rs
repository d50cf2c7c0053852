//! Web layer for the metro planner.
//!
//! Provides HTTP endpoints for station lookup, routing, fares and train
//! simulation, plus the WebSocket live feed.

mod dto;
mod error;
mod routes;
mod state;
pub mod templates;
pub mod ws;

pub use dto::*;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
