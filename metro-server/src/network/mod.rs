//! Transit graph construction and storage.
//!
//! Stations and edges are derived from a station list, line sequences, a
//! duration matrix and a fare matrix. Line-qualified variants of one
//! physical stop are joined by zero-weight interchange edges.

mod builder;
mod config;
mod fares;
mod graph;
mod matrix;

pub use builder::{BuildReport, GraphBuilder, NetworkSources};
pub use config::{BuildConfig, DEFAULT_EDGE_MINUTES};
pub use fares::FareTable;
pub use graph::{CoordinateRecord, CoordinateReport, Edge, EdgeKind, TransitGraph};
pub use matrix::{Cell, Matrix, MatrixEntry, MatrixRow};
