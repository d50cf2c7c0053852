//! Metro planner server.
//!
//! Builds a transit graph from fare, timetable and route tables, answers
//! shortest-path and fare queries over it, and runs simulated trains whose
//! progress is pushed to WebSocket subscribers.

pub mod broadcast;
pub mod cache;
pub mod config;
pub mod domain;
pub mod loader;
pub mod network;
pub mod planner;
pub mod service;
pub mod simulator;
pub mod web;
