//! Subway route and fare engine.
//!
//! Answers: "what is the best route between these two stations, by
//! distance or by travel time, and what does it cost?"

pub mod cache;
pub mod domain;
pub mod fare;
pub mod graph;
pub mod planner;
pub mod rider;
pub mod topology;
