//! Traffic Signal Simulation Library
//!
//! Simulates a small network of independently-controlled intersections,
//! each cycling through light phases with density-adaptive green times.

pub mod simulation;
