//! Fuzzy Traffic Library
//!
//! Adaptive signal control for a four-way junction: a fuzzy engine decides
//! green extensions from live queue measurements.

pub mod simulation;
