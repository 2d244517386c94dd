//! Numerical helpers shared by the deterministic and simulated valuations.

pub mod statistics;
