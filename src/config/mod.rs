//! Configuration constants
//!
//! - [`defaults`] - Default values describing the engine-sim dependency

pub mod defaults;
