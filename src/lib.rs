pub mod array;
pub mod config;
pub mod error;
pub mod geometry;
pub mod helper;
pub mod pattern_chart;
pub mod phasor;
pub mod policy;
pub mod sweep;
