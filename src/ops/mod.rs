//! High-level operations.
//!
//! This module contains the implementation of bridgegen commands.

pub mod generate;

pub use generate::{collect_bridges, generate, GenerateOptions, GenerateReport};
