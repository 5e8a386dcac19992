//! fs-core: Shared types, traits, and utilities for FruitSpin
//!
//! This crate provides the foundational types used across all FruitSpin crates.

mod error;
mod rng;

pub use error::*;
pub use rng::*;

/// Credit amounts (integer, never negative)
pub type Credits = u64;
