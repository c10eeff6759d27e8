//! Shared test utilities for chartboard integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Timestamps are made deterministic by normalizing with
//! [`FIXED_NOW`] through `chartboard_core::FixedClock`.

#![allow(dead_code)]

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
