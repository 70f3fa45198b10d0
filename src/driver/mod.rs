//! Pointer-walk driver
//!
//! This module provides the execution logic:
//! - [`engine`]: the [`Driver`](engine::Driver) that executes the step plan
//! - [`step`]: the step plan itself
//! - [`routines`]: the mutator and allocator routines
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! The driver executes one [`Step`](step::Step) at a time. A snapshot is taken
//! before the first step and after every step, so the run can be replayed in
//! both directions once it has finished.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod routines;
pub mod step;
