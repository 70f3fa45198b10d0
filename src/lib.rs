//! # Introduction
//!
//! heapwalk runs a small pointer-walk program against a simulated heap: it
//! allocates a buffer of ints, writes through a cursor while advancing it,
//! allocates one more int from a helper and prints what it reads along the
//! way. Every step is captured as a snapshot so the run can be replayed
//! forward and backward in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! RunConfig → Step plan → Driver → Snapshots → stdout / TUI
//! ```
//!
//! 1. [`config`]: run parameters and command-line parsing.
//! 2. [`driver`]: builds the step plan, executes it and records history.
//! 3. [`memory`]: the simulated memory model: tagged [`memory::value::Value`]s
//!    and a [`memory::heap::Heap`] with per-byte initialization tracking.
//! 4. [`snapshot`]: captured output and the bounded snapshot history.
//! 5. [`ui`]: ratatui-based replay viewer; not part of the stable library API.
//!
//! ## What the simulation makes visible
//!
//! Reads of never-written ints are recorded instead of returning garbage,
//! blocks that are never freed are listed as leaks when the run ends, and a
//! cursor walking past its buffer is an error rather than a stray access.

pub mod config;
pub mod driver;
pub mod memory;
pub mod snapshot;
pub mod ui;
