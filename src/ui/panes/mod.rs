//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`program`]: The step plan with the current step highlighted
//! - [`locals`]: The driver's locals and what their pointers point at
//! - [`heap`]: Heap blocks laid out as int cells, with the cursor marked
//! - [`terminal`]: Output printed so far
//! - [`status`]: Status bar with keybindings and replay position
//!
//! Each pane module exports a single `render_*` function taking the frame,
//! its area and the state it draws.

mod utils;

pub mod heap;
pub mod locals;
pub mod program;
pub mod status;
pub mod terminal;
