//! # CLI Layer
//!
//! This module is **one possible UI client** for jotter; it is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, raw keys)
//! - Uses `std::process::exit` (via `main.rs`)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Load config, start logging, decide on color
//! 3. **Dispatch**: Scripts go through [`jotter::script`], keys through `tui`
//! 4. **Output Formatting**: Render screens and messages through `outstanding` templates
//!
//! ## Structure
//!
//! - `commands`: `run()` and the per-command `handle_*()` functions
//! - `setup`: clap definitions
//! - `render`: Screen and message rendering
//! - `styles` / `templates`: Theme and template sources
//! - `tui`: The interactive key loop

mod commands;
mod render;
mod setup;
mod styles;
mod templates;
mod tui;

pub use commands::run;
