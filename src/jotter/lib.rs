//! # Jotter Architecture
//!
//! Jotter is a **UI-agnostic page/block editor core**: a sidebar of pages and an editor that
//! shows one page as an ordered list of typed blocks (paragraph, heading, to-do, quote). All
//! state lives in memory. The terminal binary is one client of this library; scripts and
//! tests are others.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders screens, reads the keyboard    │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs, script.rs)                              │
//! │  - Single writer of state, returns CmdResult                │
//! │  - Resolves display numbers to page and block ids           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Components (sidebar.rs, editor.rs)                         │
//! │  - Turn events into commands and partial page updates       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  State (workspace.rs, model.rs)                             │
//! │  - Canonical page list, current page, sidebar flag          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Changes only flow back up through return values: the sidebar hands out
//! [`sidebar::SidebarCommand`]s, the editor hands out [`model::PageUpdate`]s, and
//! [`api::JotterApi`] applies both to the [`workspace::Workspace`].
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Nothing from `api.rs` inward writes to stdout/stderr, exits the process or assumes a
//! terminal. Ids come from an injected [`ids::IdGenerator`], so every operation is
//! deterministic under test.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`workspace`]: Root state and its named operations
//! - [`editor`]: Open-page editing and the block keystroke policy
//! - [`sidebar`]: Title filter, create flow, page commands
//! - [`model`]: `Page`, `Block`, `BlockKind` and partial updates
//! - [`input`]: Surface-independent keystrokes
//! - [`ids`]: Id generators
//! - [`script`]: Line-oriented command language over the api
//! - [`export`]: Markdown and JSON output
//! - [`config`], [`logging`], [`error`]: Ambient concerns
//! - `cli`: Argument parsing, templated rendering and the interactive loop (binary only)

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod ids;
pub mod input;
pub mod logging;
pub mod model;
pub mod outcome;
pub mod script;
pub mod sidebar;
pub mod workspace;
