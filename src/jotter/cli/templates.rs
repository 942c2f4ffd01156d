//! Screen templates.
//!
//! Templates live in their own `.tmp` files and are pulled in as string constants. They are
//! minijinja templates rendered through `outstanding`, and only ever pick styles by name:
//! every layout decision (numbering, truncation, placeholders, which style a line gets) is
//! made in `render.rs` and handed over as plain data.
//!
//! Each template ends its lines explicitly, so the output is exactly one line per row and
//! the renderer can lay the sidebar and editor side by side.

pub const SIDEBAR_TEMPLATE: &str = include_str!("templates/sidebar.tmp");
pub const EDITOR_TEMPLATE: &str = include_str!("templates/editor.tmp");
pub const MESSAGES_TEMPLATE: &str = include_str!("templates/messages.tmp");
