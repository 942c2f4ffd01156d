//! Named styles for the terminal screens.
//!
//! Templates and renderers only refer to the names in [`names`]; the colors behind them are
//! registered once in [`JOTTER_THEME`]. Styles come in two layers: a handful of base styles
//! (regular, muted, faint, highlight) and the semantic styles built from them, so changing a
//! base color restyles every element that shares its meaning.
//!
//! Rendering without color keeps the text and drops the styling, which is what the tests
//! and `--no-color` see.

use console::Style;
use once_cell::sync::Lazy;
use outstanding::{rgb_to_ansi256, Theme};

/// Style identifiers shared between templates and renderers.
pub mod names {
    pub const REGULAR: &str = "regular";
    pub const MUTED: &str = "muted";
    pub const FAINT: &str = "faint";
    pub const HIGHLIGHT: &str = "highlight";
    pub const ERROR: &str = "error";
    pub const WARNING: &str = "warning";
    pub const SUCCESS: &str = "success";
    pub const INFO: &str = "info";
    pub const TIME: &str = "time";
    // Sidebar
    pub const SIDEBAR_HEADING: &str = "sidebar-heading";
    pub const LIST_INDEX: &str = "list-index";
    pub const LIST_TITLE: &str = "list-title";
    pub const CURRENT_TITLE: &str = "current-title";
    pub const CURSOR: &str = "cursor";
    pub const DRAFT: &str = "draft";
    // Editor
    pub const PAGE_TITLE: &str = "page-title";
    pub const ACTIVE_TITLE: &str = "active-title";
    pub const PLACEHOLDER: &str = "placeholder";
    pub const BLOCK_INDEX: &str = "block-index";
    pub const FOCUS: &str = "focus";
    pub const MARKER: &str = "marker";
    pub const HEADING_1: &str = "heading-1";
    pub const HEADING_2: &str = "heading-2";
    pub const HEADING_3: &str = "heading-3";
    pub const CHECKBOX: &str = "checkbox";
    pub const CHECKBOX_DONE: &str = "checkbox-done";
    pub const TODO_DONE: &str = "todo-done";
    pub const QUOTE_BAR: &str = "quote-bar";
    pub const QUOTE: &str = "quote";
}

pub static JOTTER_THEME: Lazy<Theme> = Lazy::new(build_theme);

fn build_theme() -> Theme {
    let regular = Style::new();
    let muted = Style::new().color256(rgb_to_ansi256((138, 138, 138)));
    let faint = Style::new().color256(rgb_to_ansi256((98, 98, 98)));
    let accent = Style::new().color256(rgb_to_ansi256((196, 140, 0)));
    let highlight = Style::new()
        .black()
        .on_color256(rgb_to_ansi256((255, 235, 59)));

    Theme::new()
        .add(names::REGULAR, regular.clone())
        .add(names::MUTED, muted.clone())
        .add(names::FAINT, faint.clone())
        .add(names::HIGHLIGHT, highlight.clone())
        .add(names::ERROR, Style::new().red().bold())
        .add(names::WARNING, Style::new().yellow().bold())
        .add(names::SUCCESS, Style::new().green())
        .add(names::INFO, muted.clone())
        .add(names::TIME, muted.clone().italic())
        .add(names::SIDEBAR_HEADING, muted.clone().bold())
        .add(names::LIST_INDEX, accent.clone())
        .add(names::LIST_TITLE, regular.clone())
        .add(names::CURRENT_TITLE, regular.clone().bold())
        .add(names::CURSOR, highlight.clone())
        .add(names::DRAFT, regular.clone().underlined())
        .add(names::PAGE_TITLE, regular.clone().bold())
        .add(names::ACTIVE_TITLE, regular.clone().bold().underlined())
        .add(names::PLACEHOLDER, faint.clone().italic())
        .add(names::BLOCK_INDEX, faint.clone())
        .add(names::FOCUS, accent.clone().bold())
        .add(names::MARKER, faint)
        .add(names::HEADING_1, regular.clone().bold().underlined())
        .add(names::HEADING_2, regular.clone().bold())
        .add(names::HEADING_3, muted.clone().bold())
        .add(names::CHECKBOX, accent)
        .add(names::CHECKBOX_DONE, Style::new().green())
        .add(names::TODO_DONE, muted.clone().strikethrough())
        .add(names::QUOTE_BAR, Style::new().color256(rgb_to_ansi256((120, 144, 156))))
        .add(names::QUOTE, muted.italic())
}
