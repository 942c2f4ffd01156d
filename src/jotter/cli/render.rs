//! # Rendering Module
//!
//! Turns api state into terminal text through the `outstanding` templates in
//! [`super::templates`].
//!
//! ## Design Philosophy
//!
//! Layout calculations (numbering, truncation, placeholders, column joins) stay in Rust
//! because they need Unicode-aware widths. Templates receive one entry per output row with
//! the style name already chosen, and only apply styles.
//!
//! The sidebar and the editor are rendered separately and joined row by row; the sidebar
//! column is padded with `console::pad_str`, which measures through ANSI codes.

use super::styles::{names, JOTTER_THEME};
use super::templates::{EDITOR_TEMPLATE, MESSAGES_TEMPLATE, SIDEBAR_TEMPLATE};
use chrono::{DateTime, Utc};
use console::{pad_str, truncate_str, Alignment};
use jotter::api::{CmdMessage, JotterApi, MessageLevel};
use jotter::editor::Editor;
use jotter::error::{JotterError, Result};
use jotter::ids::IdGenerator;
use jotter::model::{Block, BlockKind};
use outstanding::{render_with_output, truncate_to_width, OutputMode, ThemeChoice};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

pub const COLUMN_SEPARATOR: &str = " │ ";
pub const CARET: &str = "▏";
const SIDEBAR_HEADING: &str = "PAGES";
const NEW_PAGE_LABEL: &str = "+ New page";
const ADD_BLOCK_FOOTER: &str = "+ Add a block: Text · Heading · To-do · Quote";
const NO_PAGE_MESSAGE: &str = "Select a page to start writing.";
const UNTITLED: &str = "Untitled";
/// Width of "›NN " in front of every block row.
const GUTTER_WIDTH: usize = 4;

/// Where keyboard input currently goes, for highlighting. Scripts render with `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenFocus {
    #[default]
    None,
    /// The sidebar, with the cursor on a 1-based visible row.
    Sidebar { cursor: usize },
    Title,
    Blocks,
}

#[derive(Debug, Clone)]
pub struct ScreenOptions {
    pub use_color: bool,
    pub sidebar_width: usize,
    /// Total width to fit the screen into; `None` leaves editor rows untruncated.
    pub width: Option<usize>,
    pub focus: ScreenFocus,
    pub hint: Option<String>,
}

impl ScreenOptions {
    pub fn plain(sidebar_width: usize) -> Self {
        Self {
            use_color: false,
            sidebar_width,
            width: None,
            focus: ScreenFocus::None,
            hint: None,
        }
    }
}

#[derive(Serialize)]
struct SidebarLine {
    marker: String,
    marker_style: &'static str,
    index: String,
    text: String,
    style: &'static str,
}

#[derive(Serialize)]
struct SidebarData {
    heading: String,
    search: String,
    lines: Vec<SidebarLine>,
    footer: String,
    footer_style: &'static str,
}

#[derive(Serialize)]
struct BlockLine {
    gutter: String,
    gutter_style: &'static str,
    marker: String,
    marker_style: &'static str,
    text: String,
    style: &'static str,
}

#[derive(Serialize)]
struct EditorData {
    open: bool,
    title: String,
    title_style: &'static str,
    edited: String,
    rule: String,
    lines: Vec<BlockLine>,
    footer: String,
    empty_message: String,
    hint: String,
}

#[derive(Serialize)]
struct MessageData {
    content: String,
    style: String,
}

#[derive(Serialize)]
struct MessagesData {
    messages: Vec<MessageData>,
}

fn output_mode(use_color: bool) -> OutputMode {
    if use_color {
        OutputMode::Term
    } else {
        OutputMode::Text
    }
}

fn render_template<T: Serialize>(template: &str, data: &T, use_color: bool) -> Result<String> {
    render_with_output(
        template,
        data,
        ThemeChoice::from(&*JOTTER_THEME),
        output_mode(use_color),
    )
    .map_err(|e| JotterError::Render(e.to_string()))
}

/// The full screen: sidebar (when open) next to the editor.
pub fn render_screen<G: IdGenerator>(api: &JotterApi<G>, options: &ScreenOptions) -> Result<String> {
    let edited = api
        .editor()
        .and_then(|editor| api.workspace().page(editor.page_id()))
        .map(|page| page.updated_at);
    let editor = render_editor(api.editor(), edited, options)?;
    if !api.workspace().is_sidebar_open() {
        return Ok(fit_rows(&editor, options.width));
    }

    let sidebar = render_sidebar(api, options)?;
    let joined = join_columns(&sidebar, &editor, options.sidebar_width);
    Ok(fit_rows(&joined, options.width))
}

fn render_sidebar<G: IdGenerator>(api: &JotterApi<G>, options: &ScreenOptions) -> Result<String> {
    let cursor = match options.focus {
        ScreenFocus::Sidebar { cursor } => Some(cursor),
        _ => None,
    };
    let entries = api.sidebar_entries();

    let mut lines: Vec<SidebarLine> = entries
        .iter()
        .map(|entry| {
            let on_cursor = cursor == Some(entry.index);
            let index = format!("{:>2}. ", entry.index);
            let available = options
                .sidebar_width
                .saturating_sub(1 + index.width());
            SidebarLine {
                marker: if on_cursor { "›" } else { " " }.to_string(),
                marker_style: names::FOCUS,
                index,
                text: truncate_to_width(&display_title(&entry.title), available),
                style: if on_cursor {
                    names::CURSOR
                } else if entry.is_current {
                    names::CURRENT_TITLE
                } else {
                    names::LIST_TITLE
                },
            }
        })
        .collect();

    if lines.is_empty() {
        lines.push(SidebarLine {
            marker: " ".to_string(),
            marker_style: names::FOCUS,
            index: String::new(),
            text: "No matching pages".to_string(),
            style: names::MUTED,
        });
    }

    let (footer, footer_style) = match api.sidebar().draft() {
        Some(draft) => (format!("+ {draft}{CARET}"), names::DRAFT),
        None => (NEW_PAGE_LABEL.to_string(), names::MUTED),
    };

    let data = SidebarData {
        heading: SIDEBAR_HEADING.to_string(),
        search: api.sidebar().query().to_string(),
        lines,
        footer: truncate_to_width(&footer, options.sidebar_width),
        footer_style,
    };
    render_template(SIDEBAR_TEMPLATE, &data, options.use_color)
}

fn render_editor(
    editor: Option<&Editor>,
    edited: Option<DateTime<Utc>>,
    options: &ScreenOptions,
) -> Result<String> {
    let hint = options.hint.clone().unwrap_or_default();
    let Some(editor) = editor else {
        let data = EditorData {
            open: false,
            title: String::new(),
            title_style: names::PAGE_TITLE,
            edited: String::new(),
            rule: String::new(),
            lines: vec![],
            footer: String::new(),
            empty_message: NO_PAGE_MESSAGE.to_string(),
            hint,
        };
        return render_template(EDITOR_TEMPLATE, &data, options.use_color);
    };

    let title_active = options.focus == ScreenFocus::Title;
    let mut title = if editor.title().is_empty() && !title_active {
        UNTITLED.to_string()
    } else {
        editor.title().to_string()
    };
    if title_active {
        title.push_str(CARET);
    }

    let show_caret = options.focus == ScreenFocus::Blocks;
    let mut lines = Vec::new();
    for (i, block) in editor.blocks().iter().enumerate() {
        let focused = editor.focused_block_id() == Some(&block.id);
        let caret = match editor.focus() {
            Some(focus) if focused && show_caret => Some(focus.caret),
            _ => None,
        };
        block_lines(&mut lines, i + 1, block, focused, caret);
    }

    let data = EditorData {
        open: true,
        title,
        title_style: if title_active {
            names::ACTIVE_TITLE
        } else if editor.title().is_empty() {
            names::PLACEHOLDER
        } else {
            names::PAGE_TITLE
        },
        edited: edited
            .map(|at| format!("edited {}", format_time_ago(at)))
            .unwrap_or_default(),
        rule: "─".repeat(24),
        lines,
        footer: ADD_BLOCK_FOOTER.to_string(),
        empty_message: String::new(),
        hint,
    };
    render_template(EDITOR_TEMPLATE, &data, options.use_color)
}

/// Rows for one block: marker and style by type, placeholder when empty, continuation rows
/// for embedded newlines.
fn block_lines(
    lines: &mut Vec<BlockLine>,
    number: usize,
    block: &Block,
    focused: bool,
    caret: Option<usize>,
) {
    let (marker, marker_style, style, placeholder) = match block.kind {
        BlockKind::Heading { level } => {
            let style = match level {
                1 => names::HEADING_1,
                2 => names::HEADING_2,
                _ => names::HEADING_3,
            };
            let hashes = "#".repeat(usize::from(level.clamp(1, 3)));
            (format!("{hashes} "), names::MARKER, style, "Heading")
        }
        BlockKind::Todo { completed: true } => {
            ("[x] ".to_string(), names::CHECKBOX_DONE, names::TODO_DONE, "To-do")
        }
        BlockKind::Todo { completed: false } => {
            ("[ ] ".to_string(), names::CHECKBOX, names::REGULAR, "To-do")
        }
        BlockKind::Quote => ("│ ".to_string(), names::QUOTE_BAR, names::QUOTE, "Quote"),
        BlockKind::Paragraph | BlockKind::List => {
            (String::new(), names::MARKER, names::REGULAR, "Type something...")
        }
    };

    let mut text = block.content.clone();
    if let Some(caret) = caret {
        let offset = text
            .char_indices()
            .nth(caret)
            .map(|(offset, _)| offset)
            .unwrap_or(text.len());
        text.insert_str(offset, CARET);
    }

    let gutter_style = if focused { names::FOCUS } else { names::BLOCK_INDEX };
    if block.content.is_empty() {
        let text = if caret.is_some() { CARET.to_string() } else { String::new() };
        lines.push(BlockLine {
            gutter: gutter(number, focused),
            gutter_style,
            marker,
            marker_style,
            text: format!("{text}{placeholder}"),
            style: names::PLACEHOLDER,
        });
        return;
    }

    let continuation_marker = if block.kind == BlockKind::Quote {
        marker.clone()
    } else {
        " ".repeat(marker.width())
    };
    for (i, row) in text.split('\n').enumerate() {
        let first = i == 0;
        lines.push(BlockLine {
            gutter: if first {
                gutter(number, focused)
            } else {
                " ".repeat(GUTTER_WIDTH)
            },
            gutter_style,
            marker: if first {
                marker.clone()
            } else {
                continuation_marker.clone()
            },
            marker_style,
            text: row.to_string(),
            style,
        });
    }
}

fn gutter(number: usize, focused: bool) -> String {
    format!("{}{:>2} ", if focused { "›" } else { " " }, number)
}

fn display_title(title: &str) -> String {
    if title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

/// Lays two rendered columns side by side, padding (or cutting) the left one to `width`.
pub fn join_columns(left: &str, right: &str, width: usize) -> String {
    let left: Vec<&str> = left.lines().collect();
    let right: Vec<&str> = right.lines().collect();
    let rows = left.len().max(right.len());

    let mut output = String::new();
    for row in 0..rows {
        let l = left.get(row).copied().unwrap_or("");
        let r = right.get(row).copied().unwrap_or("");
        let line = format!(
            "{}{}{}",
            pad_str(l, width, Alignment::Left, Some("…")),
            COLUMN_SEPARATOR,
            r
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

fn fit_rows(text: &str, width: Option<usize>) -> String {
    let mut output = String::new();
    for row in text.lines() {
        match width {
            Some(width) => output.push_str(&truncate_str(row, width, "…")),
            None => output.push_str(row),
        }
        output.push('\n');
    }
    output
}

/// Renders command messages using the template system with themed styles.
pub fn render_messages(messages: &[CmdMessage], use_color: bool) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let data = MessagesData {
        messages: messages
            .iter()
            .map(|msg| MessageData {
                content: msg.content.clone(),
                style: message_style(msg.level).to_string(),
            })
            .collect(),
    };

    render_template(MESSAGES_TEMPLATE, &data, use_color).unwrap_or_else(|_| {
        messages
            .iter()
            .map(|m| format!("{}\n", m.content))
            .collect()
    })
}

fn message_style(level: MessageLevel) -> &'static str {
    match level {
        MessageLevel::Info => names::INFO,
        MessageLevel::Success => names::SUCCESS,
        MessageLevel::Warning => names::WARNING,
        MessageLevel::Error => names::ERROR,
    }
}

/// Prints command messages to stdout using the template system.
pub fn print_messages(messages: &[CmdMessage], use_color: bool) {
    let output = render_messages(messages, use_color);
    if !output.is_empty() {
        print!("{}", output);
    }
}

pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jotter::ids::SequentialIds;
    use jotter::input::{Key, KeyEvent};
    use jotter::model::{BlockType, BlockUpdate};

    fn welcome() -> JotterApi<SequentialIds> {
        JotterApi::welcome(SequentialIds::new())
    }

    fn screen(api: &JotterApi<SequentialIds>) -> String {
        render_screen(api, &ScreenOptions::plain(24)).unwrap()
    }

    #[test]
    fn welcome_screen_shows_sidebar_and_blocks() {
        let output = screen(&welcome());

        assert!(output.contains("PAGES"));
        assert!(output.contains(" 1. Getting Started"));
        assert!(output.contains("+ New page"));
        assert!(output.contains("Getting Started"));
        assert!(output.contains("# Welcome to your workspace"));
        assert!(output.contains("## What you can do here"));
        assert!(output.contains("[ ] Create pages and organize your thoughts"));
        assert!(output.contains(COLUMN_SEPARATOR.trim_end()));
    }

    #[test]
    fn closed_sidebar_renders_editor_only() {
        let mut api = welcome();
        api.toggle_sidebar();
        let output = screen(&api);

        assert!(!output.contains("PAGES"));
        assert!(!output.contains(COLUMN_SEPARATOR));
        assert!(output.starts_with("Getting Started  edited"));
    }

    #[test]
    fn block_types_get_their_markers() {
        let mut api = welcome();
        api.create_page("Kinds");
        let first = api.block_at(1).unwrap();
        for kind in [BlockType::Quote, BlockType::Todo, BlockType::Paragraph] {
            api.add_block(Some(&first), kind);
        }
        // order is now: heading, paragraph, todo, quote
        let todo = api.block_at(3).unwrap();
        api.update_block(&todo, &BlockUpdate::content("Ship"));
        api.toggle_todo(&todo);
        let quote = api.block_at(4).unwrap();
        api.update_block(&quote, &BlockUpdate::content("Said\nsomeone"));

        let output = screen(&api);
        assert!(output.contains("Type something..."));
        assert!(output.contains("[x] Ship"));
        assert!(output.contains("│ Said"));
        assert!(output.contains("│ someone"));
    }

    #[test]
    fn focused_block_is_marked() {
        let mut api = welcome();
        let second = api.block_at(2).unwrap();
        api.focus_block(&second);

        let output = screen(&api);
        assert!(output.contains("› 2 This is your personal"));
        assert!(output.contains("  1 # Welcome"));
    }

    #[test]
    fn caret_shows_only_with_block_focus() {
        let mut api = welcome();
        api.create_page("Hi");
        let first = api.block_at(1).unwrap();
        api.focus_block(&first);
        api.key_down(&first, KeyEvent::new(Key::Left));

        let mut options = ScreenOptions::plain(24);
        assert!(!render_screen(&api, &options).unwrap().contains(CARET));

        options.focus = ScreenFocus::Blocks;
        assert!(render_screen(&api, &options).unwrap().contains(&format!("H{CARET}i")));
    }

    #[test]
    fn search_and_draft_show_in_sidebar() {
        let mut api = welcome();
        api.create_page("Plans");
        api.search("zzz");
        api.begin_create();
        api.set_draft("Ideas");

        let output = screen(&api);
        assert!(output.contains("search: zzz"));
        assert!(output.contains("No matching pages"));
        assert!(output.contains(&format!("+ Ideas{CARET}")));
    }

    #[test]
    fn sidebar_titles_are_truncated_to_column() {
        let mut api = welcome();
        api.create_page("An extraordinarily long page title that will not fit");
        let output = screen(&api);

        for line in output.lines() {
            let left = line.split(" │").next().unwrap_or("");
            assert!(left.width() <= 24, "too wide: {left:?}");
        }
    }

    #[test]
    fn unknown_selection_shows_prompt() {
        let mut api = welcome();
        api.select_page(&jotter::model::PageId::new("ghost"));
        assert!(screen(&api).contains(NO_PAGE_MESSAGE));
    }

    #[test]
    fn join_columns_pads_left_column() {
        let joined = join_columns("a\nbb\nccc", "1", 4);
        let rows: Vec<&str> = joined.lines().collect();
        assert_eq!(rows[0], format!("a   {COLUMN_SEPARATOR}1"));
        assert_eq!(rows[2], format!("ccc {}", COLUMN_SEPARATOR.trim_end()));
    }

    #[test]
    fn messages_render_plain() {
        let output = render_messages(
            &[CmdMessage::success("Saved"), CmdMessage::info("Note")],
            false,
        );
        assert_eq!(output, "Saved\nNote\n");
        assert_eq!(render_messages(&[], false), "");
    }

    #[test]
    fn renders_with_and_without_color() {
        let api = welcome();
        let plain = screen(&api);
        assert!(!plain.contains('\u{1b}'));

        let mut options = ScreenOptions::plain(24);
        options.use_color = true;
        let styled = render_screen(&api, &options).unwrap();
        assert!(styled.contains("Getting Started"));
        assert!(styled.contains("PAGES"));
    }

    #[test]
    fn time_ago_reads_naturally() {
        let label = format_time_ago(Utc::now() - chrono::Duration::hours(2));
        assert!(label.contains("hours ago"));
    }
}
