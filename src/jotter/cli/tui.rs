//! # Interactive Mode
//!
//! A redraw-per-key loop over `console::Term`. Keys are read one at a time, routed by
//! [`TuiState::handle`] to the api, and the whole screen is rendered again.
//!
//! Input goes to one of three panes: the sidebar (search and page selection), the page
//! title, or the blocks. Tab and Shift-Tab cycle between them; the sidebar is skipped while
//! it is closed. Control keys work from every pane:
//!
//! | Key | Action |
//! |-----|--------|
//! | Ctrl-N | New page |
//! | Ctrl-D | Delete the page under the sidebar cursor, or the current page |
//! | Ctrl-B | Toggle the sidebar |
//! | Ctrl-P | Add a text block below |
//! | Ctrl-K | Delete the focused block |
//! | Ctrl-O | "Add a block" menu, then p, h, t or q |
//! | Ctrl-T | Toggle the focused to-do |
//! | Ctrl-L | Cycle the focused heading's level |
//! | Ctrl-Q, Ctrl-C | Quit |
//!
//! The terminal cannot report Shift with Enter, so line breaks inside a block are not
//! available here; scripts can use `shift+enter`. `console` turns Ctrl-A, Ctrl-E and Ctrl-H
//! into Home, End and Backspace, so none of those are bindings.

use super::render::{render_messages, render_screen, ScreenFocus, ScreenOptions};
use console::{Key as TermKey, Term};
use jotter::api::{CmdMessage, CmdResult, JotterApi};
use jotter::error::Result;
use jotter::ids::IdGenerator;
use jotter::input::{Key, KeyEvent};
use jotter::model::{BlockId, BlockType};
use log::{debug, info};

const CTRL_B: char = '\u{2}';
const CTRL_D: char = '\u{4}';
const CTRL_K: char = '\u{b}';
const CTRL_L: char = '\u{c}';
const CTRL_N: char = '\u{e}';
const CTRL_O: char = '\u{f}';
const CTRL_P: char = '\u{10}';
const CTRL_Q: char = '\u{11}';
const CTRL_T: char = '\u{14}';

const ADD_MENU_HINT: &str = "Add a block: [p] Text  [h] Heading  [t] To-do  [q] Quote  [esc] Cancel";
const KEYS_HINT: &str = "tab pane · ^N new · ^D delete page · ^B sidebar · ^P/^O add · ^K remove · ^T todo · ^L level · ^Q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Sidebar,
    Title,
    Blocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct TuiState {
    pub pane: Pane,
    /// 1-based row in the visible sidebar list.
    pub sidebar_cursor: usize,
    pub add_menu: bool,
}

impl TuiState {
    pub fn new<G: IdGenerator>(api: &JotterApi<G>) -> Self {
        let mut state = Self {
            pane: Pane::Blocks,
            sidebar_cursor: 1,
            add_menu: false,
        };
        state.sync_cursor(api);
        state
    }

    pub fn screen_focus(&self) -> ScreenFocus {
        match self.pane {
            Pane::Sidebar => ScreenFocus::Sidebar {
                cursor: self.sidebar_cursor,
            },
            Pane::Title => ScreenFocus::Title,
            Pane::Blocks => ScreenFocus::Blocks,
        }
    }

    pub fn hint(&self) -> &'static str {
        if self.add_menu {
            ADD_MENU_HINT
        } else {
            KEYS_HINT
        }
    }

    /// Routes one terminal key. The returned result carries any messages to show.
    pub fn handle<G: IdGenerator>(&mut self, api: &mut JotterApi<G>, key: TermKey) -> (Flow, CmdResult) {
        if matches!(key, TermKey::Char(CTRL_Q) | TermKey::CtrlC) {
            return (Flow::Quit, CmdResult::unchanged());
        }

        let result = if self.add_menu {
            self.add_menu_key(api, key)
        } else if api.sidebar().is_creating() {
            self.create_key(api, key)
        } else {
            match key {
                TermKey::Char(CTRL_N) => self.new_page(api),
                TermKey::Char(CTRL_D) => {
                    let target = match self.pane {
                        Pane::Sidebar => api.page_at(self.sidebar_cursor),
                        _ => Some(api.workspace().current_page_id().clone()),
                    };
                    match target {
                        Some(id) => api.request_delete(&id),
                        None => CmdResult::unchanged(),
                    }
                }
                TermKey::Char(CTRL_B) => {
                    let result = api.toggle_sidebar();
                    if self.pane == Pane::Sidebar && !api.workspace().is_sidebar_open() {
                        self.pane = Pane::Title;
                    }
                    result
                }
                TermKey::Char(CTRL_P) => {
                    self.pane = Pane::Blocks;
                    let after = focused(api);
                    api.add_block(after.as_ref(), BlockType::Paragraph)
                }
                TermKey::Char(CTRL_O) => {
                    self.add_menu = true;
                    CmdResult::changed()
                }
                TermKey::Char(CTRL_K) => match focused(api) {
                    Some(id) => api.delete_block(&id),
                    None => CmdResult::unchanged(),
                },
                TermKey::Char(CTRL_T) => match focused(api) {
                    Some(id) => api.toggle_todo(&id),
                    None => CmdResult::unchanged(),
                },
                TermKey::Char(CTRL_L) => match focused(api) {
                    Some(id) => api.cycle_heading_level(&id),
                    None => CmdResult::unchanged(),
                },
                TermKey::Tab => self.cycle(api, true),
                TermKey::BackTab => self.cycle(api, false),
                key => match self.pane {
                    Pane::Sidebar => self.sidebar_key(api, key),
                    Pane::Title => self.title_key(api, key),
                    Pane::Blocks => self.blocks_key(api, key),
                },
            }
        };

        self.sync_cursor(api);
        (Flow::Continue, result)
    }

    fn new_page<G: IdGenerator>(&mut self, api: &mut JotterApi<G>) -> CmdResult {
        if !api.workspace().is_sidebar_open() {
            api.toggle_sidebar();
        }
        api.blur_block();
        self.pane = Pane::Sidebar;
        api.begin_create()
    }

    fn create_key<G: IdGenerator>(&mut self, api: &mut JotterApi<G>, key: TermKey) -> CmdResult {
        match key {
            TermKey::Tab | TermKey::BackTab => {
                let result = api.create_blur();
                if result.created_page.is_some() {
                    self.enter_title();
                }
                result
            }
            key => match key_event(&key) {
                Some(event) => {
                    let result = api.create_key(event);
                    if result.created_page.is_some() {
                        self.enter_title();
                    }
                    result
                }
                None => CmdResult::unchanged(),
            },
        }
    }

    fn enter_title(&mut self) {
        self.pane = Pane::Title;
    }

    fn add_menu_key<G: IdGenerator>(&mut self, api: &mut JotterApi<G>, key: TermKey) -> CmdResult {
        self.add_menu = false;
        let block_type = match key {
            TermKey::Char('p') => BlockType::Paragraph,
            TermKey::Char('h') => BlockType::Heading,
            TermKey::Char('t') => BlockType::Todo,
            TermKey::Char('q') => BlockType::Quote,
            _ => return CmdResult::changed(),
        };
        self.pane = Pane::Blocks;
        let after = focused(api);
        api.add_block(after.as_ref(), block_type)
    }

    fn cycle<G: IdGenerator>(&mut self, api: &mut JotterApi<G>, forward: bool) -> CmdResult {
        let sidebar_open = api.workspace().is_sidebar_open();
        let next = match (self.pane, forward) {
            (Pane::Sidebar, true) => Pane::Title,
            (Pane::Title, true) => Pane::Blocks,
            (Pane::Blocks, true) if sidebar_open => Pane::Sidebar,
            (Pane::Blocks, true) => Pane::Title,
            (Pane::Sidebar, false) => Pane::Blocks,
            (Pane::Title, false) if sidebar_open => Pane::Sidebar,
            (Pane::Title, false) => Pane::Blocks,
            (Pane::Blocks, false) => Pane::Title,
        };
        self.switch_to(api, next)
    }

    fn switch_to<G: IdGenerator>(&mut self, api: &mut JotterApi<G>, pane: Pane) -> CmdResult {
        debug!("event=tui_pane from={:?} to={:?}", self.pane, pane);
        if self.pane == Pane::Blocks && pane != Pane::Blocks {
            api.blur_block();
        }
        self.pane = pane;
        if pane == Pane::Blocks && focused(api).is_none() {
            if let Some(first) = api.block_at(1) {
                api.focus_block(&first);
            }
        }
        CmdResult::changed()
    }

    fn sidebar_key<G: IdGenerator>(&mut self, api: &mut JotterApi<G>, key: TermKey) -> CmdResult {
        let visible = api.sidebar_entries().len();
        match key {
            TermKey::ArrowUp => {
                self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1).max(1);
                CmdResult::changed()
            }
            TermKey::ArrowDown => {
                self.sidebar_cursor = (self.sidebar_cursor + 1).min(visible.max(1));
                CmdResult::changed()
            }
            TermKey::Enter => match api.page_at(self.sidebar_cursor) {
                Some(id) => api.select_page(&id),
                None => CmdResult::unchanged(),
            },
            TermKey::Escape => api.search(""),
            TermKey::Backspace => {
                let mut query = api.sidebar().query().to_string();
                query.pop();
                api.search(&query)
            }
            TermKey::Char(c) if !c.is_control() => {
                let query = format!("{}{c}", api.sidebar().query());
                self.sidebar_cursor = 1;
                api.search(&query)
            }
            _ => CmdResult::unchanged(),
        }
    }

    fn title_key<G: IdGenerator>(&mut self, api: &mut JotterApi<G>, key: TermKey) -> CmdResult {
        match key {
            TermKey::Enter | TermKey::ArrowDown => self.switch_to(api, Pane::Blocks),
            key => match key_event(&key) {
                Some(event) => api.edit_title(event),
                None => CmdResult::unchanged(),
            },
        }
    }

    fn blocks_key<G: IdGenerator>(&mut self, api: &mut JotterApi<G>, key: TermKey) -> CmdResult {
        let Some(current) = focused(api).or_else(|| api.block_at(1)) else {
            return CmdResult::unchanged();
        };
        match key {
            TermKey::ArrowUp => self.move_focus(api, &current, false),
            TermKey::ArrowDown => self.move_focus(api, &current, true),
            key => match key_event(&key) {
                Some(event) => api.key_down(&current, event),
                None => CmdResult::unchanged(),
            },
        }
    }

    fn move_focus<G: IdGenerator>(
        &mut self,
        api: &mut JotterApi<G>,
        current: &BlockId,
        down: bool,
    ) -> CmdResult {
        let Some(editor) = api.editor() else {
            return CmdResult::unchanged();
        };
        let Some(position) = editor.position(current) else {
            return CmdResult::unchanged();
        };
        // block_at is 1-based; position is 0-based
        let target = if down {
            api.block_at(position + 2)
        } else if position == 0 {
            return self.switch_to(api, Pane::Title);
        } else {
            api.block_at(position)
        };
        match target {
            Some(id) => api.focus_block(&id),
            None => CmdResult::unchanged(),
        }
    }

    /// Keeps the sidebar cursor on a visible row, preferring the current page after it moved.
    fn sync_cursor<G: IdGenerator>(&mut self, api: &JotterApi<G>) {
        let entries = api.sidebar_entries();
        if self.pane != Pane::Sidebar {
            if let Some(current) = entries.iter().find(|entry| entry.is_current) {
                self.sidebar_cursor = current.index;
                return;
            }
        }
        self.sidebar_cursor = self.sidebar_cursor.clamp(1, entries.len().max(1));
    }
}

fn focused<G: IdGenerator>(api: &JotterApi<G>) -> Option<BlockId> {
    api.editor()
        .and_then(|editor| editor.focused_block_id())
        .cloned()
}

/// Terminal key to editor key. Keys with no editing meaning map to `None`.
pub fn key_event(key: &TermKey) -> Option<KeyEvent> {
    let key = match key {
        TermKey::Enter => Key::Enter,
        TermKey::Backspace => Key::Backspace,
        TermKey::Del => Key::Delete,
        TermKey::Escape => Key::Escape,
        TermKey::ArrowLeft => Key::Left,
        TermKey::ArrowRight => Key::Right,
        TermKey::Home => Key::Home,
        TermKey::End => Key::End,
        TermKey::Char(c) if !c.is_control() => Key::Char(*c),
        _ => return None,
    };
    Some(KeyEvent::new(key))
}

/// Runs the interactive loop until Ctrl-Q or Ctrl-C.
pub fn run<G: IdGenerator>(
    api: &mut JotterApi<G>,
    sidebar_width: usize,
    use_color: bool,
) -> Result<()> {
    let term = Term::stdout();
    let mut state = TuiState::new(api);
    let mut messages: Vec<CmdMessage> = Vec::new();

    info!("event=tui_start pages={}", api.workspace().len());
    term.hide_cursor()?;
    let outcome = event_loop(&term, api, &mut state, &mut messages, sidebar_width, use_color);
    term.show_cursor()?;
    term.clear_screen()?;
    info!("event=tui_stop status={}", if outcome.is_ok() { "ok" } else { "error" });
    outcome
}

fn event_loop<G: IdGenerator>(
    term: &Term,
    api: &mut JotterApi<G>,
    state: &mut TuiState,
    messages: &mut Vec<CmdMessage>,
    sidebar_width: usize,
    use_color: bool,
) -> Result<()> {
    loop {
        let (rows, cols) = term.size();
        let options = ScreenOptions {
            use_color,
            sidebar_width,
            width: Some(usize::from(cols)),
            focus: state.screen_focus(),
            hint: Some(state.hint().to_string()),
        };
        let mut screen = render_screen(api, &options)?;
        screen.push_str(&render_messages(messages, use_color));
        let screen: String = screen
            .lines()
            .take(usize::from(rows).saturating_sub(1))
            .map(|line| format!("{line}\n"))
            .collect();

        term.clear_screen()?;
        term.write_str(&screen)?;

        // raw mode delivers Ctrl-C as `Key::CtrlC` rather than SIGINT
        let key = term.read_key_raw()?;
        let (flow, result) = state.handle(api, key);
        if flow == Flow::Quit {
            return Ok(());
        }
        *messages = result.messages;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jotter::ids::SequentialIds;
    use jotter::model::BlockKind;

    fn setup() -> (JotterApi<SequentialIds>, TuiState) {
        let api = JotterApi::welcome(SequentialIds::new());
        let state = TuiState::new(&api);
        (api, state)
    }

    fn press(state: &mut TuiState, api: &mut JotterApi<SequentialIds>, keys: &[TermKey]) {
        for key in keys {
            state.handle(api, key.clone());
        }
    }

    fn type_text(state: &mut TuiState, api: &mut JotterApi<SequentialIds>, text: &str) {
        for c in text.chars() {
            state.handle(api, TermKey::Char(c));
        }
    }

    fn titles(api: &JotterApi<SequentialIds>) -> Vec<String> {
        api.workspace().pages().iter().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn ctrl_q_quits() {
        let (mut api, mut state) = setup();
        let (flow, _) = state.handle(&mut api, TermKey::Char(CTRL_Q));
        assert_eq!(flow, Flow::Quit);
    }

    #[test]
    fn ctrl_c_quits_like_ctrl_q() {
        let (mut api, mut state) = setup();
        let (flow, _) = state.handle(&mut api, TermKey::CtrlC);
        assert_eq!(flow, Flow::Quit);
    }

    #[test]
    fn ctrl_n_creates_page_from_draft() {
        let (mut api, mut state) = setup();
        press(&mut state, &mut api, &[TermKey::Char(CTRL_N)]);
        assert_eq!(state.pane, Pane::Sidebar);
        assert!(api.sidebar().is_creating());

        type_text(&mut state, &mut api, "Plans");
        let (_, result) = state.handle(&mut api, TermKey::Enter);

        assert!(result.created_page.is_some());
        assert_eq!(titles(&api), vec!["Getting Started", "Plans"]);
        assert_eq!(state.pane, Pane::Title);
        assert_eq!(state.sidebar_cursor, 2);
    }

    #[test]
    fn ctrl_n_reopens_closed_sidebar() {
        let (mut api, mut state) = setup();
        press(&mut state, &mut api, &[TermKey::Char(CTRL_B), TermKey::Char(CTRL_N)]);
        assert!(api.workspace().is_sidebar_open());
    }

    #[test]
    fn escape_cancels_creation() {
        let (mut api, mut state) = setup();
        press(&mut state, &mut api, &[TermKey::Char(CTRL_N), TermKey::Char('x'), TermKey::Escape]);
        assert!(!api.sidebar().is_creating());
        assert_eq!(api.workspace().len(), 1);
    }

    #[test]
    fn ctrl_d_refuses_last_page() {
        let (mut api, mut state) = setup();
        let (_, result) = state.handle(&mut api, TermKey::Char(CTRL_D));
        assert!(!result.changed);
        assert_eq!(result.messages[0].content, "Cannot delete the last page");
    }

    #[test]
    fn ctrl_d_in_sidebar_deletes_the_page_under_the_cursor() {
        let (mut api, mut state) = setup();
        api.create_page("Plans");
        api.create_page("Ideas");
        state.pane = Pane::Sidebar;
        state.sidebar_cursor = 2;

        press(&mut state, &mut api, &[TermKey::Char(CTRL_D)]);

        assert_eq!(titles(&api), vec!["Getting Started", "Ideas"]);
        assert_eq!(api.workspace().current_page().unwrap().title, "Ideas");
    }

    #[test]
    fn tab_cycles_panes_and_skips_closed_sidebar() {
        let (mut api, mut state) = setup();
        assert_eq!(state.pane, Pane::Blocks);
        press(&mut state, &mut api, &[TermKey::Tab]);
        assert_eq!(state.pane, Pane::Sidebar);
        press(&mut state, &mut api, &[TermKey::Tab]);
        assert_eq!(state.pane, Pane::Title);
        press(&mut state, &mut api, &[TermKey::Tab]);
        assert_eq!(state.pane, Pane::Blocks);
        assert_eq!(focused(&api), api.block_at(1));

        press(&mut state, &mut api, &[TermKey::Char(CTRL_B), TermKey::Tab]);
        assert_eq!(state.pane, Pane::Title);
        press(&mut state, &mut api, &[TermKey::BackTab]);
        assert_eq!(state.pane, Pane::Blocks);
    }

    #[test]
    fn sidebar_typing_searches_and_enter_selects() {
        let (mut api, mut state) = setup();
        api.create_page("Get Together");
        api.create_page("Plans");
        state.pane = Pane::Sidebar;

        type_text(&mut state, &mut api, "get");
        assert_eq!(api.sidebar().query(), "get");
        assert_eq!(api.sidebar_entries().len(), 2);

        press(&mut state, &mut api, &[TermKey::ArrowDown, TermKey::ArrowDown, TermKey::Enter]);
        assert_eq!(api.workspace().current_page().unwrap().title, "Get Together");

        press(&mut state, &mut api, &[TermKey::Escape]);
        assert_eq!(api.sidebar().query(), "");
    }

    #[test]
    fn title_pane_edits_title() {
        let (mut api, mut state) = setup();
        state.pane = Pane::Title;
        type_text(&mut state, &mut api, "!");
        assert_eq!(titles(&api)[0], "Getting Started!");

        press(&mut state, &mut api, &[TermKey::Enter]);
        assert_eq!(state.pane, Pane::Blocks);
    }

    #[test]
    fn blocks_pane_types_and_splits() {
        let (mut api, mut state) = setup();
        api.create_page("Notes");
        let first = api.block_at(1).unwrap();
        api.focus_block(&first);

        type_text(&mut state, &mut api, "!");
        press(&mut state, &mut api, &[TermKey::Enter]);
        type_text(&mut state, &mut api, "body");

        let blocks = api.editor().unwrap().blocks();
        assert_eq!(blocks[0].content, "Notes!");
        assert_eq!(blocks[1].content, "body");
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
    }

    #[test]
    fn arrows_move_between_blocks_and_up_to_title() {
        let (mut api, mut state) = setup();
        let first = api.block_at(1).unwrap();
        api.focus_block(&first);

        press(&mut state, &mut api, &[TermKey::ArrowDown]);
        assert_eq!(focused(&api), api.block_at(2));
        press(&mut state, &mut api, &[TermKey::ArrowUp, TermKey::ArrowUp]);
        assert_eq!(state.pane, Pane::Title);
        assert_eq!(focused(&api), None);
    }

    #[test]
    fn add_menu_inserts_chosen_type() {
        let (mut api, mut state) = setup();
        let first = api.block_at(1).unwrap();
        api.focus_block(&first);

        press(&mut state, &mut api, &[TermKey::Char(CTRL_O)]);
        assert!(state.add_menu);
        assert_eq!(state.hint(), ADD_MENU_HINT);
        press(&mut state, &mut api, &[TermKey::Char('q')]);

        assert!(!state.add_menu);
        let second = api.editor().unwrap().blocks()[1].clone();
        assert_eq!(second.kind, BlockKind::Quote);
        assert_eq!(focused(&api), Some(second.id));
    }

    #[test]
    fn add_menu_escape_adds_nothing() {
        let (mut api, mut state) = setup();
        press(&mut state, &mut api, &[TermKey::Char(CTRL_O), TermKey::Escape]);
        assert!(!state.add_menu);
        assert_eq!(api.editor().unwrap().blocks().len(), 6);
    }

    #[test]
    fn control_keys_act_on_focused_block() {
        let (mut api, mut state) = setup();
        let todo = api.block_at(4).unwrap();
        api.focus_block(&todo);
        press(&mut state, &mut api, &[TermKey::Char(CTRL_T)]);
        assert_eq!(
            api.editor().unwrap().block(&todo).unwrap().kind,
            BlockKind::Todo { completed: true }
        );

        let heading = api.block_at(1).unwrap();
        api.focus_block(&heading);
        press(&mut state, &mut api, &[TermKey::Char(CTRL_L)]);
        assert_eq!(
            api.editor().unwrap().block(&heading).unwrap().kind,
            BlockKind::Heading { level: 2 }
        );

        press(&mut state, &mut api, &[TermKey::Char(CTRL_K)]);
        assert!(api.editor().unwrap().block(&heading).is_none());

        press(&mut state, &mut api, &[TermKey::Char(CTRL_P)]);
        assert_eq!(api.editor().unwrap().blocks().len(), 6);
    }

    #[test]
    fn control_characters_are_not_text() {
        assert_eq!(key_event(&TermKey::Char('\u{7}')), None);
        assert_eq!(key_event(&TermKey::Char('a')), Some(KeyEvent::char('a')));
        assert_eq!(key_event(&TermKey::Del), Some(KeyEvent::new(Key::Delete)));
        assert_eq!(key_event(&TermKey::Tab), None);
    }

    #[test]
    fn add_block_binding_survives_console_key_decoding() {
        // console decodes 0x01 as Home, so Ctrl-A never reaches the handler
        for remapped in ['\u{1}', '\u{5}', '\u{8}', '\t', '\n', '\r', '\u{7f}'] {
            for bound in [CTRL_B, CTRL_D, CTRL_K, CTRL_L, CTRL_N, CTRL_O, CTRL_P, CTRL_Q, CTRL_T] {
                assert_ne!(bound, remapped);
            }
        }

        let (mut api, mut state) = setup();
        let first = api.block_at(1).unwrap();
        api.focus_block(&first);
        press(&mut state, &mut api, &[TermKey::Home]);
        assert_eq!(api.editor().unwrap().blocks().len(), 6);

        press(&mut state, &mut api, &[TermKey::Char(CTRL_P)]);
        let blocks = api.editor().unwrap().blocks();
        assert_eq!(blocks.len(), 7);
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(focused(&api).as_ref(), Some(&blocks[1].id));
    }
}
