//! # API Facade
//!
//! [`JotterApi`] is the single writer of workspace state and the entry point for every
//! surface (the scripted CLI, the interactive terminal, tests). It owns the [`Workspace`],
//! the [`Editor`] for the current page, the [`Sidebar`] and the id generator.
//!
//! ## Role and Responsibilities
//!
//! - **Dispatches** each request to the component that owns that piece of state
//! - **Funnels** editor changes into [`Workspace::update_page`] and sidebar commands into
//!   the matching workspace operation
//! - **Keeps the editor in step** with the current page: whenever the selection can change,
//!   the editor is re-synced, or dropped when the selection no longer resolves
//! - **Returns structured results** ([`CmdResult`]) and never prints
//!
//! Refused requests (deleting the last page or block, touching unknown ids) come back with
//! `changed == false` and an informational message; state is left exactly as it was.
//!
//! ## Generic Over IdGenerator
//!
//! `JotterApi<G: IdGenerator>` takes its id source as a type parameter so tests run with a
//! deterministic [`crate::ids::SequentialIds`] while the binary uses the configured
//! [`crate::ids::IdSource`].

use crate::editor::Editor;
use crate::ids::IdGenerator;
use crate::input::{Key, KeyEvent, KeyOutcome};
use crate::model::{
    BlockId, BlockKind, BlockType, BlockUpdate, PageId, PageUpdate, MAX_HEADING_LEVEL,
};
use crate::sidebar::{Sidebar, SidebarCommand, SidebarEntry};
use crate::workspace::Workspace;
use log::info;

pub use crate::outcome::{CmdMessage, CmdResult, MessageLevel};

pub struct JotterApi<G: IdGenerator> {
    workspace: Workspace,
    editor: Option<Editor>,
    sidebar: Sidebar,
    ids: G,
}

impl<G: IdGenerator> JotterApi<G> {
    pub fn new(workspace: Workspace, ids: G) -> Self {
        let mut api = Self {
            workspace,
            editor: None,
            sidebar: Sidebar::new(),
            ids,
        };
        api.sync_editor();
        api
    }

    /// An api over a fresh workspace holding the "Getting Started" page.
    pub fn welcome(mut ids: G) -> Self {
        let workspace = Workspace::welcome(&mut ids);
        Self::new(workspace, ids)
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// The editor for the current page, if the selection resolves.
    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        self.sidebar.entries(&self.workspace)
    }

    /// The page at a 1-based position in the visible sidebar list.
    pub fn page_at(&self, index: usize) -> Option<PageId> {
        self.sidebar.page_at(&self.workspace, index)
    }

    /// The block at a 1-based position on the open page.
    pub fn block_at(&self, index: usize) -> Option<BlockId> {
        let editor = self.editor.as_ref()?;
        let position = index.checked_sub(1)?;
        editor.blocks().get(position).map(|block| block.id.clone())
    }

    // -- workspace ---------------------------------------------------------------------

    pub fn create_page(&mut self, title: &str) -> CmdResult {
        let id = self.workspace.create_page(&mut self.ids, title);
        self.sync_editor();
        info!("event=page_create status=ok id={id}");
        CmdResult::changed()
            .with_created_page(id)
            .with_message(CmdMessage::success(format!("Page created: {title}")))
    }

    pub fn select_page(&mut self, id: &PageId) -> CmdResult {
        let resolved = self.workspace.select_page(id);
        self.sync_editor();
        if resolved {
            CmdResult::changed()
        } else {
            CmdResult::changed().with_message(CmdMessage::warning(format!(
                "Page {id} does not exist; nothing to show"
            )))
        }
    }

    pub fn delete_page(&mut self, id: &PageId) -> CmdResult {
        let title = self.workspace.page(id).map(|page| page.title.clone());
        if !self.workspace.delete_page(id) {
            let reason = if self.workspace.len() <= 1 {
                "Cannot delete the last page"
            } else {
                "No such page"
            };
            return CmdResult::unchanged().with_message(CmdMessage::info(reason));
        }
        self.sync_editor();
        info!("event=page_delete status=ok id={id}");
        CmdResult::changed().with_message(CmdMessage::success(format!(
            "Page deleted: {}",
            title.unwrap_or_default()
        )))
    }

    pub fn toggle_sidebar(&mut self) -> CmdResult {
        self.workspace.toggle_sidebar();
        CmdResult::changed()
    }

    // -- sidebar -----------------------------------------------------------------------

    pub fn search(&mut self, query: &str) -> CmdResult {
        self.sidebar.set_query(query);
        CmdResult::changed()
    }

    pub fn begin_create(&mut self) -> CmdResult {
        self.sidebar.begin_create();
        CmdResult::changed()
    }

    pub fn set_draft(&mut self, text: &str) -> CmdResult {
        if !self.sidebar.is_creating() {
            return CmdResult::unchanged();
        }
        self.sidebar.set_draft(text);
        CmdResult::changed()
    }

    /// A key typed into the new-page input.
    pub fn create_key(&mut self, key: KeyEvent) -> CmdResult {
        if !self.sidebar.is_creating() {
            return CmdResult::unchanged();
        }
        match self.sidebar.create_key(key) {
            Some(command) => self.apply_sidebar(command),
            None => CmdResult::changed(),
        }
    }

    /// Focus left the new-page input.
    pub fn create_blur(&mut self) -> CmdResult {
        match self.sidebar.blur() {
            Some(command) => self.apply_sidebar(command),
            None => CmdResult::unchanged(),
        }
    }

    /// The page item menu's "Delete".
    pub fn request_delete(&mut self, id: &PageId) -> CmdResult {
        match self.sidebar.delete(&self.workspace, id) {
            Some(command) => self.apply_sidebar(command),
            None => CmdResult::unchanged()
                .with_message(CmdMessage::info("Cannot delete the last page")),
        }
    }

    fn apply_sidebar(&mut self, command: SidebarCommand) -> CmdResult {
        match command {
            SidebarCommand::Select(id) => self.select_page(&id),
            SidebarCommand::Create(title) => self.create_page(&title),
            SidebarCommand::Delete(id) => self.delete_page(&id),
        }
    }

    // -- editor ------------------------------------------------------------------------

    pub fn update_title(&mut self, text: &str) -> CmdResult {
        let Some(editor) = self.editor.as_mut() else {
            return no_open_page();
        };
        let update = editor.update_title(text);
        self.commit(Some(update))
    }

    /// A key typed into the page title input.
    pub fn edit_title(&mut self, key: KeyEvent) -> CmdResult {
        let Some(editor) = self.editor.as_mut() else {
            return no_open_page();
        };
        let update = editor.edit_title(key);
        self.commit(update)
    }

    pub fn update_block(&mut self, id: &BlockId, update: &BlockUpdate) -> CmdResult {
        let Some(editor) = self.editor.as_mut() else {
            return no_open_page();
        };
        let update = editor.update_block(id, update);
        self.commit(update)
    }

    pub fn add_block(&mut self, after: Option<&BlockId>, block_type: BlockType) -> CmdResult {
        let Some(editor) = self.editor.as_mut() else {
            return no_open_page();
        };
        let update = editor.add_block(&mut self.ids, after, block_type);
        let created = editor.focused_block_id().cloned();
        self.commit(Some(update)).with_created_block(created)
    }

    pub fn delete_block(&mut self, id: &BlockId) -> CmdResult {
        let Some(editor) = self.editor.as_mut() else {
            return no_open_page();
        };
        if !editor.can_delete_blocks() {
            return CmdResult::unchanged()
                .with_message(CmdMessage::info("Cannot delete the only block on a page"));
        }
        let update = editor.delete_block(id);
        self.commit(update)
    }

    pub fn focus_block(&mut self, id: &BlockId) -> CmdResult {
        let Some(editor) = self.editor.as_mut() else {
            return no_open_page();
        };
        CmdResult::from_flag(editor.set_focus(id))
    }

    pub fn blur_block(&mut self) -> CmdResult {
        if let Some(editor) = self.editor.as_mut() {
            editor.blur();
        }
        CmdResult::changed()
    }

    /// One keystroke inside block `id`: the keystroke policy first, default text editing
    /// when the policy leaves the key alone. At most one update results.
    pub fn key_down(&mut self, id: &BlockId, key: KeyEvent) -> CmdResult {
        let Some(editor) = self.editor.as_mut() else {
            return no_open_page();
        };
        let response = editor.key_down(&mut self.ids, id, key);
        let (update, outcome) = match response.outcome {
            KeyOutcome::Suppressed => (response.update, KeyOutcome::Suppressed),
            KeyOutcome::Default => (editor.edit_text(id, key), KeyOutcome::Default),
        };
        // A suppressed Enter is a split; the new block holds the focus.
        let split = outcome == KeyOutcome::Suppressed && key.key == Key::Enter;
        let created = if split && update.is_some() {
            editor.focused_block_id().cloned()
        } else {
            None
        };
        self.commit(update)
            .with_key_outcome(outcome)
            .with_created_block(created)
    }

    /// Flips a to-do's completion. Other block types are left alone.
    pub fn toggle_todo(&mut self, id: &BlockId) -> CmdResult {
        let completed = self
            .editor
            .as_ref()
            .and_then(|editor| editor.block(id))
            .and_then(|block| block.kind.completed());
        match completed {
            Some(done) => self.update_block(id, &BlockUpdate::completed(!done)),
            None => CmdResult::unchanged(),
        }
    }

    /// Steps a heading through levels 1, 2, 3 and back to 1.
    pub fn cycle_heading_level(&mut self, id: &BlockId) -> CmdResult {
        let level = self
            .editor
            .as_ref()
            .and_then(|editor| editor.block(id))
            .and_then(|block| match block.kind {
                BlockKind::Heading { level } => Some(level),
                _ => None,
            });
        match level {
            Some(level) => {
                let next = if level >= MAX_HEADING_LEVEL { 1 } else { level + 1 };
                self.update_block(id, &BlockUpdate::level(next))
            }
            None => CmdResult::unchanged(),
        }
    }

    /// Applies an editor update to the page the editor has open.
    fn commit(&mut self, update: Option<PageUpdate>) -> CmdResult {
        let (Some(update), Some(editor)) = (update, self.editor.as_ref()) else {
            return CmdResult::unchanged();
        };
        let page_id = editor.page_id().clone();
        CmdResult::from_flag(self.workspace.update_page(&page_id, update))
    }

    fn sync_editor(&mut self) {
        match (self.workspace.current_page(), self.editor.as_mut()) {
            (Some(page), Some(editor)) => editor.sync(page),
            (Some(page), None) => self.editor = Some(Editor::open(page)),
            (None, _) => self.editor = None,
        }
    }
}

fn no_open_page() -> CmdResult {
    CmdResult::unchanged().with_message(CmdMessage::info("No page is open"))
}
