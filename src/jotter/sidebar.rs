//! # Sidebar
//!
//! Lists the workspace's pages, filters them by title and runs the "new page" flow. The
//! sidebar never mutates pages itself: selection, creation and deletion come back out as
//! [`SidebarCommand`]s for the owner of the workspace to apply.
//!
//! ## Display indexes
//!
//! Visible entries are numbered from 1 in list order *after* filtering, so "2" always means
//! the second line the user can see. Indexes are recomputed on every query change and are
//! not stable across edits; the page id is.

use crate::input::{Key, KeyEvent};
use crate::model::{Page, PageId};
use crate::workspace::Workspace;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarCommand {
    Select(PageId),
    Create(String),
    Delete(PageId),
}

/// One visible line of the page list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarEntry {
    pub index: usize,
    pub page_id: PageId,
    pub title: String,
    pub is_current: bool,
    pub can_delete: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    query: String,
    draft: Option<String>,
}

/// Case-insensitive substring match of `query` against `title`.
pub fn title_matches(title: &str, query: &str) -> bool {
    title.to_lowercase().contains(&query.to_lowercase())
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Pages whose title contains the query, in workspace order.
    pub fn filter<'a>(&self, pages: &'a [Page]) -> Vec<&'a Page> {
        pages
            .iter()
            .filter(|page| title_matches(&page.title, &self.query))
            .collect()
    }

    pub fn entries(&self, workspace: &Workspace) -> Vec<SidebarEntry> {
        let can_delete = workspace.len() > 1;
        self.filter(workspace.pages())
            .into_iter()
            .enumerate()
            .map(|(i, page)| SidebarEntry {
                index: i + 1,
                page_id: page.id.clone(),
                title: page.title.clone(),
                is_current: &page.id == workspace.current_page_id(),
                can_delete,
            })
            .collect()
    }

    /// Resolves a 1-based display index against the visible entries.
    pub fn page_at(&self, workspace: &Workspace, index: usize) -> Option<PageId> {
        let position = index.checked_sub(1)?;
        self.filter(workspace.pages())
            .get(position)
            .map(|page| page.id.clone())
    }

    pub fn select(&self, id: &PageId) -> SidebarCommand {
        SidebarCommand::Select(id.clone())
    }

    /// The item menu's "Delete", disabled while only one page exists.
    pub fn delete(&self, workspace: &Workspace, id: &PageId) -> Option<SidebarCommand> {
        (workspace.len() > 1).then(|| SidebarCommand::Delete(id.clone()))
    }

    pub fn is_creating(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    pub fn begin_create(&mut self) {
        if self.draft.is_none() {
            self.draft = Some(String::new());
        }
    }

    /// Replaces the draft title. Ignored outside creating mode.
    pub fn set_draft(&mut self, text: &str) {
        if let Some(draft) = self.draft.as_mut() {
            *draft = text.to_string();
        }
    }

    /// Keys typed into the draft input: Enter confirms, Escape cancels, characters and
    /// Backspace edit the draft.
    pub fn create_key(&mut self, key: KeyEvent) -> Option<SidebarCommand> {
        match key.key {
            Key::Enter => self.confirm(),
            Key::Escape => {
                self.cancel();
                None
            }
            Key::Char(c) => {
                self.draft.as_mut()?.push(c);
                None
            }
            Key::Backspace => {
                self.draft.as_mut()?.pop();
                None
            }
            _ => None,
        }
    }

    /// Focus leaving the draft input confirms it, like Enter.
    pub fn blur(&mut self) -> Option<SidebarCommand> {
        self.confirm()
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// A non-blank draft becomes a create command and closes the input. A blank draft
    /// leaves the input open.
    fn confirm(&mut self) -> Option<SidebarCommand> {
        let title = self.draft.as_deref()?.trim();
        if title.is_empty() {
            return None;
        }
        let title = title.to_string();
        self.draft = None;
        Some(SidebarCommand::Create(title))
    }
}
