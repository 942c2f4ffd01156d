//! # Workspace
//!
//! The root state container: the canonical ordered list of pages, the id of the current
//! page and whether the sidebar is open. Every mutation is a named operation on this type;
//! nothing outside it writes page fields directly.
//!
//! Guards turn invalid requests into no-ops rather than errors:
//! - the last remaining page cannot be deleted,
//! - updates addressed to an unknown page id change nothing.
//!
//! The current page is a weak reference. [`Workspace::select_page`] accepts any id; an id
//! that resolves to nothing simply yields no current page.

use crate::error::{JotterError, Result};
use crate::ids::IdGenerator;
use crate::model::{Block, BlockId, BlockKind, Page, PageId, PageUpdate};
use log::debug;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct Workspace {
    pages: Vec<Page>,
    current_page_id: PageId,
    sidebar_open: bool,
}

impl Workspace {
    /// A workspace holding a single page, which becomes current.
    pub fn new(first: Page) -> Self {
        let current_page_id = first.id.clone();
        Self {
            pages: vec![first],
            current_page_id,
            sidebar_open: true,
        }
    }

    /// A workspace seeded with the "Getting Started" page.
    pub fn welcome<G: IdGenerator>(ids: &mut G) -> Self {
        Self::new(getting_started(ids))
    }

    /// Builds a workspace from existing pages; the first one becomes current.
    pub fn from_pages(pages: Vec<Page>) -> Result<Self> {
        let first = pages.first().ok_or(JotterError::EmptyWorkspace)?;
        let current_page_id = first.id.clone();

        let mut seen = HashSet::new();
        for page in &pages {
            if !seen.insert(page.id.clone()) {
                return Err(JotterError::DuplicatePage(page.id.to_string()));
            }
        }

        Ok(Self {
            pages,
            current_page_id,
            sidebar_open: true,
        })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|page| &page.id == id)
    }

    pub fn current_page_id(&self) -> &PageId {
        &self.current_page_id
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.page(&self.current_page_id)
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    /// Appends a page seeded with a heading from `title` and selects it.
    pub fn create_page<G: IdGenerator>(&mut self, ids: &mut G, title: &str) -> PageId {
        let page = Page::titled(ids, title);
        let id = page.id.clone();
        debug!("event=page_create id={} title_len={}", id, title.len());
        self.pages.push(page);
        self.current_page_id = id.clone();
        id
    }

    /// Merges `update` into the matching page. Returns false when no page matches.
    pub fn update_page(&mut self, id: &PageId, update: PageUpdate) -> bool {
        match self.pages.iter_mut().find(|page| &page.id == id) {
            Some(page) => {
                update.apply_to(page);
                true
            }
            None => {
                debug!("event=page_update status=skipped reason=unknown_id id={}", id);
                false
            }
        }
    }

    /// Removes a page unless it is the last one. A deleted current page hands the
    /// selection to the first remaining page.
    pub fn delete_page(&mut self, id: &PageId) -> bool {
        if self.pages.len() <= 1 {
            debug!("event=page_delete status=refused reason=last_page id={}", id);
            return false;
        }

        let before = self.pages.len();
        self.pages.retain(|page| &page.id != id);
        if self.pages.len() == before {
            return false;
        }

        if &self.current_page_id == id {
            self.current_page_id = self.pages[0].id.clone();
        }
        debug!(
            "event=page_delete status=ok id={} remaining={}",
            id,
            self.pages.len()
        );
        true
    }

    /// Points the selection at `id`. Returns whether it resolves to a page.
    pub fn select_page(&mut self, id: &PageId) -> bool {
        self.current_page_id = id.clone();
        self.page(id).is_some()
    }
}

/// The page a fresh workspace opens on.
pub fn getting_started<G: IdGenerator>(ids: &mut G) -> Page {
    let page_id = PageId::new(ids.next_id());
    let mut block = |kind: BlockKind, content: &str| {
        Block::new(BlockId::new(ids.next_id()), kind, content)
    };
    let blocks = vec![
        block(BlockKind::heading(1), "Welcome to your workspace"),
        block(
            BlockKind::Paragraph,
            "This is your personal workspace where you can write, plan, and organize.",
        ),
        block(BlockKind::heading(2), "What you can do here"),
        block(
            BlockKind::Todo { completed: false },
            "Create pages and organize your thoughts",
        ),
        block(
            BlockKind::Todo { completed: false },
            "Add different types of content blocks",
        ),
        block(
            BlockKind::Todo { completed: false },
            "Build your knowledge base",
        ),
    ];
    Page::new(page_id, "Getting Started", blocks)
}
