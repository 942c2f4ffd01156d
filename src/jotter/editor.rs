//! # Editor
//!
//! The editor holds a local copy of the open page's title and blocks plus the focus target.
//! Each operation edits that copy and hands back the [`PageUpdate`] its parent must apply to
//! the workspace; `None` means nothing changed and nothing needs propagating.
//!
//! Switching pages (a [`Editor::sync`] with a different page id) throws the local copy away
//! and loads the new page. There is no diffing and no debounce.
//!
//! ## Keystrokes
//!
//! [`Editor::key_down`] implements the block keystroke policy:
//! - Enter without Shift splits: a new empty paragraph lands right after the block and takes
//!   focus. The newline is suppressed.
//! - Backspace on an empty block deletes the block instead of a character, unless it is the
//!   last block on the page.
//!
//! Every other key is left to the surface's default text editing. Surfaces without a native
//! text widget use [`Editor::edit_text`] for that.

use crate::ids::IdGenerator;
use crate::input::{Key, KeyEvent, KeyOutcome};
use crate::model::{Block, BlockId, BlockType, BlockUpdate, Page, PageId, PageUpdate};
use log::debug;

/// The block that receives keyboard input, and where the caret sits in it (in chars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Focus {
    pub block_id: BlockId,
    pub caret: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyResponse {
    pub outcome: KeyOutcome,
    pub update: Option<PageUpdate>,
}

impl KeyResponse {
    fn suppressed(update: Option<PageUpdate>) -> Self {
        Self {
            outcome: KeyOutcome::Suppressed,
            update,
        }
    }

    fn default_action() -> Self {
        Self {
            outcome: KeyOutcome::Default,
            update: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Editor {
    page_id: PageId,
    title: String,
    blocks: Vec<Block>,
    focus: Option<Focus>,
}

impl Editor {
    pub fn open(page: &Page) -> Self {
        Self {
            page_id: page.id.clone(),
            title: page.title.clone(),
            blocks: page.blocks.clone(),
            focus: None,
        }
    }

    /// Reloads from `page`. A different page drops the focus target as well.
    pub fn sync(&mut self, page: &Page) {
        if page.id != self.page_id {
            debug!("event=editor_load page={}", page.id);
            *self = Self::open(page);
            return;
        }
        self.title = page.title.clone();
        self.blocks = page.blocks.clone();
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.id == id)
    }

    pub fn focus(&self) -> Option<&Focus> {
        self.focus.as_ref()
    }

    pub fn focused_block_id(&self) -> Option<&BlockId> {
        self.focus.as_ref().map(|focus| &focus.block_id)
    }

    /// Whether the "delete block" command is enabled.
    pub fn can_delete_blocks(&self) -> bool {
        self.blocks.len() > 1
    }

    pub fn update_title(&mut self, text: &str) -> PageUpdate {
        self.title = text.to_string();
        PageUpdate::title(text)
    }

    /// End-of-line title editing for surfaces without a text widget.
    pub fn edit_title(&mut self, key: KeyEvent) -> Option<PageUpdate> {
        let mut title = self.title.clone();
        match key.key {
            Key::Char(c) => title.push(c),
            Key::Backspace => {
                title.pop()?;
            }
            _ => return None,
        }
        Some(self.update_title(&title))
    }

    pub fn update_block(&mut self, id: &BlockId, update: &BlockUpdate) -> Option<PageUpdate> {
        let block = self.blocks.iter_mut().find(|block| &block.id == id)?;
        update.apply_to(block);
        self.clamp_caret();
        Some(self.blocks_update())
    }

    /// Inserts an empty block after `after`, or at the end when `after` is `None` or
    /// unknown. The new block becomes the focus target.
    pub fn add_block<G: IdGenerator>(
        &mut self,
        ids: &mut G,
        after: Option<&BlockId>,
        block_type: BlockType,
    ) -> PageUpdate {
        let block = Block::empty(ids, block_type);
        let new_id = block.id.clone();

        let index = after
            .and_then(|id| self.position(id))
            .map(|pos| pos + 1)
            .unwrap_or(self.blocks.len());
        self.blocks.insert(index, block);
        debug!(
            "event=block_add page={} block={} type={} index={}",
            self.page_id, new_id, block_type, index
        );

        self.set_focus(&new_id);
        self.blocks_update()
    }

    /// Removes a block unless it is the last one on the page.
    pub fn delete_block(&mut self, id: &BlockId) -> Option<PageUpdate> {
        if !self.can_delete_blocks() {
            debug!(
                "event=block_delete status=refused reason=last_block page={}",
                self.page_id
            );
            return None;
        }
        let index = self.position(id)?;
        self.blocks.remove(index);
        debug!("event=block_delete status=ok page={} block={}", self.page_id, id);

        if self.focused_block_id() == Some(id) {
            let fallback = self.blocks[index.saturating_sub(1)].id.clone();
            self.set_focus(&fallback);
        }
        Some(self.blocks_update())
    }

    /// Makes `id` the focus target with the caret at the end of its text.
    pub fn set_focus(&mut self, id: &BlockId) -> bool {
        match self.block(id) {
            Some(block) => {
                let caret = block.content.chars().count();
                self.focus = Some(Focus {
                    block_id: id.clone(),
                    caret,
                });
                true
            }
            None => false,
        }
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    /// Applies the block keystroke policy to `key` pressed inside block `id`.
    pub fn key_down<G: IdGenerator>(
        &mut self,
        ids: &mut G,
        id: &BlockId,
        key: KeyEvent,
    ) -> KeyResponse {
        match key.key {
            Key::Enter if !key.shift => {
                KeyResponse::suppressed(Some(self.add_block(ids, Some(id), BlockType::Paragraph)))
            }
            Key::Backspace if self.block(id).is_some_and(Block::is_empty) => {
                KeyResponse::suppressed(self.delete_block(id))
            }
            _ => KeyResponse::default_action(),
        }
    }

    /// Default text editing at the caret of block `id`, which becomes the focus target.
    pub fn edit_text(&mut self, id: &BlockId, key: KeyEvent) -> Option<PageUpdate> {
        let block = self.block(id)?;
        let mut content = block.content.clone();
        let len = content.chars().count();
        let mut caret = match &self.focus {
            Some(focus) if &focus.block_id == id => focus.caret.min(len),
            _ => len,
        };

        let changed = match key.key {
            Key::Char(c) => {
                content.insert(byte_offset(&content, caret), c);
                caret += 1;
                true
            }
            Key::Enter => {
                content.insert(byte_offset(&content, caret), '\n');
                caret += 1;
                true
            }
            Key::Backspace if caret > 0 => {
                caret -= 1;
                content.remove(byte_offset(&content, caret));
                true
            }
            Key::Delete if caret < len => {
                content.remove(byte_offset(&content, caret));
                true
            }
            Key::Left => {
                caret = caret.saturating_sub(1);
                false
            }
            Key::Right => {
                caret = (caret + 1).min(len);
                false
            }
            Key::Home => {
                caret = 0;
                false
            }
            Key::End => {
                caret = len;
                false
            }
            _ => false,
        };

        self.focus = Some(Focus {
            block_id: id.clone(),
            caret,
        });
        if !changed {
            return None;
        }
        self.update_block(id, &BlockUpdate::content(content))
    }

    fn clamp_caret(&mut self) {
        let Some(focus) = &self.focus else {
            return;
        };
        let len = self
            .block(&focus.block_id)
            .map(|block| block.content.chars().count());
        if let (Some(len), Some(focus)) = (len, self.focus.as_mut()) {
            focus.caret = focus.caret.min(len);
        }
    }

    fn blocks_update(&self) -> PageUpdate {
        PageUpdate::blocks(self.blocks.clone())
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
