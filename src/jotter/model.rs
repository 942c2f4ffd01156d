use crate::ids::IdGenerator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_HEADING_LEVEL: u8 = 1;
pub const MAX_HEADING_LEVEL: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of a block, without its type-specific fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Paragraph,
    Heading,
    Todo,
    Quote,
    List,
}

impl BlockType {
    pub fn name(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading => "heading",
            BlockType::Todo => "todo",
            BlockType::Quote => "quote",
            BlockType::List => "list",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paragraph" | "text" => Ok(BlockType::Paragraph),
            "heading" => Ok(BlockType::Heading),
            "todo" | "to-do" => Ok(BlockType::Todo),
            "quote" => Ok(BlockType::Quote),
            "list" => Ok(BlockType::List),
            other => Err(format!("unknown block type `{other}`")),
        }
    }
}

/// A block's type together with the fields only that type carries.
///
/// `level` exists only on headings and `completed` only on to-dos, so an update can never
/// leave a stray field on the wrong kind of block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph,
    Heading {
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    Todo {
        #[serde(default)]
        completed: bool,
    },
    Quote,
    List,
}

fn default_heading_level() -> u8 {
    MIN_HEADING_LEVEL
}

pub fn clamp_level(level: u8) -> u8 {
    level.clamp(MIN_HEADING_LEVEL, MAX_HEADING_LEVEL)
}

impl BlockKind {
    /// The kind a freshly created block of `block_type` starts with.
    pub fn default_for(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Paragraph => BlockKind::Paragraph,
            BlockType::Heading => BlockKind::Heading {
                level: MIN_HEADING_LEVEL,
            },
            BlockType::Todo => BlockKind::Todo { completed: false },
            BlockType::Quote => BlockKind::Quote,
            BlockType::List => BlockKind::List,
        }
    }

    pub fn heading(level: u8) -> Self {
        BlockKind::Heading {
            level: clamp_level(level),
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            BlockKind::Paragraph => BlockType::Paragraph,
            BlockKind::Heading { .. } => BlockType::Heading,
            BlockKind::Todo { .. } => BlockType::Todo,
            BlockKind::Quote => BlockType::Quote,
            BlockKind::List => BlockType::List,
        }
    }

    pub fn level(&self) -> Option<u8> {
        match self {
            BlockKind::Heading { level } => Some(*level),
            _ => None,
        }
    }

    pub fn completed(&self) -> Option<bool> {
        match self {
            BlockKind::Todo { completed } => Some(*completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: BlockKind,
    pub content: String,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
        }
    }

    /// An empty block of the given type with its default fields.
    pub fn empty<G: IdGenerator>(ids: &mut G, block_type: BlockType) -> Self {
        Self::new(
            BlockId::new(ids.next_id()),
            BlockKind::default_for(block_type),
            String::new(),
        )
    }

    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub blocks: Vec<Block>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    pub fn new(id: PageId, title: impl Into<String>, blocks: Vec<Block>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            blocks,
            created_at: now,
            updated_at: now,
        }
    }

    /// A page whose only block is a level-1 heading carrying the title.
    pub fn titled<G: IdGenerator>(ids: &mut G, title: impl Into<String>) -> Self {
        let title = title.into();
        let page_id = PageId::new(ids.next_id());
        let heading = Block::new(
            BlockId::new(ids.next_id()),
            BlockKind::heading(MIN_HEADING_LEVEL),
            title.clone(),
        );
        Self::new(page_id, title, vec![heading])
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| &block.id == id)
    }
}

/// Partial page: only the fields that are `Some` get replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageUpdate {
    pub title: Option<String>,
    pub blocks: Option<Vec<Block>>,
}

impl PageUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            blocks: None,
        }
    }

    pub fn blocks(blocks: Vec<Block>) -> Self {
        Self {
            title: None,
            blocks: Some(blocks),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.blocks.is_none()
    }

    pub fn apply_to(self, page: &mut Page) {
        if let Some(title) = self.title {
            page.title = title;
        }
        if let Some(blocks) = self.blocks {
            page.blocks = blocks;
        }
        page.updated_at = Utc::now();
    }
}

/// Partial block. Fields that do not belong to the block's resulting type are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockUpdate {
    pub block_type: Option<BlockType>,
    pub content: Option<String>,
    pub level: Option<u8>,
    pub completed: Option<bool>,
}

impl BlockUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn level(level: u8) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }

    pub fn convert(block_type: BlockType) -> Self {
        Self {
            block_type: Some(block_type),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, block: &mut Block) {
        if let Some(block_type) = self.block_type {
            if block_type != block.block_type() {
                block.kind = BlockKind::default_for(block_type);
            }
        }
        if let Some(content) = &self.content {
            block.content = content.clone();
        }
        match &mut block.kind {
            BlockKind::Heading { level } => {
                if let Some(new_level) = self.level {
                    *level = clamp_level(new_level);
                }
            }
            BlockKind::Todo { completed } => {
                if let Some(done) = self.completed {
                    *completed = done;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn paragraph(id: &str, text: &str) -> Block {
        Block::new(BlockId::new(id), BlockKind::Paragraph, text)
    }

    #[test]
    fn titled_page_starts_with_level_one_heading() {
        let mut ids = SequentialIds::new();
        let page = Page::titled(&mut ids, "Notes");

        assert_eq!(page.title, "Notes");
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].kind, BlockKind::Heading { level: 1 });
        assert_eq!(page.blocks[0].content, "Notes");
        assert_ne!(page.id.as_str(), page.blocks[0].id.as_str());
    }

    #[test]
    fn empty_blocks_get_type_defaults() {
        let mut ids = SequentialIds::new();
        assert_eq!(
            Block::empty(&mut ids, BlockType::Heading).kind,
            BlockKind::Heading { level: 1 }
        );
        assert_eq!(
            Block::empty(&mut ids, BlockType::Todo).kind,
            BlockKind::Todo { completed: false }
        );
        assert_eq!(
            Block::empty(&mut ids, BlockType::Quote).kind,
            BlockKind::Quote
        );
    }

    #[test]
    fn heading_level_is_clamped() {
        assert_eq!(BlockKind::heading(0).level(), Some(1));
        assert_eq!(BlockKind::heading(9).level(), Some(3));

        let mut block = Block::new(BlockId::new("1"), BlockKind::heading(1), "H");
        BlockUpdate::level(7).apply_to(&mut block);
        assert_eq!(block.kind.level(), Some(3));
    }

    #[test]
    fn update_keeps_fields_it_does_not_name() {
        let mut block = Block::new(BlockId::new("1"), BlockKind::Todo { completed: true }, "Milk");
        BlockUpdate::content("Eggs").apply_to(&mut block);
        assert_eq!(block.content, "Eggs");
        assert_eq!(block.kind.completed(), Some(true));
    }

    #[test]
    fn update_ignores_fields_of_other_types() {
        let mut block = paragraph("1", "Plain");
        let update = BlockUpdate {
            level: Some(2),
            completed: Some(true),
            ..BlockUpdate::default()
        };
        update.apply_to(&mut block);
        assert_eq!(block.kind, BlockKind::Paragraph);
    }

    #[test]
    fn converting_seeds_defaults_then_applies_fields() {
        let mut block = paragraph("1", "Title");
        let update = BlockUpdate {
            block_type: Some(BlockType::Heading),
            level: Some(2),
            ..BlockUpdate::default()
        };
        update.apply_to(&mut block);
        assert_eq!(block.kind, BlockKind::Heading { level: 2 });
        assert_eq!(block.content, "Title");

        BlockUpdate::convert(BlockType::Todo).apply_to(&mut block);
        assert_eq!(block.kind, BlockKind::Todo { completed: false });
    }

    #[test]
    fn page_update_merges_only_present_fields() {
        let mut ids = SequentialIds::new();
        let mut page = Page::titled(&mut ids, "Old");
        let blocks = page.blocks.clone();

        PageUpdate::title("New").apply_to(&mut page);
        assert_eq!(page.title, "New");
        assert_eq!(page.blocks, blocks);
    }

    #[test]
    fn blocks_serialize_flat_with_type_tag() {
        let heading = Block::new(BlockId::new("7"), BlockKind::heading(2), "Hi");
        let json = serde_json::to_value(&heading).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["type"], "heading");
        assert_eq!(json["level"], 2);
        assert_eq!(json["content"], "Hi");
        assert!(json.get("completed").is_none());

        let parsed: Block =
            serde_json::from_str(r#"{"id":"3","type":"todo","content":"x"}"#).unwrap();
        assert_eq!(parsed.kind, BlockKind::Todo { completed: false });
    }

    #[test]
    fn block_type_names_parse() {
        assert_eq!("text".parse::<BlockType>().unwrap(), BlockType::Paragraph);
        assert_eq!("To-Do".parse::<BlockType>().unwrap(), BlockType::Todo);
        assert!("table".parse::<BlockType>().is_err());
    }
}
