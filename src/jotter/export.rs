//! Markdown and JSON renditions of pages.
//!
//! Markdown is produced as a pulldown-cmark event stream and serialized with
//! `pulldown-cmark-to-cmark`, so escaping of user text is left to the serializer. Block types
//! map onto their natural Markdown forms: headings keep their level, to-dos become task list
//! items (consecutive to-dos share one list), quotes become block quotes and everything else
//! is a paragraph. Line breaks inside a block are hard breaks.

use crate::error::{JotterError, Result};
use crate::model::{Block, BlockKind, Page, PageId};
use crate::workspace::Workspace;
use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag};
use pulldown_cmark_to_cmark::cmark;
use serde::Serialize;

/// A page as Markdown. The title becomes a top-level heading unless the page already opens
/// with a level-1 heading carrying the same text.
pub fn page_markdown(page: &Page) -> Result<String> {
    let mut events = Vec::new();
    push_page(&mut events, page);
    serialize(&events)
}

/// Every page in workspace order, separated by horizontal rules.
pub fn workspace_markdown(workspace: &Workspace) -> Result<String> {
    let mut events = Vec::new();
    for (i, page) in workspace.pages().iter().enumerate() {
        if i > 0 {
            events.push(Event::Rule);
        }
        push_page(&mut events, page);
    }
    serialize(&events)
}

pub fn page_json(page: &Page) -> Result<String> {
    Ok(serde_json::to_string_pretty(page)?)
}

#[derive(Serialize)]
struct WorkspaceJson<'a> {
    current_page_id: &'a PageId,
    sidebar_open: bool,
    pages: &'a [Page],
}

pub fn workspace_json(workspace: &Workspace) -> Result<String> {
    let view = WorkspaceJson {
        current_page_id: workspace.current_page_id(),
        sidebar_open: workspace.is_sidebar_open(),
        pages: workspace.pages(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

fn serialize(events: &[Event<'_>]) -> Result<String> {
    let mut output = String::new();
    cmark(events.iter(), &mut output).map_err(|e| JotterError::Render(e.to_string()))?;
    Ok(output)
}

fn push_page<'a>(events: &mut Vec<Event<'a>>, page: &'a Page) {
    let opens_with_title = page.blocks.first().is_some_and(|block| {
        block.kind == BlockKind::Heading { level: 1 } && block.content == page.title
    });
    if !opens_with_title {
        wrap(events, heading_tag(1), |events| {
            events.push(Event::Text(CowStr::Borrowed(&page.title)))
        });
    }

    let mut in_task_list = false;
    for block in &page.blocks {
        let is_todo = matches!(block.kind, BlockKind::Todo { .. });
        if in_task_list && !is_todo {
            events.push(Event::End(Tag::List(None).to_end()));
            in_task_list = false;
        }
        if is_todo && !in_task_list {
            events.push(Event::Start(Tag::List(None)));
            in_task_list = true;
        }
        push_block(events, block);
    }
    if in_task_list {
        events.push(Event::End(Tag::List(None).to_end()));
    }
}

fn push_block<'a>(events: &mut Vec<Event<'a>>, block: &'a Block) {
    match block.kind {
        BlockKind::Todo { completed } => wrap(events, Tag::Item, |events| {
            events.push(Event::TaskListMarker(completed));
            push_text(events, &block.content);
        }),
        // Empty blocks only exist while someone is typing; they have no Markdown form.
        _ if block.content.is_empty() => {}
        BlockKind::Heading { level } => wrap(events, heading_tag(level), |events| {
            push_text(events, &block.content)
        }),
        BlockKind::Quote => wrap(events, Tag::BlockQuote(None), |events| {
            wrap(events, Tag::Paragraph, |events| {
                push_text(events, &block.content)
            })
        }),
        BlockKind::Paragraph | BlockKind::List => wrap(events, Tag::Paragraph, |events| {
            push_text(events, &block.content)
        }),
    }
}

fn push_text<'a>(events: &mut Vec<Event<'a>>, text: &'a str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            events.push(Event::HardBreak);
        }
        if !line.is_empty() {
            events.push(Event::Text(CowStr::Borrowed(line)));
        }
    }
}

fn wrap<'a, F>(events: &mut Vec<Event<'a>>, tag: Tag<'a>, body: F)
where
    F: FnOnce(&mut Vec<Event<'a>>),
{
    let end = tag.to_end();
    events.push(Event::Start(tag));
    body(events);
    events.push(Event::End(end));
}

fn heading_tag<'a>(level: u8) -> Tag<'a> {
    let level = match level {
        0 | 1 => HeadingLevel::H1,
        2 => HeadingLevel::H2,
        _ => HeadingLevel::H3,
    };
    Tag::Heading {
        level,
        id: None,
        classes: vec![],
        attrs: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::model::BlockId;

    fn block(id: &str, kind: BlockKind, text: &str) -> Block {
        Block::new(BlockId::new(id), kind, text)
    }

    fn page(title: &str, blocks: Vec<Block>) -> Page {
        Page::new(PageId::new("p"), title, blocks)
    }

    #[test]
    fn seeded_heading_doubles_as_title() {
        let mut ids = SequentialIds::new();
        let md = page_markdown(&Page::titled(&mut ids, "Notes")).unwrap();
        assert_eq!(md.matches("Notes").count(), 1);
        assert!(md.contains("# Notes"));
    }

    #[test]
    fn title_is_added_when_missing() {
        let md = page_markdown(&page(
            "Plans",
            vec![block("1", BlockKind::Paragraph, "Body")],
        ))
        .unwrap();
        assert!(md.contains("# Plans"));
        assert!(md.contains("Body"));
    }

    #[test]
    fn block_types_render() {
        let md = page_markdown(&page(
            "Mixed",
            vec![
                block("1", BlockKind::heading(2), "Section"),
                block("2", BlockKind::Todo { completed: false }, "Open"),
                block("3", BlockKind::Todo { completed: true }, "Done"),
                block("4", BlockKind::Quote, "Wise words"),
                block("5", BlockKind::Paragraph, ""),
            ],
        ))
        .unwrap();

        assert!(md.contains("## Section"));
        assert!(md.contains("[ ] Open"));
        assert!(md.contains("[x] Done"));
        assert!(md.contains("> Wise words"));
    }

    #[test]
    fn multi_line_blocks_keep_their_lines() {
        let md = page_markdown(&page(
            "Lines",
            vec![block("1", BlockKind::Paragraph, "one\ntwo")],
        ))
        .unwrap();
        assert!(md.contains("one"));
        assert!(md.contains("two"));
        assert!(!md.contains("one two"));
    }

    #[test]
    fn workspace_markdown_covers_every_page() {
        let mut ids = SequentialIds::new();
        let mut ws = Workspace::welcome(&mut ids);
        ws.create_page(&mut ids, "Second");

        let md = workspace_markdown(&ws).unwrap();
        assert!(md.contains("Getting Started"));
        assert!(md.contains("Second"));
        assert!(md.contains("Build your knowledge base"));
    }

    #[test]
    fn json_has_flat_blocks() {
        let mut ids = SequentialIds::new();
        let ws = Workspace::welcome(&mut ids);
        let json = workspace_json(&ws).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["current_page_id"], "1");
        assert_eq!(value["sidebar_open"], true);
        let first = &value["pages"][0]["blocks"][0];
        assert_eq!(first["type"], "heading");
        assert_eq!(first["level"], 1);

        let page: Page = serde_json::from_str(&page_json(ws.current_page().unwrap()).unwrap()).unwrap();
        assert_eq!(page.title, "Getting Started");
    }
}
