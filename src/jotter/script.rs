//! # Scripts
//!
//! A line-oriented command language that drives [`JotterApi`] with the same discrete events
//! a user produces in the interactive surface. `jotter script` runs these files and the
//! end-to-end tests are written in it.
//!
//! One command per line. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! new Groceries
//! add todo
//! type 2 Milk
//! toggle 2
//! print
//! ```
//!
//! Page numbers are positions in the sidebar's visible list, so they follow the current
//! search query. Block numbers are positions on the open page. Both start at 1.

use crate::api::{CmdMessage, CmdResult, JotterApi};
use crate::error::{JotterError, Result};
use crate::ids::IdGenerator;
use crate::input::{Key, KeyEvent};
use crate::model::{BlockId, BlockType, BlockUpdate, PageId};
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Shortcut for the whole create flow: begin, draft, Enter.
    New(String),
    CreateBegin,
    CreateDraft(String),
    CreateEnter,
    CreateBlur,
    CreateEscape,
    Search(String),
    Select(usize),
    DeletePage(usize),
    ToggleSidebar,
    Title(String),
    Add {
        block_type: BlockType,
        after: Option<usize>,
    },
    Set {
        block: usize,
        text: String,
    },
    Key {
        block: usize,
        key: KeyEvent,
    },
    Type {
        block: usize,
        text: String,
    },
    Toggle(usize),
    Level {
        block: usize,
        level: u8,
    },
    Convert {
        block: usize,
        block_type: BlockType,
    },
    Remove(usize),
    Focus(usize),
    Print,
}

/// A parsed step and the 1-based source line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

/// Parses a whole script. Fails on the first line that does not parse.
pub fn parse(source: &str) -> Result<Vec<ScriptLine>> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                return None;
            }
            Some(
                text.parse::<Step>()
                    .map(|step| ScriptLine { line: i + 1, step })
                    .map_err(|message| JotterError::Script {
                        line: i + 1,
                        message,
                    }),
            )
        })
        .collect()
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (command, rest) = match s.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (s, ""),
        };

        let step = match command {
            "new" => Step::New(required_text(command, rest)?),
            "create" => parse_create(rest)?,
            "search" => Step::Search(rest.to_string()),
            "select" => Step::Select(number(rest)?),
            "delete-page" => Step::DeletePage(number(rest)?),
            "toggle-sidebar" => no_args(command, rest, Step::ToggleSidebar)?,
            "title" => Step::Title(unescape(rest)),
            "add" => parse_add(rest)?,
            "set" => {
                let (block, text) = number_and_rest(rest)?;
                Step::Set {
                    block,
                    text: unescape(text),
                }
            }
            "key" => {
                let (block, key) = number_and_rest(rest)?;
                Step::Key {
                    block,
                    key: key.parse()?,
                }
            }
            "type" => {
                let (block, text) = number_and_rest(rest)?;
                Step::Type {
                    block,
                    text: unescape(text),
                }
            }
            "toggle" => Step::Toggle(number(rest)?),
            "level" => {
                let (block, level) = number_and_rest(rest)?;
                let level = level
                    .parse::<u8>()
                    .map_err(|_| format!("`{level}` is not a heading level"))?;
                Step::Level { block, level }
            }
            "convert" => {
                let (block, kind) = number_and_rest(rest)?;
                Step::Convert {
                    block,
                    block_type: kind.parse()?,
                }
            }
            "remove" => Step::Remove(number(rest)?),
            "focus" => Step::Focus(number(rest)?),
            "print" => no_args(command, rest, Step::Print)?,
            other => return Err(format!("unknown command `{other}`")),
        };
        Ok(step)
    }
}

fn parse_create(rest: &str) -> std::result::Result<Step, String> {
    let (action, text) = match rest.split_once(char::is_whitespace) {
        Some((action, text)) => (action, text.trim()),
        None => (rest, ""),
    };
    match action {
        "begin" => Ok(Step::CreateBegin),
        "draft" => Ok(Step::CreateDraft(unescape(text))),
        "enter" => Ok(Step::CreateEnter),
        "blur" => Ok(Step::CreateBlur),
        "escape" => Ok(Step::CreateEscape),
        "" => Err("`create` needs one of begin|draft|enter|blur|escape".to_string()),
        other => Err(format!("unknown create action `{other}`")),
    }
}

fn parse_add(rest: &str) -> std::result::Result<Step, String> {
    let mut words = rest.split_whitespace().peekable();
    let block_type = match words.peek() {
        Some(&word) if word != "after" => {
            words.next();
            word.parse()?
        }
        _ => BlockType::Paragraph,
    };
    let after = match words.next() {
        Some("after") => Some(number(words.next().unwrap_or_default())?),
        Some(other) => return Err(format!("unexpected `{other}` in add")),
        None => None,
    };
    if let Some(extra) = words.next() {
        return Err(format!("unexpected `{extra}` in add"));
    }
    Ok(Step::Add { block_type, after })
}

fn number(text: &str) -> std::result::Result<usize, String> {
    if text.is_empty() {
        return Err("missing number".to_string());
    }
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("`{text}` is not a position (numbers start at 1)")),
    }
}

fn number_and_rest(text: &str) -> std::result::Result<(usize, &str), String> {
    match text.split_once(char::is_whitespace) {
        Some((n, rest)) => Ok((number(n)?, rest.trim())),
        None => Ok((number(text)?, "")),
    }
}

fn required_text(command: &str, text: &str) -> std::result::Result<String, String> {
    if text.is_empty() {
        return Err(format!("`{command}` needs some text"));
    }
    Ok(unescape(text))
}

fn no_args(command: &str, rest: &str, step: Step) -> std::result::Result<Step, String> {
    if rest.is_empty() {
        Ok(step)
    } else {
        Err(format!("`{command}` takes no arguments"))
    }
}

/// `\n` becomes a newline and `\\` a backslash; other escapes are kept as written.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn page<G: IdGenerator>(api: &JotterApi<G>, index: usize) -> Result<PageId> {
    api.page_at(index).ok_or(JotterError::PageIndex(index))
}

fn block<G: IdGenerator>(api: &JotterApi<G>, index: usize) -> Result<BlockId> {
    if api.editor().is_none() {
        return Err(JotterError::NoOpenPage);
    }
    api.block_at(index).ok_or(JotterError::BlockIndex(index))
}

/// Applies one step. `Print` is a no-op here; the runner hands it to its caller.
pub fn apply<G: IdGenerator>(api: &mut JotterApi<G>, step: &Step) -> Result<CmdResult> {
    let result = match step {
        Step::New(title) => {
            api.begin_create();
            api.set_draft(title);
            api.create_key(KeyEvent::new(Key::Enter))
        }
        Step::CreateBegin => api.begin_create(),
        Step::CreateDraft(text) => api.set_draft(text),
        Step::CreateEnter => api.create_key(KeyEvent::new(Key::Enter)),
        Step::CreateBlur => api.create_blur(),
        Step::CreateEscape => api.create_key(KeyEvent::new(Key::Escape)),
        Step::Search(query) => api.search(query),
        Step::Select(index) => {
            let id = page(api, *index)?;
            api.select_page(&id)
        }
        Step::DeletePage(index) => {
            let id = page(api, *index)?;
            api.request_delete(&id)
        }
        Step::ToggleSidebar => api.toggle_sidebar(),
        Step::Title(text) => api.update_title(text),
        Step::Add { block_type, after } => {
            let after = after.map(|index| block(api, index)).transpose()?;
            api.add_block(after.as_ref(), *block_type)
        }
        Step::Set { block: index, text } => {
            let id = block(api, *index)?;
            api.update_block(&id, &BlockUpdate::content(text.as_str()))
        }
        Step::Key { block: index, key } => {
            let id = block(api, *index)?;
            api.key_down(&id, *key)
        }
        Step::Type { block: index, text } => {
            let id = block(api, *index)?;
            api.focus_block(&id);
            let mut result = CmdResult::unchanged();
            for c in text.chars() {
                let key = match c {
                    '\n' => KeyEvent::shifted(Key::Enter),
                    c => KeyEvent::char(c),
                };
                let step = api.key_down(&id, key);
                result.changed |= step.changed;
                result.messages.extend(step.messages);
            }
            result
        }
        Step::Toggle(index) => {
            let id = block(api, *index)?;
            api.toggle_todo(&id)
        }
        Step::Level { block: index, level } => {
            let id = block(api, *index)?;
            api.update_block(&id, &BlockUpdate::level(*level))
        }
        Step::Convert {
            block: index,
            block_type,
        } => {
            let id = block(api, *index)?;
            api.update_block(&id, &BlockUpdate::convert(*block_type))
        }
        Step::Remove(index) => {
            let id = block(api, *index)?;
            api.delete_block(&id)
        }
        Step::Focus(index) => {
            let id = block(api, *index)?;
            api.focus_block(&id)
        }
        Step::Print => CmdResult::unchanged(),
    };
    Ok(result)
}

/// Runs parsed lines in order, calling `on_print` for every `print` step. Failures are
/// reported against the line that caused them. Returns the messages the steps produced.
pub fn run<G, F>(api: &mut JotterApi<G>, lines: &[ScriptLine], mut on_print: F) -> Result<Vec<CmdMessage>>
where
    G: IdGenerator,
    F: FnMut(&JotterApi<G>) -> Result<()>,
{
    let mut messages = Vec::new();
    for line in lines {
        debug!("event=script_step line={} step={:?}", line.line, line.step);
        if line.step == Step::Print {
            on_print(&*api).map_err(|err| at_line(line.line, err))?;
            continue;
        }
        let result = apply(api, &line.step).map_err(|err| at_line(line.line, err))?;
        messages.extend(result.messages);
    }
    Ok(messages)
}

fn at_line(line: usize, err: JotterError) -> JotterError {
    match err {
        JotterError::Script { .. } => err,
        other => JotterError::Script {
            line,
            message: other.to_string(),
        },
    }
}
