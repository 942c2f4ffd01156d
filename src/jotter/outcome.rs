use crate::input::KeyOutcome;
use crate::model::{BlockId, PageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What an api operation did. `changed` is false for refused or no-op requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdResult {
    pub changed: bool,
    pub created_page: Option<PageId>,
    pub created_block: Option<BlockId>,
    pub key_outcome: Option<KeyOutcome>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }

    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn from_flag(changed: bool) -> Self {
        Self {
            changed,
            ..Self::default()
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_created_page(mut self, id: PageId) -> Self {
        self.created_page = Some(id);
        self
    }

    pub fn with_created_block(mut self, id: Option<BlockId>) -> Self {
        self.created_block = id;
        self
    }

    pub fn with_key_outcome(mut self, outcome: KeyOutcome) -> Self {
        self.key_outcome = Some(outcome);
        self
    }
}
