use thiserror::Error;

#[derive(Error, Debug)]
pub enum JotterError {
    #[error("Workspace must contain at least one page")]
    EmptyWorkspace,

    #[error("Duplicate page id: {0}")]
    DuplicatePage(String),

    #[error("Page {0} not found in the sidebar")]
    PageIndex(usize),

    #[error("Block {0} not found on the open page")]
    BlockIndex(usize),

    #[error("No page is open")]
    NoOpenPage,

    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Interactive mode needs a terminal; use `jotter script` instead")]
    NotATerminal,

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JotterError>;
