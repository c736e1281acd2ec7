use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed entry at {}line {line}: {reason}", document_prefix(.document))]
    MalformedEntry {
        document: String,
        line: usize,
        reason: String,
    },

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Source {source_id} does not belong to channel {channel_id}")]
    UnknownSource { channel_id: String, source_id: i64 },

    #[error("Repository error: {0}")]
    Repository(#[from] rusqlite::Error),

    #[error("Repository connection error: {0}")]
    Connection(#[from] tokio_rusqlite::Error),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn document_prefix(document: &str) -> String {
    if document.is_empty() {
        String::new()
    } else {
        format!("{} ", document)
    }
}

impl AppError {
    /// True for failures of the underlying store, which abort the enclosing transaction.
    pub fn is_repository(&self) -> bool {
        matches!(self, AppError::Repository(_) | AppError::Connection(_))
    }
}
