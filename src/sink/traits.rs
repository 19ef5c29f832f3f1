//! Sink trait definitions

use crate::document::Document;
use thiserror::Error;

/// Errors that can occur while storing a document
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for finished documents
///
/// Implementations must be thread-safe (Send + Sync); documents are stored
/// from whichever worker assembled them.
pub trait DocumentSink: Send + Sync {
    /// Store one finished document, returning where it went
    fn store(&self, document: &Document) -> SinkResult<String>;
}
