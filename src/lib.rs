//! sonar2naf: SoNaR treebank fragments to NAF documents
//!
//! Reads a directory of Alpino dependency-tree fragments (one sentence per
//! file, PropBank role tags on tree nodes), groups them into documents, and
//! produces one NAF document per source text with a text layer, a term layer
//! and a semantic-role layer.
//!
//! # Pipeline
//!
//! - **Inventory**: parse fragment filenames, canonicalize them, order each
//!   document head first and by (paragraph, sentence)
//! - **Extraction**: tokens, constituents and predicate frames per fragment
//! - **Assembly**: raw text, document-wide token ids, terms, predicates
//! - **Sink**: NAF XML on disk, or an in-memory collection
//!
//! # Example
//!
//! ```no_run
//! use sonar2naf::{convert_directory, ConverterConfig, NafDirectorySink};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConverterConfig::default();
//! let sink = Arc::new(NafDirectorySink::new("out", &config)?);
//! let report = convert_directory(Path::new("fragments"), sink, config).await?;
//! println!("{} documents converted", report.converted.len());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod document;
pub mod extract;
pub mod inventory;
pub mod sink;
pub mod tree;

pub use batch::{
    convert_directory, convert_document, BatchConverter, BatchReport, ConvertError,
    DocumentFailure, DocumentSummary,
};
pub use config::{ConfigError, ConfigResult, ConverterConfig, ProcessorInfo};
pub use document::{
    AssemblyError, AssemblyResult, Document, DocumentAssembler, DocumentStats, Phase, Predicate,
    Role, Term, TermType, Token, TokenId,
};
pub use inventory::{
    scan_directory, DocumentPlan, FragmentDescriptor, FragmentName, Inventory, InventoryError,
    InventoryResult, ScanOptions, Section, SentenceNumber,
};
pub use sink::{render_naf, DocumentSink, MemorySink, NafDirectorySink, SinkError, SinkResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
