//! Recursive extraction over one fragment's tree
//!
//! Every entry point allocates its own accumulator and returns it filled;
//! nothing is carried between calls except the watermark the caller passes
//! in explicitly.

mod constituent;
mod roles;
mod tokens;

pub use constituent::{collect_constituent, Constituent};
pub use roles::{build_predicates, PredicateScan, SrlIds};
pub use tokens::{extract_tokens, ExtractError, ExtractResult, ExtractedTokens, TokenAttrs};

use crate::document::TokenId;

/// Document-level identifier of a terminal: watermark plus its sentence position
pub(crate) fn token_id(watermark: TokenId, begin: u32) -> TokenId {
    TokenId(watermark.0 + begin)
}
