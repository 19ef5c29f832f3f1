//! Assembled NAF documents and the machinery that builds them

mod assembler;
mod layers;
mod model;

pub use assembler::{AssemblyError, AssemblyResult, DocumentAssembler, FragmentError, Phase};
pub use layers::{
    normalize_morphofeat, LayerError, LayerResult, SentencePosition, TextLayers, PARAGRAPH_BREAK,
    SENTENCE_BREAK,
};
pub use model::{
    Document, DocumentStats, Predicate, PredicateId, Role, RoleId, Term, TermId, TermType, Token,
    TokenId,
};
