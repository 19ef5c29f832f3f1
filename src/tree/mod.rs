//! Syntax tree fragments
//!
//! One fragment file holds the Alpino tree of a single sentence (or
//! sub-sentence). Trees are parsed into [`TreeNode`] values, walked once by
//! the extractors, and dropped.

mod node;
mod parse;

pub use node::{NodeAttrs, Terminal, TreeNode};
pub use parse::{parse_fragment, FragmentTree, TreeError, TreeResult};
