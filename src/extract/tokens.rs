//! Token extraction

use super::token_id;
use crate::document::TokenId;
use crate::tree::{FragmentTree, TreeNode};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while extracting tokens
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("two terminals share position {begin}: '{first}' and '{second}'")]
    DuplicatePosition {
        begin: u32,
        first: String,
        second: String,
    },
}

/// Result type for extraction
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Word-level attributes copied out of a terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAttrs {
    pub word: String,
    pub lemma: String,
    pub pos: String,
    pub postag: String,
    /// Position inside the fragment (the terminal's `begin`)
    pub begin: u32,
}

/// Tokens of one fragment, keyed and ordered by document-level id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTokens {
    pub tokens: BTreeMap<TokenId, TokenAttrs>,
    /// First id available to the next fragment
    pub next_watermark: TokenId,
}

impl ExtractedTokens {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Word forms in id order, separated by single spaces
    pub fn joined_forms(&self) -> String {
        self.tokens
            .values()
            .map(|t| t.word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Collect every terminal of a fragment
///
/// Ids are `watermark + begin`. The returned watermark is one past the highest
/// id seen, or `watermark` unchanged when the fragment has no terminals.
pub fn extract_tokens(fragment: &FragmentTree, watermark: TokenId) -> ExtractResult<ExtractedTokens> {
    let mut tokens = BTreeMap::new();
    for root in &fragment.roots {
        collect(root, watermark, &mut tokens)?;
    }

    let next_watermark = tokens
        .keys()
        .next_back()
        .map(|id: &TokenId| TokenId(id.0 + 1))
        .unwrap_or(watermark);

    Ok(ExtractedTokens {
        tokens,
        next_watermark,
    })
}

fn collect(
    node: &TreeNode,
    watermark: TokenId,
    tokens: &mut BTreeMap<TokenId, TokenAttrs>,
) -> ExtractResult<()> {
    if let Some(terminal) = node.as_terminal() {
        let attrs = TokenAttrs {
            word: terminal.word.clone(),
            lemma: terminal.lemma.clone(),
            pos: terminal.pos.clone(),
            postag: terminal.postag.clone(),
            begin: terminal.begin,
        };
        if let Some(previous) = tokens.insert(token_id(watermark, terminal.begin), attrs) {
            return Err(ExtractError::DuplicatePosition {
                begin: terminal.begin,
                first: previous.word,
                second: terminal.word.clone(),
            });
        }
    }

    for child in node.children() {
        collect(child, watermark, tokens)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(begin: u32, form: &str) -> TreeNode {
        TreeNode::terminal(begin, form, form, "noun", "N(soort,ev)", "--")
    }

    #[test]
    fn test_tokens_are_offset_by_watermark() {
        let fragment = FragmentTree::new(TreeNode::phrase(
            "top",
            vec![
                TreeNode::phrase("su", vec![word(0, "de"), word(1, "man")]),
                word(2, "slaapt"),
            ],
        ));

        let extracted = extract_tokens(&fragment, TokenId(5)).unwrap();
        let ids: Vec<u32> = extracted.tokens.keys().map(|id| id.0).collect();
        assert_eq!(ids, vec![5, 6, 7]);
        assert_eq!(extracted.next_watermark, TokenId(8));
        assert_eq!(extracted.joined_forms(), "de man slaapt");
    }

    #[test]
    fn test_tokens_sorted_by_position_not_tree_order() {
        // Discontinuous constituent: "belt" (1) sits after "op" (3) in tree order
        let fragment = FragmentTree::new(TreeNode::phrase(
            "top",
            vec![
                word(0, "Jan"),
                TreeNode::phrase("vc", vec![word(3, "op"), word(2, "Marie")]),
                word(1, "belt"),
            ],
        ));

        let extracted = extract_tokens(&fragment, TokenId(1)).unwrap();
        assert_eq!(extracted.joined_forms(), "Jan belt Marie op");
    }

    #[test]
    fn test_empty_fragment_keeps_watermark() {
        let fragment = FragmentTree::new(TreeNode::phrase("top", vec![]));
        let extracted = extract_tokens(&fragment, TokenId(12)).unwrap();
        assert!(extracted.is_empty());
        assert_eq!(extracted.next_watermark, TokenId(12));
    }

    #[test]
    fn test_repeated_calls_do_not_share_state() {
        let first = FragmentTree::new(TreeNode::phrase("top", vec![word(0, "een")]));
        let second = FragmentTree::new(TreeNode::phrase("top", vec![word(0, "twee")]));

        let a = extract_tokens(&first, TokenId(1)).unwrap();
        let b = extract_tokens(&second, a.next_watermark).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(b.tokens.keys().next(), Some(&TokenId(2)));
    }

    #[test]
    fn test_duplicate_position_is_an_error() {
        let fragment = FragmentTree::new(TreeNode::phrase("top", vec![word(0, "a"), word(0, "b")]));
        assert!(matches!(
            extract_tokens(&fragment, TokenId(1)),
            Err(ExtractError::DuplicatePosition { begin: 0, .. })
        ));
    }
}
