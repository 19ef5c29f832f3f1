//! Constituent collection

use super::token_id;
use crate::document::TokenId;
use crate::tree::TreeNode;

/// Terminals dominated by one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constituent {
    /// Token ids in tree (depth-first) order
    pub tokens: Vec<TokenId>,
    /// First terminal in the descent whose relation is the head marker
    pub head: Option<TokenId>,
}

impl Constituent {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Collect the terminals a node dominates
///
/// A terminal dominates itself. The head is the first head-marked terminal
/// anywhere in the descent, not only among direct children; deeper heads can
/// win when an earlier sibling phrase contains one.
pub fn collect_constituent(node: &TreeNode, watermark: TokenId, head_marker: &str) -> Constituent {
    let mut constituent = Constituent::default();
    walk(node, watermark, head_marker, &mut constituent);
    constituent
}

fn walk(node: &TreeNode, watermark: TokenId, head_marker: &str, acc: &mut Constituent) {
    if let Some(terminal) = node.as_terminal() {
        let id = token_id(watermark, terminal.begin);
        acc.tokens.push(id);
        if acc.head.is_none() && node.rel() == head_marker {
            acc.head = Some(id);
        }
        return;
    }

    for child in node.children() {
        walk(child, watermark, head_marker, acc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(begin: u32, form: &str, rel: &str) -> TreeNode {
        TreeNode::terminal(begin, form, form, "noun", "N(soort,ev)", rel)
    }

    #[test]
    fn test_collects_terminals_in_tree_order() {
        let np = TreeNode::phrase(
            "obj1",
            vec![
                word(2, "de", "det"),
                TreeNode::phrase("mod", vec![word(3, "grote", "hd")]),
                word(4, "hond", "hd"),
            ],
        );

        let constituent = collect_constituent(&np, TokenId(10), "hd");
        assert_eq!(constituent.tokens, vec![TokenId(12), TokenId(13), TokenId(14)]);
        // First head in the full descent, even though it sits in a nested phrase
        assert_eq!(constituent.head, Some(TokenId(13)));
    }

    #[test]
    fn test_terminal_is_its_own_constituent() {
        let verb = word(1, "slaapt", "hd");
        let constituent = collect_constituent(&verb, TokenId(1), "hd");
        assert_eq!(constituent.tokens, vec![TokenId(2)]);
        assert_eq!(constituent.head, Some(TokenId(2)));
    }

    #[test]
    fn test_no_head_marker() {
        let np = TreeNode::phrase("su", vec![word(0, "Jan", "mwp"), word(1, "Jansen", "mwp")]);
        let constituent = collect_constituent(&np, TokenId(1), "hd");
        assert_eq!(constituent.tokens.len(), 2);
        assert_eq!(constituent.head, None);
    }

    #[test]
    fn test_each_call_starts_empty() {
        let a = TreeNode::phrase("su", vec![word(0, "ik", "hd")]);
        let b = TreeNode::phrase("obj1", vec![word(2, "het", "det")]);

        let first = collect_constituent(&a, TokenId(1), "hd");
        let second = collect_constituent(&b, TokenId(1), "hd");
        assert_eq!(first.tokens, vec![TokenId(1)]);
        assert_eq!(second.tokens, vec![TokenId(3)]);
        assert_eq!(second.head, None);
    }

    #[test]
    fn test_empty_phrase() {
        let trace = TreeNode::phrase("su", vec![]);
        assert!(collect_constituent(&trace, TokenId(1), "hd").is_empty());
    }
}
