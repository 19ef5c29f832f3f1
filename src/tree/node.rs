//! Tree node representation

/// Attributes every node carries, terminal or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttrs {
    /// Dependency relation to the parent (e.g., "su", "hd", "obj1")
    pub rel: String,
    /// PropBank role tag (`pb` attribute), if the node is annotated
    pub role: Option<String>,
}

/// The word-level payload of a terminal node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    /// Position of the word inside its sentence, starting at 0
    pub begin: u32,
    /// Surface form
    pub word: String,
    pub lemma: String,
    /// Coarse part-of-speech tag
    pub pos: String,
    /// Fine-grained tag, including morphological features
    pub postag: String,
}

/// A node in one sentence's syntax tree
///
/// Terminals carry a word; non-terminals own their children. A node that
/// has a word never has children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Terminal { attrs: NodeAttrs, token: Terminal },
    NonTerminal { attrs: NodeAttrs, children: Vec<TreeNode> },
}

impl TreeNode {
    /// Create a terminal node
    pub fn terminal(
        begin: u32,
        word: impl Into<String>,
        lemma: impl Into<String>,
        pos: impl Into<String>,
        postag: impl Into<String>,
        rel: impl Into<String>,
    ) -> Self {
        Self::Terminal {
            attrs: NodeAttrs {
                rel: rel.into(),
                role: None,
            },
            token: Terminal {
                begin,
                word: word.into(),
                lemma: lemma.into(),
                pos: pos.into(),
                postag: postag.into(),
            },
        }
    }

    /// Create a non-terminal node over the given children
    pub fn phrase(rel: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self::NonTerminal {
            attrs: NodeAttrs {
                rel: rel.into(),
                role: None,
            },
            children,
        }
    }

    /// Attach a PropBank role tag
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        match &mut self {
            Self::Terminal { attrs, .. } | Self::NonTerminal { attrs, .. } => {
                attrs.role = Some(role.into());
            }
        }
        self
    }

    pub fn attrs(&self) -> &NodeAttrs {
        match self {
            Self::Terminal { attrs, .. } | Self::NonTerminal { attrs, .. } => attrs,
        }
    }

    pub fn rel(&self) -> &str {
        &self.attrs().rel
    }

    pub fn role(&self) -> Option<&str> {
        self.attrs().role.as_deref()
    }

    /// Child nodes (always empty for terminals)
    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::Terminal { .. } => &[],
            Self::NonTerminal { children, .. } => children,
        }
    }

    pub fn as_terminal(&self) -> Option<&Terminal> {
        match self {
            Self::Terminal { token, .. } => Some(token),
            Self::NonTerminal { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }
}
