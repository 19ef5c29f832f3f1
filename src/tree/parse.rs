//! Alpino fragment parser
//!
//! Reads the `alpino_ds` XML of one fragment into [`TreeNode`] trees plus the
//! sentence text. Elements other than `node` and the top-level `sentence`
//! (metadata, comments, parser info) are skipped.

use super::node::{NodeAttrs, Terminal, TreeNode};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Errors raised while reading a fragment's tree
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] AttrError),

    #[error("<node> is missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },

    #[error("terminal node '{0}' has child nodes")]
    TerminalWithChildren(String),

    #[error("unbalanced <node> nesting")]
    Unbalanced,

    #[error("fragment contains no <node> tree")]
    Empty,
}

/// Result type for tree parsing
pub type TreeResult<T> = Result<T, TreeError>;

/// The parsed content of one fragment file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentTree {
    /// Top-level trees, usually exactly one
    pub roots: Vec<TreeNode>,
    /// Text of the `<sentence>` element, if present
    pub sentence: Option<String>,
}

impl FragmentTree {
    /// A fragment holding a single tree and no sentence text
    pub fn new(root: TreeNode) -> Self {
        Self {
            roots: vec![root],
            sentence: None,
        }
    }

    pub fn with_sentence(mut self, sentence: impl Into<String>) -> Self {
        self.sentence = Some(sentence.into());
        self
    }
}

/// Raw attributes of a `<node>` element before validation
#[derive(Debug, Default)]
struct PendingNode {
    begin: Option<String>,
    word: Option<String>,
    lemma: Option<String>,
    pos: Option<String>,
    postag: Option<String>,
    rel: Option<String>,
    role: Option<String>,
    children: Vec<TreeNode>,
}

impl PendingNode {
    fn from_start(element: &BytesStart<'_>) -> TreeResult<Self> {
        let mut pending = Self::default();
        for attr in element.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?.into_owned();
            let slot = match attr.key.as_ref() {
                b"begin" => &mut pending.begin,
                b"word" => &mut pending.word,
                b"lemma" => &mut pending.lemma,
                b"pos" => &mut pending.pos,
                b"postag" => &mut pending.postag,
                b"rel" => &mut pending.rel,
                b"pb" => &mut pending.role,
                _ => continue,
            };
            *slot = Some(value);
        }
        Ok(pending)
    }

    fn finish(self) -> TreeResult<TreeNode> {
        let attrs = NodeAttrs {
            rel: self.rel.ok_or(TreeError::MissingAttribute("rel"))?,
            role: self.role,
        };

        let Some(word) = self.word else {
            return Ok(TreeNode::NonTerminal {
                attrs,
                children: self.children,
            });
        };

        if !self.children.is_empty() {
            return Err(TreeError::TerminalWithChildren(word));
        }
        let begin = self.begin.ok_or(TreeError::MissingAttribute("begin"))?;
        let begin = begin
            .trim()
            .parse::<u32>()
            .map_err(|_| TreeError::InvalidAttribute {
                attribute: "begin",
                value: begin.clone(),
            })?;

        Ok(TreeNode::Terminal {
            attrs,
            token: Terminal {
                begin,
                word,
                lemma: self.lemma.ok_or(TreeError::MissingAttribute("lemma"))?,
                pos: self.pos.ok_or(TreeError::MissingAttribute("pos"))?,
                postag: self.postag.ok_or(TreeError::MissingAttribute("postag"))?,
            },
        })
    }
}

fn attach(node: TreeNode, stack: &mut [PendingNode], roots: &mut Vec<TreeNode>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Parse the XML content of one fragment file
pub fn parse_fragment(xml: &str) -> TreeResult<FragmentTree> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<PendingNode> = Vec::new();
    let mut roots = Vec::new();
    let mut sentence: Option<String> = None;
    let mut in_sentence = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"node" => {
                stack.push(PendingNode::from_start(&e)?);
            }
            Event::Empty(e) if e.name().as_ref() == b"node" => {
                let node = PendingNode::from_start(&e)?.finish()?;
                attach(node, &mut stack, &mut roots);
            }
            Event::End(e) if e.name().as_ref() == b"node" => {
                let node = stack.pop().ok_or(TreeError::Unbalanced)?.finish()?;
                attach(node, &mut stack, &mut roots);
            }
            Event::Start(e) if e.name().as_ref() == b"sentence" && stack.is_empty() => {
                in_sentence = true;
            }
            Event::End(e) if e.name().as_ref() == b"sentence" => {
                in_sentence = false;
            }
            Event::Text(text) if in_sentence => {
                sentence
                    .get_or_insert_with(String::new)
                    .push_str(&text.unescape()?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(TreeError::Unbalanced);
    }
    if roots.is_empty() {
        return Err(TreeError::Empty);
    }

    Ok(FragmentTree { roots, sentence })
}
