//! Raw text, token layer, and term layer
//!
//! Offsets come from searching each word form in the raw text, starting
//! right after the previous token, so repeated words never resolve to an
//! earlier occurrence.

use super::model::{Term, TermType, Token, TokenId};
use crate::config::ConverterConfig;
use crate::extract::ExtractedTokens;
use thiserror::Error;

/// Separator inserted between paragraphs
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// Separator inserted between sentences of one paragraph
pub const SENTENCE_BREAK: &str = " ";

/// Errors raised while adding tokens to the layers
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("word form '{form}' not found in raw text after offset {offset}")]
    FormNotInText { form: String, offset: usize },

    #[error("token ids are not contiguous: expected {expected}, found {found}")]
    NonContiguous { expected: TokenId, found: TokenId },
}

/// Result type for layer building
pub type LayerResult<T> = Result<T, LayerError>;

/// Where the next search in the raw text starts
#[derive(Debug, Clone, Copy, Default)]
struct TextCursor {
    byte: usize,
    chars: usize,
}

/// Position of a fragment inside the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentencePosition {
    pub paragraph: u32,
    pub sentence: u32,
}

/// Render a fine-grained tag as `category(f1,f2,...)`
///
/// Tags already in that form, as Alpino writes them, are kept verbatim.
pub fn normalize_morphofeat(postag: &str, separator: &str) -> String {
    if postag.ends_with(')') && postag.contains('(') {
        return postag.to_string();
    }
    let mut parts = postag.split(separator);
    let category = parts.next().unwrap_or_default();
    let features: Vec<&str> = parts.collect();
    format!("{}({})", category, features.join(","))
}

/// Growing raw text with its token and term layers
#[derive(Debug, Default)]
pub struct TextLayers {
    raw: String,
    cursor: TextCursor,
    tokens: Vec<Token>,
    terms: Vec<Term>,
}

impl TextLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Id the next token must carry
    pub fn next_token_id(&self) -> TokenId {
        TokenId(self.tokens.len() as u32 + 1)
    }

    /// Whether the token layer holds this id
    pub fn contains(&self, id: TokenId) -> bool {
        id.0 >= 1 && (id.0 as usize) <= self.tokens.len()
    }

    /// Append one sentence's text
    ///
    /// Nothing precedes the first sentence of the document; afterwards a
    /// sentence is preceded by a paragraph break or a single space.
    pub fn push_sentence(&mut self, text: &str, new_paragraph: bool) {
        if !self.raw.is_empty() {
            self.raw.push_str(if new_paragraph {
                PARAGRAPH_BREAK
            } else {
                SENTENCE_BREAK
            });
        }
        self.raw.push_str(text.trim());
    }

    /// Add one token and one term per extracted terminal, in id order
    pub fn push_tokens(
        &mut self,
        extracted: &ExtractedTokens,
        position: SentencePosition,
        config: &ConverterConfig,
    ) -> LayerResult<()> {
        for (&id, attrs) in &extracted.tokens {
            let expected = self.next_token_id();
            if id != expected {
                return Err(LayerError::NonContiguous {
                    expected,
                    found: id,
                });
            }

            let (offset, length) = self.locate(&attrs.word)?;
            self.tokens.push(Token {
                id,
                form: attrs.word.clone(),
                lemma: attrs.lemma.clone(),
                pos: attrs.pos.clone(),
                postag: attrs.postag.clone(),
                paragraph: position.paragraph,
                sentence: position.sentence,
                offset,
                length,
            });

            let term_type = if config.is_closed_class(&attrs.pos) {
                TermType::Close
            } else {
                TermType::Open
            };
            self.terms.push(Term {
                id: id.term(),
                token: id,
                term_type,
                lemma: attrs.lemma.clone(),
                pos: attrs.pos.clone(),
                morphofeat: normalize_morphofeat(&attrs.postag, &config.morph_separator),
            });
        }
        Ok(())
    }

    /// Find `form` at or after the cursor; returns its character offset and length
    fn locate(&mut self, form: &str) -> LayerResult<(usize, usize)> {
        let rest = &self.raw[self.cursor.byte..];
        let found = rest.find(form).ok_or_else(|| LayerError::FormNotInText {
            form: form.to_string(),
            offset: self.cursor.chars,
        })?;

        let offset = self.cursor.chars + rest[..found].chars().count();
        let length = form.chars().count();
        self.cursor = TextCursor {
            byte: self.cursor.byte + found + form.len(),
            chars: offset + length,
        };
        Ok((offset, length))
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Token>, Vec<Term>) {
        (self.raw, self.tokens, self.terms)
    }
}
