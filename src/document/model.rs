//! NAF document model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Document-level token number, starting at 1
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenId(pub u32);

impl TokenId {
    /// Id of the term built on this token
    pub fn term(self) -> TermId {
        TermId(self.0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Term number; shares its value with the backing token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermId(pub u32);

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PredicateId(pub u32);

impl fmt::Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pr{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(pub u32);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rl{}", self.0)
    }
}

/// A word form anchored in the raw text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub form: String,
    pub lemma: String,
    /// Coarse part-of-speech tag
    pub pos: String,
    /// Fine-grained tag as found in the tree
    pub postag: String,
    /// Paragraph number from the fragment name (head paragraphs keep their own numbering)
    pub paragraph: u32,
    /// Running sentence number within the document, head sentences first
    pub sentence: u32,
    /// Character offset into the raw text
    pub offset: usize,
    /// Length in characters
    pub length: usize,
}

/// Open or closed word class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermType {
    Open,
    Close,
}

impl TermType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub token: TokenId,
    pub term_type: TermType,
    pub lemma: String,
    pub pos: String,
    /// Normalized features, rendered `category(f1,f2,...)`
    pub morphofeat: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    /// Semantic role label, e.g. "Arg0" or "ArgM-TMP"
    pub label: String,
    pub span: Vec<TokenId>,
    pub head: Option<TokenId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub id: PredicateId,
    pub span: Vec<TokenId>,
    pub head: Option<TokenId>,
    pub roles: Vec<Role>,
}

/// Diagnostic counts for one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub fragments: usize,
    pub tokens: usize,
    pub predicates: usize,
    pub roles: usize,
    /// Role occurrences discarded because no trigger accompanied them
    pub missed_roles: usize,
    /// Role or predicate occurrences dropped for an unusable span
    pub dropped_spans: usize,
}

/// A fully assembled document
///
/// Only the assembler constructs documents; once handed out they are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    name: String,
    language: String,
    raw: String,
    tokens: Vec<Token>,
    terms: Vec<Term>,
    predicates: Vec<Predicate>,
    stats: DocumentStats,
}

impl Document {
    pub(crate) fn new(
        name: String,
        language: String,
        raw: String,
        tokens: Vec<Token>,
        terms: Vec<Term>,
        predicates: Vec<Predicate>,
        stats: DocumentStats,
    ) -> Self {
        Self {
            name,
            language,
            raw,
            tokens,
            terms,
            predicates,
            stats,
        }
    }

    /// Document name, also used as the NAF title
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn stats(&self) -> &DocumentStats {
        &self.stats
    }

    /// Look up a token by id
    pub fn token(&self, id: TokenId) -> Option<&Token> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.tokens.get(index).filter(|t| t.id == id)
    }

    /// Total number of roles across all predicates
    pub fn role_count(&self) -> usize {
        self.predicates.iter().map(|p| p.roles.len()).sum()
    }

    /// The raw text a token covers (offsets and lengths are in characters)
    pub fn token_text(&self, token: &Token) -> String {
        self.raw.chars().skip(token.offset).take(token.length).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(TokenId(3).to_string(), "w3");
        assert_eq!(TokenId(3).term().to_string(), "t3");
        assert_eq!(PredicateId(1).to_string(), "pr1");
        assert_eq!(RoleId(7).to_string(), "rl7");
    }

    #[test]
    fn test_token_lookup_and_text() {
        let token = Token {
            id: TokenId(1),
            form: "één".to_string(),
            lemma: "één".to_string(),
            pos: "num".to_string(),
            postag: "TW(hoofd,vrij)".to_string(),
            paragraph: 1,
            sentence: 1,
            offset: 4,
            length: 3,
        };
        let document = Document::new(
            "doc".to_string(),
            "nl".to_string(),
            "nog één".to_string(),
            vec![token.clone()],
            vec![],
            vec![],
            DocumentStats::default(),
        );

        assert_eq!(document.token(TokenId(1)), Some(&token));
        assert_eq!(document.token(TokenId(0)), None);
        assert_eq!(document.token(TokenId(2)), None);
        assert_eq!(document.token_text(&token), "één");
    }
}
