//! Fragment filename grammar
//!
//! Canonical names:
//!
//! ```text
//! <doc>.p.<paragraph>.s.<sentence>.xml       body fragment
//! <doc>.head.<paragraph>.s.<sentence>.xml    head (prologue) fragment
//! ```
//!
//! `<sentence>` is an integer, or `<n>_<k>` for the k-th sub-sentence
//! inserted after sentence n. The older dotted spelling `<n>.<k>` and
//! variants such as zero-padded numbers or an uppercase section marker are
//! recognized too; they parse to the same key as their canonical name.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Head sections come before the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Head,
    Body,
}

impl Section {
    fn marker(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "p",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.marker())
    }
}

/// Sentence position with an optional sub-sentence index
///
/// Ordered as a pair, so `3 < 3_1 < 3_2 < 3_10 < 4`. No floating point is
/// involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SentenceNumber {
    pub whole: u32,
    pub sub: Option<u32>,
}

impl SentenceNumber {
    pub fn new(whole: u32) -> Self {
        Self { whole, sub: None }
    }

    pub fn with_sub(whole: u32, sub: u32) -> Self {
        Self {
            whole,
            sub: Some(sub),
        }
    }

    /// Parse `3` or `3_1`
    pub fn parse(token: &str) -> Option<Self> {
        match token.split_once('_') {
            Some((whole, sub)) => Some(Self::with_sub(parse_number(whole)?, parse_number(sub)?)),
            None => Some(Self::new(parse_number(token)?)),
        }
    }
}

impl Ord for SentenceNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.whole, self.sub).cmp(&(other.whole, other.sub))
    }
}

impl PartialOrd for SentenceNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SentenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub {
            Some(sub) => write!(f, "{}_{}", self.whole, sub),
            None => write!(f, "{}", self.whole),
        }
    }
}

fn parse_number(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// A parsed fragment filename
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentName {
    pub document: String,
    pub section: Section,
    pub paragraph: u32,
    pub sentence: SentenceNumber,
}

impl FragmentName {
    /// Parse a file name (no directory part); `None` if it is not a fragment
    ///
    /// Parsing runs from the right, so document names may contain dots.
    pub fn parse(file_name: &str) -> Option<Self> {
        let parts: Vec<&str> = file_name.split('.').collect();
        let n = parts.len();
        if n < 6 || !parts[n - 1].eq_ignore_ascii_case("xml") {
            return None;
        }

        let (s_index, sentence) = if parts[n - 3].eq_ignore_ascii_case("s") {
            (n - 3, SentenceNumber::parse(parts[n - 2])?)
        } else if n >= 7 && parts[n - 4].eq_ignore_ascii_case("s") {
            let whole = parse_number(parts[n - 3])?;
            let sub = parse_number(parts[n - 2])?;
            (n - 4, SentenceNumber::with_sub(whole, sub))
        } else {
            return None;
        };

        if s_index < 3 {
            return None;
        }
        let paragraph = parse_number(parts[s_index - 1])?;
        let marker = parts[s_index - 2];
        let section = if marker.eq_ignore_ascii_case("p") {
            Section::Body
        } else if marker.eq_ignore_ascii_case("head") {
            Section::Head
        } else {
            return None;
        };

        let document = parts[..s_index - 2].join(".");
        if document.is_empty() {
            return None;
        }

        Some(Self {
            document,
            section,
            paragraph,
            sentence,
        })
    }

    /// The canonical file name for this fragment
    pub fn canonical(&self) -> String {
        format!(
            "{}.{}.{}.s.{}.xml",
            self.document, self.section, self.paragraph, self.sentence
        )
    }

    /// Ordering key inside a document: head first, then paragraph, then sentence
    pub fn sort_key(&self) -> (Section, u32, SentenceNumber) {
        (self.section, self.paragraph, self.sentence)
    }
}
