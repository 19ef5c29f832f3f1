//! Shared fixtures for the end-to-end tests
//!
//! Builds Alpino fragment files in a scratch directory and collects what the
//! converter writes back.

#![allow(dead_code)]

use rand::seq::SliceRandom;
use sonar2naf::Document;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// One terminal of a fixture sentence
#[derive(Debug, Clone)]
pub struct Word {
    pub word: String,
    pub lemma: String,
    pub pos: String,
    pub postag: String,
    pub rel: String,
    pub pb: Option<String>,
}

impl Word {
    pub fn new(word: &str, pos: &str, postag: &str) -> Self {
        Self {
            word: word.to_string(),
            lemma: word.to_lowercase(),
            pos: pos.to_string(),
            postag: postag.to_string(),
            rel: "--".to_string(),
            pb: None,
        }
    }

    pub fn rel(mut self, rel: &str) -> Self {
        self.rel = rel.to_string();
        self
    }

    pub fn pb(mut self, label: &str) -> Self {
        self.pb = Some(label.to_string());
        self
    }

    fn to_xml(&self, begin: usize) -> String {
        let pb = self
            .pb
            .as_ref()
            .map(|label| format!(r#" pb="{}""#, label))
            .unwrap_or_default();
        format!(
            r#"<node begin="{}" end="{}" rel="{}" word="{}" lemma="{}" pos="{}" postag="{}"{}/>"#,
            begin,
            begin + 1,
            self.rel,
            self.word,
            self.lemma,
            self.pos,
            self.postag,
            pb
        )
    }
}

/// A noun as it appears in most fixtures
pub fn noun(word: &str) -> Word {
    Word::new(word, "noun", "N(soort,ev,basis,zijd,stan)")
}

/// A finite verb
pub fn verb(word: &str) -> Word {
    Word::new(word, "verb", "WW(pv,tgw,met-t)")
}

/// A flat sentence: every word a direct child of one clause node
pub fn flat_fragment(words: &[Word], sentence: Option<&str>) -> String {
    let leaves: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(begin, word)| format!("      {}", word.to_xml(begin)))
        .collect();
    let sentence = sentence
        .map(|text| format!("  <sentence>{}</sentence>\n", text))
        .unwrap_or_default();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<alpino_ds version=\"1.3\">\n  <metadata/>\n  <node begin=\"0\" cat=\"top\" rel=\"top\">\n    <node cat=\"smain\" rel=\"--\">\n{}\n    </node>\n  </node>\n{}</alpino_ds>\n",
        leaves.join("\n"),
        sentence
    )
}

/// Scratch directory holding fragment files
pub struct FragmentDir {
    dir: TempDir,
}

impl FragmentDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, xml: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, xml).expect("failed to write fragment");
        path
    }

    /// Write fragments in a random order, so tests cannot rely on creation order
    pub fn write_shuffled(&self, fragments: &[(&str, String)]) {
        let mut order: Vec<&(&str, String)> = fragments.iter().collect();
        order.shuffle(&mut rand::thread_rng());
        for (name, xml) in order {
            self.write(name, xml);
        }
    }

    /// File names currently in the directory, sorted
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path())
            .expect("failed to list temp dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

/// All files with the given extension below `dir`, sorted
pub fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    files.sort();
    files
}

/// Check the structural guarantees every finished document must satisfy
pub fn assert_document_invariants(document: &Document) {
    for (index, token) in document.tokens().iter().enumerate() {
        assert_eq!(token.id.0 as usize, index + 1, "token ids must be contiguous");
        assert_eq!(
            document.token_text(token),
            token.form,
            "raw text at {} must match the token form",
            token.id
        );
    }
    assert_eq!(document.terms().len(), document.tokens().len());
    for term in document.terms() {
        assert!(document.token(term.token).is_some(), "term {} has no token", term.id);
    }
    for predicate in document.predicates() {
        assert!(!predicate.span.is_empty());
        for id in &predicate.span {
            assert!(document.token(*id).is_some());
        }
        for role in &predicate.roles {
            assert!(!role.span.is_empty());
            for id in &role.span {
                assert!(document.token(*id).is_some());
            }
        }
    }
}
