//! Document assembly
//!
//! Walks one document's fragment plan, head section first, feeding every
//! fragment through token extraction, the text layers, and predicate
//! building. Only the running scalars (watermark, sentence counter, last
//! paragraph, srl counters) and the growing layers survive from one
//! fragment to the next.

use super::layers::{LayerError, SentencePosition, TextLayers};
use super::model::{Document, DocumentStats, Predicate, TokenId};
use crate::config::ConverterConfig;
use crate::extract::{build_predicates, extract_tokens, ExtractError, SrlIds};
use crate::inventory::{DocumentPlan, FragmentDescriptor, Section};
use crate::tree::{parse_fragment, TreeError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Why a single fragment could not be processed
#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("layer error: {0}")]
    Layer(#[from] LayerError),
}

/// Errors that abort a document's assembly
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("fragment {}: {source}", .path.display())]
    Fragment {
        path: PathBuf,
        #[source]
        source: FragmentError,
    },

    #[error("invalid assembly transition from {from:?} to {to:?}")]
    Transition { from: Phase, to: Phase },
}

impl AssemblyError {
    /// Path of the fragment that failed, if the failure is tied to one
    pub fn fragment_path(&self) -> Option<&Path> {
        match self {
            Self::Fragment { path, .. } => Some(path),
            Self::Transition { .. } => None,
        }
    }
}

/// Result type for assembly
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Lifecycle of one document's assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    ProcessingHead,
    ProcessingBody,
    Finalized,
}

impl Phase {
    fn can_enter(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Start, Phase::ProcessingHead)
                | (Phase::Start, Phase::ProcessingBody)
                | (Phase::ProcessingHead, Phase::ProcessingBody)
                | (Phase::ProcessingBody, Phase::Finalized)
        )
    }
}

/// Builds one document fragment by fragment
pub struct DocumentAssembler<'a> {
    name: String,
    config: &'a ConverterConfig,
    phase: Phase,
    layers: TextLayers,
    predicates: Vec<Predicate>,
    srl_ids: SrlIds,
    watermark: TokenId,
    sentence_number: u32,
    last_paragraph: Option<(Section, u32)>,
    stats: DocumentStats,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(name: impl Into<String>, config: &'a ConverterConfig) -> Self {
        Self {
            name: name.into(),
            config,
            phase: Phase::Start,
            layers: TextLayers::new(),
            predicates: Vec::new(),
            srl_ids: SrlIds::new(),
            watermark: TokenId(1),
            sentence_number: 0,
            last_paragraph: None,
            stats: DocumentStats::default(),
        }
    }

    /// Assemble a whole plan: head fragments, then body fragments
    pub fn assemble(plan: &DocumentPlan, config: &'a ConverterConfig) -> AssemblyResult<Document> {
        let mut assembler = Self::new(&plan.name, config);
        if !plan.head.is_empty() {
            assembler.enter(Phase::ProcessingHead)?;
            for fragment in &plan.head {
                assembler.process_fragment(fragment)?;
            }
        }
        assembler.enter(Phase::ProcessingBody)?;
        for fragment in &plan.body {
            assembler.process_fragment(fragment)?;
        }
        assembler.finalize()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to the next phase
    pub fn enter(&mut self, next: Phase) -> AssemblyResult<()> {
        if !self.phase.can_enter(next) {
            return Err(AssemblyError::Transition {
                from: self.phase,
                to: next,
            });
        }
        debug!(document = %self.name, from = ?self.phase, to = ?next, "assembly phase");
        self.phase = next;
        Ok(())
    }

    /// Read, parse, and absorb one fragment file
    pub fn process_fragment(&mut self, fragment: &FragmentDescriptor) -> AssemblyResult<()> {
        let expected = match fragment.section {
            Section::Head => Phase::ProcessingHead,
            Section::Body => Phase::ProcessingBody,
        };
        if self.phase != expected {
            return Err(AssemblyError::Transition {
                from: self.phase,
                to: expected,
            });
        }

        let xml = std::fs::read_to_string(&fragment.path).map_err(|e| AssemblyError::Fragment {
            path: fragment.path.clone(),
            source: e.into(),
        })?;
        self.process_xml(fragment, &xml)
            .map_err(|source| AssemblyError::Fragment {
                path: fragment.path.clone(),
                source,
            })
    }

    fn process_xml(&mut self, fragment: &FragmentDescriptor, xml: &str) -> Result<(), FragmentError> {
        let tree = parse_fragment(xml)?;
        let extracted = extract_tokens(&tree, self.watermark)?;

        let paragraph = (fragment.section, fragment.paragraph);
        let new_paragraph = self.last_paragraph.is_some_and(|last| last != paragraph);
        self.last_paragraph = Some(paragraph);
        self.sentence_number += 1;

        let text = match &tree.sentence {
            Some(sentence) => sentence.clone(),
            None => extracted.joined_forms(),
        };
        self.layers.push_sentence(&text, new_paragraph);
        self.layers.push_tokens(
            &extracted,
            SentencePosition {
                paragraph: fragment.paragraph,
                sentence: self.sentence_number,
            },
            self.config,
        )?;

        let layers = &self.layers;
        let scan = build_predicates(
            &tree,
            self.watermark,
            self.config,
            &mut self.srl_ids,
            |id| layers.contains(id),
        );

        debug!(
            document = %self.name,
            fragment = %fragment.path.display(),
            tokens = extracted.len(),
            predicates = scan.predicates.len(),
            "fragment processed"
        );

        self.stats.fragments += 1;
        self.stats.missed_roles += scan.missed_roles;
        self.stats.dropped_spans += scan.dropped_spans;
        self.predicates.extend(scan.predicates);
        self.watermark = extracted.next_watermark;
        Ok(())
    }

    /// Close the document; no fragment can be added afterwards
    pub fn finalize(mut self) -> AssemblyResult<Document> {
        self.enter(Phase::Finalized)?;

        let (raw, tokens, terms) = self.layers.into_parts();
        let stats = DocumentStats {
            tokens: tokens.len(),
            predicates: self.predicates.len(),
            roles: self.predicates.iter().map(|p| p.roles.len()).sum(),
            ..self.stats
        };
        info!(
            document = %self.name,
            tokens = stats.tokens,
            predicates = stats.predicates,
            roles = stats.roles,
            missed_roles = stats.missed_roles,
            "document assembled"
        );

        Ok(Document::new(
            self.name,
            self.config.language.clone(),
            raw,
            tokens,
            terms,
            self.predicates,
            stats,
        ))
    }
}
