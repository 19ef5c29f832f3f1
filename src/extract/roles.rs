//! Predicate and role extraction from PropBank tags
//!
//! Role tags (`pb`) are grouped per set of siblings: all tagged children of
//! one node form a frame. A frame with a trigger occurrence becomes one
//! predicate whose remaining occurrences become its roles. A frame without a
//! trigger is discarded and its occurrences are counted as missed.
//!
//! Frames are resolved bottom-up, so predicates of embedded clauses are
//! numbered before the predicate of the clause that contains them.

use super::constituent::{collect_constituent, Constituent};
use crate::config::ConverterConfig;
use crate::document::{Predicate, PredicateId, Role, RoleId, TokenId};
use crate::tree::{FragmentTree, TreeNode};
use tracing::{debug, warn};

/// Per-document predicate and role counters
#[derive(Debug, Clone, Default)]
pub struct SrlIds {
    predicates: u32,
    roles: u32,
}

impl SrlIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_predicate(&mut self) -> PredicateId {
        self.predicates += 1;
        PredicateId(self.predicates)
    }

    fn next_role(&mut self) -> RoleId {
        self.roles += 1;
        RoleId(self.roles)
    }

    /// Number of predicate ids handed out so far
    pub fn predicate_count(&self) -> u32 {
        self.predicates
    }

    /// Number of role ids handed out so far
    pub fn role_count(&self) -> u32 {
        self.roles
    }
}

/// Predicates found in one fragment plus what was discarded on the way
#[derive(Debug, Clone, Default)]
pub struct PredicateScan {
    pub predicates: Vec<Predicate>,
    /// Role occurrences dropped because their frame had no trigger
    pub missed_roles: usize,
    /// Occurrences dropped for an empty span or a span outside the token layer
    pub dropped_spans: usize,
}

/// Tagged siblings grouped by label, labels in first-seen order
#[derive(Debug, Default)]
struct Frame {
    groups: Vec<(String, Vec<Constituent>)>,
}

impl Frame {
    fn push(&mut self, label: &str, constituent: Constituent) {
        match self.groups.iter_mut().find(|(l, _)| l == label) {
            Some((_, list)) => list.push(constituent),
            None => self.groups.push((label.to_string(), vec![constituent])),
        }
    }

    fn take(&mut self, label: &str) -> Option<Vec<Constituent>> {
        let index = self.groups.iter().position(|(l, _)| l == label)?;
        Some(self.groups.remove(index).1)
    }

    fn occurrences(&self) -> usize {
        self.groups.iter().map(|(_, list)| list.len()).sum()
    }
}

struct Scanner<'a, F> {
    config: &'a ConverterConfig,
    watermark: TokenId,
    ids: &'a mut SrlIds,
    is_known: F,
    scan: PredicateScan,
}

/// Build the predicates of one fragment
///
/// `is_known` reports whether a token id exists in the document's token
/// layer; spans referring to unknown ids are dropped as integrity violations.
pub fn build_predicates<F>(
    fragment: &FragmentTree,
    watermark: TokenId,
    config: &ConverterConfig,
    ids: &mut SrlIds,
    is_known: F,
) -> PredicateScan
where
    F: Fn(TokenId) -> bool,
{
    let mut scanner = Scanner {
        config,
        watermark,
        ids,
        is_known,
        scan: PredicateScan::default(),
    };
    scanner.scan_siblings(&fragment.roots);
    scanner.scan
}

impl<F> Scanner<'_, F>
where
    F: Fn(TokenId) -> bool,
{
    fn scan_siblings(&mut self, nodes: &[TreeNode]) {
        let mut frame = Frame::default();
        for node in nodes {
            if let Some(label) = node.role() {
                let constituent =
                    collect_constituent(node, self.watermark, &self.config.head_marker);
                frame.push(label, constituent);
            }
            self.scan_siblings(node.children());
        }
        self.resolve(frame);
    }

    fn span_is_valid(&self, constituent: &Constituent) -> bool {
        constituent.tokens.iter().all(|id| (self.is_known)(*id))
    }

    fn resolve(&mut self, mut frame: Frame) {
        let Some(triggers) = frame.take(&self.config.trigger_label) else {
            let missed = frame.occurrences();
            if missed > 0 {
                debug!(missed, "role frame without trigger discarded");
            }
            self.scan.missed_roles += missed;
            return;
        };

        let mut triggers = triggers.into_iter();
        let Some(anchor) = triggers.next() else {
            return;
        };
        if triggers.len() > 0 {
            debug!(extra = triggers.len(), "additional trigger occurrences ignored");
        }

        if anchor.is_empty() || !self.span_is_valid(&anchor) {
            warn!(
                span = ?anchor.tokens,
                "predicate span is empty or refers to unknown tokens; predicate dropped"
            );
            self.scan.dropped_spans += 1 + frame.occurrences();
            return;
        }

        let id = self.ids.next_predicate();
        let mut roles = Vec::new();
        for (label, constituents) in frame.groups {
            for constituent in constituents {
                if constituent.is_empty() {
                    self.scan.dropped_spans += 1;
                    continue;
                }
                if !self.span_is_valid(&constituent) {
                    warn!(
                        predicate = %id,
                        label = %label,
                        span = ?constituent.tokens,
                        "role span refers to unknown tokens; role dropped"
                    );
                    self.scan.dropped_spans += 1;
                    continue;
                }
                roles.push(Role {
                    id: self.ids.next_role(),
                    label: label.clone(),
                    span: constituent.tokens,
                    head: constituent.head,
                });
            }
        }

        self.scan.predicates.push(Predicate {
            id,
            span: anchor.tokens,
            head: anchor.head,
            roles,
        });
    }
}
