//! Directory scanning and fragment planning

use super::filename::{FragmentName, Section, SentenceNumber};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that stop the inventory as a whole
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("inventory task failed: {0}")]
    Task(String),
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

/// One fragment file scheduled for processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentDescriptor {
    pub document: String,
    pub section: Section,
    pub paragraph: u32,
    pub sentence: SentenceNumber,
    pub path: PathBuf,
}

/// Ordered fragments of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentPlan {
    pub name: String,
    /// Head fragments by (paragraph, sentence)
    pub head: Vec<FragmentDescriptor>,
    /// Body fragments by (paragraph, sentence)
    pub body: Vec<FragmentDescriptor>,
}

impl DocumentPlan {
    /// All fragments in processing order
    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDescriptor> {
        self.head.iter().chain(self.body.iter())
    }

    pub fn fragment_count(&self) -> usize {
        self.head.len() + self.body.len()
    }
}

/// A file renamed to its canonical name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Result of scanning a fragment directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct Inventory {
    /// Plans sorted by document name
    pub documents: Vec<DocumentPlan>,
    pub renames: Vec<Rename>,
    /// Files left alone because their canonical name was already taken
    pub conflicts: Vec<Rename>,
    /// Files that share a key with a file already in the plan
    pub duplicates: Vec<PathBuf>,
    /// Entries that are not fragment files
    pub skipped: Vec<String>,
}

impl Inventory {
    pub fn fragment_count(&self) -> usize {
        self.documents.iter().map(DocumentPlan::fragment_count).sum()
    }
}

/// Options for [`scan_directory`]
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Rename non-canonical body fragments
    pub normalize: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { normalize: true }
    }
}

struct Candidate {
    descriptor: FragmentDescriptor,
    canonical: bool,
}

type Key = (Section, u32, SentenceNumber);

/// Scan a directory of fragment files and plan every document in it
///
/// With `normalize` set, body fragments whose name is not canonical are
/// renamed; when the canonical name already exists the file is left in place
/// and reported as a conflict. Running the scan again on the same directory
/// renames nothing.
pub fn scan_directory(dir: &Path, options: ScanOptions) -> InventoryResult<Inventory> {
    let read_error = |source| InventoryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    // Renames below must not feed back into the listing.
    let entries = fs::read_dir(dir)
        .map_err(read_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;

    let mut inventory = Inventory::default();
    let mut documents: BTreeMap<String, BTreeMap<Key, Candidate>> = BTreeMap::new();

    for entry in entries {
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            inventory.skipped.push(entry.file_name().to_string_lossy().into_owned());
            continue;
        };
        let Some(name) = FragmentName::parse(&file_name) else {
            debug!(file = %file_name, "not a fragment file");
            inventory.skipped.push(file_name);
            continue;
        };

        let canonical_name = name.canonical();
        let mut path = entry.path();
        let mut canonical = file_name == canonical_name;

        if !canonical && options.normalize && name.section == Section::Body {
            let target = dir.join(&canonical_name);
            if target.exists() {
                warn!(
                    file = %file_name,
                    target = %canonical_name,
                    "cannot normalize fragment name: target exists"
                );
                inventory.conflicts.push(Rename {
                    from: path,
                    to: target,
                });
                // The canonical file is listed on its own and stands for this key.
                continue;
            }
            match fs::rename(&path, &target) {
                Ok(()) => {
                    info!(from = %file_name, to = %canonical_name, "normalized fragment name");
                    inventory.renames.push(Rename {
                        from: path,
                        to: target.clone(),
                    });
                    path = target;
                    canonical = true;
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "rename failed; using original name");
                }
            }
        }

        let key = name.sort_key();
        let candidate = Candidate {
            descriptor: FragmentDescriptor {
                document: name.document.clone(),
                section: name.section,
                paragraph: name.paragraph,
                sentence: name.sentence,
                path,
            },
            canonical,
        };

        let plan = documents.entry(name.document).or_default();
        match plan.get(&key) {
            Some(existing) if existing.canonical || !candidate.canonical => {
                warn!(file = %candidate.descriptor.path.display(), "duplicate fragment ignored");
                inventory.duplicates.push(candidate.descriptor.path);
            }
            _ => {
                if let Some(replaced) = plan.insert(key, candidate) {
                    warn!(file = %replaced.descriptor.path.display(), "duplicate fragment ignored");
                    inventory.duplicates.push(replaced.descriptor.path);
                }
            }
        }
    }

    for (name, fragments) in documents {
        let mut plan = DocumentPlan {
            name,
            ..Default::default()
        };
        for candidate in fragments.into_values() {
            match candidate.descriptor.section {
                Section::Head => plan.head.push(candidate.descriptor),
                Section::Body => plan.body.push(candidate.descriptor),
            }
        }
        inventory.documents.push(plan);
    }

    info!(
        dir = %dir.display(),
        documents = inventory.documents.len(),
        fragments = inventory.fragment_count(),
        renamed = inventory.renames.len(),
        conflicts = inventory.conflicts.len(),
        "fragment inventory complete"
    );
    Ok(inventory)
}
