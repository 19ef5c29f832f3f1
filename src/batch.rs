//! Batch conversion of a fragment directory
//!
//! Each document is assembled and stored on a blocking worker. Documents
//! share nothing mutable: every worker owns its counters and returns its own
//! statistics, and a failed document is reported without affecting the rest.

use crate::config::ConverterConfig;
use crate::document::{AssemblyError, DocumentAssembler, DocumentStats};
use crate::inventory::{
    scan_directory, DocumentPlan, InventoryError, InventoryResult, ScanOptions,
};
use crate::sink::{DocumentSink, SinkError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Why one document failed
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("cannot store document: {0}")]
    Sink(#[from] SinkError),

    #[error("worker failed: {0}")]
    Worker(String),
}

/// A converted document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub name: String,
    /// Where the sink put it
    pub location: String,
    pub stats: DocumentStats,
}

/// A document excluded from the output
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    pub name: String,
    /// Fragment that caused the failure, when known
    pub fragment: Option<PathBuf>,
    pub error: String,
}

/// Outcome of a whole batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub converted: Vec<DocumentSummary>,
    pub failed: Vec<DocumentFailure>,
    /// Fragment files renamed to their canonical names
    pub renamed: usize,
    /// Fragment files whose canonical name was already taken
    pub conflicts: usize,
    /// Role occurrences discarded for lacking a trigger, over all documents
    pub missed_roles: usize,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Converts documents concurrently into a sink
pub struct BatchConverter {
    config: Arc<ConverterConfig>,
    sink: Arc<dyn DocumentSink>,
    /// Bounds how many documents are in flight
    workers: Arc<Semaphore>,
}

impl BatchConverter {
    pub fn new(config: ConverterConfig, sink: Arc<dyn DocumentSink>) -> Self {
        let workers = Arc::new(Semaphore::new(config.jobs.max(1)));
        Self {
            config: Arc::new(config),
            sink,
            workers,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Inventory `dir` and convert every document found
    pub async fn convert_directory(&self, dir: &Path) -> InventoryResult<BatchReport> {
        let dir = dir.to_path_buf();
        let options = ScanOptions {
            normalize: self.config.normalize_filenames,
        };
        let inventory = tokio::task::spawn_blocking(move || scan_directory(&dir, options))
            .await
            .map_err(|e| InventoryError::Task(e.to_string()))??;

        let mut report = self.convert_plans(inventory.documents).await;
        report.renamed = inventory.renames.len();
        report.conflicts = inventory.conflicts.len();
        Ok(report)
    }

    /// Convert already planned documents
    pub async fn convert_plans(&self, plans: Vec<DocumentPlan>) -> BatchReport {
        let mut handles = Vec::with_capacity(plans.len());
        for plan in plans {
            let config = Arc::clone(&self.config);
            let sink = Arc::clone(&self.sink);
            let workers = Arc::clone(&self.workers);
            let name = plan.name.clone();
            let handle = tokio::spawn(run_worker(plan, config, sink, workers));
            handles.push((name, handle));
        }

        let mut report = BatchReport::default();
        for (name, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ConvertError::Worker(e.to_string())),
            };
            match outcome {
                Ok(summary) => {
                    report.missed_roles += summary.stats.missed_roles;
                    report.converted.push(summary);
                }
                Err(e) => {
                    let fragment = match &e {
                        ConvertError::Assembly(err) => err.fragment_path().map(Path::to_path_buf),
                        _ => None,
                    };
                    error!(document = %name, error = %e, "document conversion failed");
                    report.failed.push(DocumentFailure {
                        name,
                        fragment,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            converted = report.converted.len(),
            failed = report.failed.len(),
            missed_roles = report.missed_roles,
            "batch complete"
        );
        report
    }
}

/// Wait for a worker slot, then convert on the blocking pool
async fn run_worker(
    plan: DocumentPlan,
    config: Arc<ConverterConfig>,
    sink: Arc<dyn DocumentSink>,
    workers: Arc<Semaphore>,
) -> Result<DocumentSummary, ConvertError> {
    let _permit = workers
        .acquire_owned()
        .await
        .map_err(|e| ConvertError::Worker(e.to_string()))?;
    tokio::task::spawn_blocking(move || convert_document(&plan, &config, &*sink))
        .await
        .map_err(|e| ConvertError::Worker(e.to_string()))?
}

/// Inventory `input` and convert every document into `sink`
pub async fn convert_directory(
    input: &Path,
    sink: Arc<dyn DocumentSink>,
    config: ConverterConfig,
) -> InventoryResult<BatchReport> {
    BatchConverter::new(config, sink).convert_directory(input).await
}

/// Assemble one document and hand it to the sink
pub fn convert_document(
    plan: &DocumentPlan,
    config: &ConverterConfig,
    sink: &dyn DocumentSink,
) -> Result<DocumentSummary, ConvertError> {
    let document = DocumentAssembler::assemble(plan, config)?;
    let location = sink.store(&document)?;
    Ok(DocumentSummary {
        name: document.name().to_string(),
        location,
        stats: *document.stats(),
    })
}
