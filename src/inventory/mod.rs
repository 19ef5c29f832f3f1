//! Fragment inventory
//!
//! Fragment files encode their document, section, paragraph, and sentence
//! in the file name. The inventory turns a directory listing into ordered
//! per-document plans, independent of the order the filesystem lists them.

mod filename;
mod scan;

pub use filename::{FragmentName, Section, SentenceNumber};
pub use scan::{
    scan_directory, DocumentPlan, FragmentDescriptor, Inventory, InventoryError, InventoryResult,
    Rename, ScanOptions,
};
