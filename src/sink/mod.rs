//! Output sinks for finished documents
//!
//! Documents go out through the `DocumentSink` trait. `NafDirectorySink`
//! writes NAF files; `MemorySink` keeps documents around for inspection.

mod memory;
mod naf;
mod traits;

pub use memory::MemorySink;
pub use naf::{public_id, render_naf, NafDirectorySink, NAF_VERSION};
pub use traits::{DocumentSink, SinkError, SinkResult};
