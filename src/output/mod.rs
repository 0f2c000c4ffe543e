//! JSON output for the host status export
//!
//! Records are built from the FSA snapshot, rendered into one complete
//! document in memory and only then written out.

pub mod document;
pub mod record;

pub use document::{render_document, write_document};
pub use record::{direction, host_status_tags, HostRecord, JobRecord};
