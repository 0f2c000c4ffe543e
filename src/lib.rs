//! fsa_view_json: dump the AFD host status table as JSON
//!
//! Attaches passively to the FSA (Filetransfer Status Area) that a running
//! AFD daemon keeps in `<work dir>/fifodir` and renders one or all hosts as a
//! single JSON array on stdout. The table is only ever read.
//!
//! # Output
//!
//! The document is built completely before anything is written, so a failed
//! run leaves stdout empty. Records are compact JSON objects, one per line:
//!
//! ```text
//! [{"ord":0,"alias":"srv1",...,"jobs":[...]}
//! ]
//! ```
//!
//! # Feature Flags
//!
//! - **`error-queue`** (default): report `ERROR_QUEUE_SET` in `host_status`
//! - **`scp-support`**, **`wmo-support`** (default): label the legacy protocol
//!   connect states instead of reporting them as unknown
//! - **`map-support`**: the SFTP active state is labelled `SFTP/MAP`

pub mod cli;
pub mod config;
pub mod error;
pub mod error_codes;
pub mod fsa;
pub mod output;
pub mod version;
pub mod view_cmd;

pub use cli::{parse_args, parse_args_from, CliArgs, Invocation};
pub use config::{ViewMode, ViewerConfig};
pub use error::{Severity, ViewError};
pub use fsa::{attach_passive, HostStatus, JobStatus, TableHandle};
pub use output::{HostRecord, JobRecord};
pub use view_cmd::{export, resolve_range, run_view, HostSelector};
