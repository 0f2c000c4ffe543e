//! Error taxonomy of the viewer
//!
//! Every error is terminal: the process reports it once on stderr and exits
//! without having written anything to stdout.

use std::io;
use std::path::PathBuf;

use crate::error_codes::*;
use crate::fsa::{AttachError, LayoutMismatch};

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Rendered clap error, usage included
    #[error("{0}")]
    Usage(String),

    #[error("Failed to determine AFD working directory: {reason}")]
    WorkDir {
        path: Option<PathBuf>,
        reason: String,
    },

    #[error("The compiled binary does not match stored database.")]
    IncompatibleLayout(Vec<LayoutMismatch>),

    #[error("Failed to read layout stamp {path:?}: {source}")]
    UnreadableStamp {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}", attach_message(.0))]
    AttachFailed(#[from] AttachError),

    #[error("There are only {host_count} hosts in the FSA.")]
    OutOfRange { position: usize, host_count: usize },

    #[error("Could not find host `{0}` in FSA.")]
    HostNotFound(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn attach_message(err: &AttachError) -> String {
    match err {
        AttachError::IncorrectVersion { .. } => format!(
            "This program is not able to attach to the FSA due to incorrect version: {}",
            err
        ),
        AttachError::Os { .. } => format!("Failed to attach to FSA : {}", err),
        _ => format!("Failed to attach to FSA: {}", err),
    }
}

/// Prefix printed in front of a diagnostic line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

impl ViewError {
    pub fn code(&self) -> &'static str {
        match self {
            ViewError::Usage(_) => FSV_USE_001_USAGE,
            ViewError::WorkDir { .. } => FSV_USE_002_WORK_DIR,
            ViewError::IncompatibleLayout(_) => FSV_LAY_001_INCOMPATIBLE,
            ViewError::UnreadableStamp { .. } => FSV_LAY_002_UNREADABLE,
            ViewError::AttachFailed(AttachError::IncorrectVersion { .. }) => {
                FSV_ATT_001_INCORRECT_VERSION
            }
            ViewError::AttachFailed(AttachError::Os { .. }) => FSV_ATT_003_OS_ERROR,
            ViewError::AttachFailed(_) => FSV_ATT_002_ATTACH_FAILED,
            ViewError::OutOfRange { .. } => FSV_SEL_001_OUT_OF_RANGE,
            ViewError::HostNotFound(_) => FSV_SEL_002_HOST_NOT_FOUND,
            ViewError::Output(_) => FSV_IO_001_WRITE_FAILED,
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            ViewError::Usage(_) | ViewError::WorkDir { .. } => 2,
            _ => 1,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ViewError::OutOfRange { .. } | ViewError::HostNotFound(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Additional lines printed after the diagnostic
    pub fn hints(&self) -> Vec<String> {
        match self {
            ViewError::IncompatibleLayout(mismatches) => mismatches
                .iter()
                .map(|m| format!("          {}", m))
                .chain(std::iter::once(
                    "Initialize database with the command : afd -i".to_string(),
                ))
                .collect(),
            ViewError::UnreadableStamp { .. } => {
                vec!["Initialize database with the command : afd -i".to_string()]
            }
            ViewError::WorkDir { path: None, .. } => {
                vec!["Use -w <working directory> or set AFD_WORK_DIR".to_string()]
            }
            _ => Vec::new(),
        }
    }

    /// Lines written to stderr when this error ends the run
    ///
    /// Usage errors are printed as rendered by clap.
    pub fn diagnostic(&self) -> Vec<String> {
        if let ViewError::Usage(rendered) = self {
            return vec![rendered.trim_end().to_string()];
        }

        let mut lines = vec![format!(
            "{:<8}: {} [{}]",
            self.severity().as_str(),
            self,
            self.code()
        )];
        lines.extend(self.hints());
        lines
    }
}
