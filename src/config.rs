//! Runtime configuration
//!
//! Everything the viewer needs is resolved once at startup into a
//! [`ViewerConfig`] and passed down explicitly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::cli::CliArgs;
use crate::error::ViewError;
use crate::view_cmd::HostSelector;

/// Environment variable naming the AFD working directory
pub const WORK_DIR_ENV: &str = "AFD_WORK_DIR";

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "FSA_VIEW_LOG";

/// Directory inside the working directory holding the FSA files
pub const FIFO_DIR: &str = "fifodir";

/// Output layout requested on the command line
///
/// Kept for compatibility with the classic viewer flags. Both modes produce
/// the same JSON document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    CtrlAll,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub work_dir: PathBuf,
    pub selector: HostSelector,
    pub view_mode: ViewMode,
}

impl ViewerConfig {
    /// Resolve against the process environment
    pub fn resolve(args: CliArgs) -> Result<Self, ViewError> {
        Self::resolve_with(args, std::env::var_os(WORK_DIR_ENV))
    }

    /// Resolve with an explicit value for `AFD_WORK_DIR`
    ///
    /// `-w` takes precedence over the environment. The directory must exist.
    pub fn resolve_with(args: CliArgs, env_work_dir: Option<OsString>) -> Result<Self, ViewError> {
        let work_dir = args
            .work_dir
            .or_else(|| env_work_dir.filter(|v| !v.is_empty()).map(PathBuf::from))
            .ok_or_else(|| ViewError::WorkDir {
                path: None,
                reason: format!("neither -w nor {} given", WORK_DIR_ENV),
            })?;

        if !work_dir.is_dir() {
            return Err(ViewError::WorkDir {
                reason: format!("{} is not a directory", work_dir.display()),
                path: Some(work_dir),
            });
        }

        tracing::debug!(
            "Working directory {:?}, view mode {:?}",
            work_dir,
            args.view_mode
        );

        Ok(ViewerConfig {
            work_dir,
            selector: args.selector,
            view_mode: args.view_mode,
        })
    }

    pub fn fifo_dir(&self) -> PathBuf {
        fifo_dir(&self.work_dir)
    }
}

pub fn fifo_dir(work_dir: &Path) -> PathBuf {
    work_dir.join(FIFO_DIR)
}
