//! Compiled FSA layout and the type-size stamp check
//!
//! The daemon writes `typesize_data` when it initialises its database. The
//! file records the sizes and limits the table was built with, one
//! `NAME|VALUE` pair per line. A binary compiled with different limits
//! would misread every record, so it must refuse to attach.

use std::fs;
use std::io;
use std::path::Path;

pub const MAX_HOSTNAME_LENGTH: usize = 8;
pub const MAX_REAL_HOSTNAME_LENGTH: usize = 70;
pub const MAX_NO_PARALLEL_JOBS: usize = 5;
pub const SIZEOF_INT: usize = 4;
pub const SIZEOF_OFF_T: usize = 8;
pub const SIZEOF_TIME_T: usize = 8;

/// Table version this binary understands
pub const FSA_VERSION: u8 = 4;

/// Size of the table header in front of the first host record
pub const AFD_WORD_OFFSET: usize = 16;
/// Offset of the version byte inside the header
pub const VERSION_OFFSET: usize = SIZEOF_INT + 3;

pub const HOST_ALIAS_SIZE: usize = MAX_HOSTNAME_LENGTH + 1;
pub const HOST_DSP_NAME_SIZE: usize = MAX_HOSTNAME_LENGTH + 2;

/// connect_status + no_of_files + no_of_files_done
pub const JOB_STATUS_SIZE: usize = 1 + SIZEOF_INT + SIZEOF_INT;

// Field offsets inside one host record
pub const REAL_HOSTNAME_OFFSET: usize = HOST_ALIAS_SIZE;
pub const HOST_DSP_NAME_OFFSET: usize = REAL_HOSTNAME_OFFSET + 2 * MAX_REAL_HOSTNAME_LENGTH;
pub const PROTOCOL_OFFSET: usize = HOST_DSP_NAME_OFFSET + HOST_DSP_NAME_SIZE;
pub const DEBUG_OFFSET: usize = PROTOCOL_OFFSET + 4;
pub const HOST_STATUS_OFFSET: usize = DEBUG_OFFSET + 1;
pub const SPECIAL_FLAG_OFFSET: usize = HOST_STATUS_OFFSET + 4;
pub const ERROR_COUNTER_OFFSET: usize = SPECIAL_FLAG_OFFSET + 4;
pub const TOTAL_FILE_COUNTER_OFFSET: usize = ERROR_COUNTER_OFFSET + SIZEOF_INT;
pub const TOTAL_FILE_SIZE_OFFSET: usize = TOTAL_FILE_COUNTER_OFFSET + SIZEOF_INT;
pub const ACTIVE_TRANSFERS_OFFSET: usize = TOTAL_FILE_SIZE_OFFSET + SIZEOF_OFF_T;
pub const ALLOWED_TRANSFERS_OFFSET: usize = ACTIVE_TRANSFERS_OFFSET + SIZEOF_INT;
pub const JOB_STATUS_OFFSET: usize = ALLOWED_TRANSFERS_OFFSET + SIZEOF_INT;

/// Size of one host record
pub const HOST_RECORD_SIZE: usize = JOB_STATUS_OFFSET + MAX_NO_PARALLEL_JOBS * JOB_STATUS_SIZE;

/// Name of the stamp file inside the fifo directory
pub const TYPESIZE_DATA_FILE: &str = "typesize_data";

/// Values this binary was compiled with, in the order they are written
pub const TYPESIZE_ENTRIES: &[(&str, usize)] = &[
    ("MAX_HOSTNAME_LENGTH", MAX_HOSTNAME_LENGTH),
    ("MAX_REAL_HOSTNAME_LENGTH", MAX_REAL_HOSTNAME_LENGTH),
    ("MAX_NO_PARALLEL_JOBS", MAX_NO_PARALLEL_JOBS),
    ("SIZEOF_INT", SIZEOF_INT),
    ("SIZEOF_OFF_T", SIZEOF_OFF_T),
    ("SIZEOF_TIME_T", SIZEOF_TIME_T),
    ("FSA_VERSION", FSA_VERSION as usize),
];

/// A stamp entry whose stored value differs from the compiled one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMismatch {
    pub name: String,
    pub stored: String,
    pub expected: usize,
}

impl std::fmt::Display for LayoutMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} stored as {} but compiled with {}",
            self.name, self.stored, self.expected
        )
    }
}

/// Compare stamp file contents against [`TYPESIZE_ENTRIES`]
///
/// Blank lines, `#` comments and names this binary does not know are
/// skipped. A value that does not parse counts as a mismatch.
pub fn parse_typesize_data(content: &str) -> Vec<LayoutMismatch> {
    let mut mismatches = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((name, value)) = line.split_once('|') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();

        let Some(&(_, expected)) = TYPESIZE_ENTRIES.iter().find(|(n, _)| *n == name) else {
            continue;
        };

        if value.parse::<usize>().ok() != Some(expected) {
            mismatches.push(LayoutMismatch {
                name: name.to_string(),
                stored: value.to_string(),
                expected,
            });
        }
    }

    mismatches
}

/// Check the stamp in `fifo_dir` against the compiled layout
///
/// Only a missing stamp is tolerated, with a warning: older installations
/// do not write one and the attach still checks the table version. Bytes
/// that are not UTF-8 are replaced, so a damaged line counts as a mismatch
/// when it names a known entry. Any other read failure is returned.
pub fn check_typesize_data(fifo_dir: &Path) -> io::Result<Vec<LayoutMismatch>> {
    let path = fifo_dir.join(TYPESIZE_DATA_FILE);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("No type-size stamp at {:?}, skipping layout check", path);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mismatches = parse_typesize_data(&String::from_utf8_lossy(&bytes));
    tracing::debug!(
        "Checked {:?}: {} mismatch(es)",
        path,
        mismatches.len()
    );
    Ok(mismatches)
}

/// Render the stamp for the compiled layout
pub fn render_typesize_data() -> String {
    TYPESIZE_ENTRIES
        .iter()
        .map(|(name, value)| format!("{}|{}\n", name, value))
        .collect()
}
