//! Host status export
//!
//! Checks the layout stamp, attaches to the FSA, resolves the selected host
//! range and renders it as one JSON array.
//!
//! Usage: fsa_view_json [-w <working directory>] [hostname|position]

use std::io::Write;
use std::ops::Range;

use crate::config::ViewerConfig;
use crate::error::ViewError;
use crate::fsa::layout::TYPESIZE_DATA_FILE;
use crate::fsa::{attach_passive, check_typesize_data, TableHandle};
use crate::output::{render_document, write_document, HostRecord};

/// Tag for log lines of the attach
const CALLER: &str = "fsa_view_json";

/// Which hosts to export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSelector {
    All,
    /// Alias, already cut to the stored alias length
    Name(String),
    /// Zero-based position in the table
    Position(usize),
}

/// Map a selector onto a half-open range of table positions
pub fn resolve_range(selector: &HostSelector, table: &TableHandle) -> Result<Range<usize>, ViewError> {
    let host_count = table.host_count();
    match selector {
        HostSelector::All => Ok(0..host_count),
        HostSelector::Position(position) => {
            if *position >= host_count {
                return Err(ViewError::OutOfRange {
                    position: *position,
                    host_count,
                });
            }
            Ok(*position..*position + 1)
        }
        HostSelector::Name(name) => table
            .position_of(name)
            .map(|position| position..position + 1)
            .ok_or_else(|| ViewError::HostNotFound(name.clone())),
    }
}

/// Build the records for `range`
///
/// Positions outside the table are skipped; callers pass a range from
/// [`resolve_range`].
pub fn export_records(table: &TableHandle, range: Range<usize>) -> Vec<HostRecord> {
    range
        .filter_map(|ord| table.host(ord).map(|host| HostRecord::from_status(ord, host)))
        .collect()
}

/// Render the JSON document for `range`
pub fn export(table: &TableHandle, range: Range<usize>) -> Result<String, ViewError> {
    let records = export_records(table, range);
    render_document(&records).map_err(|e| ViewError::Output(e.into()))
}

/// Run the viewer and write the document to `out`
///
/// Nothing is written unless every step up to rendering succeeded.
pub fn run_view<W: Write>(config: &ViewerConfig, out: &mut W) -> Result<(), ViewError> {
    let fifo_dir = config.fifo_dir();

    let mismatches =
        check_typesize_data(&fifo_dir).map_err(|source| ViewError::UnreadableStamp {
            path: fifo_dir.join(TYPESIZE_DATA_FILE),
            source,
        })?;
    if !mismatches.is_empty() {
        return Err(ViewError::IncompatibleLayout(mismatches));
    }

    let table = attach_passive(&fifo_dir, CALLER)?;
    let range = resolve_range(&config.selector, &table)?;
    tracing::debug!(
        "Exporting hosts {}..{} of {} ({:?})",
        range.start,
        range.end,
        table.host_count(),
        config.view_mode
    );

    let doc = export(&table, range)?;
    write_document(out, &doc)?;
    Ok(())
}
