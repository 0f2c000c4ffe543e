//! Passive attach to the FSA
//!
//! The daemon keeps the current table id in `fsa.id` and the table itself in
//! `fsa.stat.<id>`, both inside the fifo directory. A passive attach reads
//! the table once, validates its header and decodes every host record field
//! by field. The daemon's files are never written.
//!
//! Header and record layout are described in [`crate::fsa::layout`].

use std::fs;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::fsa::layout::{
    AFD_WORD_OFFSET, FSA_VERSION, HOST_ALIAS_SIZE, HOST_DSP_NAME_SIZE, HOST_RECORD_SIZE,
    MAX_NO_PARALLEL_JOBS, MAX_REAL_HOSTNAME_LENGTH, VERSION_OFFSET,
};
use crate::fsa::{HostStatus, JobStatus, TableHandle};

/// File holding the id of the current table
pub const FSA_ID_FILE: &str = "fsa.id";
/// Prefix of the table file, followed by the id
pub const FSA_STAT_FILE_PREFIX: &str = "fsa.stat.";

/// Reasons a passive attach can fail
#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    /// Table was written by a daemon with a different table version
    #[error("incorrect version (table has {found}, expected {expected})")]
    IncorrectVersion { found: u8, expected: u8 },

    /// Host count is negative while the daemon rebuilds the table
    #[error("table is stale (host count {0})")]
    Stale(i32),

    /// Table is shorter than its header claims
    #[error("table truncated: {len} bytes, need {needed}")]
    Truncated { len: usize, needed: usize },

    /// `fsa.id` does not hold a table id
    #[error("invalid table id in {path:?}: {content:?}")]
    BadId { path: PathBuf, content: String },

    /// Operating system refused access to a table file
    #[error("{source} ({path:?})")]
    Os {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Path of the table file for `id`
pub fn table_file(fifo_dir: &Path, id: i32) -> PathBuf {
    fifo_dir.join(format!("{}{}", FSA_STAT_FILE_PREFIX, id))
}

/// Read the current table id
pub fn read_fsa_id(fifo_dir: &Path) -> Result<i32, AttachError> {
    let path = fifo_dir.join(FSA_ID_FILE);
    let content = fs::read_to_string(&path).map_err(|source| AttachError::Os {
        path: path.clone(),
        source,
    })?;

    content
        .trim()
        .parse::<i32>()
        .map_err(|_| AttachError::BadId {
            path,
            content: content.trim().to_string(),
        })
}

/// Attach read-only to the FSA in `fifo_dir`
///
/// `caller` only tags the log lines.
pub fn attach_passive(fifo_dir: &Path, caller: &str) -> Result<TableHandle, AttachError> {
    let id = read_fsa_id(fifo_dir)?;
    let path = table_file(fifo_dir, id);
    tracing::debug!("{}: attaching passive to {:?}", caller, path);

    let bytes = fs::read(&path).map_err(|source| AttachError::Os {
        path: path.clone(),
        source,
    })?;

    let table = decode_table(&bytes)?;
    tracing::debug!("{}: attached, {} host(s)", caller, table.host_count());
    Ok(table)
}

/// Decode a complete table image
pub fn decode_table(bytes: &[u8]) -> Result<TableHandle, AttachError> {
    if bytes.len() < AFD_WORD_OFFSET {
        return Err(AttachError::Truncated {
            len: bytes.len(),
            needed: AFD_WORD_OFFSET,
        });
    }

    let version = bytes[VERSION_OFFSET];
    if version != FSA_VERSION {
        return Err(AttachError::IncorrectVersion {
            found: version,
            expected: FSA_VERSION,
        });
    }

    let mut header = Cursor::new(bytes);
    let no_of_hosts = header
        .read_i32::<LittleEndian>()
        .map_err(|_| truncated(bytes.len(), AFD_WORD_OFFSET))?;
    if no_of_hosts < 0 {
        return Err(AttachError::Stale(no_of_hosts));
    }

    let no_of_hosts = no_of_hosts as usize;
    let needed = AFD_WORD_OFFSET + no_of_hosts * HOST_RECORD_SIZE;
    if bytes.len() < needed {
        return Err(truncated(bytes.len(), needed));
    }

    let hosts = bytes[AFD_WORD_OFFSET..needed]
        .chunks_exact(HOST_RECORD_SIZE)
        .enumerate()
        .map(|(position, record)| {
            decode_host(record, position).map_err(|_| truncated(bytes.len(), needed))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TableHandle::from_hosts(hosts))
}

fn truncated(len: usize, needed: usize) -> AttachError {
    AttachError::Truncated { len, needed }
}

fn decode_host(record: &[u8], position: usize) -> io::Result<HostStatus> {
    let mut cursor = Cursor::new(record);

    let host_alias = read_name(&mut cursor, HOST_ALIAS_SIZE)?;
    let real_hostname = [
        read_name(&mut cursor, MAX_REAL_HOSTNAME_LENGTH)?,
        read_name(&mut cursor, MAX_REAL_HOSTNAME_LENGTH)?,
    ];
    let host_dsp_name = read_name(&mut cursor, HOST_DSP_NAME_SIZE)?;
    let protocol = cursor.read_u32::<LittleEndian>()?;
    let debug = cursor.read_u8()?;
    let host_status = cursor.read_u32::<LittleEndian>()?;
    let special_flag = cursor.read_u32::<LittleEndian>()?;
    let error_counter = cursor.read_i32::<LittleEndian>()?;
    let total_file_counter = cursor.read_i32::<LittleEndian>()?;
    let total_file_size = cursor.read_i64::<LittleEndian>()?;
    let active_transfers = cursor.read_i32::<LittleEndian>()?;
    let allowed_transfers = cursor.read_i32::<LittleEndian>()?;

    let mut slots = Vec::with_capacity(MAX_NO_PARALLEL_JOBS);
    for _ in 0..MAX_NO_PARALLEL_JOBS {
        slots.push(JobStatus {
            connect_status: cursor.read_u8()?,
            no_of_files: cursor.read_i32::<LittleEndian>()?,
            no_of_files_done: cursor.read_i32::<LittleEndian>()?,
        });
    }

    let allowed = clamp_allowed_transfers(allowed_transfers);
    if allowed as i64 != allowed_transfers as i64 {
        tracing::warn!(
            "Host {} ({}) has allowed_transfers {}, using {}",
            position,
            host_alias,
            allowed_transfers,
            allowed
        );
    }
    slots.truncate(allowed);

    Ok(HostStatus {
        host_alias,
        real_hostname,
        host_dsp_name,
        protocol,
        debug,
        host_status,
        special_flag,
        error_counter,
        total_file_counter,
        total_file_size,
        active_transfers,
        job_status: slots,
    })
}

/// Keep a stored slot count inside `0..=MAX_NO_PARALLEL_JOBS`
fn clamp_allowed_transfers(raw: i32) -> usize {
    raw.clamp(0, MAX_NO_PARALLEL_JOBS as i32) as usize
}

/// Read a NUL padded name field of `size` bytes
fn read_name(cursor: &mut Cursor<&[u8]>, size: usize) -> io::Result<String> {
    let mut buf = vec![0u8; size];
    cursor.read_exact(&mut buf)?;
    let end = buf.iter().position(|&b| b == 0).unwrap_or(size);
    Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsa::layout::ALLOWED_TRANSFERS_OFFSET;
    use crate::fsa::test_helpers::{encode_table, encode_table_with_version, sample_host};
    use crate::fsa::{connect, protocol};
    use tempfile::TempDir;

    #[test]
    fn test_decode_reads_every_field() {
        let mut host = sample_host("srv1", 2);
        host.real_hostname = ["srv1.example.org".into(), "srv1-backup".into()];
        host.host_dsp_name = "srv1*".into();
        host.protocol = protocol::SFTP_FLAG | protocol::SEND_FLAG;
        host.debug = 2;
        host.host_status = 0x0102;
        host.special_flag = 0x40;
        host.error_counter = 3;
        host.total_file_counter = 42;
        host.total_file_size = 5_000_000_000;
        host.active_transfers = 1;
        host.job_status[1].connect_status = connect::SFTP_ACTIVE;
        host.job_status[1].no_of_files = 7;
        host.job_status[1].no_of_files_done = 2;

        let table = decode_table(&encode_table(&[host.clone()])).unwrap();
        assert_eq!(table.host_count(), 1);
        assert_eq!(table.host(0), Some(&host));
    }

    #[test]
    fn test_decode_empty_table() {
        let table = decode_table(&encode_table(&[])).unwrap();
        assert_eq!(table.host_count(), 0);
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let bytes = encode_table_with_version(&[sample_host("srv1", 1)], FSA_VERSION + 1);
        match decode_table(&bytes) {
            Err(AttachError::IncorrectVersion { found, expected }) => {
                assert_eq!(found, FSA_VERSION + 1);
                assert_eq!(expected, FSA_VERSION);
            }
            other => panic!("expected IncorrectVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_table_is_rejected() {
        let bytes = encode_table(&[sample_host("a", 1), sample_host("b", 1)]);
        let cut = &bytes[..bytes.len() - 1];
        assert!(matches!(
            decode_table(cut),
            Err(AttachError::Truncated { .. })
        ));
        assert!(matches!(
            decode_table(&bytes[..4]),
            Err(AttachError::Truncated { .. })
        ));
    }

    #[test]
    fn test_negative_host_count_is_stale() {
        let mut bytes = encode_table(&[]);
        bytes[..4].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(decode_table(&bytes), Err(AttachError::Stale(-1))));
    }

    #[test]
    fn test_allowed_transfers_is_clamped() {
        let mut bytes = encode_table(&[sample_host("a", 2), sample_host("b", 2)]);
        let first = AFD_WORD_OFFSET + ALLOWED_TRANSFERS_OFFSET;
        let second = first + HOST_RECORD_SIZE;
        bytes[first..first + 4].copy_from_slice(&99i32.to_le_bytes());
        bytes[second..second + 4].copy_from_slice(&(-3i32).to_le_bytes());

        let table = decode_table(&bytes).unwrap();
        assert_eq!(table.host(0).unwrap().allowed_transfers(), MAX_NO_PARALLEL_JOBS);
        assert_eq!(table.host(1).unwrap().allowed_transfers(), 0);
    }

    #[test]
    fn test_attach_passive_follows_fsa_id() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(FSA_ID_FILE), "17\n").unwrap();
        fs::write(table_file(dir.path(), 17), encode_table(&[sample_host("srv1", 1)])).unwrap();

        let table = attach_passive(dir.path(), "test").unwrap();
        assert_eq!(table.position_of("srv1"), Some(0));
    }

    #[test]
    fn test_attach_passive_without_table_is_os_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            attach_passive(dir.path(), "test"),
            Err(AttachError::Os { .. })
        ));

        fs::write(dir.path().join(FSA_ID_FILE), "3").unwrap();
        match attach_passive(dir.path(), "test") {
            Err(AttachError::Os { path, source }) => {
                assert_eq!(path, table_file(dir.path(), 3));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Os error, got {:?}", other),
        }
    }

    #[test]
    fn test_attach_passive_bad_id() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(FSA_ID_FILE), "not-a-number").unwrap();
        assert!(matches!(
            attach_passive(dir.path(), "test"),
            Err(AttachError::BadId { .. })
        ));
    }
}
