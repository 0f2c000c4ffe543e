//! Fixture writer for FSA tables
//!
//! Production code only ever reads the FSA. Tests and benchmarks need real
//! table images on disk, so this module writes them in the same layout the
//! attach decodes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::FIFO_DIR;
use crate::fsa::attach::{table_file, FSA_ID_FILE};
use crate::fsa::layout::{
    render_typesize_data, AFD_WORD_OFFSET, FSA_VERSION, HOST_ALIAS_SIZE, HOST_DSP_NAME_SIZE,
    HOST_RECORD_SIZE, MAX_NO_PARALLEL_JOBS, MAX_REAL_HOSTNAME_LENGTH, TYPESIZE_DATA_FILE,
    VERSION_OFFSET,
};
use crate::fsa::{connect, HostStatus, JobStatus};

/// Host with `slots` disconnected job slots
pub fn sample_host(alias: &str, slots: usize) -> HostStatus {
    let mut host = HostStatus::new(alias);
    host.job_status = vec![
        JobStatus {
            connect_status: connect::DISCONNECT,
            ..Default::default()
        };
        slots
    ];
    host
}

/// Encode `hosts` as a table image of the compiled version
pub fn encode_table(hosts: &[HostStatus]) -> Vec<u8> {
    encode_table_with_version(hosts, FSA_VERSION)
}

/// Encode `hosts` with an arbitrary version byte in the header
pub fn encode_table_with_version(hosts: &[HostStatus], version: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(AFD_WORD_OFFSET + hosts.len() * HOST_RECORD_SIZE);

    let mut header = [0u8; AFD_WORD_OFFSET];
    header[..4].copy_from_slice(&(hosts.len() as i32).to_le_bytes());
    header[VERSION_OFFSET] = version;
    header[8..12].copy_from_slice(&4096u32.to_le_bytes());
    buf.extend_from_slice(&header);

    for host in hosts {
        encode_host(&mut buf, host);
    }
    buf
}

fn encode_host(buf: &mut Vec<u8>, host: &HostStatus) {
    write_name(buf, &host.host_alias, HOST_ALIAS_SIZE);
    write_name(buf, &host.real_hostname[0], MAX_REAL_HOSTNAME_LENGTH);
    write_name(buf, &host.real_hostname[1], MAX_REAL_HOSTNAME_LENGTH);
    write_name(buf, &host.host_dsp_name, HOST_DSP_NAME_SIZE);
    buf.extend_from_slice(&host.protocol.to_le_bytes());
    buf.push(host.debug);
    buf.extend_from_slice(&host.host_status.to_le_bytes());
    buf.extend_from_slice(&host.special_flag.to_le_bytes());
    buf.extend_from_slice(&host.error_counter.to_le_bytes());
    buf.extend_from_slice(&host.total_file_counter.to_le_bytes());
    buf.extend_from_slice(&host.total_file_size.to_le_bytes());
    buf.extend_from_slice(&host.active_transfers.to_le_bytes());

    let allowed = host.job_status.len().min(MAX_NO_PARALLEL_JOBS);
    buf.extend_from_slice(&(allowed as i32).to_le_bytes());

    let unused = JobStatus::default();
    for slot in 0..MAX_NO_PARALLEL_JOBS {
        let job = host.job_status.get(slot).unwrap_or(&unused);
        buf.push(job.connect_status);
        buf.extend_from_slice(&job.no_of_files.to_le_bytes());
        buf.extend_from_slice(&job.no_of_files_done.to_le_bytes());
    }
}

/// Write a NUL padded name, cut to leave room for the terminator
fn write_name(buf: &mut Vec<u8>, name: &str, size: usize) {
    let bytes = name.as_bytes();
    let len = bytes.len().min(size - 1);
    buf.extend_from_slice(&bytes[..len]);
    buf.resize(buf.len() + size - len, 0);
}

/// Populate `work_dir` the way a running daemon would
///
/// Creates the fifo directory, the id file, the table and a matching
/// type-size stamp. Returns the fifo directory.
pub fn write_work_dir(work_dir: &Path, hosts: &[HostStatus]) -> io::Result<PathBuf> {
    write_work_dir_with_id(work_dir, hosts, 1)
}

pub fn write_work_dir_with_id(
    work_dir: &Path,
    hosts: &[HostStatus],
    id: i32,
) -> io::Result<PathBuf> {
    let fifo_dir = work_dir.join(FIFO_DIR);
    fs::create_dir_all(&fifo_dir)?;
    fs::write(fifo_dir.join(FSA_ID_FILE), format!("{}\n", id))?;
    fs::write(table_file(&fifo_dir, id), encode_table(hosts))?;
    fs::write(fifo_dir.join(TYPESIZE_DATA_FILE), render_typesize_data())?;
    Ok(fifo_dir)
}
