//! Filetransfer status area (FSA)
//!
//! The FSA is owned and mutated by the AFD daemons. This module only reads
//! it: [`attach::attach_passive`] takes a one-shot snapshot of the table and
//! hands back a [`TableHandle`] holding decoded [`HostStatus`] records.
//!
//! Nothing here locks the table. A snapshot may mix values written before
//! and after a concurrent update by the daemon.

pub mod attach;
pub mod layout;
pub mod table;
pub mod test_helpers;

pub use attach::{attach_passive, AttachError};
pub use layout::{check_typesize_data, LayoutMismatch};
pub use table::{truncate_hostname, TableHandle};

/// Protocol capability bits of [`HostStatus::protocol`]
pub mod protocol {
    pub const FTP_FLAG: u32 = 1;
    pub const LOC_FLAG: u32 = 2;
    pub const SMTP_FLAG: u32 = 4;
    pub const MAP_FLAG: u32 = 8;
    pub const SCP_FLAG: u32 = 16;
    pub const WMO_FLAG: u32 = 32;
    pub const HTTP_FLAG: u32 = 64;
    pub const SFTP_FLAG: u32 = 128;
    pub const SEND_FLAG: u32 = 1 << 30;
    pub const RETRIEVE_FLAG: u32 = 1 << 31;
}

/// Bits of [`HostStatus::host_status`]
pub mod status {
    pub const STOP_TRANSFER_STAT: u32 = 1;
    pub const PAUSE_QUEUE_STAT: u32 = 2;
    pub const AUTO_PAUSE_QUEUE_STAT: u32 = 4;
    pub const DANGER_PAUSE_QUEUE_STAT: u32 = 8;
    pub const HOST_ERROR_OFFLINE_STATIC: u32 = 16;
    pub const DO_NOT_DELETE_DATA: u32 = 32;
    pub const HOST_CONFIG_HOST_DISABLED: u32 = 64;
    pub const HOST_ERROR_ACKNOWLEDGED: u32 = 128;
    pub const HOST_ERROR_OFFLINE: u32 = 256;
    pub const HOST_ERROR_ACKNOWLEDGED_T: u32 = 512;
    pub const HOST_ERROR_OFFLINE_T: u32 = 1024;
    pub const HOST_ACTION_SUCCESS: u32 = 2048;
    pub const ERROR_QUEUE_SET: u32 = 4096;
}

/// Bits of [`HostStatus::special_flag`]
pub mod special {
    pub const HOST_DISABLED: u32 = 32;
    pub const HOST_IN_DIR_CONFIG: u32 = 64;
}

/// Debug level of a host as stored in the FSA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    None,
    Debug,
    Trace,
    FullTrace,
}

impl DebugMode {
    /// Unknown raw levels fall back to [`DebugMode::None`]
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => DebugMode::Debug,
            2 => DebugMode::Trace,
            3 => DebugMode::FullTrace,
            _ => DebugMode::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DebugMode::None => "none",
            DebugMode::Debug => "debug",
            DebugMode::Trace => "trace",
            DebugMode::FullTrace => "full_trace",
        }
    }
}

/// Connection state of a single job slot
///
/// The SCP and WMO states only exist when the matching protocol support is
/// compiled in. Without it the raw value is not recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStatus {
    Disconnect,
    Connecting,
    NotWorking,
    FtpActive,
    FtpBurstActive,
    SftpActive,
    SftpBurstActive,
    LocActive,
    HttpActive,
    HttpRetrieveActive,
    SmtpActive,
    SmtpBurstActive,
    #[cfg(feature = "scp-support")]
    ScpActive,
    #[cfg(feature = "scp-support")]
    ScpBurstActive,
    #[cfg(feature = "wmo-support")]
    WmoActive,
    #[cfg(feature = "wmo-support")]
    WmoBurstActive,
    ClosingConnection,
}

/// Raw connect status values as written by the daemons
pub mod connect {
    pub const DISCONNECT: u8 = 0;
    pub const CONNECTING: u8 = 1;
    pub const NOT_WORKING: u8 = 2;
    pub const FTP_ACTIVE: u8 = 3;
    pub const FTP_BURST2_TRANSFER_ACTIVE: u8 = 4;
    pub const SFTP_ACTIVE: u8 = 5;
    pub const SFTP_BURST_TRANSFER_ACTIVE: u8 = 6;
    pub const LOC_ACTIVE: u8 = 7;
    pub const HTTP_ACTIVE: u8 = 8;
    pub const HTTP_RETRIEVE_ACTIVE: u8 = 9;
    pub const SMTP_ACTIVE: u8 = 10;
    pub const SMTP_BURST_TRANSFER_ACTIVE: u8 = 11;
    pub const SCP_ACTIVE: u8 = 12;
    pub const SCP_BURST_TRANSFER_ACTIVE: u8 = 13;
    pub const WMO_ACTIVE: u8 = 14;
    pub const WMO_BURST_TRANSFER_ACTIVE: u8 = 15;
    pub const CLOSING_CONNECTION: u8 = 16;
}

/// Label used for any connect status this build does not know
pub const UNKNOWN_CONNECT_STATUS: &str = "Unknown status";

impl ConnectStatus {
    pub fn from_raw(raw: u8) -> Option<Self> {
        let status = match raw {
            connect::DISCONNECT => ConnectStatus::Disconnect,
            connect::CONNECTING => ConnectStatus::Connecting,
            connect::NOT_WORKING => ConnectStatus::NotWorking,
            connect::FTP_ACTIVE => ConnectStatus::FtpActive,
            connect::FTP_BURST2_TRANSFER_ACTIVE => ConnectStatus::FtpBurstActive,
            connect::SFTP_ACTIVE => ConnectStatus::SftpActive,
            connect::SFTP_BURST_TRANSFER_ACTIVE => ConnectStatus::SftpBurstActive,
            connect::LOC_ACTIVE => ConnectStatus::LocActive,
            connect::HTTP_ACTIVE => ConnectStatus::HttpActive,
            connect::HTTP_RETRIEVE_ACTIVE => ConnectStatus::HttpRetrieveActive,
            connect::SMTP_ACTIVE => ConnectStatus::SmtpActive,
            connect::SMTP_BURST_TRANSFER_ACTIVE => ConnectStatus::SmtpBurstActive,
            #[cfg(feature = "scp-support")]
            connect::SCP_ACTIVE => ConnectStatus::ScpActive,
            #[cfg(feature = "scp-support")]
            connect::SCP_BURST_TRANSFER_ACTIVE => ConnectStatus::ScpBurstActive,
            #[cfg(feature = "wmo-support")]
            connect::WMO_ACTIVE => ConnectStatus::WmoActive,
            #[cfg(feature = "wmo-support")]
            connect::WMO_BURST_TRANSFER_ACTIVE => ConnectStatus::WmoBurstActive,
            connect::CLOSING_CONNECTION => ConnectStatus::ClosingConnection,
            _ => return None,
        };
        Some(status)
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectStatus::Disconnect => "DISCONNECT",
            ConnectStatus::Connecting => "CONNECTING",
            ConnectStatus::NotWorking => "NOT working",
            ConnectStatus::FtpActive => "FTP active",
            ConnectStatus::FtpBurstActive => "FTP burst active",
            // MAP_ACTIVE shares the slot with SFTP_ACTIVE
            #[cfg(feature = "map-support")]
            ConnectStatus::SftpActive => "SFTP/MAP",
            #[cfg(not(feature = "map-support"))]
            ConnectStatus::SftpActive => "SFTP active",
            ConnectStatus::SftpBurstActive => "SFTP burst active",
            ConnectStatus::LocActive => "LOC active",
            ConnectStatus::HttpActive => "HTTP active",
            ConnectStatus::HttpRetrieveActive => "HTTP retrieve active",
            ConnectStatus::SmtpActive => "SMTP active",
            ConnectStatus::SmtpBurstActive => "SMTP burst active",
            #[cfg(feature = "scp-support")]
            ConnectStatus::ScpActive => "SCP active",
            #[cfg(feature = "scp-support")]
            ConnectStatus::ScpBurstActive => "SCP burst active",
            #[cfg(feature = "wmo-support")]
            ConnectStatus::WmoActive => "WMO active",
            #[cfg(feature = "wmo-support")]
            ConnectStatus::WmoBurstActive => "WMO burst active",
            ConnectStatus::ClosingConnection => "Closing connection",
        }
    }

    /// Label for a raw value, [`UNKNOWN_CONNECT_STATUS`] if unrecognised
    pub fn label_for(raw: u8) -> &'static str {
        Self::from_raw(raw)
            .map(Self::label)
            .unwrap_or(UNKNOWN_CONNECT_STATUS)
    }
}

/// One transfer slot of a host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatus {
    pub connect_status: u8,
    pub no_of_files: i32,
    pub no_of_files_done: i32,
}

/// Status of one configured host
///
/// `job_status` holds exactly the allowed transfer slots of the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostStatus {
    pub host_alias: String,
    pub real_hostname: [String; 2],
    pub host_dsp_name: String,
    pub protocol: u32,
    pub debug: u8,
    pub host_status: u32,
    pub special_flag: u32,
    pub error_counter: i32,
    pub total_file_counter: i32,
    pub total_file_size: i64,
    pub active_transfers: i32,
    pub job_status: Vec<JobStatus>,
}

impl HostStatus {
    /// Host with the given alias and otherwise zeroed fields
    pub fn new(alias: impl Into<String>) -> Self {
        let alias = alias.into();
        HostStatus {
            host_dsp_name: alias.clone(),
            host_alias: alias,
            ..Default::default()
        }
    }

    pub fn allowed_transfers(&self) -> usize {
        self.job_status.len()
    }

    pub fn debug_mode(&self) -> DebugMode {
        DebugMode::from_raw(self.debug)
    }

    pub fn can_send(&self) -> bool {
        self.protocol & protocol::SEND_FLAG != 0
    }

    pub fn can_retrieve(&self) -> bool {
        self.protocol & protocol::RETRIEVE_FLAG != 0
    }

    pub fn in_dir_config(&self) -> bool {
        self.special_flag & special::HOST_IN_DIR_CONFIG != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_mode_unknown_levels_fall_back_to_none() {
        assert_eq!(DebugMode::from_raw(0).as_str(), "none");
        assert_eq!(DebugMode::from_raw(1).as_str(), "debug");
        assert_eq!(DebugMode::from_raw(2).as_str(), "trace");
        assert_eq!(DebugMode::from_raw(3).as_str(), "full_trace");
        for raw in 4..=u8::MAX {
            assert_eq!(DebugMode::from_raw(raw), DebugMode::None, "raw level {}", raw);
        }
    }

    #[test]
    fn test_connect_status_labels() {
        assert_eq!(ConnectStatus::label_for(connect::DISCONNECT), "DISCONNECT");
        assert_eq!(ConnectStatus::label_for(connect::CONNECTING), "CONNECTING");
        assert_eq!(ConnectStatus::label_for(connect::NOT_WORKING), "NOT working");
        assert_eq!(
            ConnectStatus::label_for(connect::HTTP_RETRIEVE_ACTIVE),
            "HTTP retrieve active"
        );
        assert_eq!(
            ConnectStatus::label_for(connect::CLOSING_CONNECTION),
            "Closing connection"
        );
        assert_eq!(ConnectStatus::label_for(200), UNKNOWN_CONNECT_STATUS);
    }

    #[cfg(feature = "scp-support")]
    #[test]
    fn test_scp_states_known_with_scp_support() {
        assert_eq!(ConnectStatus::label_for(connect::SCP_ACTIVE), "SCP active");
        assert_eq!(
            ConnectStatus::label_for(connect::SCP_BURST_TRANSFER_ACTIVE),
            "SCP burst active"
        );
    }

    #[cfg(not(feature = "wmo-support"))]
    #[test]
    fn test_wmo_states_unknown_without_wmo_support() {
        assert_eq!(ConnectStatus::label_for(connect::WMO_ACTIVE), UNKNOWN_CONNECT_STATUS);
    }

    #[test]
    fn test_direction_bits() {
        let mut host = HostStatus::new("srv1");
        assert!(!host.can_send() && !host.can_retrieve());

        host.protocol = protocol::FTP_FLAG | protocol::SEND_FLAG;
        assert!(host.can_send());
        assert!(!host.can_retrieve());

        host.protocol |= protocol::RETRIEVE_FLAG;
        assert!(host.can_retrieve());
    }

    #[test]
    fn test_new_host_uses_alias_as_display_name() {
        let host = HostStatus::new("srv1");
        assert_eq!(host.host_alias, "srv1");
        assert_eq!(host.host_dsp_name, "srv1");
        assert_eq!(host.allowed_transfers(), 0);
    }
}
