//! JSON record types for the exported host status
//!
//! Field order of the structs is the emission order.

use serde::Serialize;

use crate::fsa::{special, status, ConnectStatus, HostStatus, JobStatus};

/// One host of the exported array
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRecord {
    pub ord: usize,
    pub alias: String,
    pub real1: String,
    pub real2: String,
    pub display: String,
    pub direction: String,
    pub debug_mode: &'static str,
    pub host_status: Vec<&'static str>,
    pub error_count: i32,
    pub file_count: i32,
    pub file_size: i64,
    pub transfers: i32,
    pub jobs: Vec<JobRecord>,
}

/// One transfer slot of a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRecord {
    pub job_num: usize,
    pub connect_status: &'static str,
    pub number_of_files: i32,
    pub number_of_files_done: i32,
}

/// How a tag in `host_status` is derived
#[derive(Debug, Clone, Copy)]
enum TagRule {
    /// Bit set in `host_status`
    Status(u32, &'static str),
    /// Bit set in `host_status`, reported only with the error queue compiled in
    ErrorQueue(u32, &'static str),
    /// Bit absent from `special_flag`
    SpecialAbsent(u32, &'static str),
    /// TRANSFER_ACTIVE or NORMAL_STATUS, exactly one of them
    Activity,
    /// Bit set in `special_flag`
    Special(u32, &'static str),
}

const HOST_STATUS_TAGS: &[TagRule] = &[
    TagRule::Status(status::PAUSE_QUEUE_STAT, "PAUSE_QUEUE"),
    TagRule::Status(status::AUTO_PAUSE_QUEUE_STAT, "AUTO_PAUSE_QUEUE"),
    TagRule::ErrorQueue(status::ERROR_QUEUE_SET, "ERROR_QUEUE_SET"),
    TagRule::Status(status::STOP_TRANSFER_STAT, "STOP_TRANSFER"),
    TagRule::Status(status::HOST_CONFIG_HOST_DISABLED, "HOST_CONFIG_HOST_DISABLED"),
    TagRule::SpecialAbsent(special::HOST_IN_DIR_CONFIG, "HOST_NOT_IN_DIR_CONFIG"),
    TagRule::Status(status::DANGER_PAUSE_QUEUE_STAT, "DANGER_PAUSE_QUEUE_STAT"),
    TagRule::Status(status::HOST_ERROR_ACKNOWLEDGED, "HOST_ERROR_ACKNOWLEDGED"),
    TagRule::Status(status::HOST_ERROR_ACKNOWLEDGED_T, "HOST_ERROR_ACKNOWLEDGED_T"),
    TagRule::Status(status::HOST_ERROR_OFFLINE, "HOST_ERROR_OFFLINE"),
    TagRule::Status(status::HOST_ERROR_OFFLINE_T, "HOST_ERROR_OFFLINE_T"),
    TagRule::Status(status::HOST_ERROR_OFFLINE_STATIC, "HOST_ERROR_OFFLINE_STATIC"),
    TagRule::Status(status::DO_NOT_DELETE_DATA, "DO_NOT_DELETE_DATA"),
    TagRule::Status(status::HOST_ACTION_SUCCESS, "HOST_ACTION_SUCCESS"),
    TagRule::Activity,
    TagRule::Special(special::HOST_DISABLED, "HOST_DISABLED"),
    TagRule::Special(special::HOST_IN_DIR_CONFIG, "HOST_IN_DIR_CONFIG"),
];

/// Status tags of a host in fixed order
pub fn host_status_tags(host: &HostStatus) -> Vec<&'static str> {
    HOST_STATUS_TAGS
        .iter()
        .filter_map(|rule| match *rule {
            TagRule::Status(bit, tag) => (host.host_status & bit != 0).then_some(tag),
            TagRule::ErrorQueue(bit, tag) => {
                (cfg!(feature = "error-queue") && host.host_status & bit != 0).then_some(tag)
            }
            TagRule::SpecialAbsent(bit, tag) => (host.special_flag & bit == 0).then_some(tag),
            TagRule::Activity => Some(if host.active_transfers > 0 {
                "TRANSFER_ACTIVE"
            } else {
                "NORMAL_STATUS"
            }),
            TagRule::Special(bit, tag) => (host.special_flag & bit != 0).then_some(tag),
        })
        .collect()
}

/// "S" for send, "R" for retrieve, both or neither
pub fn direction(host: &HostStatus) -> String {
    let mut direction = String::with_capacity(2);
    if host.can_send() {
        direction.push('S');
    }
    if host.can_retrieve() {
        direction.push('R');
    }
    direction
}

impl HostRecord {
    pub fn from_status(ord: usize, host: &HostStatus) -> Self {
        HostRecord {
            ord,
            alias: host.host_alias.clone(),
            real1: host.real_hostname[0].clone(),
            real2: host.real_hostname[1].clone(),
            display: host.host_dsp_name.clone(),
            direction: direction(host),
            debug_mode: host.debug_mode().as_str(),
            host_status: host_status_tags(host),
            error_count: host.error_counter,
            file_count: host.total_file_counter,
            file_size: host.total_file_size,
            transfers: host.active_transfers,
            jobs: host
                .job_status
                .iter()
                .enumerate()
                .map(|(job_num, job)| JobRecord::from_status(job_num, job))
                .collect(),
        }
    }
}

impl JobRecord {
    pub fn from_status(job_num: usize, job: &JobStatus) -> Self {
        JobRecord {
            job_num,
            connect_status: ConnectStatus::label_for(job.connect_status),
            number_of_files: job.no_of_files,
            number_of_files_done: job.no_of_files_done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsa::test_helpers::sample_host;
    use crate::fsa::{connect, protocol};

    #[test]
    fn test_direction_combinations() {
        let mut host = sample_host("srv1", 0);
        assert_eq!(direction(&host), "");
        host.protocol = protocol::SEND_FLAG;
        assert_eq!(direction(&host), "S");
        host.protocol = protocol::RETRIEVE_FLAG | protocol::HTTP_FLAG;
        assert_eq!(direction(&host), "R");
        host.protocol = protocol::SEND_FLAG | protocol::RETRIEVE_FLAG;
        assert_eq!(direction(&host), "SR");
    }

    #[test]
    fn test_idle_host_outside_dir_config() {
        let host = sample_host("srv1", 1);
        assert_eq!(
            host_status_tags(&host),
            vec!["HOST_NOT_IN_DIR_CONFIG", "NORMAL_STATUS"]
        );
    }

    #[test]
    fn test_tags_follow_table_order() {
        let mut host = sample_host("srv1", 1);
        host.host_status = status::STOP_TRANSFER_STAT
            | status::PAUSE_QUEUE_STAT
            | status::HOST_ERROR_OFFLINE
            | status::HOST_ERROR_ACKNOWLEDGED;
        host.special_flag = special::HOST_IN_DIR_CONFIG | special::HOST_DISABLED;
        host.active_transfers = 2;

        assert_eq!(
            host_status_tags(&host),
            vec![
                "PAUSE_QUEUE",
                "STOP_TRANSFER",
                "HOST_ERROR_ACKNOWLEDGED",
                "HOST_ERROR_OFFLINE",
                "TRANSFER_ACTIVE",
                "HOST_DISABLED",
                "HOST_IN_DIR_CONFIG",
            ]
        );
    }

    #[test]
    fn test_activity_tag_is_always_present_exactly_once() {
        let mut host = sample_host("srv1", 1);
        for active in [-1, 0, 1, 5] {
            host.active_transfers = active;
            let tags = host_status_tags(&host);
            let activity = tags
                .iter()
                .filter(|t| **t == "TRANSFER_ACTIVE" || **t == "NORMAL_STATUS")
                .count();
            assert_eq!(activity, 1, "active_transfers={}", active);
        }
    }

    #[cfg(feature = "error-queue")]
    #[test]
    fn test_error_queue_tag() {
        let mut host = sample_host("srv1", 1);
        host.host_status = status::ERROR_QUEUE_SET | status::AUTO_PAUSE_QUEUE_STAT;
        host.special_flag = special::HOST_IN_DIR_CONFIG;
        assert_eq!(
            host_status_tags(&host),
            vec![
                "AUTO_PAUSE_QUEUE",
                "ERROR_QUEUE_SET",
                "NORMAL_STATUS",
                "HOST_IN_DIR_CONFIG",
            ]
        );
    }

    #[test]
    fn test_record_for_send_only_host() {
        let mut host = sample_host("srv1", 1);
        host.protocol = protocol::FTP_FLAG | protocol::SEND_FLAG;
        host.job_status[0].connect_status = connect::DISCONNECT;
        host.job_status[0].no_of_files = 3;

        let record = HostRecord::from_status(0, &host);
        assert_eq!(record.ord, 0);
        assert_eq!(record.alias, "srv1");
        assert_eq!(record.direction, "S");
        assert_eq!(record.debug_mode, "none");
        assert_eq!(record.transfers, 0);
        assert_eq!(
            record.jobs,
            vec![JobRecord {
                job_num: 0,
                connect_status: "DISCONNECT",
                number_of_files: 3,
                number_of_files_done: 0,
            }]
        );
    }

    #[test]
    fn test_unknown_connect_status_label() {
        let mut host = sample_host("srv1", 2);
        host.job_status[1].connect_status = 250;
        let record = HostRecord::from_status(4, &host);
        assert_eq!(record.jobs[1].connect_status, "Unknown status");
        assert_eq!(record.jobs[1].job_num, 1);
    }

    #[test]
    fn test_serialized_field_order() {
        let record = HostRecord::from_status(0, &sample_host("srv1", 0));
        let json = serde_json::to_string(&record).unwrap();

        let keys = [
            "\"ord\"",
            "\"alias\"",
            "\"real1\"",
            "\"real2\"",
            "\"display\"",
            "\"direction\"",
            "\"debug_mode\"",
            "\"host_status\"",
            "\"error_count\"",
            "\"file_count\"",
            "\"file_size\"",
            "\"transfers\"",
            "\"jobs\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
        assert!(json.ends_with("\"jobs\":[]}"), "{}", json);
    }

    #[test]
    fn test_file_size_is_an_integer() {
        let mut host = sample_host("big", 0);
        host.total_file_size = i64::MAX;
        let value = serde_json::to_value(HostRecord::from_status(0, &host)).unwrap();
        assert_eq!(value["file_size"].as_i64(), Some(i64::MAX));
    }
}
