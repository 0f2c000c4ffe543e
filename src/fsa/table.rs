//! Read-only handle over an attached FSA snapshot

use crate::fsa::layout::MAX_HOSTNAME_LENGTH;
use crate::fsa::HostStatus;

/// Snapshot of the FSA taken at attach time
///
/// The host count is fixed for the lifetime of the handle. Valid positions
/// are `0..host_count()`.
#[derive(Debug, Clone, Default)]
pub struct TableHandle {
    hosts: Vec<HostStatus>,
}

impl TableHandle {
    pub fn from_hosts(hosts: Vec<HostStatus>) -> Self {
        TableHandle { hosts }
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn host(&self, position: usize) -> Option<&HostStatus> {
        self.hosts.get(position)
    }

    pub fn hosts(&self) -> &[HostStatus] {
        &self.hosts
    }

    /// Position of the first host whose alias equals `alias`
    ///
    /// Linear scan in table order. Aliases are unique in a well formed
    /// table but that is not checked here.
    pub fn position_of(&self, alias: &str) -> Option<usize> {
        self.hosts.iter().position(|host| host.host_alias == alias)
    }
}

/// Cut a hostname down to the longest alias the FSA can store
///
/// Truncation happens on a character boundary so the result stays valid
/// UTF-8 and may be shorter than [`MAX_HOSTNAME_LENGTH`] bytes.
pub fn truncate_hostname(name: &str) -> &str {
    if name.len() <= MAX_HOSTNAME_LENGTH {
        return name;
    }
    let mut end = MAX_HOSTNAME_LENGTH;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
