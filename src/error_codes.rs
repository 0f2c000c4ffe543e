//! Diagnostic error codes
//!
//! Error codes follow the pattern: FSV-{CATEGORY}-{3-digit number}
//!
//! Categories (1-3 uppercase letters):
//! - USE: Command line and working directory errors
//! - LAY: Layout stamp mismatches
//! - ATT: Attach failures
//! - SEL: Host selection errors (position, hostname)
//! - IO: Output errors
//!
//! Each error code is stable and should not be reused.
//!
//! | Code | Description | Remediation |
//! |------|-------------|-------------|
//! | FSV-USE-001 | Malformed command line | See `fsa_view_json --help` |
//! | FSV-USE-002 | Working directory unusable | Pass `-w` or set `AFD_WORK_DIR` |
//! | FSV-LAY-001 | Layout mismatch | Initialize database with `afd -i` |
//! | FSV-LAY-002 | Layout stamp unreadable | Check permissions of `typesize_data` or re-run `afd -i` |
//! | FSV-ATT-001 | Incorrect FSA version | Use a binary built for the running AFD |
//! | FSV-ATT-002 | Attach failed | Check that AFD is running; retry after a table rebuild |
//! | FSV-ATT-003 | OS error | Check permissions of the fifo directory |
//! | FSV-SEL-001 | Position out of range | Positions start at 0 |
//! | FSV-SEL-002 | Host not found | Check the alias; aliases are cut to 8 bytes |
//! | FSV-IO-001 | Write failed | Check the consumer of stdout |

/// Malformed command line
pub const FSV_USE_001_USAGE: &str = "FSV-USE-001";

/// Working directory missing or not a directory
pub const FSV_USE_002_WORK_DIR: &str = "FSV-USE-002";

/// Compiled layout does not match the stored type-size stamp
pub const FSV_LAY_001_INCOMPATIBLE: &str = "FSV-LAY-001";

/// Layout stamp exists but cannot be read
pub const FSV_LAY_002_UNREADABLE: &str = "FSV-LAY-002";

/// Table written with a different FSA version
pub const FSV_ATT_001_INCORRECT_VERSION: &str = "FSV-ATT-001";

/// Table stale, truncated or id unreadable
pub const FSV_ATT_002_ATTACH_FAILED: &str = "FSV-ATT-002";

/// Operating system refused access to a table file
pub const FSV_ATT_003_OS_ERROR: &str = "FSV-ATT-003";

/// Position beyond the host count
pub const FSV_SEL_001_OUT_OF_RANGE: &str = "FSV-SEL-001";

/// No host with the requested alias
pub const FSV_SEL_002_HOST_NOT_FOUND: &str = "FSV-SEL-002";

/// Writing the JSON document failed
pub const FSV_IO_001_WRITE_FAILED: &str = "FSV-IO-001";

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CODES: &[&str] = &[
        FSV_USE_001_USAGE,
        FSV_USE_002_WORK_DIR,
        FSV_LAY_001_INCOMPATIBLE,
        FSV_LAY_002_UNREADABLE,
        FSV_ATT_001_INCORRECT_VERSION,
        FSV_ATT_002_ATTACH_FAILED,
        FSV_ATT_003_OS_ERROR,
        FSV_SEL_001_OUT_OF_RANGE,
        FSV_SEL_002_HOST_NOT_FOUND,
        FSV_IO_001_WRITE_FAILED,
    ];

    #[test]
    fn test_error_codes_are_unique() {
        let mut unique = std::collections::HashSet::new();
        for code in ALL_CODES {
            assert!(unique.insert(code), "Duplicate error code detected: {}", code);
        }
    }

    #[test]
    fn test_error_code_format() {
        for code in ALL_CODES {
            assert!(code.starts_with("FSV-"), "Error code must start with 'FSV-': {}", code);
            let parts: Vec<&str> = code.split('-').collect();
            assert_eq!(parts.len(), 3, "Error code must have 3 parts: {}", code);

            assert!(
                (1..=3).contains(&parts[1].len()),
                "Category must be 1-3 chars: {}",
                code
            );
            assert!(parts[1].chars().all(|c| c.is_ascii_uppercase()));

            assert_eq!(parts[2].len(), 3, "Number must be 3 digits: {}", code);
            assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
        }
    }
}
