//! Version and build information
//!
//! Backs the `--version` flag. Build metadata is injected by `build.rs`.

/// Full version line
///
/// Returns format: "fsa_view_json {version} ({commit} {date}) rustc {rustc_version}"
pub fn version() -> String {
    format!(
        "fsa_view_json {} ({} {}) rustc {}",
        package_version(),
        build_commit(),
        build_date(),
        rustc_version()
    )
}

/// Get the package version (e.g., "1.4.0")
pub fn package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns "unknown" if not built from a git checkout
pub fn build_commit() -> &'static str {
    option_env!("FSA_VIEW_COMMIT_SHA").unwrap_or("unknown")
}

pub fn build_date() -> &'static str {
    option_env!("FSA_VIEW_BUILD_DATE").unwrap_or("unknown")
}

pub fn rustc_version() -> &'static str {
    option_env!("FSA_VIEW_RUSTC_VERSION").unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_line_starts_with_binary_name() {
        let line = version();
        assert!(line.starts_with("fsa_view_json "), "got: {}", line);
        assert!(line.contains(package_version()));
        assert!(line.contains("rustc "));
    }
}
