use std::process::Command;

/// First line of a command's stdout, `None` if it could not be run
fn probe(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    stdout.lines().next().map(|line| line.trim().to_string())
}

fn main() {
    let commit = probe("git", &["rev-parse", "--short", "HEAD"]);
    let date = probe("date", &["+%Y-%m-%d"]);
    // "rustc 1.92.0 (..." -> "1.92.0"
    let rustc = probe("rustc", &["--version"]).and_then(|line| {
        line.strip_prefix("rustc ")
            .and_then(|rest| rest.split_whitespace().next())
            .map(str::to_string)
    });

    for (key, value) in [
        ("FSA_VIEW_COMMIT_SHA", commit),
        ("FSA_VIEW_BUILD_DATE", date),
        ("FSA_VIEW_RUSTC_VERSION", rustc),
    ] {
        let value = value.unwrap_or_else(|| "unknown".to_string());
        println!("cargo:rustc-env={}={}", key, value);
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
}
