//! CLI argument parsing
//!
//! `fsa_view_json [--version] [-w <working directory>] [-a|-i] [hostname|position]`

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};

use crate::config::ViewMode;
use crate::error::ViewError;
use crate::fsa::truncate_hostname;
use crate::view_cmd::HostSelector;

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(CliArgs),
    /// Rendered help text for stdout
    ShowHelp(String),
    ShowVersion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub work_dir: Option<PathBuf>,
    pub view_mode: ViewMode,
    pub selector: HostSelector,
}

fn command() -> Command {
    Command::new("fsa_view_json")
        .about("Shows all information in the FSA about one or all hosts in JSON format")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("work_dir")
                .short('w')
                .value_name("WORKING_DIRECTORY")
                .help("AFD working directory (default: $AFD_WORK_DIR)")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("all")
                .short('a')
                .help("Control view (default)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .help("Info view")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("host")
                .value_name("HOSTNAME|POSITION")
                .help("Host alias or zero-based position; all hosts when omitted")
                .required(false),
        )
}

/// Parse the process arguments
pub fn parse_args() -> Result<Invocation, ViewError> {
    parse_args_from(std::env::args_os())
}

/// Parse an explicit argument list, program name first
pub fn parse_args_from<I, T>(args: I) -> Result<Invocation, ViewError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            return Ok(Invocation::ShowHelp(e.render().to_string()));
        }
        Err(e) => {
            let mut rendered = e.render().to_string();
            // Not every clap error carries the usage line
            if !rendered.contains("Usage:") {
                rendered.push('\n');
                rendered.push_str(&command().render_usage().to_string());
            }
            return Err(ViewError::Usage(rendered));
        }
    };

    if matches.get_flag("version") {
        return Ok(Invocation::ShowVersion);
    }

    // -i is checked last and wins when both are given
    let view_mode = if matches.get_flag("info") {
        ViewMode::Info
    } else {
        ViewMode::CtrlAll
    };

    let selector = matches
        .get_one::<String>("host")
        .map(|host| parse_selector(host))
        .unwrap_or(HostSelector::All);

    Ok(Invocation::Run(CliArgs {
        work_dir: matches.get_one::<PathBuf>("work_dir").cloned(),
        view_mode,
        selector,
    }))
}

/// Interpret the positional argument
///
/// All digits selects a position; a position too large for `usize` can
/// never be in range and saturates. Anything else is a hostname, cut to the
/// longest alias the FSA stores.
pub fn parse_selector(arg: &str) -> HostSelector {
    if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) {
        let position = arg.parse::<usize>().unwrap_or(usize::MAX);
        HostSelector::Position(position)
    } else {
        HostSelector::Name(truncate_hostname(arg).to_string())
    }
}
