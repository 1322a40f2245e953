//! CLI argument parsing via clap.

use clap::Parser;
use runlocal::build_info::CLI_VERSION_TEXT;
use std::ffi::OsString;

/// Exit status clap uses for usage errors; reused for unsendable commands.
pub const EXIT_USAGE: i32 = 2;

/// Run a command from an SSH session on your local desktop.
#[derive(Debug, Parser)]
#[command(
    name = "runlocal",
    version = CLI_VERSION_TEXT,
    override_usage = "runlocal [-serve]\n       runlocal program [args...]"
)]
pub struct Args {
    /// Listen for commands (run this on the desktop).
    #[arg(long = "serve")]
    pub serve: bool,

    /// Program to run on the desktop, followed by its arguments.
    #[arg(
        value_name = "PROGRAM",
        required_unless_present = "serve",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Accept the single-dash `-serve` spelling in flag position.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(idx, arg)| {
            if idx == 1 && (arg == "-serve" || arg == "-serve=true") {
                OsString::from("--serve")
            } else {
                arg
            }
        })
        .collect()
}
