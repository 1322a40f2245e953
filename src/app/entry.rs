//! Application entry orchestration for the runlocal CLI.

use runlocal::config::load_config;
use tracing::{debug, error, info};

use super::send::run_send_mode;
use super::serve::run_serve_mode;
use crate::cli::Args;

/// Exit status for fatal configuration or registry failures.
pub(crate) const EXIT_FATAL: i32 = 1;

/// Where the client is running, judged from `SSH_CONNECTION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionContext {
    /// Inside an SSH session; commands are forwarded to the desktop.
    Remote { connection: String },
    /// Directly on the desktop.
    Local,
}

pub(crate) fn session_context<F>(env_lookup: F) -> SessionContext
where
    F: Fn(&str) -> Option<String>,
{
    match env_lookup("SSH_CONNECTION") {
        Some(connection) if !connection.trim().is_empty() => SessionContext::Remote { connection },
        _ => SessionContext::Local,
    }
}

/// Run the selected role and return the process exit status.
pub(crate) async fn run(args: Args) -> i32 {
    if !args.serve {
        match session_context(|name| std::env::var(name).ok()) {
            SessionContext::Remote { connection } => debug!(connection = %connection, "ssh session"),
            SessionContext::Local => {
                refuse_local_execution();
                return EXIT_FATAL;
            }
        }
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return EXIT_FATAL;
        }
    };

    if args.serve {
        run_serve_mode(config).await
    } else {
        run_send_mode(config, args.command).await
    }
}

/// Running the program directly on this machine is not implemented, so a
/// client outside an SSH session stops instead of guessing.
fn refuse_local_execution() {
    let invoked_as = std::env::args().next().unwrap_or_default();
    let actual = std::fs::read_link("/proc/self/exe")
        .map(|path| path.display().to_string())
        .unwrap_or_else(|e| format!("unknown ({e})"));
    info!(invoked_as = %invoked_as, actual = %actual, "not inside an SSH session");
    error!("not yet implemented: would have run locally");
}
