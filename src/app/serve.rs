//! `runlocal -serve`: listen for commands on this desktop.

use runlocal::build_info::startup_metadata_line;
use runlocal::channel::X11Channel;
use runlocal::config::Config;
use runlocal::error::RunlocalError;
use runlocal::launch::ProcessLauncher;
use runlocal::server::Server;
use tokio::runtime::Handle;
use tracing::{error, info};

use super::entry::EXIT_FATAL;

/// Run the dispatch loop until the display connection fails.
///
/// The loop blocks on registry events, so it lives on a blocking thread;
/// launched children are drained on the async runtime.
pub(super) async fn run_serve_mode(config: Config) -> i32 {
    info!(build = %startup_metadata_line(), "starting server");
    let runtime = Handle::current();
    let result = tokio::task::spawn_blocking(move || -> Result<(), RunlocalError> {
        let channel = X11Channel::connect(None)?;
        let server = Server::start(channel, ProcessLauncher::new(runtime), &config)?;
        server.run()?;
        Ok(())
    })
    .await;

    match result {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            error!("server stopped: {e}");
            EXIT_FATAL
        }
        Err(e) => {
            error!("server loop aborted: {e}");
            EXIT_FATAL
        }
    }
}
