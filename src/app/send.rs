//! `runlocal program [args...]`: hand a command to the desktop server.

use runlocal::channel::X11Channel;
use runlocal::client::{Client, SendReport};
use runlocal::config::Config;
use runlocal::error::RunlocalError;
use runlocal::protocol::CommandRequest;
use runlocal::rewrite::fixup_args;
use tracing::error;

use super::entry::EXIT_FATAL;
use crate::cli::EXIT_USAGE;

/// Send one command. Finding no server still exits 0.
pub(super) async fn run_send_mode(config: Config, command: Vec<String>) -> i32 {
    let result = tokio::task::spawn_blocking(move || -> Result<SendReport, RunlocalError> {
        let request = CommandRequest::from_tokens(fixup_args(&command))?;
        let channel = X11Channel::connect(None)?;
        let client = Client::new(channel, &config.channel)?;
        client.send(&request)
    })
    .await;

    match result {
        Ok(Ok(_)) => 0,
        Ok(Err(RunlocalError::Protocol(e))) => {
            error!("cannot send command: {e}");
            EXIT_USAGE
        }
        Ok(Err(e)) => {
            error!("{e}");
            EXIT_FATAL
        }
        Err(e) => {
            error!("client aborted: {e}");
            EXIT_FATAL
        }
    }
}
