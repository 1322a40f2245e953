//! runlocal: run a command typed in an SSH session on the local desktop.
//!
//! A long-lived server on the desktop owns one X11 window and advertises it
//! through a well-known window property. The client, run inside the remote
//! shell over a forwarded display, probes every top-level window for that
//! property and writes its command into each window that carries it. The
//! server turns `file:` arguments into `sftp://<host>` URIs and launches the
//! program locally.
//!
//! # Quick start
//!
//! ```no_run
//! use runlocal::channel::X11Channel;
//! use runlocal::client::Client;
//! use runlocal::config::load_config;
//! use runlocal::protocol::CommandRequest;
//! use runlocal::rewrite::fixup_args;
//!
//! let config = load_config().unwrap();
//! let tokens = fixup_args(&["gedit".to_string(), "notes.txt".to_string()]);
//! let request = CommandRequest::from_tokens(tokens).unwrap();
//! let client = Client::new(X11Channel::connect(None).unwrap(), &config.channel).unwrap();
//! client.send(&request).unwrap();
//! ```

pub mod build_info;
pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod hosts;
pub mod launch;
pub mod protocol;
pub mod rewrite;
pub mod server;
#[cfg(test)]
pub mod testsupport;
