//! Host name resolution for remote-file URIs.
//!
//! Both configuration files are re-read on every lookup so edits take effect
//! without restarting the server. Missing or unparsable files degrade to a
//! best-effort answer instead of failing the command.

mod lines;
mod resolv;
mod ssh_config;

pub use lines::MAX_LINE_BYTES;
pub use resolv::shorten_host;
pub use ssh_config::parse_ssh_config;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, warn};

use crate::config::HostsConfig;

/// Maps an originating host to the alias the local SSH config knows it by.
#[derive(Debug)]
pub struct HostResolver {
    resolv_conf: PathBuf,
    ssh_config: Option<PathBuf>,
    line_limit: usize,
    warned_missing_ssh_config: AtomicBool,
}

impl HostResolver {
    pub fn new(resolv_conf: impl Into<PathBuf>, ssh_config: Option<PathBuf>) -> Self {
        Self {
            resolv_conf: resolv_conf.into(),
            ssh_config,
            line_limit: MAX_LINE_BYTES,
            warned_missing_ssh_config: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &HostsConfig) -> Self {
        Self::new(config.resolv_conf.clone(), config.ssh_config.clone())
    }

    /// Strip the local search domain from `host`, if one matches.
    pub fn shorten(&self, host: &str) -> String {
        let Some(file) = open_optional(&self.resolv_conf) else {
            return host.to_string();
        };
        match shorten_host(host, BufReader::new(file), self.line_limit) {
            Ok(short) => short,
            Err(e) => {
                error!(path = %self.resolv_conf.display(), "ignoring resolver config: {e}");
                host.to_string()
            }
        }
    }

    /// Fresh `HostName` → alias table. Empty when the file is unusable.
    pub fn aliases(&self) -> HashMap<String, String> {
        let Some(path) = self.ssh_config.as_deref() else {
            self.warn_missing_ssh_config(None);
            return HashMap::new();
        };
        let Some(file) = open_optional(path) else {
            self.warn_missing_ssh_config(Some(path));
            return HashMap::new();
        };
        match parse_ssh_config(BufReader::new(file), self.line_limit) {
            Ok(aliases) => aliases,
            Err(e) => {
                error!(path = %path.display(), "ignoring ssh config: {e}");
                HashMap::new()
            }
        }
    }

    /// Shorten `host` and look it up in the SSH config.
    ///
    /// Falls back to the shortened name itself when no alias exists.
    pub fn mapped_host(&self, host: &str) -> String {
        let short = self.shorten(host);
        match self.aliases().remove(&short) {
            Some(alias) => {
                debug!(host, alias = %alias, "mapped host");
                alias
            }
            None => {
                warn!(host = %short, "host not in ssh config mapping; using it verbatim");
                short
            }
        }
    }

    fn warn_missing_ssh_config(&self, path: Option<&Path>) {
        if self.warned_missing_ssh_config.swap(true, Ordering::Relaxed) {
            return;
        }
        match path {
            Some(path) => warn!(path = %path.display(), "no ssh config, won't map hostnames"),
            None => warn!("HOME is not set; no ssh config, won't map hostnames"),
        }
    }
}

fn open_optional(path: &Path) -> Option<File> {
    match File::open(path) {
        Ok(file) => Some(file),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), "cannot open: {e}");
            None
        }
    }
}
