//! Configuration data model.
//!
//! `FileConfig` mirrors `runlocal.toml` with every key optional; `Config` is
//! the resolved form handed to the client and server constructors.

use serde::Deserialize;
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_CHANNEL_NAME, DEFAULT_MAX_PAYLOAD_BYTES, DEFAULT_REMOTE_SCHEME, DEFAULT_RESOLV_CONF,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub channel: ChannelConfig,
    pub hosts: HostsConfig,
}

/// Shared-registry channel settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Symbolic name interned into the channel handle.
    pub name: String,
    /// Largest payload read from a mailbox; longer values are truncated.
    pub max_payload_bytes: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CHANNEL_NAME.to_string(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

/// Host-mapping settings used by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsConfig {
    pub resolv_conf: PathBuf,
    /// `None` when no home directory could be determined.
    pub ssh_config: Option<PathBuf>,
    pub remote_scheme: String,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            resolv_conf: PathBuf::from(DEFAULT_RESOLV_CONF),
            ssh_config: None,
            remote_scheme: DEFAULT_REMOTE_SCHEME.to_string(),
        }
    }
}

/// On-disk `runlocal.toml` shape.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileConfig {
    pub channel: FileChannelConfig,
    pub hosts: FileHostsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileChannelConfig {
    pub name: Option<String>,
    pub max_payload_bytes: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileHostsConfig {
    pub resolv_conf: Option<String>,
    pub ssh_config: Option<String>,
    pub remote_scheme: Option<String>,
}
