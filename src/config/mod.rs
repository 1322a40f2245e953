//! Configuration loading from TOML files and environment variables.
//!
//! Precedence (highest wins):
//! 1. Environment variables (`RUNLOCAL_CHANNEL`, `RUNLOCAL_RESOLV_CONF`,
//!    `RUNLOCAL_SSH_CONFIG`)
//! 2. The file named by `RUNLOCAL_CONFIG`
//! 3. `$XDG_CONFIG_HOME/runlocal/runlocal.toml` (or `~/.config/runlocal/runlocal.toml`)
//! 4. Built-in defaults
//!
//! The config never adds command-line flags; it only tunes the channel name
//! and the host-mapping inputs.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

mod defaults;
mod env;
mod sources;
mod types;

use defaults::{DEFAULT_SSH_CONFIG_RELATIVE, MIN_MAX_PAYLOAD_BYTES};
pub use sources::{config_root_dir, home_dir};
use sources::read_config_text_with_sources;
use types::FileConfig;
pub use types::{ChannelConfig, Config, HostsConfig};

/// Load configuration from disk and environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from_sources(
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
        home_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot, FHome>(
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
    home: FHome,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
    FHome: Fn() -> Option<PathBuf>,
{
    let path_override = env::non_empty(&env_lookup, env::ENV_CONFIG);
    let (text, source) =
        read_config_text_with_sources(path_override.as_deref(), &read_file, &config_root)?;
    debug!(?source, "loaded configuration");
    let parsed: FileConfig = toml::from_str(&text)?;
    let home = home();
    let mut config = resolve(parsed, home.as_deref());
    env::apply_runtime_env_overrides(&mut config, &env_lookup);
    validate(&config)?;
    Ok(config)
}

fn resolve(file: FileConfig, home: Option<&Path>) -> Config {
    let defaults = Config::default();
    let channel = ChannelConfig {
        name: file.channel.name.unwrap_or(defaults.channel.name),
        max_payload_bytes: file
            .channel
            .max_payload_bytes
            .unwrap_or(defaults.channel.max_payload_bytes),
    };
    let ssh_config = match file.hosts.ssh_config {
        Some(path) => Some(expand_home(&path, home)),
        None => home.map(|home| home.join(DEFAULT_SSH_CONFIG_RELATIVE)),
    };
    let hosts = HostsConfig {
        resolv_conf: file
            .hosts
            .resolv_conf
            .map(|path| expand_home(&path, home))
            .unwrap_or(defaults.hosts.resolv_conf),
        ssh_config,
        remote_scheme: file
            .hosts
            .remote_scheme
            .unwrap_or(defaults.hosts.remote_scheme),
    };
    Config { channel, hosts }
}

/// Expand a leading `~/` against the home directory when one is known.
fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.channel.name.trim().is_empty() {
        return Err(ConfigError::Invalid("channel.name must not be empty".into()));
    }
    if config.channel.max_payload_bytes < MIN_MAX_PAYLOAD_BYTES {
        return Err(ConfigError::Invalid(format!(
            "channel.max_payload_bytes must be at least {MIN_MAX_PAYLOAD_BYTES}, got {}",
            config.channel.max_payload_bytes
        )));
    }
    let scheme = &config.hosts.remote_scheme;
    if scheme.is_empty()
        || !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return Err(ConfigError::Invalid(format!(
            "hosts.remote_scheme `{scheme}` is not a valid URI scheme"
        )));
    }
    Ok(())
}
