//! Environment overrides. `RUNLOCAL_*` variables beat file values.

use std::path::PathBuf;

use super::Config;

/// Path of an explicit config file.
pub(super) const ENV_CONFIG: &str = "RUNLOCAL_CONFIG";
pub(super) const ENV_CHANNEL: &str = "RUNLOCAL_CHANNEL";
pub(super) const ENV_RESOLV_CONF: &str = "RUNLOCAL_RESOLV_CONF";
pub(super) const ENV_SSH_CONFIG: &str = "RUNLOCAL_SSH_CONFIG";

pub(super) fn apply_runtime_env_overrides<FEnv>(config: &mut Config, env_lookup: &FEnv)
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(name) = non_empty(env_lookup, ENV_CHANNEL) {
        config.channel.name = name;
    }
    if let Some(path) = non_empty(env_lookup, ENV_RESOLV_CONF) {
        config.hosts.resolv_conf = PathBuf::from(path);
    }
    if let Some(path) = non_empty(env_lookup, ENV_SSH_CONFIG) {
        config.hosts.ssh_config = Some(PathBuf::from(path));
    }
}

/// Env value with surrounding whitespace removed; blank counts as unset.
pub(super) fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
