//! Default configuration constants.

/// Channel identifier shared by client and server.
pub(super) const DEFAULT_CHANNEL_NAME: &str = "RUNLOCAL_EXECUTE";
/// Mailbox read window in bytes (1024 32-bit property units).
pub(super) const DEFAULT_MAX_PAYLOAD_BYTES: u32 = 4096;
/// Smallest read window accepted from configuration.
pub(super) const MIN_MAX_PAYLOAD_BYTES: u32 = 4;
/// Resolver configuration consulted for search-domain shortening.
pub(super) const DEFAULT_RESOLV_CONF: &str = "/etc/resolv.conf";
/// SSH client config location relative to the home directory.
pub(super) const DEFAULT_SSH_CONFIG_RELATIVE: &str = ".ssh/config";
/// URI scheme substituted for `file:` on the server side.
pub(super) const DEFAULT_REMOTE_SCHEME: &str = "sftp";
/// Directory (under the config root) and file name of `runlocal.toml`.
pub(super) const CONFIG_DIR_NAME: &str = "runlocal";
pub(super) const CONFIG_FILE_NAME: &str = "runlocal.toml";
