//! Argument rewriting on both sides of the channel.
//!
//! The client tags local paths generically as `file:` URIs and prepends its
//! own host name. The server, which knows how it reaches that host, turns
//! each `file:` prefix into `<scheme>://<mapped-host>`.

use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::hosts::HostResolver;
use crate::protocol::CommandRequest;

/// Prefix marking an argument as a path on the originating host.
pub const FILE_PREFIX: &str = "file:";

/// Client-side pass over `[program, args...]` using the real host and cwd.
///
/// Returns `[host, program, args...]`.
pub fn fixup_args(command: &[String]) -> Vec<String> {
    let host = match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            warn!("cannot read local hostname, using localhost: {e}");
            "localhost".to_string()
        }
    };
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            warn!("cannot read working directory, using /: {e}");
            PathBuf::from("/")
        }
    };
    fixup_args_with(command, &host, &cwd)
}

/// Client-side pass with an explicit host and working directory.
///
/// Every token, the program included, that already carries `file:` or
/// names an existing path becomes `file:<absolute path>`.
pub fn fixup_args_with(command: &[String], host: &str, cwd: &Path) -> Vec<String> {
    let mut out = Vec::with_capacity(command.len() + 1);
    out.push(host.to_string());
    out.extend(command.iter().map(|arg| fixup_arg(arg, cwd)));
    out
}

fn fixup_arg(arg: &str, cwd: &Path) -> String {
    if let Some(rest) = arg.strip_prefix(FILE_PREFIX) {
        return file_uri(&absolutize(Path::new(rest), cwd));
    }
    if arg.is_empty() {
        return String::new();
    }
    let path = Path::new(arg);
    let on_disk = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    // Existence follows the path as given, before `..` is folded away.
    if on_disk.exists() {
        file_uri(&absolutize(path, cwd))
    } else {
        arg.to_string()
    }
}

fn file_uri(path: &Path) -> String {
    format!("{FILE_PREFIX}{}", path.to_string_lossy())
}

/// Join `path` onto `cwd` when relative and clean it lexically.
///
/// `.` is dropped, `..` pops one component, and `..` at the root stays at
/// the root. Symlinks are not resolved.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Server-side pass: resolve the request's host and rewrite its `file:` args.
pub fn map_file_args(resolver: &HostResolver, scheme: &str, request: &CommandRequest) -> Vec<String> {
    let mapped = resolver.mapped_host(&request.host);
    rewrite_file_args(&request.args, &format!("{scheme}://{mapped}"))
}

/// Replace the leading `file:` of each argument with `remote_prefix`.
///
/// An empty authority (`file:///path`) collapses to `file:/path` first so
/// both spellings produce `<remote_prefix>/path`. Other arguments are
/// returned unchanged.
pub fn rewrite_file_args(args: &[String], remote_prefix: &str) -> Vec<String> {
    args.iter()
        .map(|arg| match arg.strip_prefix(FILE_PREFIX) {
            Some(rest) => {
                let rest = if rest.starts_with("///") { &rest[2..] } else { rest };
                format!("{remote_prefix}{rest}")
            }
            None => arg.clone(),
        })
        .collect()
}
