//! `HostName` → `Host` alias table from an OpenSSH client config.

use std::collections::HashMap;
use std::io::BufRead;

use super::lines::for_each_line;
use crate::error::HostConfigError;

/// Map every `HostName` value to the alias of the `Host` block it sits in.
///
/// The first alias recorded for a given host name is kept. `HostName` lines
/// outside a named `Host` block (before the first one, under a wildcard-only
/// pattern, or inside a `Match` block) are ignored.
pub fn parse_ssh_config<R: BufRead>(
    config: R,
    line_limit: usize,
) -> Result<HashMap<String, String>, HostConfigError> {
    let mut aliases = HashMap::new();
    let mut current: Option<String> = None;
    for_each_line(config, line_limit, |line| {
        let Some((keyword, value)) = split_directive(line) else {
            return;
        };
        match keyword.to_ascii_lowercase().as_str() {
            "host" => {
                current = value
                    .split_whitespace()
                    .find(|pattern| !is_pattern(pattern))
                    .map(str::to_string);
            }
            "match" => current = None,
            "hostname" => {
                let (Some(alias), Some(name)) = (&current, value.split_whitespace().next()) else {
                    return;
                };
                aliases
                    .entry(name.to_string())
                    .or_insert_with(|| alias.clone());
            }
            _ => {}
        }
    })?;
    Ok(aliases)
}

/// Split `Keyword value`, `Keyword=value` or `Keyword = value`.
fn split_directive(line: &str) -> Option<(&str, &str)> {
    let end = line.find(|c: char| c.is_whitespace() || c == '=')?;
    let (keyword, rest) = line.split_at(end);
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest).trim();
    (!rest.is_empty()).then_some((keyword, rest))
}

fn is_pattern(token: &str) -> bool {
    token.starts_with('!') || token.contains(['*', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(conf: &str) -> HashMap<String, String> {
        parse_ssh_config(Cursor::new(conf.as_bytes()), 1024).unwrap()
    }

    #[test]
    fn maps_hostname_to_alias() {
        let map = parse("Host alias\nHostName real.example.com\n");
        assert_eq!(map.get("real.example.com").map(String::as_str), Some("alias"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn second_block_does_not_clobber_first() {
        let map = parse(
            "Host devbox\n  HostName work\n\nHost other\n  HostName build.example.com\n",
        );
        assert_eq!(map.get("work").map(String::as_str), Some("devbox"));
        assert_eq!(
            map.get("build.example.com").map(String::as_str),
            Some("other")
        );
    }

    #[test]
    fn first_alias_for_a_hostname_is_kept() {
        let map = parse("Host a\nHostName shared\nHost b\nHostName shared\n");
        assert_eq!(map.get("shared").map(String::as_str), Some("a"));
    }

    #[test]
    fn keywords_are_case_insensitive_and_accept_equals() {
        let map = parse("HOST box\nhostname=box.lan\nHost  tab\n\tHostName = tab.lan\n");
        assert_eq!(map.get("box.lan").map(String::as_str), Some("box"));
        assert_eq!(map.get("tab.lan").map(String::as_str), Some("tab"));
    }

    #[test]
    fn wildcard_and_match_blocks_are_skipped() {
        let map = parse(
            "HostName orphan\nHost *\n  HostName star\nHost !x web*\nHostName w\nMatch all\nHostName m\n",
        );
        assert!(map.is_empty(), "got: {map:?}");
    }

    #[test]
    fn first_plain_pattern_is_the_alias() {
        let map = parse("Host *.corp dev dev2\nHostName dev.corp\n");
        assert_eq!(map.get("dev.corp").map(String::as_str), Some("dev"));
    }

    #[test]
    fn comments_and_other_directives_are_ignored() {
        let map = parse("# Host fake\nHost a\n  User me\n  Port 2222\n  HostName a.lan\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a.lan").map(String::as_str), Some("a"));
    }
}
