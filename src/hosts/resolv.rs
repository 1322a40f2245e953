//! Domain-suffix shortening driven by resolver configuration.

use std::io::BufRead;

use super::lines::for_each_line;
use crate::error::HostConfigError;

/// Strip the domain suffix named by `search`/`host` lines.
///
/// Every listed domain is tried against the original `host`; the last line
/// that matches wins. A suffix only matches on a dot boundary and never
/// consumes the whole name.
pub fn shorten_host<R: BufRead>(
    host: &str,
    resolv_conf: R,
    line_limit: usize,
) -> Result<String, HostConfigError> {
    let mut shortened = host.to_string();
    for_each_line(resolv_conf, line_limit, |line| {
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            return;
        };
        if !matches!(keyword.to_ascii_lowercase().as_str(), "search" | "host") {
            return;
        }
        for domain in fields {
            if let Some(short) = strip_domain(host, domain) {
                shortened = short.to_string();
            }
        }
    })?;
    Ok(shortened)
}

fn strip_domain<'a>(host: &'a str, domain: &str) -> Option<&'a str> {
    let domain = domain.trim_end_matches('.');
    if domain.is_empty() {
        return None;
    }
    let head = host.strip_suffix(domain)?.strip_suffix('.')?;
    (!head.is_empty()).then_some(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn shorten(host: &str, conf: &str) -> String {
        shorten_host(host, Cursor::new(conf.as_bytes()), 1024).unwrap()
    }

    #[test]
    fn strips_matching_search_domain() {
        assert_eq!(shorten("foo.example.com", "search example.com\n"), "foo");
    }

    #[test]
    fn no_matching_line_leaves_host_alone() {
        let conf = "nameserver 10.0.0.1\nsearch corp.internal\n";
        assert_eq!(shorten("foo.example.com", conf), "foo.example.com");
    }

    #[test]
    fn host_directive_and_keyword_case_are_accepted() {
        assert_eq!(shorten("box.lan", "HOST lan\n"), "box");
    }

    #[test]
    fn later_search_domains_are_considered() {
        assert_eq!(shorten("db.b.org", "search a.org b.org\n"), "db");
    }

    #[test]
    fn suffix_must_sit_on_a_dot_boundary() {
        assert_eq!(shorten("fooexample.com", "search example.com\n"), "fooexample.com");
    }

    #[test]
    fn bare_domain_is_not_shortened_to_empty() {
        assert_eq!(shorten("example.com", "search example.com\n"), "example.com");
    }

    #[test]
    fn trailing_dot_on_domain_is_ignored() {
        assert_eq!(shorten("foo.example.com", "search example.com.\n"), "foo");
    }

    #[test]
    fn domain_directive_does_not_shorten() {
        assert_eq!(
            shorten("foo.example.com", "domain example.com\n"),
            "foo.example.com"
        );
    }

    #[test]
    fn overlong_line_fails_the_file() {
        let conf = format!("search {}\n", "x".repeat(2048));
        assert!(shorten_host("foo", Cursor::new(conf.as_bytes()), 1024).is_err());
    }
}
