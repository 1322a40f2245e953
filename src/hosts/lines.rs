//! Bounded line reading shared by the resolver and SSH config parsers.

use std::io::{BufRead, Read};

use crate::error::HostConfigError;

/// Longest line either parser accepts before giving up on the file.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Call `visit` with every non-blank, non-comment line, trimmed.
///
/// A line longer than `limit` bytes aborts the whole file.
pub(super) fn for_each_line<R, F>(
    mut reader: R,
    limit: usize,
    mut visit: F,
) -> Result<(), HostConfigError>
where
    R: BufRead,
    F: FnMut(&str),
{
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let read = (&mut reader)
            .take(limit as u64 + 1)
            .read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Ok(());
        }
        line_no += 1;
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.len() > limit {
            return Err(HostConfigError::LineTooLong {
                line: line_no,
                limit,
            });
        }
        let text = String::from_utf8_lossy(&buf);
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        visit(trimmed);
    }
}
