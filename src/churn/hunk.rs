//! Hunk header parsing.
//!
//! Diffs are requested with zero lines of context, so a hunk header is the
//! only thing needed to know which line positions an edit touched:
//!
//! ```text
//! @@ -10,2 +10,3 @@ fn main() {
//!    ^^^^^^^^^^^ specifier
//! ```
//!
//! Each side is `<sign><line>[,<count>]`; the count defaults to 1.

use crate::error::HunkError;
use std::str::FromStr;

/// One side of a hunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// 1-based line number; 0 for insertions before the first line.
    pub position: u32,
    pub count: u32,
}

/// The removal and addition ranges of a single `@@ -a +b @@` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub removal: LineRange,
    pub addition: LineRange,
}

impl HunkHeader {
    /// Parses a full diff line starting with `@@ `.
    ///
    /// Returns `None` when the line is not a hunk header at all.
    pub fn from_line(line: &str) -> Option<Result<Self, HunkError>> {
        let rest = line.strip_prefix("@@ ")?;
        Some(specifier(rest).and_then(|spec| spec.parse()))
    }
}

impl FromStr for HunkHeader {
    type Err = HunkError;

    /// Parses the specifier between `@@ ` and ` @@`, e.g. `-5,0 +6,3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (removal, addition) = s.split_once(' ').ok_or_else(|| HunkError::MissingSeparator {
            header: s.to_string(),
        })?;

        Ok(Self {
            removal: parse_range(s, removal, '-')?,
            addition: parse_range(s, addition, '+')?,
        })
    }
}

/// Extracts the specifier text from everything after the opening `@@ `.
pub(crate) fn specifier(rest: &str) -> Result<&str, HunkError> {
    rest.find(" @@")
        .map(|end| &rest[..end])
        .ok_or_else(|| HunkError::Unterminated {
            header: rest.trim_end().to_string(),
        })
}

fn parse_range(header: &str, side: &str, sign: char) -> Result<LineRange, HunkError> {
    let digits = side.strip_prefix(sign).ok_or_else(|| HunkError::MissingSign {
        header: header.to_string(),
        expected: sign,
    })?;

    let (position, count) = match digits.split_once(',') {
        Some((position, count)) => (parse_number(header, position)?, parse_number(header, count)?),
        None => (parse_number(header, digits)?, 1),
    };

    Ok(LineRange { position, count })
}

fn parse_number(header: &str, value: &str) -> Result<u32, HunkError> {
    value.parse().map_err(|_| HunkError::InvalidNumber {
        header: header.to_string(),
        value: value.to_string(),
    })
}
