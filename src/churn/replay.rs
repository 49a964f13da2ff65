//! Replays the zero-context diff text of one commit into an author's ledgers.
//!
//! The replayer is a two-state machine. Outside of any file it ignores
//! everything; a `+++ <path>` line moves it into that file, and every hunk
//! header seen afterwards is parsed, classified and applied to the file's
//! ledger.
//!
//! Diff text may carry the `-`/`+` content lines of each hunk or only the
//! headers. When content is present it is skipped by count using the
//! hunk's own ranges, so an added line that reads `++ x` is not taken for a
//! file header. Header-only text is replayed header by header.

use super::edit::EditSet;
use super::hunk::{self, HunkHeader};
use super::ledger::{LedgerSet, Tally};
use crate::error::HunkError;
use crate::util::path_matches;

const FILE_HEADER: &str = "+++ ";
const NO_NEWLINE_MARKER: char = '\\';

#[derive(Debug, Clone, Copy, Default)]
struct Pending {
    removed: u32,
    added: u32,
}

impl Pending {
    /// Consumes `line` if it is one of the content lines still owed by the
    /// current hunk. Removed lines always precede added ones, so a `+` line
    /// seen while removals are owed belongs to something else.
    fn consume(&mut self, line: &str) -> bool {
        if self.removed > 0 && line.starts_with('-') {
            self.removed -= 1;
            true
        } else if self.removed == 0 && self.added > 0 && line.starts_with('+') {
            self.added -= 1;
            true
        } else {
            false
        }
    }
}

enum State<'a> {
    NoFile,
    InFile {
        path: &'a str,
        tracked: bool,
        last_header: Option<&'a str>,
        pending: Pending,
    },
}

/// Per-commit scratch state. Dropped once the commit's lines run out; only
/// the ledgers and the totals survive.
pub struct CommitReplay<'a, 'l> {
    ledgers: &'l mut LedgerSet,
    totals: &'l mut Tally,
    path_prefix: Option<&'l str>,
    state: State<'a>,
    skip_content: bool,
    hunks_applied: usize,
}

impl<'a, 'l> CommitReplay<'a, 'l> {
    pub fn new(ledgers: &'l mut LedgerSet, totals: &'l mut Tally) -> Self {
        Self {
            ledgers,
            totals,
            path_prefix: None,
            state: State::NoFile,
            skip_content: false,
            hunks_applied: 0,
        }
    }

    /// Only files whose destination path starts with `prefix` are recorded.
    pub fn with_path_prefix(mut self, prefix: Option<&'l str>) -> Self {
        self.path_prefix = prefix;
        self
    }

    /// Feeds every line of `diff`, returning the number of hunks applied.
    ///
    /// A malformed hunk header stops the replay. Hunks applied before it
    /// stay in the ledgers and in the totals.
    pub fn run(mut self, diff: &'a str) -> Result<usize, HunkError> {
        self.skip_content = carries_content(diff);
        for line in diff.lines() {
            self.feed(line)?;
        }
        Ok(self.hunks_applied)
    }

    fn feed(&mut self, line: &'a str) -> Result<(), HunkError> {
        if line.starts_with(NO_NEWLINE_MARKER) {
            return Ok(());
        }
        if let State::InFile { pending, .. } = &mut self.state {
            if self.skip_content && pending.consume(line) {
                return Ok(());
            }
        }

        if let Some(path) = line.strip_prefix(FILE_HEADER) {
            self.enter_file(path.trim_end());
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("@@ ") {
            self.hunk(rest)?;
        }
        Ok(())
    }

    fn enter_file(&mut self, path: &'a str) {
        let tracked = path_matches(path, self.path_prefix);
        if tracked {
            self.ledgers.file_mut(path);
        }
        // a new file always starts with no previous header to compare against
        self.state = State::InFile {
            path,
            tracked,
            last_header: None,
            pending: Pending::default(),
        };
    }

    fn hunk(&mut self, rest: &'a str) -> Result<(), HunkError> {
        let State::InFile {
            path,
            tracked,
            last_header,
            pending,
        } = &mut self.state
        else {
            return Ok(());
        };

        let text = hunk::specifier(rest)?;
        let header: HunkHeader = text.parse()?;
        *pending = Pending {
            removed: header.removal.count,
            added: header.addition.count,
        };

        if *last_header == Some(text) {
            return Ok(());
        }
        *last_header = Some(text);

        if *tracked {
            let delta = self.ledgers.file_mut(*path).apply(&EditSet::classify(&header));
            *self.totals += delta;
            self.hunks_applied += 1;
        }
        Ok(())
    }
}

/// Whether `diff` has any line that can only be hunk content.
fn carries_content(diff: &str) -> bool {
    diff.lines().any(|line| {
        line.starts_with(NO_NEWLINE_MARKER)
            || (line.starts_with('-') && !line.starts_with("--- "))
            || (line.starts_with('+') && !line.starts_with(FILE_HEADER))
    })
}

/// Replays one commit's diff text into `ledgers`, adding to `totals`.
pub fn replay_commit(
    diff: &str,
    ledgers: &mut LedgerSet,
    totals: &mut Tally,
    path_prefix: Option<&str>,
) -> Result<usize, HunkError> {
    CommitReplay::new(ledgers, totals)
        .with_path_prefix(path_prefix)
        .run(diff)
}
