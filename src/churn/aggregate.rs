use super::ledger::{LedgerSet, Tally};
use super::replay::replay_commit;
use crate::error::{HunkError, Result};
use crate::model::{Author, AuthorEntry, DateRange, SkippedCommit};
use crate::source::HistorySource;
use tracing::{debug, warn};

/// One author's replay in progress: fresh ledgers, running totals and the
/// commits that had to be abandoned.
///
/// Commits must be fed oldest first. Sessions share nothing, so separate
/// authors can be tallied independently.
#[derive(Debug, Default)]
pub struct TallySession {
    ledgers: LedgerSet,
    tally: Tally,
    path_prefix: Option<String>,
    commit_count: u32,
    skipped: Vec<SkippedCommit>,
}

impl TallySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path_prefix(mut self, prefix: Option<String>) -> Self {
        self.path_prefix = prefix;
        self
    }

    /// Replays one commit. A malformed hunk header abandons the rest of that
    /// commit and is recorded as skipped; it never fails the session.
    pub fn replay(&mut self, commit_id: &str, diff: &str) {
        self.commit_count += 1;
        match replay_commit(
            diff,
            &mut self.ledgers,
            &mut self.tally,
            self.path_prefix.as_deref(),
        ) {
            Ok(hunks) => debug!(commit = commit_id, hunks, "replayed commit"),
            Err(err) => self.skip(commit_id, err),
        }
    }

    fn skip(&mut self, commit_id: &str, err: HunkError) {
        warn!(commit = commit_id, header = err.header(), "{err}; skipping rest of commit");
        self.skipped.push(SkippedCommit {
            commit_id: commit_id.to_string(),
            header: err.header().to_string(),
            reason: err.to_string(),
        });
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn ledgers(&self) -> &LedgerSet {
        &self.ledgers
    }

    pub fn skipped(&self) -> &[SkippedCommit] {
        &self.skipped
    }

    pub fn finish(self, author: Author) -> AuthorReport {
        AuthorReport {
            author,
            tally: self.tally,
            commit_count: self.commit_count,
            skipped: self.skipped,
            ledgers: self.ledgers,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthorReport {
    pub author: Author,
    pub tally: Tally,
    pub commit_count: u32,
    pub skipped: Vec<SkippedCommit>,
    pub ledgers: LedgerSet,
}

impl AuthorReport {
    pub fn net(&self) -> i64 {
        self.tally.net()
    }

    pub fn is_zero(&self) -> bool {
        self.tally.contribution == 0 && self.tally.churn == 0
    }

    pub fn into_entry(self, detail: bool) -> AuthorEntry {
        AuthorEntry {
            net: self.net(),
            name: self.author.name,
            email: self.author.email,
            commit_count: self.commit_count,
            contribution: self.tally.contribution,
            churn: self.tally.churn,
            skipped: self.skipped,
            files: detail.then_some(self.ledgers),
        }
    }
}

/// Replays every commit of `author` within `range`, oldest first, into a
/// fresh set of ledgers.
///
/// Failing to enumerate commits or to produce a diff is fatal; an author
/// without commits yields a zero tally.
pub fn tally_author<S: HistorySource>(
    source: &S,
    author: &Author,
    range: &DateRange,
    path_prefix: Option<&str>,
) -> Result<AuthorReport> {
    let commit_ids = source.commit_ids(author, range)?;
    debug!(author = %author, commits = commit_ids.len(), "tallying author");

    let mut session = TallySession::new().with_path_prefix(path_prefix.map(str::to_string));
    for commit_id in &commit_ids {
        let diff = source.diff_text(commit_id)?;
        session.replay(commit_id, &diff);
    }
    Ok(session.finish(author.clone()))
}

/// Tallies each author in turn, in the order given.
pub fn tally_authors<'a, S, I>(
    source: &S,
    authors: I,
    range: &DateRange,
    path_prefix: Option<&str>,
    mut on_done: impl FnMut(&AuthorReport),
) -> Result<Vec<AuthorReport>>
where
    S: HistorySource,
    I: IntoIterator<Item = &'a Author>,
{
    let mut reports = Vec::new();
    for author in authors {
        let report = tally_author(source, author, range, path_prefix)?;
        on_done(&report);
        reports.push(report);
    }
    Ok(reports)
}

/// Orders reports for display: largest contribution first, then by name.
pub fn sort_reports(reports: &mut [AuthorReport]) {
    reports.sort_by(|a, b| {
        b.tally
            .contribution
            .cmp(&a.tally.contribution)
            .then_with(|| a.author.cmp(&b.author))
    });
}
