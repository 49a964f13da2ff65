//! Where commit history comes from.
//!
//! The tally only needs three things from version control: who committed,
//! which commits an author made (oldest first) and the zero-context diff of
//! each commit. Keeping that behind a trait lets the replay be driven from a
//! real repository or from canned diff text.

use crate::error::Result;
use crate::model::{Author, DateRange};

pub trait HistorySource {
    /// Distinct author identities of all non-merge commits.
    fn authors(&self) -> Result<Vec<Author>>;

    /// Ids of `author`'s non-merge commits within `range`, oldest first.
    fn commit_ids(&self, author: &Author, range: &DateRange) -> Result<Vec<String>>;

    /// Unified diff of one commit against its first parent, with zero lines
    /// of context, no `a/` `b/` path prefixes and binary files left out.
    fn diff_text(&self, commit_id: &str) -> Result<String>;
}

impl<S: HistorySource + ?Sized> HistorySource for &S {
    fn authors(&self) -> Result<Vec<Author>> {
        (**self).authors()
    }

    fn commit_ids(&self, author: &Author, range: &DateRange) -> Result<Vec<String>> {
        (**self).commit_ids(author, range)
    }

    fn diff_text(&self, commit_id: &str) -> Result<String> {
        (**self).diff_text(commit_id)
    }
}
