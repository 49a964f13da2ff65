//! Contribution vs. churn accounting.
//!
//! Hunk headers are parsed ([`hunk`]), turned into line-position edits
//! ([`edit`]) and recorded in per-file ledgers ([`ledger`]). [`replay`] walks
//! one commit's diff text and [`aggregate`] drives it over an author's
//! commits, oldest first.

pub mod aggregate;
pub mod edit;
pub mod exec;
pub mod hunk;
pub mod ledger;
pub mod output;
pub mod replay;

pub use aggregate::{sort_reports, tally_author, tally_authors, AuthorReport, TallySession};
pub use edit::{Edit, EditSet};
pub use exec::exec;
pub use hunk::{HunkHeader, LineRange};
pub use ledger::{FileLedger, LedgerSet, Tally};
pub use output::{output_chart, output_json, output_ndjson, output_table};
pub use replay::{replay_commit, CommitReplay};
