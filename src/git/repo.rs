use super::diff::{is_binary, write_file_diff, DEV_NULL};
use crate::error::{ChurnError, Result};
use crate::model::{Author, CommitInfo, DateRange};
use crate::source::HistorySource;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use gix::object::tree::diff::ChangeDetached;
use gix::objs::tree::EntryMode;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::OnceCell;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

enum Visit {
    Expand(ObjectId),
    Emit(CommitInfo),
}

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
    show_progress: bool,
    history: OnceCell<Vec<CommitInfo>>,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        debug!(path = %path.display(), "opened repository");

        Ok(Self {
            repo,
            path,
            show_progress: true,
            history: OnceCell::new(),
        })
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn resolve_range(&self, since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
        let mut range = DateRange::new();

        let since_dt = since.map(|s| self.parse_commit_or_date(s)).transpose()?;
        let until_dt = until.map(|u| self.parse_commit_or_date(u)).transpose()?;

        if let (Some(s), Some(u)) = (since_dt, until_dt) {
            if s > u {
                return Err(ChurnError::InvalidDate(format!(
                    "Invalid range: since ({s}) is after until ({u})"
                )));
            }
        }

        if let Some(s) = since_dt {
            range = range.with_since(s);
        }
        if let Some(u) = until_dt {
            range = range.with_until(u);
        }

        Ok(range)
    }

    fn parse_commit_or_date(&self, input: &str) -> Result<DateTime<Utc>> {
        if let Some(dt) = parse_date(input)? {
            return Ok(dt);
        }

        // Fallback to Git ref
        let id = self
            .repo
            .rev_parse_single(input)
            .map_err(|e| ChurnError::Parse(format!("Invalid commit or date '{input}': {e}")))?;

        let commit = id
            .object()?
            .try_into_commit()
            .map_err(|_| ChurnError::Parse(format!("Not a commit: {input}")))?;

        let secs = commit.time()?.seconds;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| ChurnError::InvalidDate(format!("Invalid timestamp: {secs}")))
    }

    /// Every non-merge commit reachable from HEAD, oldest first. Walked once.
    pub fn history(&self) -> Result<&[CommitInfo]> {
        if let Some(history) = self.history.get() {
            return Ok(history.as_slice());
        }
        let walked = self.walk()?;
        Ok(self.history.get_or_init(|| walked).as_slice())
    }

    fn walk(&self) -> Result<Vec<CommitInfo>> {
        let mut head = self.repo.head()?;
        let head_commit = head.peel_to_commit_in_place()?;

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack = vec![Visit::Expand(head_commit.id)];

        let pb = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} {pos}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message("Walking history...");

        while let Some(visit) = stack.pop() {
            let commit_id = match visit {
                Visit::Emit(info) => {
                    commits.push(info);
                    continue;
                }
                Visit::Expand(id) => id,
            };
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            let timestamp = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| ChurnError::InvalidDate(format!("Invalid timestamp: {secs}")))?;

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

            // merges are walked through but never replayed
            if parents.len() <= 1 {
                let author = commit.author()?;
                stack.push(Visit::Emit(CommitInfo {
                    id: commit_id.to_string(),
                    author: Author::new(author.name.to_string(), author.email.to_string()),
                    timestamp,
                }));
            }
            stack.extend(parents.into_iter().map(Visit::Expand));
            pb.inc(1);
        }

        pb.finish_and_clear();

        // post-order puts parents first; the stable sort keeps that order
        // among commits sharing a timestamp
        commits.sort_by_key(|c| c.timestamp);
        debug!(commits = commits.len(), "walked history");
        Ok(commits)
    }

    /// Zero-context diff of `commit_id` against its first parent.
    pub fn commit_diff(&self, commit_id: &str) -> Result<String> {
        let oid = ObjectId::from_hex(commit_id.as_bytes())
            .map_err(|e| ChurnError::Parse(format!("Invalid commit ID: {e}")))?;
        let commit = self.repo.find_commit(oid)?;
        let tree = commit.tree()?;

        let parent: Option<ObjectId> = commit.parent_ids().next().map(|id| id.into());
        let parent_tree = match parent {
            Some(pid) => Some(self.repo.find_commit(pid)?.tree()?),
            None => None,
        };

        let changes: Vec<ChangeDetached> =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let mut out = String::new();
        for change in changes {
            self.render_change(change, &mut out)?;
        }
        Ok(out)
    }

    fn render_change(&self, change: ChangeDetached, out: &mut String) -> Result<()> {
        match change {
            ChangeDetached::Addition {
                id,
                entry_mode,
                location,
                ..
            } => {
                if let Some(new) = self.blob_text(id, entry_mode)? {
                    write_file_diff(out, DEV_NULL, &location.to_string(), "", &new);
                }
            }
            ChangeDetached::Deletion {
                id,
                entry_mode,
                location,
                ..
            } => {
                if let Some(old) = self.blob_text(id, entry_mode)? {
                    write_file_diff(out, &location.to_string(), DEV_NULL, &old, "");
                }
            }
            ChangeDetached::Modification {
                previous_id,
                previous_entry_mode,
                id,
                entry_mode,
                location,
                ..
            } => {
                let old = self.blob_text(previous_id, previous_entry_mode)?;
                let new = self.blob_text(id, entry_mode)?;
                if let (Some(old), Some(new)) = (old, new) {
                    let path = location.to_string();
                    write_file_diff(out, &path, &path, &old, &new);
                }
            }
            ChangeDetached::Rewrite {
                source_id,
                source_entry_mode,
                id,
                entry_mode,
                source_location,
                location,
                ..
            } => {
                let old = self.blob_text(source_id, source_entry_mode)?;
                let new = self.blob_text(id, entry_mode)?;
                if let (Some(old), Some(new)) = (old, new) {
                    write_file_diff(
                        out,
                        &source_location.to_string(),
                        &location.to_string(),
                        &old,
                        &new,
                    );
                }
            }
        }
        Ok(())
    }

    /// Text of a file entry. Trees, submodules and binary data give `None`;
    /// a blob that cannot be read is an error.
    fn blob_text(&self, id: ObjectId, mode: EntryMode) -> Result<Option<String>> {
        if mode.is_tree() || mode.is_commit() {
            return Ok(None);
        }
        let object = self.repo.find_object(id)?;
        if is_binary(&object.data) {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&object.data).into_owned()))
    }
}

impl HistorySource for GitRepo {
    fn authors(&self) -> Result<Vec<Author>> {
        let authors: BTreeSet<Author> = self.history()?.iter().map(|c| c.author.clone()).collect();
        Ok(authors.into_iter().collect())
    }

    fn commit_ids(&self, author: &Author, range: &DateRange) -> Result<Vec<String>> {
        Ok(self
            .history()?
            .iter()
            .filter(|c| &c.author == author && range.contains(&c.timestamp))
            .map(|c| c.id.clone())
            .collect())
    }

    fn diff_text(&self, commit_id: &str) -> Result<String> {
        self.commit_diff(commit_id)
    }
}

/// Dates that do not need the repository: RFC3339, `YYYY-MM-DD`, and
/// durations before now (`3 weeks ago`, `90d`).
pub fn parse_date(input: &str) -> Result<Option<DateTime<Utc>>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(Utc.from_utc_datetime(&datetime)));
        }
    }

    if let Some(duration) = parse_natural_duration(input) {
        let target = SystemTime::now()
            .checked_sub(duration)
            .ok_or_else(|| ChurnError::InvalidDate(format!("Duration overflow for '{input}'")))?;
        return Ok(Some(DateTime::<Utc>::from(target)));
    }

    Ok(None)
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    let units = [(" days ago", 86400), (" weeks ago", 7 * 86400), (" months ago", 30 * 86400)];
    for (suffix, secs) in units {
        if let Some(n) = input.strip_suffix(suffix) {
            if let Ok(n) = n.trim().parse::<u64>() {
                return Some(Duration::from_secs(n * secs));
            }
        }
    }

    let compact = input.strip_suffix(" ago").unwrap_or(&input);
    humantime::parse_duration(compact.trim_start_matches('-')).ok()
}
