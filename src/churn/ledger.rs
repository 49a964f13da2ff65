use super::edit::EditSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Contribution and churn, either from one application of edits or summed
/// over an author's whole replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub contribution: u64,
    pub churn: u64,
}

impl Tally {
    pub fn net(&self) -> i64 {
        self.contribution as i64 - self.churn as i64
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.contribution += rhs.contribution;
        self.churn += rhs.churn;
    }
}

/// Sparse record of line position -> accumulated signed magnitude for one
/// file within one author's replay. Positions are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileLedger {
    positions: BTreeMap<u32, i64>,
}

impl FileLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every edit of `edits`. A position seen for the first time
    /// counts towards contribution; a position already present counts
    /// towards churn. Either way the increment is the absolute magnitude of
    /// the edit, not the accumulated value.
    pub fn apply(&mut self, edits: &EditSet) -> Tally {
        let mut delta = Tally::default();
        for edit in edits.iter() {
            let weight = edit.magnitude.unsigned_abs();
            match self.positions.get_mut(&edit.position) {
                Some(value) => {
                    *value += edit.magnitude;
                    delta.churn += weight;
                }
                None => {
                    self.positions.insert(edit.position, edit.magnitude);
                    delta.contribution += weight;
                }
            }
        }
        delta
    }

    pub fn get(&self, position: u32) -> Option<i64> {
        self.positions.get(&position).copied()
    }

    pub fn contains(&self, position: u32) -> bool {
        self.positions.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, i64)> + '_ {
        self.positions.iter().map(|(&position, &value)| (position, value))
    }
}

/// The ledgers of every file one author touched, keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerSet {
    files: BTreeMap<String, FileLedger>,
}

impl LedgerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger for `path`, created empty the first time the path is named.
    pub fn file_mut(&mut self, path: &str) -> &mut FileLedger {
        self.files.entry(path.to_string()).or_default()
    }

    pub fn file(&self, path: &str) -> Option<&FileLedger> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileLedger)> {
        self.files.iter().map(|(path, ledger)| (path.as_str(), ledger))
    }
}
