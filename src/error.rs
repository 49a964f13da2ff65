use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChurnError>;

#[derive(Error, Debug)]
pub enum ChurnError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
}

// gix errors are large; keep them boxed inside ChurnError
impl From<gix::object::find::existing::Error> for ChurnError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        ChurnError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for ChurnError {
    fn from(err: gix::object::commit::Error) -> Self {
        ChurnError::Commit(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for ChurnError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        ChurnError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for ChurnError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        ChurnError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for ChurnError {
    fn from(err: gix::objs::decode::Error) -> Self {
        ChurnError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for ChurnError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        ChurnError::DiffTreeToTree(Box::new(err))
    }
}

impl From<gix::discover::Error> for ChurnError {
    fn from(err: gix::discover::Error) -> Self {
        ChurnError::GitDiscover(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for ChurnError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        ChurnError::RefFind(Box::new(err))
    }
}

/// A hunk header that does not have the `-L[,C] +L[,C]` shape.
///
/// Every variant carries the offending header text so the caller can
/// report it alongside the commit it came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HunkError {
    #[error("malformed hunk header '{header}': missing space between ranges")]
    MissingSeparator { header: String },
    #[error("malformed hunk header '{header}': expected '{expected}' before range")]
    MissingSign { header: String, expected: char },
    #[error("malformed hunk header '{header}': '{value}' is not a line number")]
    InvalidNumber { header: String, value: String },
    #[error("malformed hunk header '{header}': missing closing '@@'")]
    Unterminated { header: String },
}

impl HunkError {
    pub fn header(&self) -> &str {
        match self {
            HunkError::MissingSeparator { header }
            | HunkError::MissingSign { header, .. }
            | HunkError::InvalidNumber { header, .. }
            | HunkError::Unterminated { header } => header,
        }
    }
}
