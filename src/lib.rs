pub mod churn;
pub mod cli;
pub mod error;
pub mod git;
pub mod model;
pub mod source;
pub mod util;
