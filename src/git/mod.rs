pub mod diff;
pub mod repo;

pub use repo::GitRepo;
