//! Live adapters for real external interactions.

pub mod filesystem;
pub mod git;

pub use filesystem::LiveFileSystem;
pub use git::LiveGitRepo;
