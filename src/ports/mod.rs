//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the resolution core and an
//! external system (the filesystem and git). Implementations live in
//! `src/adapters/`.

pub mod filesystem;
pub mod git;

pub use filesystem::FileSystem;
pub use git::{GitRepo, RevisionRange};

/// Boxed error returned by port methods.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
