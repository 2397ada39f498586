// Adapters layer: concrete implementations for external systems (filesystem, git).

pub mod git;
pub mod storage;

pub use git::GitCliPublisher;
pub use storage::LocalStorage;
