use crate::utils::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Read-only view of environment variables.
pub trait EnvSource {
    fn get(&self, name: &str) -> Option<String>;
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

pub trait Storage {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write_string(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Commits the written DR files to the configuration repository.
pub trait Publisher {
    fn stage(&mut self, outputs: &[PathBuf]) -> Result<()>;
    fn has_staged_changes(&mut self) -> Result<bool>;
    fn commit(&mut self, message: &str) -> Result<()>;
    fn push(&mut self, remote: &str) -> Result<()>;
}
