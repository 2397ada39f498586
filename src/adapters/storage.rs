use crate::domain::ports::Storage;
use crate::utils::error::{DrError, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| DrError::io(path.display().to_string(), e))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).map_err(|e| DrError::io(path.display().to_string(), e))
    }
}
