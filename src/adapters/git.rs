use crate::domain::ports::Publisher;
use crate::utils::error::{DrError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Publishes through the `git` executable inside the config checkout.
#[derive(Debug, Clone)]
pub struct GitCliPublisher {
    repo_root: PathBuf,
}

impl GitCliPublisher {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// Pathspec for `output` as seen from inside the checkout.
    fn pathspec<'p>(&self, output: &'p Path) -> &'p Path {
        output.strip_prefix(&self.repo_root).unwrap_or(output)
    }

    fn output<I, S>(&self, command: &str, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        tracing::debug!("Running git {} in {}", command, self.repo_root.display());
        Command::new("git")
            .arg(command)
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .map_err(|err| DrError::Git {
                command: command.to_string(),
                detail: err.to_string(),
            })
    }

    fn run<I, S>(&self, command: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.output(command, args)?;
        if !output.status.success() {
            return Err(failure(command, &output));
        }
        Ok(())
    }
}

fn failure(command: &str, output: &Output) -> DrError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let detail = if stderr.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.trim().to_string()
    };
    DrError::Git {
        command: command.to_string(),
        detail: format!("exited with {}: {}", output.status, detail),
    }
}

impl Publisher for GitCliPublisher {
    fn stage(&mut self, outputs: &[PathBuf]) -> Result<()> {
        self.run("add", ["--update"])?;
        if outputs.is_empty() {
            return Ok(());
        }
        // 新產生的 DR 檔案尚未被追蹤，需要明確加入
        let mut args: Vec<&OsStr> = vec![OsStr::new("--")];
        args.extend(outputs.iter().map(|p| self.pathspec(p).as_os_str()));
        self.run("add", args)
    }

    fn has_staged_changes(&mut self) -> Result<bool> {
        let output = self.output("diff", ["--cached", "--quiet"])?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(failure("diff", &output)),
        }
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        self.run("commit", ["-m", message])
    }

    fn push(&mut self, remote: &str) -> Result<()> {
        self.run("push", [remote, "HEAD"])
    }
}
