use crate::config::toml_config::RunFile;
use crate::config::RunSettings;
use crate::domain::model::ServiceId;
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "spring-dr-config")]
#[command(about = "Generate disaster-recovery Spring profiles and push them to the config repository")]
pub struct CliConfig {
    /// Optional TOML run file; command line flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Local checkout of the configuration repository
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Services to process, e.g. HMT,SCM
    #[arg(long, value_delimiter = ',')]
    pub services: Option<Vec<String>>,

    #[arg(long)]
    pub remote: Option<String>,

    #[arg(long)]
    pub commit_message: Option<String>,

    /// Write the DR files but do not commit or push
    #[arg(long)]
    pub no_publish: bool,

    /// Patch and log only; nothing is written or pushed
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 預設值 < TOML 檔 < 命令列參數
    pub fn settings(&self) -> Result<RunSettings> {
        let mut settings = RunSettings::default();

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading run configuration from: {}", path.display());
            settings.apply_file(&RunFile::from_file(path)?);
        }

        if let Some(dir) = &self.working_dir {
            settings.working_dir = dir.clone();
        }
        if let Some(services) = &self.services {
            settings.services = services
                .iter()
                .map(|s| ServiceId::new(s.trim()))
                .collect();
        }
        if let Some(remote) = &self.remote {
            settings.remote = remote.clone();
        }
        if let Some(message) = &self.commit_message {
            settings.commit_message = message.clone();
        }
        if self.no_publish {
            settings.publish = false;
        }
        settings.dry_run = self.dry_run;
        settings.absolutize_working_dir()?;

        Ok(settings)
    }
}
