#[cfg(feature = "cli")]
pub mod cli;
pub mod environment;
pub mod toml_config;

use crate::config::toml_config::RunFile;
use crate::domain::model::ServiceId;
use crate::utils::error::{DrError, Result};
use crate::utils::validation::{self, Validate};
use std::path::PathBuf;

pub const DEFAULT_WORKING_DIR: &str = "/tmp/spring-cloud-config/";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_COMMIT_MESSAGE: &str =
    "ARGO_WORKFLOW_AUTOMATION: Updating shared services properties for disaster recovery profiles";
pub const DEFAULT_SERVICES: &[&str] = &["ADD_ON", "HMT", "SCM", "STOREFRONT"];

/// Services with a Spring config in the config repository.
pub const KNOWN_SERVICES: &[&str] = &[
    "ARCS",
    "ADD_ON",
    "DARMA_LMR",
    "FRP_BATCH",
    "FRP_COMMON",
    "FRP_DB",
    "FRP_LOCATION",
    "IAM",
    "MKT",
    "MEDIATOR",
    "NOTIFICATION",
    "PE_DISCOUNT",
    "PE_ORDER",
    "PE_PAYMENT",
    "PE_TAX",
    "PE_MEDIATOR",
    "PE_BE",
    "RE",
    "HMT",
    "VALIDATE_ADDRESS",
    "ID_SERVICE",
    "RMS",
    "SCM",
    "STOREFRONT",
];

#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub working_dir: PathBuf,
    pub services: Vec<ServiceId>,
    pub remote: String,
    pub commit_message: String,
    pub publish: bool,
    pub dry_run: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from(DEFAULT_WORKING_DIR),
            services: DEFAULT_SERVICES.iter().map(|s| ServiceId::new(*s)).collect(),
            remote: DEFAULT_REMOTE.to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            publish: true,
            dry_run: false,
        }
    }
}

impl RunSettings {
    /// Overlays the values present in a run file.
    pub fn apply_file(&mut self, file: &RunFile) {
        if let Some(dir) = &file.working_dir {
            self.working_dir = PathBuf::from(dir);
        }
        if let Some(services) = &file.services {
            self.services = services.iter().map(ServiceId::new).collect();
        }
        if let Some(publish) = &file.publish {
            if let Some(enabled) = publish.enabled {
                self.publish = enabled;
            }
            if let Some(remote) = &publish.remote {
                self.remote = remote.clone();
            }
            if let Some(message) = &publish.commit_message {
                self.commit_message = message.clone();
            }
        }
    }

    /// Anchors a relative working directory at the current directory.
    pub fn absolutize_working_dir(&mut self) -> Result<()> {
        self.working_dir = std::path::absolute(&self.working_dir)
            .map_err(|e| DrError::io(self.working_dir.display().to_string(), e))?;
        Ok(())
    }

    pub fn unknown_services(&self) -> Vec<&ServiceId> {
        self.services
            .iter()
            .filter(|s| !KNOWN_SERVICES.contains(&s.as_str()))
            .collect()
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("working_dir", &self.working_dir.to_string_lossy())?;

        if self.services.is_empty() {
            return Err(DrError::Validation {
                field: "services".to_string(),
                value: String::new(),
                reason: "At least one service is required".to_string(),
            });
        }
        for service in &self.services {
            validation::validate_service_id("services", service.as_str())?;
        }
        validation::validate_unique("services", self.services.iter().map(ServiceId::as_str))?;

        validation::validate_non_empty_string("remote", &self.remote)?;
        validation::validate_non_empty_string("commit_message", &self.commit_message)?;
        Ok(())
    }
}
