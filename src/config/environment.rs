use crate::core::paths;
use crate::domain::model::{EndpointSet, RunPlan, ServiceId, ServiceTarget};
use crate::domain::ports::EnvSource;
use crate::utils::error::{DrError, Result};
use crate::utils::validation;
use std::path::Path;

pub const REDIS_CLUSTER_ENDPOINT: &str = "REDIS_CLUSTER_ENDPOINT";
pub const KAFKA_CLUSTER_ENDPOINT: &str = "KAFKA_CLUSTER_ENDPOINT";
pub const REDSHIFT_CLUSTER_ENDPOINT: &str = "REDSHIFT_CLUSTER_ENDPOINT";
pub const ES_CLUSTER_ENDPOINT: &str = "ES_CLUSTER_ENDPOINT";

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

pub struct EnvironmentResolver<'a, E: EnvSource> {
    env: &'a E,
}

impl<'a, E: EnvSource> EnvironmentResolver<'a, E> {
    pub fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// 空字串視為未設定
    fn optional(&self, name: &str) -> Option<String> {
        self.env
            .get(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &str) -> Result<String> {
        self.optional(name).ok_or_else(|| DrError::MissingEnv {
            name: name.to_string(),
        })
    }

    fn endpoint(&self, name: &str) -> Result<String> {
        let value = self.required(name)?;
        validation::validate_placeholder_default(name, &value)
            .map_err(|e| invalid_env(name, &value, e))?;
        Ok(value)
    }

    pub fn endpoints(&self) -> Result<EndpointSet> {
        Ok(EndpointSet {
            cache: self.endpoint(REDIS_CLUSTER_ENDPOINT)?,
            broker: self.endpoint(KAFKA_CLUSTER_ENDPOINT)?,
            warehouse: self.endpoint(REDSHIFT_CLUSTER_ENDPOINT)?,
            search: self.endpoint(ES_CLUSTER_ENDPOINT)?,
        })
    }

    /// Relative file paths are taken from the working directory.
    pub fn target(&self, service: &ServiceId, working_dir: &Path) -> Result<ServiceTarget> {
        let path_var = service.file_path_var();
        let raw_path = self.required(&path_var)?;
        let full_path = if Path::new(&raw_path).is_absolute() {
            raw_path
        } else {
            working_dir.join(&raw_path).to_string_lossy().into_owned()
        };
        let file = paths::decompose(&full_path)?;

        let rds_var = service.rds_endpoint_var();
        let rds_endpoint = match self.optional(&rds_var) {
            Some(endpoint) => {
                validation::validate_host(&rds_var, &endpoint)
                    .map_err(|e| invalid_env(&rds_var, &endpoint, e))?;
                Some(endpoint)
            }
            None => None,
        };

        Ok(ServiceTarget {
            service: service.clone(),
            file,
            rds_endpoint,
        })
    }

    /// Resolves every service before any document is read.
    pub fn plan(&self, services: &[ServiceId], working_dir: &Path) -> Result<RunPlan> {
        let endpoints = self.endpoints()?;
        let targets = services
            .iter()
            .map(|service| self.target(service, working_dir))
            .collect::<Result<Vec<_>>>()?;
        Ok(RunPlan { endpoints, targets })
    }
}

fn invalid_env(name: &str, value: &str, cause: DrError) -> DrError {
    let reason = match cause {
        DrError::Validation { reason, .. } => reason,
        other => other.to_string(),
    };
    DrError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
        reason,
    }
}
