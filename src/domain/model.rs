use std::fmt;
use std::path::PathBuf;

/// Short uppercase token naming one service, e.g. `HMT` or `ADD_ON`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_path_var(&self) -> String {
        format!("{}_FILE_PATH", self.0)
    }

    pub fn rds_endpoint_var(&self) -> String {
        format!("{}_RDS_ENDPOINT", self.0)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared-cluster endpoints, read once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet {
    pub cache: String,
    pub broker: String,
    pub warehouse: String,
    pub search: String,
}

/// 由服務設定檔路徑拆解出來的資訊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFile {
    pub source: PathBuf,
    /// Everything up to and including the last `/`.
    pub directory: String,
    pub file_name: String,
    /// File name up to and including its last `-`.
    pub app_name: String,
}

impl ServiceFile {
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}dr.yaml", self.directory, self.app_name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTarget {
    pub service: ServiceId,
    pub file: ServiceFile,
    pub rds_endpoint: Option<String>,
}

/// Everything resolved from the environment before any file is touched.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub endpoints: EndpointSet,
    pub targets: Vec<ServiceTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    DatabaseUrl,
    CacheHost,
    BrokerAddress,
    SearchHosts,
    WarehouseUrl,
}

impl Rewrite {
    pub fn field(self) -> &'static str {
        match self {
            Rewrite::DatabaseUrl => "spring.datasource.url",
            Rewrite::CacheHost => "spring.redis.host",
            Rewrite::BrokerAddress => "kafka.server.address",
            Rewrite::SearchHosts => "elasticsearch.hosts",
            Rewrite::WarehouseUrl => "redshift.datasource.url",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub applied: Vec<Rewrite>,
    pub skipped: Vec<Rewrite>,
}

impl PatchReport {
    pub fn was_applied(&self, rewrite: Rewrite) -> bool {
        self.applied.contains(&rewrite)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOutcome {
    pub service: ServiceId,
    pub output: PathBuf,
    pub report: PatchReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Pushed,
    NothingToCommit,
    Disabled,
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub services: Vec<ServiceOutcome>,
    pub publish: PublishOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_env_var_names() {
        let service = ServiceId::new("ADD_ON");
        assert_eq!(service.file_path_var(), "ADD_ON_FILE_PATH");
        assert_eq!(service.rds_endpoint_var(), "ADD_ON_RDS_ENDPOINT");
    }

    #[test]
    fn test_output_path_is_sibling() {
        let file = ServiceFile {
            source: PathBuf::from("/repo/hmt/hmt-service-prod.yaml"),
            directory: "/repo/hmt/".to_string(),
            file_name: "hmt-service-prod.yaml".to_string(),
            app_name: "hmt-service-".to_string(),
        };
        assert_eq!(
            file.output_path(),
            PathBuf::from("/repo/hmt/hmt-service-dr.yaml")
        );
    }
}
