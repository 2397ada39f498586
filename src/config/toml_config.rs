use crate::config::environment::ProcessEnv;
use crate::domain::ports::EnvSource;
use crate::utils::error::{DrError, Result};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::path::Path;

/// Optional TOML run file, e.g.
///
/// ```toml
/// working_dir = "/tmp/spring-cloud-config/"
/// services = ["ADD_ON", "HMT", "SCM", "STOREFRONT"]
///
/// [publish]
/// enabled = true
/// remote = "origin"
/// commit_message = "ARGO_WORKFLOW_AUTOMATION: ..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunFile {
    pub working_dir: Option<String>,
    pub services: Option<Vec<String>>,
    pub publish: Option<PublishSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishSection {
    pub enabled: Option<bool>,
    pub remote: Option<String>,
    pub commit_message: Option<String>,
}

impl RunFile {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DrError::io(path.display().to_string(), e))?;
        Self::from_toml_str(&content, &ProcessEnv)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str<E: EnvSource>(content: &str, env: &E) -> Result<Self> {
        let processed = substitute_env_vars(content, env);
        toml::from_str(&processed)
            .map_err(|e| DrError::config(format!("TOML parsing error: {}", e)))
    }
}

/// 替換環境變數 (例如 ${WORKSPACE})，未設定的保持原樣
fn substitute_env_vars<E: EnvSource>(content: &str, env: &E) -> String {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    re.replace_all(content, |caps: &Captures| {
        env.get(&caps[1])
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
