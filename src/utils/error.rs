use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrError {
    #[error("Missing required environment variable: {name}")]
    MissingEnv { name: String },

    #[error("Invalid value for environment variable {name}='{value}': {reason}")]
    InvalidEnv {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Invalid service file path '{path}': {reason}")]
    InvalidServicePath { path: String, reason: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error in {path}: {source}")]
    YamlParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("YAML serialization error for {path}: {source}")]
    YamlSerialize {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unexpected document shape at '{field}': {reason}")]
    DocumentShape { field: String, reason: String },

    #[error("Invalid datasource URL '{url}': {reason}")]
    InvalidDatasourceUrl { url: String, reason: String },

    #[error("git {command} failed: {detail}")]
    Git { command: String, detail: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error for {field}='{value}': {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Document,
    Filesystem,
    Publish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 設定錯誤，修正環境或參數後可重跑
    Medium,
    /// 單一服務的文件無法處理
    High,
    /// 檔案系統或版本控制失敗
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl DrError {
    pub fn config(message: impl Into<String>) -> Self {
        DrError::Config {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        DrError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DrError::MissingEnv { .. }
            | DrError::InvalidEnv { .. }
            | DrError::InvalidServicePath { .. }
            | DrError::Config { .. }
            | DrError::Validation { .. } => ErrorCategory::Configuration,
            DrError::YamlParse { .. }
            | DrError::YamlSerialize { .. }
            | DrError::DocumentShape { .. }
            | DrError::InvalidDatasourceUrl { .. } => ErrorCategory::Document,
            DrError::Io { .. } => ErrorCategory::Filesystem,
            DrError::Git { .. } => ErrorCategory::Publish,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Document => ErrorSeverity::High,
            ErrorCategory::Filesystem | ErrorCategory::Publish => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DrError::MissingEnv { name } => {
                format!("Set {} in the workflow environment and re-run", name)
            }
            DrError::InvalidEnv { name, .. } => {
                format!("Check the value of {} in the workflow environment", name)
            }
            DrError::InvalidServicePath { .. } => {
                "Service file paths must look like <dir>/<app-name>-<profile>.yaml".to_string()
            }
            DrError::Io { path, .. } => {
                format!("Check that {} exists and the checkout is writable", path)
            }
            DrError::YamlParse { path, .. } => format!("Fix the YAML syntax in {}", path),
            DrError::YamlSerialize { .. } => {
                "The patched document could not be rendered; inspect its values".to_string()
            }
            DrError::DocumentShape { field, .. } => {
                format!("Make '{}' a mapping or remove it from the document", field)
            }
            DrError::InvalidDatasourceUrl { .. } => {
                "Use the form jdbc:postgresql://<host>:<port>/<database>".to_string()
            }
            DrError::Git { .. } => {
                "Check the checkout, git credentials and the remote; local DR files were left in place"
                    .to_string()
            }
            DrError::Config { .. } | DrError::Validation { .. } => {
                "Review the command line arguments and the run configuration file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Document => format!("Could not patch configuration document: {}", self),
            ErrorCategory::Filesystem => format!("File access failed: {}", self),
            ErrorCategory::Publish => format!("Publishing to the config repository failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DrError>;
