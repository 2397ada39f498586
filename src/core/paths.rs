use crate::domain::model::ServiceFile;
use crate::utils::error::{DrError, Result};
use std::path::PathBuf;

/// 拆解服務設定檔路徑：目錄、檔名、應用程式名稱前綴
///
/// `/repo/hmt/hmt-service-prod.yaml` becomes directory `/repo/hmt/`,
/// file name `hmt-service-prod.yaml` and app name `hmt-service-`.
pub fn decompose(full_path: &str) -> Result<ServiceFile> {
    let slash = full_path
        .rfind('/')
        .ok_or_else(|| invalid(full_path, "path has no '/' directory component"))?;
    let (directory, file_name) = full_path.split_at(slash + 1);

    if file_name.is_empty() {
        return Err(invalid(full_path, "path has no file name"));
    }

    let hyphen = file_name
        .rfind('-')
        .ok_or_else(|| invalid(full_path, "file name has no '-' before its profile suffix"))?;

    Ok(ServiceFile {
        source: PathBuf::from(full_path),
        directory: directory.to_string(),
        file_name: file_name.to_string(),
        app_name: file_name[..=hyphen].to_string(),
    })
}

fn invalid(path: &str, reason: &str) -> DrError {
    DrError::InvalidServicePath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
