use crate::core::jdbc;
use crate::domain::model::{EndpointSet, PatchReport, Rewrite};
use crate::utils::error::{DrError, Result};
use serde_yaml::{Mapping, Value};

pub const REDIS_HOST_PLACEHOLDER: &str = "REDIS_HOST";
pub const KAFKA_SERVER_PLACEHOLDER: &str = "KAFKA_SERVER";

/// `${NAME:default}` as understood by the Spring property resolver.
pub fn placeholder(name: &str, default: &str) -> String {
    format!("${{{}:{}}}", name, default)
}

/// Rewrites a Spring configuration document onto the shared DR endpoints.
///
/// Every rewrite touches its own path. A missing parent section means the
/// service does not use that resource and the rewrite is skipped; a parent
/// that exists but is not a mapping is an error.
pub struct DocumentPatcher<'a> {
    endpoints: &'a EndpointSet,
}

impl<'a> DocumentPatcher<'a> {
    pub fn new(endpoints: &'a EndpointSet) -> Self {
        Self { endpoints }
    }

    pub fn patch(&self, document: &mut Value, rds_endpoint: Option<&str>) -> Result<PatchReport> {
        let root = match document {
            Value::Mapping(root) => root,
            other => {
                return Err(DrError::DocumentShape {
                    field: "<root>".to_string(),
                    reason: format!("expected a mapping, found {}", kind(other)),
                })
            }
        };

        let mut report = PatchReport::default();

        let database = match rds_endpoint {
            Some(endpoint) => rewrite_database_url(root, endpoint)?,
            None => false,
        };
        record(&mut report, Rewrite::DatabaseUrl, database);

        let cache = set_leaf(
            root,
            &["spring", "redis"],
            "host",
            placeholder(REDIS_HOST_PLACEHOLDER, &self.endpoints.cache),
        )?;
        record(&mut report, Rewrite::CacheHost, cache);

        let broker = set_leaf(
            root,
            &["kafka", "server"],
            "address",
            placeholder(KAFKA_SERVER_PLACEHOLDER, &self.endpoints.broker),
        )?;
        record(&mut report, Rewrite::BrokerAddress, broker);

        // 搜尋與資料倉儲的消費端沒有 placeholder 覆寫機制，直接寫入值
        let search = set_leaf(
            root,
            &["elasticsearch"],
            "hosts",
            self.endpoints.search.clone(),
        )?;
        record(&mut report, Rewrite::SearchHosts, search);

        let warehouse = set_leaf(
            root,
            &["redshift", "datasource"],
            "url",
            self.endpoints.warehouse.clone(),
        )?;
        record(&mut report, Rewrite::WarehouseUrl, warehouse);

        Ok(report)
    }
}

fn record(report: &mut PatchReport, rewrite: Rewrite, applied: bool) {
    if applied {
        report.applied.push(rewrite);
    } else {
        tracing::debug!("Skipping {}: section not present", rewrite.field());
        report.skipped.push(rewrite);
    }
}

fn rewrite_database_url(root: &mut Mapping, endpoint: &str) -> Result<bool> {
    let Some(datasource) = parent_mapping(root, &["spring", "datasource"])? else {
        return Ok(false);
    };
    let Some(current) = datasource.get_mut("url") else {
        return Ok(false);
    };

    let rewritten = match current {
        Value::String(url) => match jdbc::rewrite_datasource_url(url, endpoint) {
            Some(rewritten) => rewritten,
            None => {
                tracing::warn!("Leaving datasource URL '{}' as is: no database name found", url);
                return Ok(false);
            }
        },
        other => {
            return Err(DrError::InvalidDatasourceUrl {
                url: format!("{:?}", other),
                reason: format!("expected a string, found {}", kind(other)),
            })
        }
    };
    *current = Value::String(rewritten);
    Ok(true)
}

/// Sets `leaf` under the mapping at `parents`, inserting it if absent.
fn set_leaf(root: &mut Mapping, parents: &[&str], leaf: &str, value: String) -> Result<bool> {
    match parent_mapping(root, parents)? {
        Some(parent) => {
            parent.insert(Value::String(leaf.to_string()), Value::String(value));
            Ok(true)
        }
        None => Ok(false),
    }
}

fn parent_mapping<'m>(root: &'m mut Mapping, path: &[&str]) -> Result<Option<&'m mut Mapping>> {
    let mut current = root;
    for (depth, key) in path.iter().enumerate() {
        let node = current;
        match node.get_mut(*key) {
            None => return Ok(None),
            Some(Value::Mapping(next)) => current = next,
            Some(other) => {
                return Err(DrError::DocumentShape {
                    field: path[..=depth].join("."),
                    reason: format!("expected a mapping, found {}", kind(other)),
                })
            }
        }
    }
    Ok(Some(current))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
