use regex::Regex;
use std::sync::OnceLock;

pub const DB_HOST_PLACEHOLDER: &str = "DB_HOST";
pub const POSTGRES_SUBPROTOCOL: &str = "postgresql";
pub const POSTGRES_PORT: u16 = 5432;

fn wrapped_placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\$\{[A-Za-z0-9_.\-]+:(.*)\}$").unwrap())
}

/// `${SPRING_DATASOURCE_URL:jdbc:...}` yields its default, anything else is returned as is.
fn unwrap_placeholder(raw: &str) -> &str {
    match wrapped_placeholder().captures(raw).and_then(|caps| caps.get(1)) {
        Some(default) => default.as_str(),
        None => raw,
    }
}

/// A JDBC connection string split into the parts the DR rewrite cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdbcUrl {
    pub subprotocol: String,
    pub authority: String,
    pub database: String,
    pub query: Option<String>,
}

impl JdbcUrl {
    /// Parses `[jdbc:][<subprotocol>://]<authority>/<path>[?query]`, optionally
    /// wrapped in a `${NAME:...}` placeholder.
    ///
    /// The database is the last segment of the path. Returns `None` when
    /// there is no database segment to keep.
    pub fn parse(raw: &str) -> Option<Self> {
        let unwrapped = unwrap_placeholder(raw.trim());
        let (location, query) = match unwrapped.split_once('?') {
            Some((location, query)) => (location, Some(query.to_string())),
            None => (unwrapped, None),
        };

        let body = location.strip_prefix("jdbc:").unwrap_or(location);
        let (subprotocol, rest) = match body.split_once("://") {
            Some((subprotocol, rest)) if !subprotocol.is_empty() => (subprotocol, rest),
            _ => (POSTGRES_SUBPROTOCOL, body),
        };

        let (authority, path) = rest.split_once('/')?;
        let mut database = path.rsplit('/').next().unwrap_or_default();
        // `${DB_HOST:host:5432/db}` left by older runs closes its brace after the database
        if authority.contains("${") && !authority.contains('}') {
            database = database.strip_suffix('}').unwrap_or(database);
        }
        if database.is_empty() {
            return None;
        }

        Some(Self {
            subprotocol: subprotocol.to_string(),
            authority: authority.to_string(),
            database: database.to_string(),
            query,
        })
    }

    /// Points the URL at `${DB_HOST:<endpoint>}:5432`, keeping database and query.
    pub fn with_db_host_placeholder(&self, endpoint: &str) -> Self {
        Self {
            subprotocol: POSTGRES_SUBPROTOCOL.to_string(),
            authority: format!("${{{}:{}}}:{}", DB_HOST_PLACEHOLDER, endpoint, POSTGRES_PORT),
            database: self.database.clone(),
            query: self.query.clone(),
        }
    }
}

impl std::fmt::Display for JdbcUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "jdbc:{}://{}/{}",
            self.subprotocol, self.authority, self.database
        )?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

/// Rewrites a datasource URL onto the shared database endpoint.
///
/// `None` means the URL has no database name and is left alone.
pub fn rewrite_datasource_url(raw: &str, endpoint: &str) -> Option<String> {
    JdbcUrl::parse(raw).map(|url| url.with_db_host_placeholder(endpoint).to_string())
}
