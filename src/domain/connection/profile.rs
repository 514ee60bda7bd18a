use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_DATABASE: &str = "olist_ecommerce";

/// Target server coordinates and credentials.
///
/// There is deliberately no default user or password; both must come from
/// flags, environment, or the profile file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionProfile {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// For logging - password replaced with ****, user URL-encoded
    pub fn to_masked_dsn(&self) -> String {
        format!(
            "mysql://{}:****@{}:{}/{}",
            urlencoding::encode(&self.user),
            self.host,
            self.port,
            self.database
        )
    }
}
