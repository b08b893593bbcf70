use std::time::Duration;

use clap::Args;

pub const DEFAULT_PNCP_API_URL: &str = "https://pncp.gov.br/api/pncp/v1";

/// Database settings, read once at startup from the `DB__*` environment variables
#[derive(Args, Clone, Debug)]
pub struct DatabaseConfig {
    #[clap(long = "db-host", env = "DB__HOST", default_value = "localhost")]
    pub host: String,
    #[clap(long = "db-port", env = "DB__PORT", default_value_t = 5432)]
    pub port: u16,
    #[clap(long = "db-username", env = "DB__USERNAME", default_value = "postgres")]
    pub username: String,
    #[clap(
        long = "db-password",
        env = "DB__PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,
    #[clap(long = "db-name", env = "DB__NAME", default_value = "pncp")]
    pub name: String,
    /// Full connection URL; takes precedence over the individual settings
    #[clap(long = "database-url", env = "DATABASE_URL")]
    pub url: Option<String>,
}

impl DatabaseConfig {
    /// Postgres URL assembled from the parts; user, password and database
    /// name are percent-encoded so any character is accepted
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        let username = urlencoding::encode(&self.username);
        let name = urlencoding::encode(&self.name);
        if self.password.is_empty() {
            format!(
                "postgres://{}@{}:{}/{}",
                username, self.host, self.port, name
            )
        } else {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                username,
                urlencoding::encode(&self.password),
                self.host,
                self.port,
                name
            )
        }
    }

    /// Connection URL safe to log
    pub fn redacted_url(&self) -> String {
        if self.url.is_some() {
            return "<DATABASE_URL>".to_string();
        }
        format!(
            "postgres://{}@{}:{}/{}",
            self.username, self.host, self.port, self.name
        )
    }
}

#[derive(Args, Clone, Debug)]
pub struct PncpApiConfig {
    #[clap(long = "pncp-api-url", env = "PNCP__API_URL", default_value = DEFAULT_PNCP_API_URL)]
    pub base_url: String,
    #[clap(long = "pncp-timeout-secs", env = "PNCP__TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl PncpApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PncpApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PNCP_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct AppConfig {
    #[clap(short, long, default_value = "8000")]
    pub port: u16,
    #[clap(long)]
    pub cors_origin: Option<String>,
    /// Largest accepted request body, uploads included
    #[clap(long, env = "PNCP__MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
    #[clap(flatten)]
    pub database: DatabaseConfig,
    #[clap(flatten)]
    pub pncp_api: PncpApiConfig,
}
