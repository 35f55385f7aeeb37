/// Application configuration module
use anyhow::Context;
use std::env;
use url::Url;

pub const DEFAULT_SERVER_HOST: &str = "http://localhost:8000";
pub const DEFAULT_API_VERSION: &str = "v1.0.0@latest (2022-06-24)";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub server_host: Url,
    pub bind_addr: String,
    pub api_v1_str: String,
    pub api_version: String,
    pub project_name: String,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.into());
        let server_host = Url::parse(&server_host)
            .with_context(|| format!("SERVER_HOST is not a valid URL: {server_host}"))?;

        let cors_origins = parse_origins(
            &env::var("BACKEND_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            server_host,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            api_v1_str: env::var("API_V1_STR").unwrap_or_else(|_| "/api/v1".to_string()),
            api_version: env::var("API_VERSION").unwrap_or_else(|_| DEFAULT_API_VERSION.into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "Perseus".to_string()),
            environment: env::var("PROJECT_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            cors_origins,
            max_connections: env_u32("DB_MAX_CONNECTIONS", 5),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Database URL to connect with; production connections require TLS.
    pub fn connect_url(&self) -> anyhow::Result<String> {
        let url = self
            .database_url
            .clone()
            .context("DATABASE_URL is required")?;

        if !self.is_production() || url.contains("sslmode=") {
            return Ok(url);
        }

        let separator = if url.contains('?') { '&' } else { '?' };
        Ok(format!("{url}{separator}sslmode=require"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            server_host: Url::parse(DEFAULT_SERVER_HOST).expect("default host is a valid URL"),
            bind_addr: "0.0.0.0:8000".to_string(),
            api_v1_str: "/api/v1".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            project_name: "Perseus".to_string(),
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_connections: 5,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|s| s.trim().trim_matches('"').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
