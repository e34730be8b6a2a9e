const DEFAULT_DATABASE_URL: &str = "sqlite://crm.db?mode=rwc";
const DEFAULT_SECRET_KEY: &str = "crm-secret-key-2024";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Environment-driven configuration; every value has a hardcoded default.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Config {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            secret_key: std::env::var("SECRET_KEY")
                .unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string()),
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port,
        }
    }

    /// In-memory store, used by tests.
    pub fn for_tests() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: 0,
        }
    }
}
