use db::DBService;

pub mod config;
pub mod error;
pub mod http;
pub mod response;
pub mod routes;
pub mod seed;

pub use config::Config;

/// Shared application state handed to every handler. Carries the explicit
/// persistence handle instead of a process-global store.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> Result<AppState, db::DbErr> {
        let db = DBService::new(&config.database_url).await?;
        Ok(AppState { db, config })
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
