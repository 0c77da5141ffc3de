//! Shared application state

use std::sync::Arc;

use crate::BoxError;
use crate::auth::JwtService;
use crate::config::Config;
use crate::db::DbService;
use crate::seating::SeatingEngine;

#[derive(Clone)]
pub struct AppState {
    pub db: DbService,
    /// Single entry point for seat mutations
    pub engine: SeatingEngine,
    pub jwt: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbService, config: Config) -> Self {
        Self {
            engine: SeatingEngine::new(db.pool.clone()),
            jwt: Arc::new(JwtService::new(&config.jwt_secret, config.jwt_expiry_hours)),
            db,
            config: Arc::new(config),
        }
    }

    /// Open the configured database and build the state around it
    pub async fn initialize(config: Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_url, config.db_max_connections).await?;
        Ok(Self::new(db, config))
    }
}
