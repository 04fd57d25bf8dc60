use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Build a lazily-connecting pool; the first query opens the connection.
    pub fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = config.connect_options()?;

        info!(
            host = %options.get_host(),
            port = options.get_port(),
            database = ?options.get_database(),
            max_connections = config.max_connections,
            "Scheduler database pool configured"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
