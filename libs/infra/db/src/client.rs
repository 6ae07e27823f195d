// [libs/infra/db/src/client.rs]
/*!
 * APARATO: DATABASE CONNECTION CLIENT
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GESTIÓN DE ENLACES Y BOOTSTRAP DE ESQUEMA
 */

use crate::errors::DbError;
use crate::schema::apply_full_schema;
use libsql::{Builder, Connection, Database};
use std::sync::Arc;
use tracing::{error, info, instrument};

#[derive(Clone)]
pub struct RechargeDbClient {
    driver: Arc<Database>,
    /// Mantiene viva la base de datos en memoria; sin esto SQLite la purga
    /// en cuanto la última conexión se suelta.
    _memory_anchor: Option<Arc<Connection>>,
}

impl RechargeDbClient {
    #[instrument(skip(access_token))]
    pub async fn connect(connection_url: &str, access_token: Option<String>) -> Result<Self, DbError> {
        if connection_url.is_empty() {
            return Err(DbError::ConfigurationError("DATABASE_URL is empty".into()));
        }

        info!("🔌 [DATABASE]: connecting to [{}]", connection_url);

        let is_remote = connection_url.starts_with("libsql://") || connection_url.starts_with("https://");
        let is_memory = connection_url.contains(":memory:") || connection_url.contains("mode=memory");

        let driver = if is_remote {
            let token = access_token
                .ok_or_else(|| DbError::ConfigurationError("remote access token missing".into()))?;
            Builder::new_remote(connection_url.to_string(), token).build().await
        } else {
            Builder::new_local(connection_url).build().await
        }
        .map_err(|e| DbError::ConnectionError(e.to_string()))?;

        let driver = Arc::new(driver);
        let mut anchor = None;

        if is_memory {
            let anchor_conn = driver.connect().map_err(|e| DbError::ConnectionError(e.to_string()))?;
            apply_full_schema(&anchor_conn).await.map_err(|e| DbError::ConnectionError(e.to_string()))?;
            anchor = Some(Arc::new(anchor_conn));
            info!("⚓ [DATABASE]: in-memory schema anchored.");
        } else {
            let bootstrap_conn = driver.connect().map_err(|e| DbError::ConnectionError(e.to_string()))?;
            apply_full_schema(&bootstrap_conn).await.map_err(|e| DbError::ConnectionError(e.to_string()))?;
        }

        Ok(Self { driver, _memory_anchor: anchor })
    }

    pub fn get_connection(&self) -> Result<Connection, DbError> {
        self.driver.connect().map_err(|e| {
            error!("⚠️ [POOL_FAULT]: connection allocation failed: {}", e);
            DbError::ConnectionError(e.to_string())
        })
    }
}
