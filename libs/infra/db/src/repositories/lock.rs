// [libs/infra/db/src/repositories/lock.rs]
/*!
 * APARATO: DISTRIBUTED LOCK REPOSITORY (C2)
 * RESPONSABILIDAD: GARANTÍA DE ESCRITOR ÚNICO POR SERVICIO (§4.2).
 *
 * El candado vive como una sola fila por `lock_key` en `distributed_locks`.
 * La adquisición es una única ráfaga `INSERT ... ON CONFLICT DO UPDATE`
 * condicionada a que el candado existente ya haya expirado — ningún
 * `SELECT` previo, ninguna ventana de carrera.
 */

use crate::client::RechargeDbClient;
use crate::errors::DbError;
use libsql::params;
use tracing::{info, instrument, warn};

pub struct LockRepository {
    client: RechargeDbClient,
}

impl LockRepository {
    pub fn new(client: RechargeDbClient) -> Self {
        Self { client }
    }

    /// Intenta tomar (o refrescar, si ya es dueño) el candado `lock_key`.
    /// Retorna `true` si quedó en posesión del llamador.
    #[instrument(skip(self, owner_token))]
    pub async fn acquire(&self, lock_key: &str, owner_token: &str, now: i64, ttl_seconds: i64) -> Result<bool, DbError> {
        let connection = self.client.get_connection()?;
        let expires_at = now + ttl_seconds;

        let rows_affected = connection
            .execute(
                "INSERT INTO distributed_locks (lock_key, owner_token, expires_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(lock_key) DO UPDATE SET
                     owner_token = excluded.owner_token,
                     expires_at = excluded.expires_at
                 WHERE distributed_locks.expires_at < ?4 OR distributed_locks.owner_token = ?2",
                params![lock_key, owner_token, expires_at, now],
            )
            .await?;

        if rows_affected > 0 {
            info!("🔒 [LOCK]: [{}] held by [{}] until {}", lock_key, owner_token, expires_at);
        } else {
            warn!("⛔ [LOCK]: [{}] busy, skipping this cycle", lock_key);
        }

        Ok(rows_affected > 0)
    }

    #[instrument(skip(self, owner_token))]
    pub async fn release(&self, lock_key: &str, owner_token: &str) -> Result<(), DbError> {
        let connection = self.client.get_connection()?;
        let rows_affected = connection
            .execute(
                "DELETE FROM distributed_locks WHERE lock_key = ?1 AND owner_token = ?2",
                params![lock_key, owner_token],
            )
            .await?;

        if rows_affected == 0 {
            return Err(DbError::LockNotHeld);
        }

        info!("🔓 [LOCK]: [{}] released by [{}]", lock_key, owner_token);
        Ok(())
    }
}
