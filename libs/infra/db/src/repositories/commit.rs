// [libs/infra/db/src/repositories/commit.rs]
/*!
 * APARATO: COMMIT ENGINE (C9)
 * RESPONSABILIDAD: INSERT ATÓMICO MAESTRO+DETALLE Y ACTUALIZACIÓN DE EXPIRACIÓN (§4.9).
 *
 * Corazón de la garantía exactly-once: una única transacción por lote. Un
 * choque contra la restricción única `(sim, folio)` se trata como éxito
 * idempotente (I2) y NO aborta la transacción; cualquier otro fallo sí,
 * y el lote completo vuelve a `db_insertion_failed_pending_recovery`.
 */

use crate::client::RechargeDbClient;
use crate::errors::DbError;
use libsql::params;
use tracing::{info, instrument, warn};

/// Tabla de dispositivos cuya columna de expiración este commit debe tocar.
#[derive(Debug, Clone, Copy)]
pub enum DeviceTable {
    DispositivosGps,
    VozSubscripciones,
    AgentesEmpresa,
}

impl DeviceTable {
    /// `None` para `AgentesEmpresa`: el saldo del agente vive en una base
    /// lógica distinta (§4.9.1) y se actualiza en un paso posterior al
    /// commit, no dentro de esta transacción.
    fn update_sql(self) -> Option<&'static str> {
        match self {
            DeviceTable::DispositivosGps => Some("UPDATE dispositivos_gps SET unix_saldo = ?1 WHERE sim = ?2"),
            DeviceTable::VozSubscripciones => Some("UPDATE voz_subscripciones SET expires_at = ?1 WHERE sim = ?2"),
            DeviceTable::AgentesEmpresa => None,
        }
    }
}

pub struct DetailInput {
    pub sim: String,
    pub amount: i64,
    pub device: String,
    pub vehicle: String,
    pub detail_text: String,
    pub folio: String,
    pub new_expires_at: i64,
    pub device_table: DeviceTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Committed,
    Duplicate,
}

pub struct CommitResult {
    pub master_id: String,
    pub outcomes: Vec<(String, DetailOutcome)>,
}

pub struct CommitRepository {
    client: RechargeDbClient,
}

impl CommitRepository {
    pub fn new(client: RechargeDbClient) -> Self {
        Self { client }
    }

    /// Ejecuta el commit atómico de un lote no vacío de items. `is_recovery`
    /// sólo afecta el texto de la nota (ya formateado por el llamador);
    /// el comportamiento transaccional es idéntico.
    ///
    /// El maestro (`recargas`/`recharge_analytics`) sólo se inserta si al
    /// menos un detalle aterriza de verdad; un lote íntegramente duplicado
    /// (replay de recuperación, S6/P2) no deja huérfanos: se revierte la
    /// transacción sin escribir maestro.
    #[instrument(skip(self, details, note))]
    pub async fn commit_batch(
        &self,
        master_id: &str,
        now: i64,
        type_literal: &str,
        provider: &str,
        note: &str,
        details: &[DetailInput],
    ) -> Result<CommitResult, DbError> {
        let connection = self.client.get_connection()?;
        let tx = connection.transaction().await.map_err(|_| DbError::TransactionError)?;

        let mut outcomes = Vec::with_capacity(details.len());
        let mut committed_total: i64 = 0;

        for detail in details {
            let insert_result = tx
                .execute(
                    "INSERT INTO detalle_recargas (master_id, sim, amount, dispositivo, vehiculo, detalle, folio, status)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)",
                    params![
                        master_id,
                        detail.sim.clone(),
                        detail.amount,
                        detail.device.clone(),
                        detail.vehicle.clone(),
                        detail.detail_text.clone(),
                        detail.folio.clone()
                    ],
                )
                .await;

            match insert_result {
                Ok(_) => {
                    if let Some(sql) = detail.device_table.update_sql() {
                        tx.execute(sql, params![detail.new_expires_at, detail.sim.clone()])
                            .await
                            .map_err(DbError::QueryError)?;
                    }
                    committed_total += detail.amount;
                    outcomes.push((detail.sim.clone(), DetailOutcome::Committed));
                }
                Err(e) if is_unique_violation(&e) => {
                    warn!("♻️  [COMMIT]: duplicate (sim, folio) for sim={} folio={} — treated as idempotent success", detail.sim, detail.folio);
                    outcomes.push((detail.sim.clone(), DetailOutcome::Duplicate));
                }
                Err(e) => {
                    return Err(DbError::QueryError(e));
                }
            }
        }

        let any_committed = outcomes.iter().any(|(_, o)| *o == DetailOutcome::Committed);
        if !any_committed {
            tx.rollback().await.map_err(|_| DbError::TransactionError)?;
            info!("♻️  [COMMIT]: batch [{}] was entirely duplicate — no master row created (S6)", master_id);
            return Ok(CommitResult { master_id: master_id.to_string(), outcomes });
        }

        tx.execute(
            "INSERT INTO recargas (id, total, ts, note, actor, provider, tipo) VALUES (?1, ?2, ?3, ?4, 'recharge-engine', ?5, ?6)",
            params![master_id, committed_total, now, note, provider, type_literal],
        )
        .await
        .map_err(DbError::QueryError)?;

        tx.execute(
            "INSERT INTO recharge_analytics (master_id, created_at) VALUES (?1, ?2)",
            params![master_id, now],
        )
        .await
        .map_err(DbError::QueryError)?;

        tx.commit().await.map_err(|_| DbError::TransactionError)?;

        let committed_count = outcomes.iter().filter(|(_, o)| *o == DetailOutcome::Committed).count();
        info!("✅ [COMMIT]: master [{}] sealed with {} detail row(s)", master_id, committed_count);
        Ok(CommitResult { master_id: master_id.to_string(), outcomes })
    }

    /// Paso posterior al commit, independiente de la transacción de
    /// facturación (§4.9.1: "not co-transactional … billing transaction
    /// commits first; agent-balance update follows"). Idempotente: una
    /// repetición tras fallo parcial simplemente vuelve a escribir el mismo
    /// valor final.
    #[instrument(skip(self))]
    pub async fn update_agent_balance(&self, sim: &str, new_expires_at: i64, now: i64) -> Result<(), DbError> {
        let connection = self.client.get_connection()?;

        connection
            .execute("UPDATE agentes_empresa SET balance_expires_at = ?1 WHERE sim = ?2", params![new_expires_at, sim])
            .await
            .map_err(DbError::QueryError)?;

        connection
            .execute(
                "INSERT INTO agentes_balance (sim, fecha_saldo) VALUES (?1, ?2)
                 ON CONFLICT(sim) DO UPDATE SET fecha_saldo = excluded.fecha_saldo",
                params![sim, now],
            )
            .await
            .map_err(DbError::QueryError)?;

        Ok(())
    }
}

fn is_unique_violation(error: &libsql::Error) -> bool {
    error.to_string().to_uppercase().contains("UNIQUE CONSTRAINT")
}
