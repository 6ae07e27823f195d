// [libs/infra/db/src/repositories/verifier.rs]
/*!
 * APARATO: VERIFIER (C10)
 * RESPONSABILIDAD: LECTURA POST-COMMIT PARA CONFIRMAR DURABILIDAD (§4.10).
 *
 * Tras el `COMMIT` de C9, cada item del lote se relee por `(sim, folio)`.
 * Los encontrados se consideran durables; los ausentes (fallo de réplica,
 * lectura contra un reemplazo que aún no alcanzó consistencia) quedan
 * marcados para recuperación en el próximo ciclo.
 */

use crate::client::RechargeDbClient;
use crate::errors::DbError;
use libsql::params;
use tracing::instrument;

pub struct VerifierRepository {
    client: RechargeDbClient,
}

impl VerifierRepository {
    pub fn new(client: RechargeDbClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn exists(&self, sim: &str, folio: &str) -> Result<bool, DbError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query("SELECT 1 FROM detalle_recargas WHERE sim = ?1 AND folio = ?2 LIMIT 1", params![sim, folio])
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Verifica un lote completo, retornando el subconjunto `(sim, folio)`
    /// que NO se pudo confirmar durable.
    pub async fn verify_batch(&self, items: &[(String, String)]) -> Result<Vec<(String, String)>, DbError> {
        let mut unverified = Vec::new();
        for (sim, folio) in items {
            if !self.exists(sim, folio).await? {
                unverified.push((sim.clone(), folio.clone()));
            }
        }
        Ok(unverified)
    }
}
