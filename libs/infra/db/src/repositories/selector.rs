// [libs/infra/db/src/repositories/selector.rs]
/*!
 * APARATO: CANDIDATE SELECTOR (C7)
 * RESPONSABILIDAD: CONSULTAS SQL POR SERVICIO QUE PRODUCEN `(Device, RechargePlan)` (§4.7).
 *
 * GPS resuelve todo en una sola sentencia (join + anti-duplicado +
 * telemetría correlacionada). VOZ es una consulta de suscripción simple sin
 * telemetría. ELIoT consulta su vista de agentes locales; el enriquecimiento
 * de `lastReport` contra la colección de métricas vive fuera de este
 * repositorio (puerto HTTP en `recharge-infra-telemetry`), ya que esta capa
 * no debe conocer transporte de red.
 */

use crate::client::RechargeDbClient;
use crate::errors::DbError;
use libsql::params;
use recharge_domain_models::{Device, RechargePlan, RechargeState, ServiceKind};
use tracing::instrument;

pub struct CandidateSelector {
    client: RechargeDbClient,
}

/// Candidato ELIoT antes del enriquecimiento de telemetría — `uuid` es la
/// clave contra la cual se consulta `metricas`.
pub struct EliotCandidateRow {
    pub uuid: String,
    pub device: Device,
    pub plan: RechargePlan,
}

impl CandidateSelector {
    pub fn new(client: RechargeDbClient) -> Self {
        Self { client }
    }

    /// Selección GPS: join único, excluye tenants en lista negra y SIMs con
    /// detalle `rastreo` exitoso en la ventana anti-duplicado, computa
    /// `lastReport`/`minutesSinceReport`/`daysSinceReport` por subconsulta
    /// correlacionada, y conserva sólo filas con `daysSinceReport <= days_limit`.
    #[instrument(skip(self, blacklist_patterns))]
    pub async fn select_gps(
        &self,
        now: i64,
        end_of_today: i64,
        days_limit: i64,
        anti_duplicate_window_start: i64,
        blacklist_patterns: &[String],
        amount: i64,
        days: i64,
        product_code: &str,
    ) -> Result<Vec<(Device, RechargePlan)>, DbError> {
        let connection = self.client.get_connection()?;

        let blacklist_clause = blacklist_patterns
            .iter()
            .map(|_| "tenant NOT LIKE ?".to_string())
            .collect::<Vec<_>>()
            .join(" AND ");
        let blacklist_clause = if blacklist_clause.is_empty() { "1=1".to_string() } else { blacklist_clause };

        let sql = format!(
            "SELECT sim, descriptor, tenant, unix_saldo,
                    (SELECT MAX(reported_at) FROM track WHERE track.sim = dispositivos_gps.sim) AS last_report
             FROM dispositivos_gps
             WHERE prepaid = 1 AND active = 1 AND unix_saldo <= ?
               AND {blacklist}
               AND NOT EXISTS (
                   SELECT 1 FROM detalle_recargas dr
                   JOIN recargas r ON dr.master_id = r.id
                   WHERE dr.sim = dispositivos_gps.sim
                     AND r.tipo = 'rastreo'
                     AND dr.status = 1
                     AND r.ts >= ?
               )
             ORDER BY tenant, descriptor",
            blacklist = blacklist_clause
        );

        // El orden de los parámetros debe seguir el orden de aparición de los
        // placeholders en la sentencia: unix_saldo, patrones de lista negra, anti-duplicado.
        let mut ordered = vec![libsql::Value::Integer(end_of_today)];
        ordered.extend(blacklist_patterns.iter().cloned().map(libsql::Value::Text));
        ordered.push(libsql::Value::Integer(anti_duplicate_window_start));

        let mut rows = connection.query(&sql, libsql::params::Params::Positional(ordered)).await?;
        let mut out = Vec::new();

        while let Some(row) = rows.next().await? {
            let sim: String = row.get(0)?;
            let descriptor: String = row.get(1)?;
            let tenant: String = row.get(2)?;
            let expires_at: i64 = row.get(3)?;
            let last_report: Option<i64> = row.get(4).ok();

            let days_since_report = last_report.map(|r| (now - r).max(0) / 86_400);
            if let Some(d) = days_since_report {
                if d > days_limit {
                    continue;
                }
            }

            let device = Device {
                sim: sim.clone(),
                service: ServiceKind::Gps,
                descriptor,
                tenant,
                expires_at,
                last_report,
                package_code: None,
            };
            let state = RechargeState::classify(expires_at, now, end_of_today);
            let plan = RechargePlan { sim, amount, days, product_code: product_code.to_string(), state };
            out.push((device, plan));
        }

        Ok(out)
    }

    /// Selección VOZ: sin entrada de telemetría, restringida por código de
    /// paquete y vigencia de suscripción.
    #[instrument(skip(self))]
    pub async fn select_voz(&self, now: i64, end_of_today: i64) -> Result<Vec<(Device, RechargePlan)>, DbError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT sim, descriptor, tenant, package_code, expires_at
                 FROM voz_subscripciones
                 WHERE prepaid = 1 AND active = 1 AND expires_at <= ?1
                 ORDER BY tenant, descriptor",
                params![end_of_today],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let sim: String = row.get(0)?;
            let descriptor: String = row.get(1)?;
            let tenant: String = row.get(2)?;
            let package_code: String = row.get(3)?;
            let expires_at: i64 = row.get(4)?;

            let device = Device {
                sim: sim.clone(),
                service: ServiceKind::Voz,
                descriptor,
                tenant,
                expires_at,
                last_report: None,
                package_code: Some(package_code.clone()),
            };
            let state = RechargeState::classify(expires_at, now, end_of_today);
            // Monto/días VOZ se derivan del código de producto fuera de este repositorio.
            let plan = RechargePlan { sim, amount: 0, days: 0, product_code: package_code, state };
            out.push((device, plan));
        }

        Ok(out)
    }

    /// Selección ELIoT: vista `agentes_empresa` restringida a prepago +
    /// activo + comunicación GSM + `importe_recarga > 0` + vencido/por-vencer.
    /// `lastReport` se enriquece posteriormente contra `metricas`.
    #[instrument(skip(self))]
    pub async fn select_eliot(&self, now: i64, end_of_today: i64) -> Result<Vec<EliotCandidateRow>, DbError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT uuid, sim, descriptor, tenant, importe_recarga, dias_recarga, balance_expires_at
                 FROM agentes_empresa
                 WHERE prepaid = 1 AND active = 1 AND gsm = 1 AND importe_recarga > 0
                   AND balance_expires_at <= ?1
                 ORDER BY tenant, descriptor",
                params![end_of_today],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let uuid: String = row.get(0)?;
            let sim: String = row.get(1)?;
            let descriptor: String = row.get(2)?;
            let tenant: String = row.get(3)?;
            let importe_recarga: i64 = row.get(4)?;
            let dias_recarga: Option<i64> = row.get(5).ok();
            let expires_at: i64 = row.get(6)?;

            let device = Device {
                sim: sim.clone(),
                service: ServiceKind::Eliot,
                descriptor,
                tenant,
                expires_at,
                last_report: None,
                package_code: None,
            };
            let state = RechargeState::classify(expires_at, now, end_of_today);
            let plan = RechargePlan {
                sim,
                amount: importe_recarga,
                days: dias_recarga.unwrap_or(0),
                product_code: String::new(),
                state,
            };
            out.push(EliotCandidateRow { uuid, device, plan });
        }

        Ok(out)
    }
}
