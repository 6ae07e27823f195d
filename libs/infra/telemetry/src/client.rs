// [libs/infra/telemetry/src/client.rs]
/*!
 * =================================================================
 * APARATO: ELIOT TELEMETRY PORT
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: RESOLVER EL ÚLTIMO REPORTE POR `uuid` (§4.7)
 *
 * El agente ELIoT vive en una colección `metricas` fuera de la base
 * relacional; en vez de cargar un driver dedicado sin precedente en el
 * stack, este puerto habla HTTP contra el servicio que ya expone esa
 * colección, devolviendo el mismo dato (`lastReport`, Unix seconds) que
 * el selector de GPS obtiene por SQL.
 * =================================================================
 */

use crate::errors::TelemetryError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

#[derive(Deserialize)]
struct LastReportResponse {
    #[serde(rename = "lastReport")]
    last_report: Option<i64>,
}

pub struct TelemetryClient {
    http: Client,
    base_endpoint: String,
}

impl TelemetryClient {
    pub fn new(base_url: String, secret_token: String) -> Self {
        let mut header_map = reqwest::header::HeaderMap::new();
        let auth_value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", secret_token))
            .expect("CRITICAL: invalid telemetry auth token format");
        header_map.insert(reqwest::header::AUTHORIZATION, auth_value);

        Self {
            http: Client::builder()
                .default_headers(header_map)
                .user_agent("recharge-engine/1.0")
                .timeout(Duration::from_secs(10))
                .build()
                .expect("FATAL: telemetry http client initialization failed"),
            base_endpoint: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Consulta el último reporte de un único agente por `uuid`. `None`
    /// significa que el agente nunca reportó (fail-safe: el llamador debe
    /// tratar esto como "siempre a recargar", per §4.8).
    #[instrument(skip(self))]
    pub async fn last_report(&self, uuid: &str) -> Result<Option<i64>, TelemetryError> {
        let url = format!("{}/api/v1/metricas/{}/last-report", self.base_endpoint, uuid);
        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if response.status() != StatusCode::OK {
            return Err(TelemetryError::ServiceRejected(format!("HTTP_{}", response.status())));
        }

        let body: Value = response.json().await.map_err(|e| TelemetryError::DecodeFault(e.to_string()))?;
        let parsed: LastReportResponse =
            serde_json::from_value(body).map_err(|e| TelemetryError::DecodeFault(e.to_string()))?;
        Ok(parsed.last_report)
    }

    /// Resuelve el último reporte de un lote de `uuid`s, preservando el
    /// orden de entrada. Cada entrada ausente se resuelve a `None` en vez
    /// de abortar el lote completo.
    pub async fn last_report_batch(&self, uuids: &[String]) -> Result<Vec<Option<i64>>, TelemetryError> {
        let mut results = Vec::with_capacity(uuids.len());
        for uuid in uuids {
            results.push(self.last_report(uuid).await?);
        }
        Ok(results)
    }
}
