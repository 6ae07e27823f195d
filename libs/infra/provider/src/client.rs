// [libs/infra/provider/src/client.rs]
/*!
 * =================================================================
 * APARATO: CARRIER UPLINK (C3)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CONSULTA DE SALDO Y COMPRA DE RECARGAS CONTRA TAECEL/MST (§4.3)
 *
 * La compra es la única llamada que gasta dinero en todo el sistema: se emite
 * exactamente cuando el llamador está listo para anclar el `AuxiliaryItem` de
 * inmediato (§4.3, I-no purchase without staging). Este módulo no decide
 * reintentos; eso es responsabilidad de `recharge-core-retry` en la capa que
 * invoca estos métodos.
 * =================================================================
 */

use crate::cache::BalanceCache;
use crate::errors::{classify_fault, ProviderError};
use recharge_domain_models::{ProviderFault, ProviderName, ProviderResponse};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, instrument, warn};

#[async_trait::async_trait]
pub trait ProviderClient: Send + Sync {
    fn name(&self) -> ProviderName;
    async fn balance(&self) -> Result<i64, ProviderError>;
    async fn purchase(&self, sim: &str, product_code: &str) -> Result<ProviderResponse, ProviderError>;
}

#[derive(Serialize)]
struct PurchasePayload<'a> {
    sim: &'a str,
    product_code: &'a str,
}

/// Cliente HTTP concreto para un carrier (TAECEL o MST comparten el mismo
/// contrato de wire, según §4.3; sólo difieren en endpoint base y token).
pub struct CarrierClient {
    provider: ProviderName,
    http: Client,
    base_endpoint: String,
    cache: BalanceCache,
}

impl CarrierClient {
    pub fn new(provider: ProviderName, base_url: String, secret_token: String) -> Self {
        let mut header_map = reqwest::header::HeaderMap::new();
        let auth_value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", secret_token))
            .expect("CRITICAL: invalid carrier auth token format");
        header_map.insert(reqwest::header::AUTHORIZATION, auth_value);

        Self {
            provider,
            http: Client::builder()
                .default_headers(header_map)
                .user_agent("recharge-engine/1.0")
                .timeout(Duration::from_secs(20))
                .build()
                .expect("FATAL: carrier http client initialization failed"),
            base_endpoint: base_url.trim_end_matches('/').to_string(),
            cache: BalanceCache::new(),
        }
    }

    pub fn taecel(base_url: String, secret_token: String) -> Self {
        Self::new(ProviderName::Taecel, base_url, secret_token)
    }

    pub fn mst(base_url: String, secret_token: String) -> Self {
        Self::new(ProviderName::Mst, base_url, secret_token)
    }
}

#[async_trait::async_trait]
impl ProviderClient for CarrierClient {
    fn name(&self) -> ProviderName {
        self.provider
    }

    #[instrument(skip(self), fields(provider = %self.provider))]
    async fn balance(&self) -> Result<i64, ProviderError> {
        if let Some(cached) = self.cache.get(self.provider) {
            return Ok(cached);
        }

        let url = format!("{}/api/v1/balance", self.base_endpoint);
        let response = self.http.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(classify_status(response.status()));
        }

        let body: Value = response.json().await.map_err(reqwest_to_decode_error)?;
        let cents = body
            .get("saldo")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| ProviderError::MalformedResponse("missing numeric field 'saldo'".to_string()))?;

        self.cache.set(self.provider, cents);
        Ok(cents)
    }

    #[instrument(skip(self), fields(provider = %self.provider, sim))]
    async fn purchase(&self, sim: &str, product_code: &str) -> Result<ProviderResponse, ProviderError> {
        let url = format!("{}/api/v1/purchase", self.base_endpoint);
        let payload = PurchasePayload { sim, product_code };

        let response = self.http.post(&url).json(&payload).send().await?;

        if response.status() != StatusCode::OK {
            return Err(classify_status(response.status()));
        }

        let raw: Value = response.json().await.map_err(reqwest_to_decode_error)?;

        if let Some(parsed) = ProviderResponse::parse_success(raw.clone()) {
            info!("✅ [CARRIER]: purchase settled for sim={}", sim);
            return Ok(parsed);
        }

        let kind = raw.get("errorKind").and_then(|v| v.as_str()).unwrap_or("UNKNOWN");
        let message = raw.get("errorMessage").and_then(|v| v.as_str()).unwrap_or("");
        warn!("⛔ [CARRIER]: purchase rejected for sim={} kind={}", sim, kind);

        let fault = ProviderFault { kind: kind.to_string(), message: message.to_string(), raw };
        Err(classify_fault(sim, &fault.kind, &fault.message))
    }
}

fn classify_status(status: StatusCode) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthRejected,
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderError::Timeout,
        _ => ProviderError::Rejected { kind: format!("HTTP_{}", status.as_u16()), message: status.to_string() },
    }
}

fn reqwest_to_decode_error(source: reqwest::Error) -> ProviderError {
    ProviderError::MalformedResponse(source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_category_table() {
        assert!(matches!(classify_status(StatusCode::UNAUTHORIZED), ProviderError::AuthRejected));
        assert!(matches!(classify_status(StatusCode::TOO_MANY_REQUESTS), ProviderError::RateLimited));
        assert!(matches!(classify_status(StatusCode::GATEWAY_TIMEOUT), ProviderError::Timeout));
    }
}
