// [libs/infra/telemetry/src/errors.rs]
/*!
 * APARATO: TELEMETRY CLIENT ERRORS
 * RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DEL PUERTO DE TELEMETRÍA ELIOT
 */

use recharge_core_retry::{Classifiable, FailureCategory};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("[TELEMETRY_NETWORK_FAULT]: failed to reach telemetry service: {0}")]
    NetworkFault(#[from] reqwest::Error),

    #[error("[TELEMETRY_DECODE_FAULT]: malformed telemetry response: {0}")]
    DecodeFault(String),

    #[error("[TELEMETRY_SERVICE_REJECTED]: telemetry service returned {0}")]
    ServiceRejected(String),
}

impl Classifiable for TelemetryError {
    fn category(&self) -> FailureCategory {
        match self {
            TelemetryError::NetworkFault(_) => FailureCategory::Retriable,
            TelemetryError::DecodeFault(_) | TelemetryError::ServiceRejected(_) => FailureCategory::Business,
        }
    }
}
