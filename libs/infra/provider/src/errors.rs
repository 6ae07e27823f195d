// [libs/infra/provider/src/errors.rs]
/*!
 * APARATO: PROVIDER CLIENT ERRORS
 * RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE COMUNICACIÓN CON TAECEL/MST (§4.3/§4.4)
 */

use recharge_core_retry::{Classifiable, FailureCategory};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("[PROVIDER_NETWORK_FAULT]: failed to reach carrier: {0}")]
    NetworkFault(#[from] reqwest::Error),

    #[error("[PROVIDER_TIMEOUT]: carrier did not respond in time")]
    Timeout,

    #[error("[PROVIDER_RATE_LIMITED]: carrier rejected the call due to rate limiting")]
    RateLimited,

    #[error("[PROVIDER_AUTH_REJECTED]: carrier credentials invalid or expired")]
    AuthRejected,

    #[error("[PROVIDER_MALFORMED_RESPONSE]: could not decode carrier response: {0}")]
    MalformedResponse(String),

    #[error("[PROVIDER_INVALID_SIM]: carrier rejected sim={sim}")]
    InvalidSim { sim: String },

    #[error("[PROVIDER_SIM_BLOCKED]: sim={sim} is blocked by the carrier")]
    SimBlocked { sim: String },

    #[error("[PROVIDER_DUPLICATE_TXN]: carrier reports folio already applied for sim={sim}")]
    DuplicateTxn { sim: String },

    #[error("[PROVIDER_UNSUPPORTED_CARRIER]: no client registered for provider {0}")]
    UnsupportedCarrier(String),

    #[error("[PROVIDER_REJECTED]: carrier returned {kind}: {message}")]
    Rejected { kind: String, message: String },
}

impl Classifiable for ProviderError {
    fn category(&self) -> FailureCategory {
        match self {
            ProviderError::NetworkFault(_) | ProviderError::Timeout | ProviderError::RateLimited => {
                FailureCategory::Retriable
            }
            ProviderError::AuthRejected => FailureCategory::Fatal,
            ProviderError::MalformedResponse(_)
            | ProviderError::InvalidSim { .. }
            | ProviderError::SimBlocked { .. }
            | ProviderError::DuplicateTxn { .. }
            | ProviderError::UnsupportedCarrier(_)
            | ProviderError::Rejected { .. } => FailureCategory::Business,
        }
    }
}

/// Clasifica el `kind` corto que un carrier adjunta a una respuesta de fallo,
/// mapeándolo a la variante tipada correspondiente (§4.4 tabla de categorías).
pub fn classify_fault(sim: &str, kind: &str, message: &str) -> ProviderError {
    match kind.to_uppercase().as_str() {
        "TIMEOUT" => ProviderError::Timeout,
        "RATE_LIMIT" | "RATE_LIMITED" => ProviderError::RateLimited,
        "AUTH_FAILED" | "UNAUTHORIZED" => ProviderError::AuthRejected,
        "INVALID_SIM" => ProviderError::InvalidSim { sim: sim.to_string() },
        "SIM_BLOCKED" => ProviderError::SimBlocked { sim: sim.to_string() },
        "DUPLICATE_TXN" => ProviderError::DuplicateTxn { sim: sim.to_string() },
        other => ProviderError::Rejected { kind: other.to_string(), message: message.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_and_network_are_retriable() {
        assert_eq!(classify_fault("1", "TIMEOUT", "").category(), FailureCategory::Retriable);
        assert_eq!(classify_fault("1", "rate_limit", "").category(), FailureCategory::Retriable);
    }

    #[test]
    fn auth_failure_is_fatal() {
        assert_eq!(classify_fault("1", "AUTH_FAILED", "").category(), FailureCategory::Fatal);
    }

    #[test]
    fn sim_faults_are_business() {
        assert_eq!(classify_fault("1", "SIM_BLOCKED", "").category(), FailureCategory::Business);
        assert_eq!(classify_fault("1", "INVALID_SIM", "").category(), FailureCategory::Business);
        assert_eq!(classify_fault("1", "DUPLICATE_TXN", "").category(), FailureCategory::Business);
    }

    #[test]
    fn unmapped_kind_defaults_to_business() {
        assert_eq!(classify_fault("1", "SOMETHING_NEW", "x").category(), FailureCategory::Business);
    }
}
