// [libs/domain/models/src/provider.rs]
/*!
 * APARATO: PROVIDER RESPONSE CONTRACT
 * RESPONSABILIDAD: MODELA LA RESPUESTA DE COMPRA DE UN PROVEEDOR EXTERNO (§6).
 *
 * La codificación de red (HTTP/SOAP) de TAECEL/MST es responsabilidad de
 * `recharge-infra-provider`; este módulo sólo define el contrato tipado que
 * ese adaptador produce, incluyendo el bug conocido de `timeout`/`ip`
 * apareciendo a veces anidados bajo `response` en vez de en la raíz.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifica al proveedor de recarga que atendió (o rechazó) la compra.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProviderName {
    /// TAECEL — proveedor primario por defecto.
    Taecel,
    /// MST — proveedor alterno.
    Mst,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::Taecel => write!(f, "TAECEL"),
            ProviderName::Mst => write!(f, "MST"),
        }
    }
}

/// Resultado tipado de `purchase()` (§4.3). Variante soberana en lugar del
/// `serde_json::Value` sin tipar que el proveedor realmente transmite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum ProviderResponse {
    Success {
        txn_id: String,
        folio: String,
        /// Saldo final tras la compra, tal como el carrier lo formatea (texto, no numérico).
        saldo_final: String,
        timeout: String,
        ip: String,
        /// Cuerpo crudo preservado verbatim para auditoría forense.
        raw: serde_json::Value,
    },
    Failure(ProviderFault),
}

/// Fallo de compra reportado por el proveedor (antes de clasificación de reintento).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderFault {
    /// Código/etiqueta corta del proveedor (p.ej. `"SIM_BLOCKED"`, `"TIMEOUT"`).
    pub kind: String,
    pub message: String,
    pub raw: serde_json::Value,
}

impl ProviderResponse {
    /// Reconstruye una respuesta exitosa desde el JSON crudo del proveedor,
    /// revisando ambas ubicaciones conocidas de `timeout`/`ip` (raíz y
    /// anidado bajo `response`) — ver §6 "known bug surface".
    pub fn parse_success(raw: serde_json::Value) -> Option<Self> {
        let ok = raw.get("ok").and_then(|v| v.as_bool()).unwrap_or(false);
        if !ok {
            return None;
        }

        let nested = raw.get("response");

        let field = |name: &str| -> Option<String> {
            raw.get(name)
                .and_then(|v| v.as_str())
                .or_else(|| nested.and_then(|n| n.get(name)).and_then(|v| v.as_str()))
                .map(|s| s.to_string())
        };

        Some(ProviderResponse::Success {
            txn_id: field("txnId").unwrap_or_default(),
            folio: field("folio").unwrap_or_default(),
            saldo_final: field("saldoFinal").unwrap_or_default(),
            timeout: field("timeout").unwrap_or_default(),
            ip: field("ip").unwrap_or_default(),
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_root_level_timeout_and_ip() {
        let raw = json!({"ok": true, "txnId": "T1", "folio": "F1", "saldoFinal": "10.00", "timeout": "1.2", "ip": "10.0.0.1"});
        let parsed = ProviderResponse::parse_success(raw).unwrap();
        match parsed {
            ProviderResponse::Success { timeout, ip, .. } => {
                assert_eq!(timeout, "1.2");
                assert_eq!(ip, "10.0.0.1");
            }
            _ => panic!("expected success"),
        }
    }

    #[test]
    fn parses_timeout_and_ip_nested_under_response() {
        let raw = json!({
            "ok": true, "txnId": "T1", "folio": "F1", "saldoFinal": "10.00",
            "response": {"timeout": "2.5", "ip": "10.0.0.9"}
        });
        let parsed = ProviderResponse::parse_success(raw).unwrap();
        match parsed {
            ProviderResponse::Success { timeout, ip, .. } => {
                assert_eq!(timeout, "2.5");
                assert_eq!(ip, "10.0.0.9");
            }
            _ => panic!("expected success"),
        }
    }

    #[test]
    fn ok_false_yields_none() {
        let raw = json!({"ok": false});
        assert!(ProviderResponse::parse_success(raw).is_none());
    }
}
