// [libs/domain/models/src/aux_item.rs]
/*!
 * APARATO: AUXILIARY ITEM
 * RESPONSABILIDAD: UNIDAD DURABLE DE STAGING ENTRE LA COMPRA Y EL COMMIT (§3 I1).
 *
 * Invariante I1: una vez creado con `status = WebserviceSuccessPendingDb` el
 * item DEBE llegar a la base de datos de facturación o permanecer
 * durablemente recuperable — nunca puede descartarse en silencio.
 */

use crate::service::ServiceKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuxiliaryStatus {
    /// La compra en el proveedor tuvo éxito; aún no confirmada en la DB de facturación.
    WebserviceSuccessPendingDb,
    /// El commit a la DB falló; espera reintento por recuperación.
    DbInsertionFailedPendingRecovery,
    /// El commit aparentemente tuvo éxito pero la verificación post-commit no encontró la fila.
    DbVerificationFailed,
}

/// Snapshot del dispositivo en el momento de la compra, preservado para el
/// texto de auditoría aun si el dispositivo cambia entre la compra y el commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub descriptor: String,
    pub tenant: String,
    pub sim: String,
    pub last_report: Option<i64>,
}

/// Contexto de ciclo usado únicamente para construir la nota humana legible (§4.9.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleContext {
    pub index: usize,
    pub total: usize,
    pub evaluated: usize,
    pub expired: usize,
    pub due_today: usize,
    pub savings: usize,
}

/// Unidad durable de staging para una compra ya pagada, en tránsito hacia la DB de facturación.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxiliaryItem {
    pub id: String,
    pub kind: ServiceKind,
    pub sim: String,
    pub amount: i64,
    pub days: i64,
    pub provider_name: String,
    pub provider_txn_id: String,
    pub provider_folio: String,
    /// Cuerpo crudo del proveedor, preservado verbatim.
    pub provider_raw_response: serde_json::Value,
    pub device_snapshot: DeviceSnapshot,
    pub cycle_context: CycleContext,
    pub status: AuxiliaryStatus,
    pub attempts: u32,
    /// Segundos Unix de creación.
    pub created_at: i64,
    /// Campos consumidos por el texto de detalle de facturación (§4.9 paso 3a).
    pub timeout: String,
    pub ip: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AuxiliaryItem {
        AuxiliaryItem {
            id: "aux-1".into(),
            kind: ServiceKind::Gps,
            sim: "6681000001".into(),
            amount: 1_000,
            days: 8,
            provider_name: "TAECEL".into(),
            provider_txn_id: "T001".into(),
            provider_folio: "F001".into(),
            provider_raw_response: serde_json::json!({"ok": true}),
            device_snapshot: DeviceSnapshot {
                descriptor: "UNIT-01".into(),
                tenant: "ACME".into(),
                sim: "6681000001".into(),
                last_report: Some(900),
            },
            cycle_context: CycleContext { index: 0, total: 1, evaluated: 1, expired: 1, due_today: 0, savings: 0 },
            status: AuxiliaryStatus::WebserviceSuccessPendingDb,
            attempts: 0,
            created_at: 1_700_000_000,
            timeout: "1.23".into(),
            ip: "10.0.0.1".into(),
        }
    }

    /// L1: round-trip law — serialize/deserialize must be lossless.
    #[test]
    fn serde_round_trip_preserves_item() {
        let item = sample();
        let encoded = serde_json::to_string(&item).unwrap();
        let decoded: AuxiliaryItem = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.id, item.id);
        assert_eq!(decoded.status, item.status);
        assert_eq!(decoded.provider_folio, item.provider_folio);
    }
}
