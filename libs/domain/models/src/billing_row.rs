// [libs/domain/models/src/billing_row.rs]
/*!
 * APARATO: BILLING ROW CONTRACT
 * RESPONSABILIDAD: FORMA DE LAS FILAS PERSISTIDAS EN LA DB DE FACTURACIÓN (§4.9).
 *
 * `MasterRecharge` y `DetailRecharge` son la forma en que un ciclo completo se
 * resume en una fila maestra y N filas de detalle, una por dispositivo
 * recargado. No se derivan campos aquí: el ensamblado vive en
 * `recharge-domain-billing`.
 */

use serde::{Deserialize, Serialize};

/// Fila maestra de un ciclo de recarga (tabla `recargas`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterRecharge {
    pub id: String,
    /// Suma de los montos de todos los detalles exitosos, en la unidad menor del carrier.
    pub total: i64,
    /// Segundos Unix del cierre del ciclo.
    pub ts: i64,
    /// Texto de auditoría construido por `NoteBuilder` (§4.9.4).
    pub note: String,
    /// Identidad del actor que ejecutó el ciclo (nombre del motor/host).
    pub actor: String,
    pub provider: String,
    /// Literal de tipo de servicio (`rastreo`|`paquete`|`eliot`).
    pub r#type: String,
    pub summary: CycleSummary,
}

/// Fila de detalle de una recarga individual (tabla `detalle_recargas`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailRecharge {
    pub master_id: String,
    pub sim: String,
    pub amount: i64,
    /// Descriptor del dispositivo al momento de la compra.
    pub device: String,
    /// "{descriptor} [{tenant}]".
    pub vehicle: String,
    /// Texto legible con timeout/ip/saldo final (§4.9 paso 3a).
    pub detail: String,
    pub folio: String,
    pub status: String,
}

/// Conteos de resultado de un ciclo, usados tanto en la nota como en la telemetría de cierre.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CycleSummary {
    pub errors: usize,
    pub successes: usize,
    pub refunds: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_summary_defaults_to_zero() {
        let s = CycleSummary::default();
        assert_eq!(s.errors, 0);
        assert_eq!(s.successes, 0);
        assert_eq!(s.refunds, 0);
    }

    #[test]
    fn detail_recharge_round_trips() {
        let d = DetailRecharge {
            master_id: "m1".into(),
            sim: "6681000001".into(),
            amount: 1_000,
            device: "UNIT-01".into(),
            vehicle: "UNIT-01 [ACME]".into(),
            detail: "timeout=1.2 ip=10.0.0.1".into(),
            folio: "F001".into(),
            status: "ok".into(),
        };
        let encoded = serde_json::to_string(&d).unwrap();
        let decoded: DetailRecharge = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.folio, d.folio);
    }
}
