// [libs/domain/models/src/device.rs]
/*!
 * APARATO: DEVICE ENTITY
 * RESPONSABILIDAD: REPRESENTA UN SIM Y SU ESTADO DE SALDO A NIVEL DE CARRIER.
 *
 * El ciclo de vida del dispositivo se gestiona fuera de este motor; el
 * motor solo muta `expires_at` tras una recarga exitosa (§4.9).
 */

use crate::service::ServiceKind;
use serde::{Deserialize, Serialize};

/// Un SIM bajo monitoreo de saldo, con la identidad mínima necesaria para
/// facturar y para construir el texto de auditoría (`detalle_recargas.detalle`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    /// Identidad opaca a nivel de carrier; clave primaria de negocio.
    pub sim: String,
    pub service: ServiceKind,
    /// Etiqueta humana (p.ej. placa del vehículo).
    pub descriptor: String,
    /// Nombre de la empresa dueña del dispositivo.
    pub tenant: String,
    /// Expiración de saldo a nivel de carrier, segundos Unix.
    pub expires_at: i64,
    /// Última telemetría reportada, segundos Unix. Ausente para VOZ.
    pub last_report: Option<i64>,
    /// SKU de producto (VOZ/ELIoT); selecciona `productCode` y días de validez.
    pub package_code: Option<String>,
}

impl Device {
    /// "{descriptor} [{tenant}]" — formato de `detalle_recargas.vehiculo`.
    pub fn vehicle_label(&self) -> String {
        format!("{} [{}]", self.descriptor, self.tenant)
    }

    /// Minutos transcurridos desde el último reporte de telemetría, si se conoce.
    pub fn minutes_since_report(&self, now: i64) -> Option<i64> {
        self.last_report.map(|last| (now - last).max(0) / 60)
    }

    /// Días transcurridos desde el último reporte de telemetría, si se conoce.
    pub fn days_since_report(&self, now: i64) -> Option<i64> {
        self.last_report.map(|last| (now - last).max(0) / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(expires_at: i64, last_report: Option<i64>) -> Device {
        Device {
            sim: "6681000001".into(),
            service: ServiceKind::Gps,
            descriptor: "UNIT-01".into(),
            tenant: "ACME".into(),
            expires_at,
            last_report,
            package_code: None,
        }
    }

    #[test]
    fn vehicle_label_formats_descriptor_and_tenant() {
        let d = device(0, None);
        assert_eq!(d.vehicle_label(), "UNIT-01 [ACME]");
    }

    #[test]
    fn minutes_since_report_floors_to_zero_when_future() {
        let d = device(0, Some(1_000));
        assert_eq!(d.minutes_since_report(500), Some(0));
    }

    #[test]
    fn minutes_since_report_is_none_without_telemetry() {
        let d = device(0, None);
        assert_eq!(d.minutes_since_report(1_000), None);
    }
}
