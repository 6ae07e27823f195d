// [libs/domain/models/src/service.rs]
/*!
 * APARATO: SERVICE TAXONOMY
 * RESPONSABILIDAD: IDENTIFICA LAS TRES POBLACIONES DE DISPOSITIVOS DEL ENJAMBRE.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Las tres poblaciones de dispositivos que este motor recarga.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// Rastreadores vehiculares GPS (billing `type` = `rastreo`).
    Gps,
    /// Suscripciones de voz (billing `type` = `paquete`).
    Voz,
    /// Agentes IoT (billing `type` = `eliot`).
    Eliot,
}

impl ServiceKind {
    /// Literal de tipo persistido en `recargas.tipo`.
    pub fn billing_type_literal(self) -> &'static str {
        match self {
            ServiceKind::Gps => "rastreo",
            ServiceKind::Voz => "paquete",
            ServiceKind::Eliot => "eliot",
        }
    }

    /// Prefijo estable usado en los nombres de archivo de la cola auxiliar y el marcador de crash.
    pub fn file_prefix(self) -> &'static str {
        match self {
            ServiceKind::Gps => "gps",
            ServiceKind::Voz => "voz",
            ServiceKind::Eliot => "eliot",
        }
    }

    /// Etiqueta usada en el nombre de lock distribuido `recharge_<service>`.
    pub fn lock_key(self) -> String {
        format!("recharge_{}", self.file_prefix())
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Gps => write!(f, "GPS"),
            ServiceKind::Voz => write!(f, "VOZ"),
            ServiceKind::Eliot => write!(f, "ELIoT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_literals_match_spec() {
        assert_eq!(ServiceKind::Gps.billing_type_literal(), "rastreo");
        assert_eq!(ServiceKind::Voz.billing_type_literal(), "paquete");
        assert_eq!(ServiceKind::Eliot.billing_type_literal(), "eliot");
    }

    #[test]
    fn lock_key_is_namespaced() {
        assert_eq!(ServiceKind::Gps.lock_key(), "recharge_gps");
    }
}
