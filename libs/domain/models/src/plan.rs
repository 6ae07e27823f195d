// [libs/domain/models/src/plan.rs]
/*!
 * APARATO: RECHARGE PLAN
 * RESPONSABILIDAD: REPRESENTA LA INTENCIÓN DE COMPRA DERIVADA POR DISPOSITIVO/CICLO.
 *
 * Es efímero: se calcula en cada ciclo a partir del `Device` seleccionado y
 * nunca se persiste tal cual (sólo su resultado, vía `AuxiliaryItem`/`DetailRecharge`).
 */

use serde::{Deserialize, Serialize};

/// Estado derivado de un dispositivo candidato respecto a `now` (§3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RechargeState {
    /// `expires_at < now`.
    Expired,
    /// `now <= expires_at <= endOfToday(local)`.
    DueToday,
    /// Nunca recargado en este ciclo; ni vencido ni por vencer.
    Fresh,
}

impl RechargeState {
    /// Clasifica según la regla de fronteras de §3 y §8 (boundary: `expires_at == now` ⇒ `DueToday`).
    pub fn classify(expires_at: i64, now: i64, end_of_today: i64) -> Self {
        if expires_at < now {
            RechargeState::Expired
        } else if expires_at <= end_of_today {
            RechargeState::DueToday
        } else {
            RechargeState::Fresh
        }
    }
}

/// Plan de recarga calculado para un dispositivo candidato.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RechargePlan {
    pub sim: String,
    /// Monto a cobrar, en la unidad monetaria menor del carrier (p.ej. centavos de MXN).
    pub amount: i64,
    /// Días de validez que la recarga añade.
    pub days: i64,
    /// SKU del carrier a comprar.
    pub product_code: String,
    pub state: RechargeState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_now_is_due_today_not_expired() {
        let now = 1_000;
        let end_of_today = 2_000;
        assert_eq!(RechargeState::classify(now, now, end_of_today), RechargeState::DueToday);
    }

    #[test]
    fn expires_before_now_is_expired() {
        assert_eq!(RechargeState::classify(999, 1_000, 2_000), RechargeState::Expired);
    }

    #[test]
    fn expires_at_end_of_today_is_due_today() {
        assert_eq!(RechargeState::classify(2_000, 1_000, 2_000), RechargeState::DueToday);
    }

    #[test]
    fn expires_after_end_of_today_is_fresh() {
        assert_eq!(RechargeState::classify(2_001, 1_000, 2_000), RechargeState::Fresh);
    }
}
