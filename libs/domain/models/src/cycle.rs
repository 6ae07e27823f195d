// [libs/domain/models/src/cycle.rs]
/*!
 * APARATO: CYCLE STATS
 * RESPONSABILIDAD: CONTADORES ACUMULADOS DURANTE UN CICLO DE UN SERVICIO (§4.9.4, §7).
 *
 * Se acumulan a medida que el procesador de servicio avanza por su máquina de
 * estados y se exponen tal cual en los desenlaces `Blocked`/`Skipped`.
 */

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CycleStats {
    pub evaluated: usize,
    pub expired: usize,
    pub due_today: usize,
    /// Dispositivos que ya tenían saldo vigente y no requirieron compra.
    pub savings: usize,
    pub ok: usize,
    pub tried: usize,
    pub failed: usize,
}

impl CycleStats {
    pub fn record_evaluated(&mut self) {
        self.evaluated += 1;
    }

    pub fn record_expired(&mut self) {
        self.expired += 1;
    }

    pub fn record_due_today(&mut self) {
        self.due_today += 1;
    }

    pub fn record_savings(&mut self) {
        self.savings += 1;
    }

    pub fn record_attempt(&mut self, ok: bool) {
        self.tried += 1;
        if ok {
            self.ok += 1;
        } else {
            self.failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_attempt_splits_ok_and_failed() {
        let mut s = CycleStats::default();
        s.record_attempt(true);
        s.record_attempt(false);
        s.record_attempt(true);
        assert_eq!(s.tried, 3);
        assert_eq!(s.ok, 2);
        assert_eq!(s.failed, 1);
    }

    #[test]
    fn counters_start_at_zero() {
        let s = CycleStats::default();
        assert_eq!(s.evaluated, 0);
        assert_eq!(s.savings, 0);
    }
}
