// [libs/domain/billing/src/note.rs]
/*!
 * APARATO: NOTE BUILDER
 * RESPONSABILIDAD: FORMATEA LA NOTA KPI DE UN CIERRE DE CICLO (§4.9.4).
 *
 * Formato: `[<SERVICE>-AUTO v2.3] EVALUADOS: <n> | VENCIDOS: <n> | POR_VENCER: <n> [ | AHORRO: <n> ] | [<ok>/<tried>]`
 * `<ok>`/`<tried>` van a 3 dígitos con cero a la izquierda. Los commits de
 * recuperación anteponen `< RECUPERACIÓN <SERVICE> > ` a la línea completa.
 */

use recharge_domain_models::CycleStats;

pub struct NoteBuilder<'a> {
    service_label: &'a str,
    stats: CycleStats,
    is_recovery: bool,
}

impl<'a> NoteBuilder<'a> {
    pub fn new(service_label: &'a str, stats: CycleStats) -> Self {
        Self { service_label, stats, is_recovery: false }
    }

    pub fn recovery(mut self, is_recovery: bool) -> Self {
        self.is_recovery = is_recovery;
        self
    }

    pub fn build(&self) -> String {
        let mut line = format!(
            "[{}-AUTO v2.3] EVALUADOS: {} | VENCIDOS: {} | POR_VENCER: {}",
            self.service_label, self.stats.evaluated, self.stats.expired, self.stats.due_today,
        );

        // El propagado del contador de ahorro hacia noteData es parcial en la
        // fuente: la nota tolera su ausencia tratando savings=0 como "omitir".
        if self.stats.savings > 0 {
            line.push_str(&format!(" | AHORRO: {}", self.stats.savings));
        }

        line.push_str(&format!(" | [{:03}/{:03}]", self.stats.ok, self.stats.tried));

        if self.is_recovery {
            format!("< RECUPERACIÓN {} > {}", self.service_label, line)
        } else {
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(evaluated: usize, expired: usize, due_today: usize, savings: usize, ok: usize, tried: usize) -> CycleStats {
        CycleStats { evaluated, expired, due_today, savings, ok, tried, failed: tried - ok }
    }

    #[test]
    fn formats_happy_path_note_from_s1() {
        let note = NoteBuilder::new("GPS", stats(1, 1, 0, 0, 1, 1)).build();
        assert_eq!(note, "[GPS-AUTO v2.3] EVALUADOS: 1 | VENCIDOS: 1 | POR_VENCER: 0 | [001/001]");
    }

    #[test]
    fn omits_savings_segment_when_zero() {
        let note = NoteBuilder::new("GPS", stats(3, 1, 1, 0, 1, 1)).build();
        assert!(!note.contains("AHORRO"));
    }

    #[test]
    fn includes_savings_segment_when_present() {
        let note = NoteBuilder::new("GPS", stats(3, 1, 1, 1, 1, 1)).build();
        assert!(note.contains("AHORRO: 1"));
    }

    #[test]
    fn recovery_prefixes_full_line() {
        let note = NoteBuilder::new("VOZ", stats(1, 1, 0, 0, 1, 1)).recovery(true).build();
        assert!(note.starts_with("< RECUPERACIÓN VOZ > [VOZ-AUTO v2.3]"));
    }

    #[test]
    fn zero_pads_ok_and_tried_to_three_digits() {
        let note = NoteBuilder::new("GPS", stats(5, 0, 0, 0, 7, 12)).build();
        assert!(note.ends_with("[007/012]"));
    }
}
