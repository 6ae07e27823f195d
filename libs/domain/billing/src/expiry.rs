// [libs/domain/billing/src/expiry.rs]
/*!
 * APARATO: EXPIRY FORMULA
 * RESPONSABILIDAD: ÚNICA FÓRMULA DE EXTENSIÓN DE VIGENCIA TRAS UNA RECARGA (§4.9 paso 3c, §9).
 *
 * Fijada a `endOfLocalDay(now) + days * 86400` por mandato de §9: rutas
 * legado que usan `now + days * 86400` directo NO se preservan aquí.
 */

const SECONDS_PER_DAY: i64 = 86_400;

/// `end_of_local_day` es el límite superior del día local de `now`, en
/// segundos Unix (calculado por la capa de zona horaria, fuera de este módulo).
pub fn compute_expiry(end_of_local_day: i64, days: i64) -> i64 {
    end_of_local_day + days * SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extends_from_end_of_day_not_from_now() {
        let end_of_today = 1_700_000_000;
        assert_eq!(compute_expiry(end_of_today, 8), end_of_today + 8 * SECONDS_PER_DAY);
    }

    #[test]
    fn zero_days_returns_end_of_day_unchanged() {
        let end_of_today = 1_700_000_000;
        assert_eq!(compute_expiry(end_of_today, 0), end_of_today);
    }
}
