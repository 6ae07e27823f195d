// [apps/recharge-orchestrator/src/scheduler.rs]
/*!
 * APARATO: CLOCK & SCHEDULER (C1)
 * RESPONSABILIDAD: DISPARA UN CICLO POR SERVICIO, ALINEADO AL RELOJ DE PARED LOCAL (§4.1).
 *
 * Dos modos: Interval (minutos `{0, k, 2k, …}` dentro de cada hora, alineado
 * a la hora en punto, no al arranque del proceso) y Fixed (horas locales
 * configuradas, p.ej. 01:00/04:00). P5: los arranques de ciclo sucesivos en
 * modo Interval caen en `t ≡ 0 (mod k minutos)` con jitter ≤ 1s.
 */

use chrono::{Local, NaiveTime, TimeZone};
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleMode {
    Interval { step_minutes: u32 },
    Fixed { local_times: Vec<(u32, u32)> },
}

pub struct Scheduler {
    mode: ScheduleMode,
    label: String,
}

impl Scheduler {
    pub fn new(label: impl Into<String>, mode: ScheduleMode) -> Self {
        Self { label: label.into(), mode }
    }

    /// Duración hasta el próximo disparo, calculada desde `now`.
    fn delay_until_next(&self, now: chrono::DateTime<Local>) -> Duration {
        let next = match &self.mode {
            ScheduleMode::Interval { step_minutes } => next_interval_fire(now, *step_minutes),
            ScheduleMode::Fixed { local_times } => next_fixed_fire(now, local_times),
        };
        (next - now).to_std().unwrap_or(Duration::from_secs(0))
    }

    /// Suspende hasta el próximo disparo programado. Cancelable: el
    /// llamador envuelve esta espera en un `tokio::select!` contra la señal
    /// de apagado.
    #[instrument(skip(self), fields(service = %self.label))]
    pub async fn wait_for_next_tick(&self) {
        let now = Local::now();
        let delay = self.delay_until_next(now);
        info!("⏰ [SCHEDULER]: [{}] next cycle in {:.0}s", self.label, delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}

fn next_interval_fire(now: chrono::DateTime<Local>, step_minutes: u32) -> chrono::DateTime<Local> {
    let step = step_minutes.max(1) as i64;
    let hour_start = now.date_naive().and_hms_opt(now.hour_value(), 0, 0).expect("valid hour boundary");
    let hour_start = Local.from_local_datetime(&hour_start).single().unwrap_or(now);

    let minutes_elapsed = (now - hour_start).num_minutes();
    let next_mark = ((minutes_elapsed / step) + 1) * step;

    if next_mark < 60 {
        hour_start + chrono::Duration::minutes(next_mark)
    } else {
        hour_start + chrono::Duration::hours(1)
    }
}

fn next_fixed_fire(now: chrono::DateTime<Local>, local_times: &[(u32, u32)]) -> chrono::DateTime<Local> {
    let today = now.date_naive();
    let mut candidates: Vec<chrono::DateTime<Local>> = local_times
        .iter()
        .filter_map(|(h, m)| NaiveTime::from_hms_opt(*h, *m, 0))
        .filter_map(|t| Local.from_local_datetime(&today.and_time(t)).single())
        .collect();

    candidates.retain(|c| *c > now);

    if let Some(next) = candidates.into_iter().min() {
        return next;
    }

    // Ningún horario restante hoy: el primero de mañana.
    let tomorrow = today.succ_opt().expect("valid successor day");
    local_times
        .iter()
        .filter_map(|(h, m)| NaiveTime::from_hms_opt(*h, *m, 0))
        .filter_map(|t| Local.from_local_datetime(&tomorrow.and_time(t)).single())
        .min()
        .unwrap_or(now + chrono::Duration::days(1))
}

trait HourValue {
    fn hour_value(&self) -> u32;
}

impl HourValue for chrono::DateTime<Local> {
    fn hour_value(&self) -> u32 {
        use chrono::Timelike;
        self.hour()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> chrono::DateTime<Local> {
        let today = Local::now().date_naive();
        Local.from_local_datetime(&today.and_hms_opt(h, m, s).unwrap()).single().unwrap()
    }

    #[test]
    fn interval_fire_lands_on_next_multiple_of_step() {
        let now = at(10, 7, 30);
        let next = next_interval_fire(now, 10);
        assert_eq!(next, at(10, 10, 0));
    }

    #[test]
    fn interval_fire_rolls_into_next_hour() {
        let now = at(10, 55, 0);
        let next = next_interval_fire(now, 10);
        assert_eq!(next, at(11, 0, 0));
    }

    #[test]
    fn interval_fire_exactly_on_mark_advances_to_next_mark() {
        let now = at(10, 10, 0);
        let next = next_interval_fire(now, 10);
        assert_eq!(next, at(10, 20, 0));
    }

    #[test]
    fn fixed_fire_picks_the_nearest_remaining_time_today() {
        let now = at(2, 0, 0);
        let next = next_fixed_fire(now, &[(1, 0), (4, 0)]);
        assert_eq!(next, at(4, 0, 0));
    }

    #[test]
    fn fixed_fire_rolls_to_tomorrows_first_slot_when_all_passed() {
        let now = at(23, 0, 0);
        let next = next_fixed_fire(now, &[(1, 0), (4, 0)]);
        assert!(next > now);
        assert_eq!(next.time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }
}
