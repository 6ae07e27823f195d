// [libs/shared/signal/src/alert.rs]
/*!
 * APARATO: ALERT AGGREGATION
 * RESPONSABILIDAD: CONTADORES POR CATEGORÍA/HORA Y EMISIÓN DE ALERTAS AGREGADAS (§4.4).
 *
 * "Alert thresholds (per-category per-hour counters) trigger an aggregated
 * alert when exceeded." Ventana deslizante de una hora, sin dependencias
 * externas — el conteo vive en memoria del proceso orquestador.
 */

use recharge_core_retry::FailureCategory;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tracing::{error, warn};

/// Puerto de salida de alertas. La implementación por defecto emite vía
/// `tracing`; un despliegue productivo puede envolverla para reenviar a un
/// canal externo sin que el llamador lo sepa.
pub trait AlertSink: Send + Sync {
    fn alert(&self, category: FailureCategory, message: &str);
}

/// Emite la alerta como un evento de trazado al nivel correspondiente a la
/// severidad de la categoría.
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn alert(&self, category: FailureCategory, message: &str) {
        match category {
            FailureCategory::Fatal => error!(category = %category, "🚨 [ALERT]: {}", message),
            FailureCategory::Retriable | FailureCategory::Business => {
                warn!(category = %category, "⚠️  [ALERT]: {}", message)
            }
        }
    }
}

const WINDOW: Duration = Duration::from_secs(3_600);
const DEFAULT_THRESHOLD: usize = 5;

/// Contador deslizante de una hora por categoría. No es `Sync` de forma
/// lock-free: el orquestador la posee detrás de un `Mutex` (un único
/// procesador por servicio la consulta a la vez).
pub struct InMemoryAlertCounter {
    threshold: usize,
    events: HashMap<FailureCategory, VecDeque<Instant>>,
}

impl InMemoryAlertCounter {
    pub fn new() -> Self {
        Self { threshold: DEFAULT_THRESHOLD, events: HashMap::new() }
    }

    pub fn with_threshold(threshold: usize) -> Self {
        Self { threshold, events: HashMap::new() }
    }

    /// Registra un evento de fallo y retorna `true` si el umbral se superó
    /// en la ventana de la última hora (el evento que lo hace superar
    /// cuenta dentro de la ventana).
    pub fn record(&mut self, category: FailureCategory, now: Instant) -> bool {
        let bucket = self.events.entry(category).or_default();
        bucket.push_back(now);
        while let Some(&front) = bucket.front() {
            if now.duration_since(front) > WINDOW {
                bucket.pop_front();
            } else {
                break;
            }
        }
        bucket.len() > self.threshold
    }
}

impl Default for InMemoryAlertCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_exceed_before_threshold() {
        let mut counter = InMemoryAlertCounter::new();
        let now = Instant::now();
        for _ in 0..5 {
            assert!(!counter.record(FailureCategory::Business, now));
        }
    }

    #[test]
    fn exceeds_threshold_on_sixth_event_within_hour() {
        let mut counter = InMemoryAlertCounter::new();
        let now = Instant::now();
        for _ in 0..5 {
            counter.record(FailureCategory::Business, now);
        }
        assert!(counter.record(FailureCategory::Business, now));
    }

    #[test]
    fn categories_are_counted_independently() {
        let mut counter = InMemoryAlertCounter::new();
        let now = Instant::now();
        for _ in 0..5 {
            counter.record(FailureCategory::Business, now);
        }
        assert!(!counter.record(FailureCategory::Retriable, now));
    }

    #[test]
    fn events_outside_window_are_forgotten() {
        let mut counter = InMemoryAlertCounter::new();
        let t0 = Instant::now();
        for _ in 0..5 {
            counter.record(FailureCategory::Fatal, t0);
        }
        let later = t0 + Duration::from_secs(3_601);
        assert!(!counter.record(FailureCategory::Fatal, later));
    }
}
