// [libs/shared/signal/src/lib.rs]
/*!
 * =================================================================
 * APARATO: SIGNAL OBSERVABILITY
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4)
 * RESPONSABILIDAD: TRAZADO, CAPTURA DE PÁNICOS Y AGREGACIÓN DE ALERTAS
 * =================================================================
 */

pub mod alert;
pub mod tracing_init;

pub use alert::{AlertSink, InMemoryAlertCounter, TracingAlertSink};
pub use tracing_init::init_tracing;
