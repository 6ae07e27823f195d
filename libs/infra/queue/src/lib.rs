// [libs/infra/queue/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RECHARGE INFRA QUEUE
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: COLA AUXILIAR DURABLE (C5) Y MARCADOR DE CAÍDA (C6)
 * =================================================================
 */

pub mod crash_marker;
pub mod errors;
pub mod queue;

pub use crash_marker::{CrashMarker, CrashMarkerStore};
pub use errors::QueueError;
pub use queue::AuxiliaryQueue;
