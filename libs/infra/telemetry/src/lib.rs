// [libs/infra/telemetry/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RECHARGE INFRA TELEMETRY
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: ÚLTIMO REPORTE ELIOT POR `uuid` (§4.7)
 * =================================================================
 */

pub mod client;
pub mod errors;

pub use client::TelemetryClient;
pub use errors::TelemetryError;
