// [libs/infra/provider/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RECHARGE INFRA PROVIDER
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CLIENTE DE SALDO Y COMPRA CONTRA TAECEL/MST (§4.3)
 * =================================================================
 */

pub mod cache;
pub mod client;
pub mod errors;

pub use cache::BalanceCache;
pub use client::{CarrierClient, ProviderClient};
pub use errors::{classify_fault, ProviderError};
