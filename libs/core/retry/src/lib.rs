// [libs/core/retry/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RETRY & ERROR CLASSIFICATION ENGINE
 * CLASIFICACIÓN: CORE ALGORITHM (ESTRATO L1)
 * RESPONSABILIDAD: POLÍTICA DE REINTENTO INDEPENDIENTE DE TRANSPORTE
 * =================================================================
 */

pub mod category;
pub mod policy;

pub use category::{Classifiable, FailureCategory};
pub use policy::{backoff_delay, execute_fixed_retry, execute_with_category};
