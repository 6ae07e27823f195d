// [libs/infra/db/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RECHARGE INFRA DB
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: PERSISTENCIA TÁCTICA SOBRE LIBSQL — LOCK, SELECTOR,
 * COMMIT ENGINE Y VERIFICADOR
 * =================================================================
 */

pub mod client;
pub mod errors;
pub mod repositories;
pub mod schema;

pub use client::RechargeDbClient;
pub use errors::DbError;
pub use repositories::{
    CandidateSelector, CommitRepository, CommitResult, DetailInput, DetailOutcome, DeviceTable,
    EliotCandidateRow, LockRepository, VerifierRepository,
};
