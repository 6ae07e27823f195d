// [libs/infra/db/src/repositories/mod.rs]
/*!
 * APARATO: REPOSITORY ACCESS MATRIX
 * RESPONSABILIDAD: AGRUPA LOS ADAPTADORES DE PERSISTENCIA DEL MOTOR DE RECARGAS
 */

pub mod commit;
pub mod lock;
pub mod selector;
pub mod verifier;

pub use commit::{CommitRepository, CommitResult, DetailInput, DetailOutcome, DeviceTable};
pub use lock::LockRepository;
pub use selector::{CandidateSelector, EliotCandidateRow};
pub use verifier::VerifierRepository;
