// [libs/infra/db/src/errors.rs]
/*!
 * APARATO: DATABASE ERROR CATALOG
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE PERSISTENCIA
 */

use recharge_core_retry::{Classifiable, FailureCategory};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Error de enlace físico o de red con el cluster Turso.
    #[error("[L3_DB_NET_FAULT]: database uplink severed -> {0}")]
    ConnectionError(String),

    /// Variable de entorno de conexión vacía o malformada.
    #[error("[L3_DB_CONFIG_FAULT]: strategic env void -> {0}")]
    ConfigurationError(String),

    /// Error de sintaxis o ejecución devuelto por libSQL.
    #[error("[L3_DB_QUERY_FAULT]: sql query rejected -> {0}")]
    QueryError(#[from] libsql::Error),

    /// Fallo al transformar una fila SQL en un tipo de dominio.
    #[error("[L3_DB_MAPPING_FAULT]: data mapping violation -> {0}")]
    MappingError(String),

    /// Fallo al abrir/cerrar una transacción multi-tabla.
    #[error("[L3_DB_FAULT]: transaction collapse")]
    TransactionError,

    /// El candado distribuido ya está en manos de otro titular vigente.
    #[error("[L3_LOCK_FAULT]: lock already held by another owner")]
    LockConflict,

    /// Se intentó liberar o refrescar un candado que ya no pertenece al llamador.
    #[error("[L3_LOCK_FAULT]: lock not held by this owner")]
    LockNotHeld,
}

impl Classifiable for DbError {
    fn category(&self) -> FailureCategory {
        match self {
            DbError::ConnectionError(_) | DbError::ConfigurationError(_) | DbError::TransactionError => {
                FailureCategory::Fatal
            }
            DbError::QueryError(_) | DbError::MappingError(_) => FailureCategory::Business,
            DbError::LockConflict | DbError::LockNotHeld => FailureCategory::Business,
        }
    }
}
