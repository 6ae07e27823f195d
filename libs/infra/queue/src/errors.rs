// [libs/infra/queue/src/errors.rs]
/*!
 * APARATO: AUXILIARY QUEUE ERRORS
 * RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE PERSISTENCIA DE LA COLA (§4.5/§4.6)
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("[QUEUE_IO_FAULT]: disk access failed: {0}")]
    IoFault(#[from] std::io::Error),

    #[error("[QUEUE_DECODE_FAULT]: malformed queue entry: {0}")]
    DecodeFault(#[from] serde_json::Error),
}
