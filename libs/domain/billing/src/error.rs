// [libs/domain/billing/src/error.rs]
use thiserror::Error;

/// Errores de negocio puros de facturación — sin E/S, sin red, sin DB.
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("[BILLING_UNMAPPED_PRODUCT_AMOUNT]: no existe SKU ELIoT para importe {amount}")]
    UnmappedProductAmount { amount: i64 },
}
