// [libs/domain/billing/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RECHARGE DOMAIN BILLING
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: REGLAS DE FACTURACIÓN PURAS — SIN E/S
 * =================================================================
 */

pub mod descriptor;
pub mod error;
pub mod expiry;
pub mod note;
pub mod product_catalog;

pub use descriptor::{AmountSource, DaysSource, ServiceDescriptor};
pub use error::BillingError;
pub use expiry::compute_expiry;
pub use note::NoteBuilder;
pub use product_catalog::{EliotProduct, ProductCatalog};
