// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RECHARGE DOMAIN MODELS
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: DEFINICIÓN DE ENTIDADES SOBERANAS DEL MOTOR DE RECARGAS
 * =================================================================
 */

pub mod service;
pub mod device;
pub mod plan;
pub mod provider;
pub mod aux_item;
pub mod billing_row;
pub mod cycle;

pub use service::ServiceKind;
pub use device::Device;
pub use plan::{RechargePlan, RechargeState};
pub use provider::{ProviderName, ProviderResponse, ProviderFault};
pub use aux_item::{AuxiliaryItem, AuxiliaryStatus, DeviceSnapshot, CycleContext};
pub use billing_row::{MasterRecharge, DetailRecharge, CycleSummary};
pub use cycle::CycleStats;
