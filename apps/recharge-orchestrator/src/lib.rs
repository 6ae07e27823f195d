// [apps/recharge-orchestrator/src/lib.rs]
/*!
 * =================================================================
 * APARATO: RECHARGE ORCHESTRATOR LIBRARY ROOT
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: ÁRBOL DE MÓDULOS DEL BINARIO SOBERANO DEL MOTOR DE RECARGAS
 * =================================================================
 */

/// Carga y validación de variables de entorno (§6).
pub mod config;
/// Núcleo de mando: ignición de componentes y orquestación de los tres servicios (C12).
pub mod kernel;
/// Máquina de estados de un ciclo completo por servicio (C11).
pub mod processor;
/// Reloj de pared local y disparo de ciclos (C1).
pub mod scheduler;

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::kernel::EngineKernel;
}
