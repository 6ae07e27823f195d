// [apps/recharge-orchestrator/src/main.rs]
/*!
 * APARATO: ENGINE ENTRY POINT
 * RESPONSABILIDAD: IGNICIÓN DEL BINARIO SOBERANO DEL MOTOR DE RECARGAS.
 *
 * Arranque fatal (config ausente, DB inalcanzable) termina el proceso con
 * código distinto de cero; errores en tiempo de ejecución nunca lo hacen (§6).
 */

use dotenvy::dotenv;
use recharge_orchestrator::prelude::*;
use recharge_shared_signal::init_tracing;
use tracing::error;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing("recharge_orchestrator");

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(async {
        let config = match EngineConfig::from_env() {
            Ok(config) => config,
            Err(e) => {
                error!("💀 [STARTUP]: configuration error, aborting ignition: {}", e);
                std::process::exit(1);
            }
        };

        let kernel = EngineKernel::new(config);
        if let Err(e) = kernel.run().await {
            error!("💀 [STARTUP]: fatal error during ignition: {}", e);
            std::process::exit(1);
        }

        Ok(())
    })
}
