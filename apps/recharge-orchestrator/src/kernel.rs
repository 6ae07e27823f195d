// [apps/recharge-orchestrator/src/kernel.rs]
/*!
 * =================================================================
 * APARATO: ENGINE KERNEL (C12)
 * CLASIFICACIÓN: COMPOSITION ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: ARRANQUE DE COMPONENTES Y ORQUESTACIÓN DE LOS TRES
 * HILOS DE PROGRAMACIÓN INDEPENDIENTES (§4.12)
 *
 * Los tres servicios comparten únicamente el pool de conexiones DB y los
 * clientes de proveedor/telemetría en tiempo de ejecución — nada más. Cada
 * uno corre en su propia tarea de Tokio, con su propio `Scheduler` y
 * `ServiceProcessor`.
 * =================================================================
 */

use crate::config::EngineConfig;
use crate::processor::{CycleOutcome, ServiceProcessor};
use crate::scheduler::{ScheduleMode, Scheduler};
use recharge_infra_db::{CandidateSelector, CommitRepository, LockRepository, RechargeDbClient, VerifierRepository};
use recharge_infra_provider::{CarrierClient, ProviderClient};
use recharge_infra_telemetry::TelemetryClient;
use recharge_shared_signal::{AlertSink, TracingAlertSink};
use recharge_domain_models::ServiceKind;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

pub struct EngineKernel {
    config: EngineConfig,
}

impl EngineKernel {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Arranca el motor: conecta la base, construye los tres procesadores
    /// de servicio, ejecuta su recuperación de arranque (§4.6) y lanza sus
    /// hilos de programación independientes. Bloquea hasta recibir una
    /// señal de apagado, momento en que espera a que los ciclos en vuelo
    /// alcancen un punto seguro antes de retornar (§4.12).
    #[instrument(skip(self))]
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.config;

        let db = RechargeDbClient::connect(&config.database_url, config.database_token.clone()).await?;
        let alert_sink: Arc<dyn AlertSink> = Arc::new(TracingAlertSink);

        let providers: Vec<Arc<dyn ProviderClient>> = vec![
            Arc::new(CarrierClient::taecel(config.taecel.base_url.clone(), config.taecel.token.clone())),
            Arc::new(CarrierClient::mst(config.mst.base_url.clone(), config.mst.token.clone())),
        ];
        let telemetry = Arc::new(TelemetryClient::new(config.telemetry.base_url.clone(), config.telemetry.token.clone()));

        let gps_processor = Arc::new(ServiceProcessor::new(
            ServiceKind::Gps,
            &config,
            CandidateSelector::new(db.clone()),
            CommitRepository::new(db.clone()),
            VerifierRepository::new(db.clone()),
            LockRepository::new(db.clone()),
            providers.clone(),
            None,
            alert_sink.clone(),
        ));
        let voz_processor = Arc::new(ServiceProcessor::new(
            ServiceKind::Voz,
            &config,
            CandidateSelector::new(db.clone()),
            CommitRepository::new(db.clone()),
            VerifierRepository::new(db.clone()),
            LockRepository::new(db.clone()),
            providers.clone(),
            None,
            alert_sink.clone(),
        ));
        let eliot_processor = Arc::new(ServiceProcessor::new(
            ServiceKind::Eliot,
            &config,
            CandidateSelector::new(db.clone()),
            CommitRepository::new(db.clone()),
            VerifierRepository::new(db.clone()),
            LockRepository::new(db.clone()),
            providers.clone(),
            Some(telemetry.clone()),
            alert_sink.clone(),
        ));

        for processor in [&gps_processor, &voz_processor, &eliot_processor] {
            processor.recover_on_startup().await;
        }

        let gps_scheduler = Scheduler::new("GPS", ScheduleMode::Interval { step_minutes: config.gps.interval_minutes });
        let voz_scheduler = Scheduler::new("VOZ", config.voz.schedule.clone());
        let eliot_scheduler = Scheduler::new("ELIOT", ScheduleMode::Interval { step_minutes: config.eliot.interval_minutes });

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let gps_handle = tokio::spawn(run_service_loop(gps_scheduler, gps_processor, shutdown_rx.clone()));
        let voz_handle = tokio::spawn(run_service_loop(voz_scheduler, voz_processor, shutdown_rx.clone()));
        let eliot_handle = tokio::spawn(run_service_loop(eliot_scheduler, eliot_processor, shutdown_rx));

        wait_for_termination_signal().await;
        info!("🛑 [KERNEL]: shutdown signal received, waiting for in-flight cycles to reach a safe point");
        let _ = shutdown_tx.send(true);

        let _ = tokio::join!(gps_handle, voz_handle, eliot_handle);
        info!("✅ [KERNEL]: clean shutdown complete");
        Ok(())
    }
}

/// Alterna espera programada y ejecución de ciclo hasta recibir la señal de
/// apagado. La espera es cancelable de inmediato; la ejecución de un ciclo
/// ya en curso siempre llega a su fin natural antes de que el bucle revise
/// la señal de nuevo (el punto seguro de §4.12: tras Verifying/Releasing).
async fn run_service_loop(scheduler: Scheduler, processor: Arc<ServiceProcessor>, mut shutdown: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            _ = scheduler.wait_for_next_tick() => {}
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
        }

        if *shutdown.borrow() {
            break;
        }

        match processor.run_cycle().await {
            CycleOutcome::Skipped => {}
            CycleOutcome::Blocked { pending } => {
                warn!("⛔ [KERNEL]: cycle blocked with {} item(s) still pending recovery", pending);
            }
            CycleOutcome::Completed(stats) => {
                info!(
                    "📊 [KERNEL]: cycle completed evaluated={} expired={} due_today={} savings={} ok={} tried={}",
                    stats.evaluated, stats.expired, stats.due_today, stats.savings, stats.ok, stats.tried
                );
            }
        }
    }
}

#[cfg(unix)]
async fn wait_for_termination_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_termination_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
