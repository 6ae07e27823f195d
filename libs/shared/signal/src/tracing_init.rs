// [libs/shared/signal/src/tracing_init.rs]
/*!
 * APARATO: TRACING BOOTSTRAP
 * RESPONSABILIDAD: INICIALIZA EL SUSCRIPTOR GLOBAL Y EL GANCHO DE PÁNICOS.
 *
 * Desarrollo: trazas compactas y coloreadas. Producción: JSON plano para
 * ingesta por el colector externo.
 */

use std::panic;
use tracing::{error, info, instrument};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as formatting_layer, EnvFilter};

#[instrument(skip_all)]
pub fn init_tracing(service_name: &str) {
    let environmental_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{}={level},hyper=warn,libsql=error",
            service_name,
            level = if cfg!(debug_assertions) { "debug" } else { "info" }
        )
        .into()
    });

    let is_production = !cfg!(debug_assertions);

    if is_production {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().json().flatten_event(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().compact().with_target(false))
            .init();
    }

    let service_id_snapshot = service_name.to_string();
    panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic_info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("undefined panic payload");

        error!(
            target: "panic_monitor",
            service = %service_id_snapshot,
            location = %location,
            "🔥 [CRITICAL_PANIC]: thread terminated abruptly: {}",
            payload
        );
    }));

    info!("👁️  [SIGNAL_ONLINE]: tracing initialized for [{}]", service_name);
}
