// [apps/recharge-orchestrator/src/config.rs]
/*!
 * APARATO: ENGINE CONFIGURATION
 * RESPONSABILIDAD: CARGA Y VALIDACIÓN DE VARIABLES DE ENTORNO (§6).
 *
 * Variables requeridas ausentes son un error de arranque FATAL (exit != 0,
 * §6 "Exit codes"); variables opcionales malformadas caen a un default
 * documentado en el propio parseo.
 */

use crate::scheduler::ScheduleMode;
use std::collections::HashMap;
use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("[CONFIG_MISSING]: required env var {0} is not set")]
    Missing(&'static str),

    #[error("[CONFIG_MALFORMED]: env var {key} = {value:?} could not be parsed: {reason}")]
    Malformed { key: &'static str, value: String, reason: String },
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parse_required<T: std::str::FromStr>(key: &'static str) -> Result<T, ConfigError> {
    let raw = required(key)?;
    raw.parse().map_err(|e: T::Err| ConfigError::Malformed { key, value: raw, reason: e.to_string() })
}

fn with_default<T: std::str::FromStr>(key: &'static str, default: T) -> T {
    env::var(key).ok().and_then(|raw| raw.parse().ok()).unwrap_or(default)
}

fn bool_flag(key: &'static str) -> bool {
    env::var(key).map(|v| v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

/// Credenciales de enlace hacia un carrier concreto (TAECEL o MST).
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub base_url: String,
    pub token: String,
}

fn provider_credentials(prefix: &'static str) -> Result<ProviderCredentials, ConfigError> {
    Ok(ProviderCredentials {
        base_url: required(leak(format!("{prefix}_BASE_URL")))?,
        token: required(leak(format!("{prefix}_TOKEN")))?,
    })
}

/// Las claves de entorno deben vivir por `'static` para los mensajes de
/// error; como sólo se construyen una vez al arranque, filtrarlas es
/// aceptable (no hay ciclo de vida posterior que las reclame).
fn leak(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

#[derive(Debug, Clone)]
pub struct GpsConfig {
    pub minutes_no_report: i64,
    pub days_limit: i64,
    pub amount: i64,
    pub days: i64,
    pub product_code: String,
    pub tenant_blacklist: Vec<String>,
    pub anti_duplicate_window_days: i64,
    /// Paso `k` del modo Interval (§4.1: `k >= 6` para GPS).
    pub interval_minutes: u32,
}

#[derive(Debug, Clone)]
pub struct VozConfig {
    pub schedule: ScheduleMode,
    /// `"CODE:AMOUNT:DAYS"` pares separados por coma — VOZ no tiene un
    /// catálogo fijo citado en la especificación como el de ELIoT, así que
    /// se deriva de configuración en vez de inventar denominaciones.
    pub product_catalog: HashMap<String, (i64, i64)>,
}

#[derive(Debug, Clone)]
pub struct EliotConfig {
    pub minutes_no_report: i64,
    pub days_limit: i64,
    /// Paso `k` del modo Interval (§4.1: `k >= 10` para ELIoT).
    pub interval_minutes: u32,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub database_url: String,
    pub database_token: Option<String>,
    pub data_dir: String,
    pub taecel: ProviderCredentials,
    pub mst: ProviderCredentials,
    pub telemetry: ProviderCredentials,
    pub gps: GpsConfig,
    pub voz: VozConfig,
    pub eliot: EliotConfig,
    pub lock_ttl_seconds: i64,
    pub delay_between_calls: Duration,
    pub verbose_gps: bool,
    pub verbose_voz: bool,
    pub verbose_eliot: bool,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let gps_minutes_no_report: i64 = parse_required("GPS_MINUTES_NO_REPORT")?;
        if gps_minutes_no_report < 6 {
            return Err(ConfigError::Malformed {
                key: "GPS_MINUTES_NO_REPORT",
                value: gps_minutes_no_report.to_string(),
                reason: "must be >= 6".into(),
            });
        }

        let eliot_minutes_no_report: i64 = parse_required("ELIOT_MINUTES_NO_REPORT")?;
        if eliot_minutes_no_report < 10 {
            return Err(ConfigError::Malformed {
                key: "ELIOT_MINUTES_NO_REPORT",
                value: eliot_minutes_no_report.to_string(),
                reason: "must be >= 10".into(),
            });
        }

        let voz_schedule_mode = env::var("VOZ_SCHEDULE_MODE").unwrap_or_else(|_| "fixed".to_string());
        let voz_schedule = match voz_schedule_mode.as_str() {
            "interval" => {
                let minutes: u32 = with_default("VOZ_MINUTES", 10);
                ScheduleMode::Interval { step_minutes: minutes.max(10) }
            }
            _ => ScheduleMode::Fixed { local_times: vec![(1, 0), (4, 0)] },
        };

        let tenant_blacklist = env::var("GPS_TENANT_BLACKLIST")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let voz_product_catalog = parse_product_catalog(&env::var("VOZ_PRODUCT_CATALOG").unwrap_or_default());

        Ok(EngineConfig {
            database_url: required("DATABASE_URL")?,
            database_token: env::var("TURSO_AUTH_TOKEN").ok(),
            data_dir: env::var("RECHARGE_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            taecel: provider_credentials("TAECEL")?,
            mst: provider_credentials("MST")?,
            telemetry: provider_credentials("TELEMETRY")?,
            gps: GpsConfig {
                minutes_no_report: gps_minutes_no_report,
                days_limit: parse_required("GPS_DAYS_LIMIT")?,
                amount: parse_required("GPS_AMOUNT")?,
                days: parse_required("GPS_DAYS")?,
                product_code: required("GPS_CODE")?,
                tenant_blacklist,
                anti_duplicate_window_days: with_default("GPS_ANTI_DUPLICATE_WINDOW_DAYS", 6),
                interval_minutes: with_default::<u32>("GPS_INTERVAL_MINUTES", 6).max(6),
            },
            voz: VozConfig { schedule: voz_schedule, product_catalog: voz_product_catalog },
            eliot: EliotConfig {
                minutes_no_report: eliot_minutes_no_report,
                days_limit: parse_required("ELIOT_DAYS_LIMIT")?,
                interval_minutes: with_default::<u32>("ELIOT_INTERVAL_MINUTES", 10).max(10),
            },
            lock_ttl_seconds: with_default("LOCK_TTL_SECONDS", 300),
            delay_between_calls: Duration::from_millis(with_default("DELAY_BETWEEN_CALLS_MS", 0u64)),
            verbose_gps: bool_flag("TEST_GPS"),
            verbose_voz: bool_flag("TEST_VOZ"),
            verbose_eliot: bool_flag("TEST_ELIOT"),
        })
    }
}

fn parse_product_catalog(raw: &str) -> HashMap<String, (i64, i64)> {
    let mut table = HashMap::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let parts: Vec<&str> = entry.split(':').collect();
        if parts.len() != 3 {
            continue;
        }
        if let (Ok(amount), Ok(days)) = (parts[1].parse::<i64>(), parts[2].parse::<i64>()) {
            table.insert(parts[0].to_string(), (amount, days));
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_catalog_parses_well_formed_entries() {
        let table = parse_product_catalog("P10:10:7,P50:50:30");
        assert_eq!(table.get("P10"), Some(&(10, 7)));
        assert_eq!(table.get("P50"), Some(&(50, 30)));
    }

    #[test]
    fn product_catalog_skips_malformed_entries() {
        let table = parse_product_catalog("broken,P10:10:7");
        assert_eq!(table.len(), 1);
        assert!(table.contains_key("P10"));
    }

    #[test]
    fn empty_catalog_is_empty() {
        assert!(parse_product_catalog("").is_empty());
    }
}
