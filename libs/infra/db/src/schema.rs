// [libs/infra/db/src/schema.rs]
/*!
 * APARATO: BILLING SCHEMA BOOTSTRAP
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GOBERNANZA ESTRUCTURAL DE LAS TABLAS QUE ESTE MOTOR ESCRIBE
 * Y DE LAS TABLAS FUENTE DE DISPOSITIVOS QUE CONSUME COMO CONTRATO EXTERNO.
 *
 * El esquema de facturación (`recargas`/`detalle_recargas`) es un contrato
 * consumido, no diseñado aquí — se solidifica de todos modos para que el
 * motor tenga dónde escribir en un despliegue local o de prueba. Las tablas
 * fuente de dispositivos (`dispositivos_gps`, `voz_subscripciones`,
 * `agentes_empresa`) son análogos locales de las vistas/joins que en
 * producción viven en bases de datos externas de flota.
 */

use anyhow::{Context, Result};
use libsql::Connection;
use tracing::{debug, info, instrument};

const BILLING_TABLES: &[(&str, &str)] = &[
    ("TABLE_RECARGAS", r#"
        CREATE TABLE IF NOT EXISTS recargas (
            id TEXT PRIMARY KEY,
            total INTEGER NOT NULL,
            ts INTEGER NOT NULL,
            note TEXT NOT NULL,
            actor TEXT NOT NULL,
            provider TEXT NOT NULL,
            tipo TEXT NOT NULL,
            errores INTEGER DEFAULT 0,
            exitos INTEGER DEFAULT 0,
            reembolsos INTEGER DEFAULT 0
        );
    "#),
    ("TABLE_DETALLE_RECARGAS", r#"
        CREATE TABLE IF NOT EXISTS detalle_recargas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            master_id TEXT NOT NULL REFERENCES recargas(id),
            sim TEXT NOT NULL,
            amount INTEGER NOT NULL,
            dispositivo TEXT NOT NULL,
            vehiculo TEXT NOT NULL,
            detalle TEXT NOT NULL,
            folio TEXT NOT NULL,
            status INTEGER NOT NULL,
            UNIQUE(sim, folio)
        );
    "#),
    ("TABLE_RECHARGE_ANALYTICS", r#"
        CREATE TABLE IF NOT EXISTS recharge_analytics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            master_id TEXT NOT NULL REFERENCES recargas(id),
            created_at INTEGER NOT NULL
        );
    "#),
];

const DEVICE_SOURCE_TABLES: &[(&str, &str)] = &[
    ("TABLE_DISPOSITIVOS_GPS", r#"
        CREATE TABLE IF NOT EXISTS dispositivos_gps (
            sim TEXT PRIMARY KEY,
            descriptor TEXT NOT NULL,
            tenant TEXT NOT NULL,
            prepaid INTEGER NOT NULL DEFAULT 1,
            active INTEGER NOT NULL DEFAULT 1,
            unix_saldo INTEGER NOT NULL
        );
    "#),
    ("TABLE_TRACK", r#"
        CREATE TABLE IF NOT EXISTS track (
            sim TEXT NOT NULL,
            reported_at INTEGER NOT NULL
        );
    "#),
    ("TABLE_VOZ_SUBSCRIPCIONES", r#"
        CREATE TABLE IF NOT EXISTS voz_subscripciones (
            sim TEXT PRIMARY KEY,
            descriptor TEXT NOT NULL,
            tenant TEXT NOT NULL,
            package_code TEXT NOT NULL,
            prepaid INTEGER NOT NULL DEFAULT 1,
            active INTEGER NOT NULL DEFAULT 1,
            expires_at INTEGER NOT NULL
        );
    "#),
    ("TABLE_AGENTES_EMPRESA", r#"
        CREATE TABLE IF NOT EXISTS agentes_empresa (
            uuid TEXT PRIMARY KEY,
            sim TEXT NOT NULL,
            descriptor TEXT NOT NULL,
            tenant TEXT NOT NULL,
            prepaid INTEGER NOT NULL DEFAULT 1,
            active INTEGER NOT NULL DEFAULT 1,
            gsm INTEGER NOT NULL DEFAULT 1,
            importe_recarga INTEGER NOT NULL,
            dias_recarga INTEGER,
            balance_expires_at INTEGER NOT NULL
        );
    "#),
    // Base lógica separada de agentes_empresa per §4.9.1 — co-ubicada aquí
    // sólo para desarrollo/pruebas locales; en producción es otra conexión.
    // Escrita por `CommitRepository::update_agent_balance`, un paso posterior
    // al commit de facturación, nunca dentro de su transacción.
    ("TABLE_AGENTES_BALANCE", r#"
        CREATE TABLE IF NOT EXISTS agentes_balance (
            sim TEXT PRIMARY KEY,
            fecha_saldo INTEGER NOT NULL
        );
    "#),
];

const OPERATIONAL_TABLES: &[(&str, &str)] = &[
    ("TABLE_DISTRIBUTED_LOCKS", r#"
        CREATE TABLE IF NOT EXISTS distributed_locks (
            lock_key TEXT PRIMARY KEY,
            owner_token TEXT NOT NULL,
            expires_at INTEGER NOT NULL
        );
    "#),
    ("TABLE_SYSTEM_STATE", r#"
        CREATE TABLE IF NOT EXISTS system_state (
            key TEXT PRIMARY KEY,
            value_text TEXT,
            value_int INTEGER,
            updated_at INTEGER
        );
    "#),
];

const ACCELERATION_INDEXES: &[(&str, &str)] = &[
    ("IDX_TRACK_SIM", "CREATE INDEX IF NOT EXISTS idx_track_sim ON track(sim, reported_at);"),
    ("IDX_DETALLE_SIM", "CREATE INDEX IF NOT EXISTS idx_detalle_sim ON detalle_recargas(sim, status);"),
    ("IDX_RECARGAS_TS", "CREATE INDEX IF NOT EXISTS idx_recargas_ts ON recargas(tipo, ts);"),
];

#[instrument(skip(database_connection))]
pub async fn apply_full_schema(database_connection: &Connection) -> Result<()> {
    info!("🏗️ [SCHEMA]: solidifying billing and device-source strata...");

    for (identifier, sql) in BILLING_TABLES.iter().chain(DEVICE_SOURCE_TABLES).chain(OPERATIONAL_TABLES) {
        debug!("  ↳ solidifying: {}", identifier);
        database_connection
            .execute(sql, ())
            .await
            .with_context(|| format!("CRITICAL_SOLIDIFICATION_FAULT: {}", identifier))?;
    }

    for (identifier, sql) in ACCELERATION_INDEXES {
        debug!("  ↳ hardening: {}", identifier);
        database_connection
            .execute(sql, ())
            .await
            .with_context(|| format!("CRITICAL_HARDENING_FAULT: {}", identifier))?;
    }

    info!("✅ [SCHEMA]: billing ledger level and certified.");
    Ok(())
}
