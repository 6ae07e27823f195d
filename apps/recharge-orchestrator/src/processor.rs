// [apps/recharge-orchestrator/src/processor.rs]
/*!
 * =================================================================
 * APARATO: SERVICE PROCESSOR (C11)
 * CLASIFICACIÓN: APPLICATION DRIVER (ESTRATO L1-APP)
 * RESPONSABILIDAD: MÁQUINA DE ESTADOS DE UN CICLO COMPLETO POR SERVICIO (§4.11)
 *
 * Un único driver parametrizado por servicio (§9: "composition with a
 * strategy table" en lugar de una cadena de herencia). La tabla de
 * estrategia completa — selector, filtro, mapeador de commit — vive aquí,
 * sobre los parámetros puros de `recharge-domain-billing::ServiceDescriptor`.
 * =================================================================
 */

use crate::config::{EngineConfig, GpsConfig, VozConfig};
use recharge_core_retry::{execute_fixed_retry, execute_with_category, FailureCategory};
use recharge_domain_billing::{compute_expiry, NoteBuilder, ProductCatalog};
use recharge_domain_models::{
    AuxiliaryItem, AuxiliaryStatus, CycleContext, CycleStats, Device, DeviceSnapshot, ProviderName,
    ProviderResponse, RechargePlan, RechargeState, ServiceKind,
};
use recharge_infra_db::{
    CandidateSelector, CommitRepository, DetailInput, DeviceTable, EliotCandidateRow, LockRepository,
    VerifierRepository,
};
use recharge_infra_provider::{ProviderClient, ProviderError};
use recharge_infra_queue::{AuxiliaryQueue, CrashMarkerStore};
use recharge_infra_telemetry::TelemetryClient;
use recharge_shared_signal::{AlertSink, InMemoryAlertCounter};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug)]
pub enum CycleOutcome {
    /// El candado ya lo posee otro proceso; ciclo saltado en silencio (§4.2, §7).
    Skipped,
    /// La cola quedó no vacía tras la recuperación: cero compras nuevas (P6).
    Blocked { pending: usize },
    Completed(CycleStats),
}

enum ServiceParams {
    Gps(GpsConfig),
    Voz(VozConfig),
    Eliot { minutes_no_report: i64, days_limit: i64 },
}

/// Plan resuelto para un candidato concreto, con monto/días/código ya
/// determinados según la fuente que le corresponda (§4.9.1).
struct ResolvedPurchase {
    amount: i64,
    days: i64,
    product_code: String,
    device_table: DeviceTable,
}

pub struct ServiceProcessor {
    kind: ServiceKind,
    label: &'static str,
    owner_token: String,
    lock_ttl_seconds: i64,
    delay_between_calls: Duration,
    verbose: bool,
    params: ServiceParams,
    selector: CandidateSelector,
    commit: CommitRepository,
    verifier: VerifierRepository,
    lock: LockRepository,
    queue: AuxiliaryQueue,
    crash_marker: CrashMarkerStore,
    telemetry: Option<Arc<TelemetryClient>>,
    providers: Vec<Arc<dyn ProviderClient>>,
    alert_sink: Arc<dyn AlertSink>,
    alert_counter: Mutex<InMemoryAlertCounter>,
}

impl ServiceProcessor {
    pub fn new(
        kind: ServiceKind,
        config: &EngineConfig,
        selector: CandidateSelector,
        commit: CommitRepository,
        verifier: VerifierRepository,
        lock: LockRepository,
        providers: Vec<Arc<dyn ProviderClient>>,
        telemetry: Option<Arc<TelemetryClient>>,
        alert_sink: Arc<dyn AlertSink>,
    ) -> Self {
        let (label, params, verbose): (&'static str, ServiceParams, bool) = match kind {
            ServiceKind::Gps => ("GPS", ServiceParams::Gps(config.gps.clone()), config.verbose_gps),
            ServiceKind::Voz => ("VOZ", ServiceParams::Voz(config.voz.clone()), config.verbose_voz),
            ServiceKind::Eliot => (
                "ELIOT",
                ServiceParams::Eliot {
                    minutes_no_report: config.eliot.minutes_no_report,
                    days_limit: config.eliot.days_limit,
                },
                config.verbose_eliot,
            ),
        };

        let queue_path = format!("{}/{}_auxiliary_queue.json", config.data_dir, kind.file_prefix());
        let marker_path = format!("{}/{}_crash_recovery.json", config.data_dir, kind.file_prefix());

        Self {
            kind,
            label,
            owner_token: Uuid::new_v4().to_string(),
            lock_ttl_seconds: config.lock_ttl_seconds,
            delay_between_calls: config.delay_between_calls,
            verbose,
            params,
            selector,
            commit,
            verifier,
            lock,
            queue: AuxiliaryQueue::new(queue_path),
            crash_marker: CrashMarkerStore::new(marker_path),
            telemetry,
            providers,
            alert_sink,
            alert_counter: Mutex::new(InMemoryAlertCounter::new()),
        }
    }

    /// Recuperación de arranque (§4.6), invocada una vez por el kernel antes
    /// de que el programador empiece a disparar ciclos normales.
    pub async fn recover_on_startup(&self) {
        let pending = self.recover_pending().await;
        if pending > 0 {
            warn!("⚠️  [{}]: {} item(s) still pending after startup recovery", self.label, pending);
        }
    }

    #[instrument(skip(self), fields(service = %self.label))]
    pub async fn run_cycle(&self) -> CycleOutcome {
        let (now, end_of_today) = now_and_end_of_day();

        if !self.lock.acquire(&self.kind.lock_key(), &self.owner_token, now, self.lock_ttl_seconds).await.unwrap_or(false) {
            return CycleOutcome::Skipped;
        }

        if let Ok(snapshot) = self.queue.snapshot_for_crash_marker().await {
            let _ = self.crash_marker.arm(snapshot.len(), snapshot).await;
        }

        let pending_after_recovery = self.recover_pending().await;
        if pending_after_recovery > 0 {
            warn!("⛔ [{}]: queue non-empty after recovery — blocking this cycle (P6)", self.label);
            let _ = self.lock.release(&self.kind.lock_key(), &self.owner_token).await;
            return CycleOutcome::Blocked { pending: pending_after_recovery };
        }

        let mut stats = CycleStats::default();
        let candidates = match self.select_candidates(now, end_of_today).await {
            Ok(c) => c,
            Err(message) => {
                self.alert_sink.alert(FailureCategory::Fatal, &message);
                let _ = self.lock.release(&self.kind.lock_key(), &self.owner_token).await;
                return CycleOutcome::Completed(stats);
            }
        };

        let to_recharge = self.classify_and_filter(candidates, now, &mut stats);

        if !to_recharge.is_empty() {
            let staged = self.purchase_and_stage(to_recharge, &mut stats).await;
            if !staged.is_empty() {
                self.commit_and_verify(staged, &stats, false).await;
            }
        }

        let _ = self.crash_marker.clear().await;
        let _ = self.lock.release(&self.kind.lock_key(), &self.owner_token).await;
        CycleOutcome::Completed(stats)
    }

    // ---------------------------------------------------------------
    // Selecting (C7)
    // ---------------------------------------------------------------

    async fn select_candidates(&self, now: i64, end_of_today: i64) -> Result<Vec<(Device, RechargePlan)>, String> {
        match &self.params {
            ServiceParams::Gps(cfg) => self
                .selector
                .select_gps(
                    now,
                    end_of_today,
                    cfg.days_limit,
                    now - cfg.anti_duplicate_window_days * 86_400,
                    &cfg.tenant_blacklist,
                    cfg.amount,
                    cfg.days,
                    &cfg.product_code,
                )
                .await
                .map_err(|e| format!("[{}] selector failed: {e}", self.label)),
            ServiceParams::Voz(_) => self
                .selector
                .select_voz(now, end_of_today)
                .await
                .map_err(|e| format!("[{}] selector failed: {e}", self.label)),
            ServiceParams::Eliot { days_limit, .. } => {
                let rows = self
                    .selector
                    .select_eliot(now, end_of_today)
                    .await
                    .map_err(|e| format!("[{}] selector failed: {e}", self.label))?;
                Ok(self.enrich_eliot_candidates(rows, now, *days_limit).await)
            }
        }
    }

    /// Enriquece candidatos ELIoT con `lastReport` vía el puerto de
    /// telemetría HTTP, aplicando el mismo recorte por `days_limit` que GPS
    /// resuelve en SQL. Un fallo de telemetría para un `uuid` se trata de
    /// forma fail-safe: `lastReport = None` (§4.8 "never strand a device").
    async fn enrich_eliot_candidates(
        &self,
        rows: Vec<EliotCandidateRow>,
        now: i64,
        days_limit: i64,
    ) -> Vec<(Device, RechargePlan)> {
        let Some(telemetry) = &self.telemetry else {
            return rows.into_iter().map(|r| (r.device, r.plan)).collect();
        };

        let uuids: Vec<String> = rows.iter().map(|r| r.uuid.clone()).collect();
        let last_reports = match telemetry.last_report_batch(&uuids).await {
            Ok(values) => values,
            Err(e) => {
                warn!("⚠️  [{}]: telemetry batch lookup failed, treating as never-reported: {}", self.label, e);
                vec![None; rows.len()]
            }
        };

        rows.into_iter()
            .zip(last_reports)
            .filter_map(|(row, last_report)| {
                let EliotCandidateRow { device, plan, .. } = row;
                let mut device = device;
                device.last_report = last_report;

                if let Some(last) = last_report {
                    let days_since = (now - last).max(0) / 86_400;
                    if days_since > days_limit {
                        return None;
                    }
                }

                Some((device, plan))
            })
            .collect()
    }

    // ---------------------------------------------------------------
    // Filtering (C8)
    // ---------------------------------------------------------------

    fn classify_and_filter(
        &self,
        candidates: Vec<(Device, RechargePlan)>,
        now: i64,
        stats: &mut CycleStats,
    ) -> Vec<(Device, RechargePlan)> {
        let minutes_no_report = match &self.params {
            ServiceParams::Gps(cfg) => Some(cfg.minutes_no_report),
            ServiceParams::Eliot { minutes_no_report, .. } => Some(*minutes_no_report),
            ServiceParams::Voz(_) => None,
        };

        let mut to_recharge = Vec::new();
        for (device, plan) in candidates {
            stats.record_evaluated();
            match plan.state {
                RechargeState::Expired => stats.record_expired(),
                RechargeState::DueToday => stats.record_due_today(),
                RechargeState::Fresh => {}
            }

            let Some(threshold) = minutes_no_report else {
                // VOZ no tiene entrada de telemetría: bypass total del filtro (§4.8).
                to_recharge.push((device, plan));
                continue;
            };

            match device.minutes_since_report(now) {
                Some(minutes) if minutes < threshold => {
                    stats.record_savings();
                }
                _ => to_recharge.push((device, plan)),
            }
        }

        to_recharge
    }

    // ---------------------------------------------------------------
    // Purchasing (C3/C4) + Staging (C5)
    // ---------------------------------------------------------------

    async fn purchase_and_stage(&self, candidates: Vec<(Device, RechargePlan)>, stats: &mut CycleStats) -> Vec<AuxiliaryItem> {
        let total = candidates.len();
        let mut start_index = self.pick_provider_index().await;
        let mut staged = Vec::new();

        for (index, (device, plan)) in candidates.into_iter().enumerate() {
            let resolved = match self.resolve_purchase(&device, &plan) {
                Ok(r) => r,
                Err(message) => {
                    warn!("⛔ [{}]: {}", self.label, message);
                    stats.record_attempt(false);
                    continue;
                }
            };

            let purchase_index = AtomicUsize::new(start_index);
            let providers = &self.providers;
            let sim = device.sim.clone();
            let product_code = resolved.product_code.clone();

            let outcome = execute_with_category(
                || {
                    let i = purchase_index.load(Ordering::SeqCst) % providers.len();
                    let client = providers[i].clone();
                    let sim = sim.clone();
                    let product_code = product_code.clone();
                    async move {
                        let response = client.purchase(&sim, &product_code).await?;
                        Ok::<(ProviderResponse, ProviderName), ProviderError>((response, client.name()))
                    }
                },
                |category, attempt, err| {
                    warn!("⚠️  [{}]: purchase attempt {} failed for sim={}: {}", self.label, attempt, sim, err);
                    self.raise_alert_if_exceeded(category, &format!("sim={} error={}", sim, err));
                },
                || {
                    purchase_index.fetch_add(1, Ordering::SeqCst);
                },
            )
            .await;

            start_index = purchase_index.load(Ordering::SeqCst);

            let (response, provider_name) = match outcome {
                Ok(pair) => pair,
                Err(_) => {
                    stats.record_attempt(false);
                    continue;
                }
            };

            let ProviderResponse::Success { txn_id, folio, saldo_final, timeout, ip, raw } = response else {
                stats.record_attempt(false);
                continue;
            };

            let item = AuxiliaryItem {
                id: Uuid::new_v4().to_string(),
                kind: self.kind,
                sim: device.sim.clone(),
                amount: resolved.amount,
                days: resolved.days,
                provider_name: provider_name.to_string(),
                provider_txn_id: txn_id,
                provider_folio: folio,
                provider_raw_response: raw,
                device_snapshot: DeviceSnapshot {
                    descriptor: device.descriptor.clone(),
                    tenant: device.tenant.clone(),
                    sim: device.sim.clone(),
                    last_report: device.last_report,
                },
                cycle_context: CycleContext {
                    index,
                    total,
                    evaluated: stats.evaluated,
                    expired: stats.expired,
                    due_today: stats.due_today,
                    savings: stats.savings,
                },
                status: AuxiliaryStatus::WebserviceSuccessPendingDb,
                attempts: 0,
                created_at: chrono::Local::now().timestamp(),
                timeout,
                ip,
            };
            let _ = saldo_final; // preservado dentro de `provider_raw_response` para el texto de detalle.

            match execute_fixed_retry(5, Duration::from_millis(500), || {
                let item = item.clone();
                async move { self.queue.append(&item).await }
            })
            .await
            {
                Ok(()) => {
                    stats.record_attempt(true);
                    staged.push(item);
                    if self.verbose {
                        info!("✅ [{}][TEST]: purchase settled for sim={}", self.label, device.sim);
                        tokio::time::sleep(Duration::from_millis(300)).await;
                    }
                }
                Err(e) => {
                    self.alert_sink.alert(
                        FailureCategory::Fatal,
                        &format!(
                            "[{}] DATA LOSS RISK: purchase settled for sim={} folio={} but staging failed after 5 attempts: {}",
                            self.label, item.sim, item.provider_folio, e
                        ),
                    );
                    stats.record_attempt(true);
                    break;
                }
            }

            if !self.delay_between_calls.is_zero() {
                tokio::time::sleep(self.delay_between_calls).await;
            }
        }

        staged
    }

    fn raise_alert_if_exceeded(&self, category: FailureCategory, context: &str) {
        let exceeded = self.alert_counter.lock().unwrap().record(category, Instant::now());
        if exceeded {
            self.alert_sink.alert(category, &format!("[{}] threshold exceeded: {}", self.label, context));
        }
    }

    async fn pick_provider_index(&self) -> usize {
        let mut best_index = 0;
        let mut best_balance = i64::MIN;
        for (i, provider) in self.providers.iter().enumerate() {
            match provider.balance().await {
                Ok(balance) if balance > best_balance => {
                    best_balance = balance;
                    best_index = i;
                }
                Ok(_) => {}
                Err(e) => warn!("⚠️  [{}]: balance check failed for provider {:?}: {}", self.label, provider.name(), e),
            }
        }
        best_index
    }

    /// Resuelve monto/días/código de producto según la fuente que le
    /// corresponda al servicio (§4.9.1, §4.9.2).
    fn resolve_purchase(&self, device: &Device, plan: &RechargePlan) -> Result<ResolvedPurchase, String> {
        match &self.params {
            ServiceParams::Gps(cfg) => Ok(ResolvedPurchase {
                amount: cfg.amount,
                days: cfg.days,
                product_code: cfg.product_code.clone(),
                device_table: DeviceTable::DispositivosGps,
            }),
            ServiceParams::Voz(cfg) => {
                let code = device.package_code.clone().unwrap_or_default();
                let (amount, days) = cfg
                    .product_catalog
                    .get(&code)
                    .copied()
                    .ok_or_else(|| format!("no VOZ product catalog entry for code {code}"))?;
                Ok(ResolvedPurchase { amount, days, product_code: code, device_table: DeviceTable::VozSubscripciones })
            }
            ServiceParams::Eliot { .. } => {
                let product = ProductCatalog::lookup(plan.amount).map_err(|e| e.to_string())?;
                Ok(ResolvedPurchase {
                    amount: plan.amount,
                    days: plan.days,
                    product_code: product.product_code.to_string(),
                    device_table: DeviceTable::AgentesEmpresa,
                })
            }
        }
    }

    // ---------------------------------------------------------------
    // Committing (C9) + Verifying (C10) + Cleaning
    // ---------------------------------------------------------------

    async fn commit_and_verify(&self, staged: Vec<AuxiliaryItem>, stats: &CycleStats, is_recovery: bool) {
        let master_id = Uuid::new_v4().to_string();
        let now = chrono::Local::now().timestamp();
        let provider = staged[0].provider_name.clone();
        let note = NoteBuilder::new(self.label, *stats).recovery(is_recovery).build();

        let details: Vec<DetailInput> = staged.iter().map(|item| self.detail_input_for(item, now)).collect();

        match self.commit.commit_batch(&master_id, now, self.kind.billing_type_literal(), &provider, &note, &details).await {
            Ok(result) => {
                info!("✅ [{}]: master [{}] committed with {} detail(s)", self.label, master_id, result.outcomes.len());
                self.verify_and_clean(&staged).await;
                if matches!(self.kind, ServiceKind::Eliot) {
                    self.reconcile_agent_balances(&details, now).await;
                }
            }
            Err(e) => {
                warn!("⛔ [{}]: batch commit failed, re-staging for recovery: {}", self.label, e);
                self.alert_sink.alert(FailureCategory::Business, &format!("[{}] commit failed: {}", self.label, e));
                self.rewrite_queue_items(staged, AuxiliaryStatus::DbInsertionFailedPendingRecovery, true).await;
            }
        }
    }

    /// Actualización del saldo del agente, posterior y no co-transaccional
    /// al commit de facturación (§4.9.1). Cada SIM se reintenta de forma
    /// independiente; un fallo aquí no revierte ni re-encola la facturación
    /// ya sellada — el propio UPDATE es idempotente, así que sólo se loguea
    /// y se cuenta para alerta.
    async fn reconcile_agent_balances(&self, details: &[DetailInput], now: i64) {
        for detail in details {
            let sim = detail.sim.clone();
            let new_expires_at = detail.new_expires_at;

            let outcome = execute_with_category(
                || {
                    let sim = sim.clone();
                    async move { self.commit.update_agent_balance(&sim, new_expires_at, now).await }
                },
                |category, attempt, err| {
                    warn!("⚠️  [{}]: agent-balance reconciliation attempt {} failed for sim={}: {}", self.label, attempt, sim, err);
                    self.raise_alert_if_exceeded(category, &format!("agent-balance sim={} error={}", sim, err));
                },
                || {},
            )
            .await;

            if outcome.is_err() {
                warn!("⛔ [{}]: agent-balance reconciliation exhausted retries for sim={}, next cycle's selector will retry it implicitly", self.label, sim);
            }
        }
    }

    async fn verify_and_clean(&self, staged: &[AuxiliaryItem]) {
        let pairs: Vec<(String, String)> = staged.iter().map(|i| (i.sim.clone(), i.provider_folio.clone())).collect();

        match self.verifier.verify_batch(&pairs).await {
            Ok(unverified) => {
                let unverified_set: HashSet<(String, String)> = unverified.into_iter().collect();
                let verified: Vec<AuxiliaryItem> = staged
                    .iter()
                    .filter(|i| !unverified_set.contains(&(i.sim.clone(), i.provider_folio.clone())))
                    .cloned()
                    .collect();
                let unverified_items: Vec<AuxiliaryItem> = staged
                    .iter()
                    .filter(|i| unverified_set.contains(&(i.sim.clone(), i.provider_folio.clone())))
                    .cloned()
                    .collect();

                let _ = self
                    .queue
                    .remove_by_predicate(|item| verified.iter().any(|v| v.id == item.id))
                    .await;

                if !unverified_items.is_empty() {
                    warn!("⚠️  [{}]: {} item(s) failed post-commit verification", self.label, unverified_items.len());
                    self.rewrite_queue_items(unverified_items, AuxiliaryStatus::DbVerificationFailed, false).await;
                }
            }
            Err(e) => {
                warn!("⚠️  [{}]: verification pass failed, items remain staged for next recovery: {}", self.label, e);
            }
        }
    }

    /// Reescribe en la cola los items dados con un nuevo estado, incrementando
    /// `attempts` cuando `bump_attempts` es verdadero. La cola no soporta
    /// actualización in-place: se retiran por `id` y se reinsertan mutados.
    async fn rewrite_queue_items(&self, items: Vec<AuxiliaryItem>, status: AuxiliaryStatus, bump_attempts: bool) {
        let ids: HashSet<String> = items.iter().map(|i| i.id.clone()).collect();
        let _ = self.queue.remove_by_predicate(|item| ids.contains(&item.id)).await;
        for mut item in items {
            item.status = status;
            if bump_attempts {
                item.attempts += 1;
            }
            let _ = self.queue.append(&item).await;
        }
    }

    fn detail_input_for(&self, item: &AuxiliaryItem, now: i64) -> DetailInput {
        let (_, end_of_today) = now_and_end_of_day();
        let minutes_without_report = item.device_snapshot.last_report.map(|last| (now - last).max(0) / 60);

        DetailInput {
            sim: item.sim.clone(),
            amount: item.amount,
            device: item.device_snapshot.descriptor.clone(),
            vehicle: format!("{} [{}]", item.device_snapshot.descriptor, item.device_snapshot.tenant),
            detail_text: build_detail_text(item, now, minutes_without_report),
            folio: item.provider_folio.clone(),
            new_expires_at: compute_expiry(end_of_today, item.days),
            device_table: match self.kind {
                ServiceKind::Gps => DeviceTable::DispositivosGps,
                ServiceKind::Voz => DeviceTable::VozSubscripciones,
                ServiceKind::Eliot => DeviceTable::AgentesEmpresa,
            },
        }
    }

    // ---------------------------------------------------------------
    // Recovering (C6)
    // ---------------------------------------------------------------

    async fn recover_pending(&self) -> usize {
        let items = self.queue.list().await.unwrap_or_default();
        let pending: Vec<AuxiliaryItem> = items
            .into_iter()
            .filter(|i| {
                matches!(
                    i.status,
                    AuxiliaryStatus::WebserviceSuccessPendingDb
                        | AuxiliaryStatus::DbInsertionFailedPendingRecovery
                        | AuxiliaryStatus::DbVerificationFailed
                )
            })
            .collect();

        if pending.is_empty() {
            return 0;
        }

        info!("♻️  [{}]: recovering {} pending item(s)", self.label, pending.len());
        let stats = CycleStats::default();
        self.commit_and_verify(pending.clone(), &stats, true).await;

        let remaining = self.queue.list().await.unwrap_or_default();
        remaining
            .into_iter()
            .filter(|i| matches!(i.status, AuxiliaryStatus::WebserviceSuccessPendingDb | AuxiliaryStatus::DbInsertionFailedPendingRecovery | AuxiliaryStatus::DbVerificationFailed))
            .count()
    }
}

fn now_and_end_of_day() -> (i64, i64) {
    use chrono::{Local, TimeZone};
    let now = Local::now();
    let end_of_day = now.date_naive().and_hms_opt(23, 59, 59).expect("valid end-of-day time");
    let end_ts = Local.from_local_datetime(&end_of_day).single().unwrap_or(now).timestamp();
    (now.timestamp(), end_ts)
}

/// Extrae `saldoFinal` del cuerpo crudo preservado, revisando ambas
/// ubicaciones conocidas (raíz y anidado bajo `response`) — mismo recorrido
/// que `ProviderResponse::parse_success` (§6 "known bug surface").
fn extract_saldo_final(raw: &Value) -> String {
    raw.get("saldoFinal")
        .and_then(|v| v.as_str())
        .or_else(|| raw.get("response").and_then(|n| n.get("saldoFinal")).and_then(|v| v.as_str()))
        .unwrap_or("")
        .to_string()
}

fn build_detail_text(item: &AuxiliaryItem, now: i64, minutes_without_report: Option<i64>) -> String {
    let local_ts = {
        use chrono::{Local, TimeZone};
        Local
            .timestamp_opt(now, 0)
            .single()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default()
    };

    let mut text = format!(
        "Proveedor: {} | Folio: {} | Monto: {} | SIM: {} | SaldoFinal: {} | TxnId: {} | Timeout: {} | IP: {} | Fecha: {}",
        item.provider_name,
        item.provider_folio,
        item.amount,
        item.sim,
        extract_saldo_final(&item.provider_raw_response),
        item.provider_txn_id,
        item.timeout,
        item.ip,
        local_ts,
    );

    if let Some(minutes) = minutes_without_report {
        text.push_str(&format!(" | Sin Reportar: {} min", minutes));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item() -> AuxiliaryItem {
        AuxiliaryItem {
            id: "aux-1".into(),
            kind: ServiceKind::Gps,
            sim: "6681000001".into(),
            amount: 1_000,
            days: 8,
            provider_name: "TAECEL".into(),
            provider_txn_id: "T001".into(),
            provider_folio: "F001".into(),
            provider_raw_response: json!({"ok": true, "saldoFinal": "500.00"}),
            device_snapshot: DeviceSnapshot {
                descriptor: "UNIT-01".into(),
                tenant: "ACME".into(),
                sim: "6681000001".into(),
                last_report: Some(1_700_000_000 - 15 * 60),
            },
            cycle_context: CycleContext { index: 0, total: 1, evaluated: 1, expired: 1, due_today: 0, savings: 0 },
            status: AuxiliaryStatus::WebserviceSuccessPendingDb,
            attempts: 0,
            created_at: 1_700_000_000,
            timeout: "1.23".into(),
            ip: "10.0.0.1".into(),
        }
    }

    #[test]
    fn detail_text_contains_folio_and_minutes_without_report() {
        let item = sample_item();
        let text = build_detail_text(&item, 1_700_000_000, Some(15));
        assert!(text.contains("Folio: F001"));
        assert!(text.contains("Sin Reportar: 15 min"));
    }

    #[test]
    fn detail_text_omits_minutes_suffix_when_no_telemetry() {
        let item = sample_item();
        let text = build_detail_text(&item, 1_700_000_000, None);
        assert!(!text.contains("Sin Reportar"));
    }

    #[test]
    fn extract_saldo_final_reads_root_level() {
        assert_eq!(extract_saldo_final(&json!({"saldoFinal": "10.00"})), "10.00");
    }

    #[test]
    fn extract_saldo_final_reads_nested_under_response() {
        assert_eq!(extract_saldo_final(&json!({"response": {"saldoFinal": "20.00"}})), "20.00");
    }
}
