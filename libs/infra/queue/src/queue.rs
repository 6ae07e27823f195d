// [libs/infra/queue/src/queue.rs]
/*!
 * APARATO: AUXILIARY QUEUE (C5)
 * RESPONSABILIDAD: LISTA DURABLE DE `AuxiliaryItem` POR SERVICIO (§4.5).
 *
 * Persistida como un archivo con una secuencia de objetos JSON (uno por
 * línea). El lock distribuido garantiza que sólo un proceso escribe
 * durante un ciclo; cada mutación reescribe el archivo completo mediante
 * escritura atómica (temp file + rename) para que un crash a mitad de
 * escritura nunca deje un archivo truncado y corrupto.
 */

use crate::errors::QueueError;
use recharge_domain_models::AuxiliaryItem;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub struct AuxiliaryQueue {
    path: PathBuf,
}

impl AuxiliaryQueue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<AuxiliaryItem>, QueueError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path).await?;
        let mut items = Vec::new();
        for line in raw.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            items.push(serde_json::from_str(trimmed)?);
        }
        Ok(items)
    }

    #[instrument(skip(self, item))]
    pub async fn append(&self, item: &AuxiliaryItem) -> Result<(), QueueError> {
        let mut items = self.list().await?;
        items.push(item.clone());
        self.persist_all(&items).await?;
        info!("📥 [QUEUE]: staged item id={} sim={}", item.id, item.sim);
        Ok(())
    }

    /// Retira del archivo todo item que satisfaga `predicate`, retornando
    /// los items retirados. El archivo queda con los items restantes.
    #[instrument(skip(self, predicate))]
    pub async fn remove_by_predicate<F>(&self, predicate: F) -> Result<Vec<AuxiliaryItem>, QueueError>
    where
        F: Fn(&AuxiliaryItem) -> bool,
    {
        let items = self.list().await?;
        let (removed, kept): (Vec<_>, Vec<_>) = items.into_iter().partition(|item| predicate(item));
        self.persist_all(&kept).await?;
        if !removed.is_empty() {
            info!("🧹 [QUEUE]: removed {} item(s)", removed.len());
        }
        Ok(removed)
    }

    /// Instantánea usada para poblar el marcador de caída (§4.6) antes de
    /// que el ciclo empiece a mutar estado externo.
    pub async fn snapshot_for_crash_marker(&self) -> Result<Vec<AuxiliaryItem>, QueueError> {
        self.list().await
    }

    async fn persist_all(&self, items: &[AuxiliaryItem]) -> Result<(), QueueError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut body = String::new();
        for item in items {
            body.push_str(&serde_json::to_string(item)?);
            body.push('\n');
        }

        write_then_rename(&self.path, body.as_bytes()).await
    }
}

/// Escritura atómica: vuelca a un archivo temporal junto al destino y
/// renombra sobre él. Un crash antes del rename deja el archivo original
/// intacto; después del rename, el contenido nuevo completo.
pub(crate) async fn write_then_rename(path: &Path, bytes: &[u8]) -> Result<(), QueueError> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, bytes).await?;
    fs::rename(&tmp_path, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recharge_domain_models::{AuxiliaryStatus, CycleContext, DeviceSnapshot, ServiceKind};
    use tempfile::tempdir;

    fn sample(id: &str) -> AuxiliaryItem {
        AuxiliaryItem {
            id: id.to_string(),
            kind: ServiceKind::Gps,
            sim: "6681000001".into(),
            amount: 1_000,
            days: 8,
            provider_name: "TAECEL".into(),
            provider_txn_id: "T001".into(),
            provider_folio: "F001".into(),
            provider_raw_response: serde_json::json!({"ok": true}),
            device_snapshot: DeviceSnapshot {
                descriptor: "UNIT-01".into(),
                tenant: "ACME".into(),
                sim: "6681000001".into(),
                last_report: Some(900),
            },
            cycle_context: CycleContext { index: 0, total: 1, evaluated: 1, expired: 1, due_today: 0, savings: 0 },
            status: AuxiliaryStatus::WebserviceSuccessPendingDb,
            attempts: 0,
            created_at: 1_700_000_000,
            timeout: "1.23".into(),
            ip: "10.0.0.1".into(),
        }
    }

    #[tokio::test]
    async fn list_on_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let queue = AuxiliaryQueue::new(dir.path().join("gps.jsonl"));
        assert!(queue.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_then_list_round_trips() {
        let dir = tempdir().unwrap();
        let queue = AuxiliaryQueue::new(dir.path().join("gps.jsonl"));
        queue.append(&sample("a1")).await.unwrap();
        queue.append(&sample("a2")).await.unwrap();

        let items = queue.list().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "a1");
        assert_eq!(items[1].id, "a2");
    }

    #[tokio::test]
    async fn remove_by_predicate_keeps_the_rest() {
        let dir = tempdir().unwrap();
        let queue = AuxiliaryQueue::new(dir.path().join("gps.jsonl"));
        queue.append(&sample("a1")).await.unwrap();
        queue.append(&sample("a2")).await.unwrap();

        let removed = queue.remove_by_predicate(|item| item.id == "a1").await.unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, "a1");

        let remaining = queue.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "a2");
    }

    #[tokio::test]
    async fn no_temp_file_survives_a_clean_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gps.jsonl");
        let queue = AuxiliaryQueue::new(&path);
        queue.append(&sample("a1")).await.unwrap();
        assert!(!path.with_extension("tmp").exists());
    }
}
