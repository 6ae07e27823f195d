// [libs/infra/queue/src/crash_marker.rs]
/*!
 * APARATO: CRASH MARKER (C6)
 * RESPONSABILIDAD: DETECTA UNA CAÍDA A MITAD DE CICLO Y DISPARA RECUPERACIÓN (§4.6).
 *
 * Se escribe antes de que un ciclo empiece a mutar estado externo
 * (compras, commits) y se borra al final limpio del ciclo. Su sola
 * presencia al arrancar el proceso, sin importar el contenido de la cola,
 * dispara el flujo de recuperación.
 */

use crate::errors::QueueError;
use crate::queue::write_then_rename;
use recharge_domain_models::AuxiliaryItem;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrashMarker {
    pub was_processing: bool,
    pub items_in_process: usize,
    pub snapshot: Vec<AuxiliaryItem>,
}

pub struct CrashMarkerStore {
    path: PathBuf,
}

impl CrashMarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[instrument(skip(self, snapshot))]
    pub async fn arm(&self, items_in_process: usize, snapshot: Vec<AuxiliaryItem>) -> Result<(), QueueError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let marker = CrashMarker { was_processing: true, items_in_process, snapshot };
        let body = serde_json::to_vec(&marker)?;
        write_then_rename(&self.path, &body).await
    }

    pub async fn read(&self) -> Result<Option<CrashMarker>, QueueError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read(&self.path).await?;
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), QueueError> {
        if self.path.exists() {
            fs::remove_file(&self.path).await?;
            info!("🏁 [CRASH_MARKER]: cleared at clean cycle end");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn read_on_missing_marker_is_none() {
        let dir = tempdir().unwrap();
        let store = CrashMarkerStore::new(dir.path().join("gps.marker.json"));
        assert!(store.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn arm_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let store = CrashMarkerStore::new(dir.path().join("gps.marker.json"));
        store.arm(3, Vec::new()).await.unwrap();

        let marker = store.read().await.unwrap().unwrap();
        assert!(marker.was_processing);
        assert_eq!(marker.items_in_process, 3);
    }

    #[tokio::test]
    async fn clear_removes_the_marker() {
        let dir = tempdir().unwrap();
        let store = CrashMarkerStore::new(dir.path().join("gps.marker.json"));
        store.arm(1, Vec::new()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_on_absent_marker_is_a_noop() {
        let dir = tempdir().unwrap();
        let store = CrashMarkerStore::new(dir.path().join("gps.marker.json"));
        store.clear().await.unwrap();
    }
}
