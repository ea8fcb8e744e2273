use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::model::AppInfo;

pub type AppSnapshot = Arc<Vec<AppInfo>>;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("launcher model worker has stopped")]
    Closed,
    #[error("failed to read apps manifest '{path}': {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid apps manifest '{path}': {source}")]
    ManifestFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

enum ModelTask {
    Read { reply: oneshot::Sender<AppSnapshot> },
    ReplaceAll { apps: Vec<AppInfo> },
    Upsert { app: AppInfo },
    RemovePackage { package_name: String },
}

#[derive(Clone)]
pub struct LauncherModel {
    tx: mpsc::UnboundedSender<ModelTask>,
}

impl LauncherModel {
    pub fn spawn(apps: Vec<AppInfo>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ModelTask>();
        tokio::spawn(async move {
            let mut apps: AppSnapshot = Arc::new(apps);
            while let Some(task) = rx.recv().await {
                match task {
                    ModelTask::Read { reply } => {
                        let _ = reply.send(Arc::clone(&apps));
                    }
                    ModelTask::ReplaceAll { apps: next } => {
                        debug!(count = next.len(), "replacing app list");
                        apps = Arc::new(next);
                    }
                    ModelTask::Upsert { app } => {
                        // Outstanding snapshots keep the old list.
                        let list = Arc::make_mut(&mut apps);
                        let key = app.component_key();
                        match list.iter_mut().find(|existing| existing.component_key() == key) {
                            Some(existing) => *existing = app,
                            None => list.push(app),
                        }
                    }
                    ModelTask::RemovePackage { package_name } => {
                        Arc::make_mut(&mut apps).retain(|app| app.package_name != package_name);
                    }
                }
            }
            debug!("launcher model worker stopped");
        });
        Self { tx }
    }

    pub async fn snapshot(&self) -> Result<AppSnapshot, ModelError> {
        let (reply, rx) = oneshot::channel();
        self.enqueue(ModelTask::Read { reply })?;
        rx.await.map_err(|_| ModelError::Closed)
    }

    pub fn replace_all(&self, apps: Vec<AppInfo>) -> Result<(), ModelError> {
        self.enqueue(ModelTask::ReplaceAll { apps })
    }

    pub fn upsert(&self, app: AppInfo) -> Result<(), ModelError> {
        self.enqueue(ModelTask::Upsert { app })
    }

    pub fn remove_package(&self, package_name: &str) -> Result<(), ModelError> {
        self.enqueue(ModelTask::RemovePackage {
            package_name: package_name.to_string(),
        })
    }

    fn enqueue(&self, task: ModelTask) -> Result<(), ModelError> {
        self.tx.send(task).map_err(|_| ModelError::Closed)
    }
}

/// Reads a JSON array of apps. A missing manifest is an empty app list.
pub fn load_manifest(path: &Path) -> Result<Vec<AppInfo>, ModelError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ModelError::ManifestRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&raw).map_err(|source| ModelError::ManifestFormat {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_observes_mutations_in_queue_order() {
        let model = LauncherModel::spawn(vec![AppInfo::new("com.x.a", "Alpha")]);
        let before = model.snapshot().await.unwrap();

        model.upsert(AppInfo::new("com.x.b", "Beta")).unwrap();
        model.remove_package("com.x.a").unwrap();
        let after = model.snapshot().await.unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].package_name, "com.x.a");
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].package_name, "com.x.b");
    }

    #[tokio::test]
    async fn upsert_replaces_same_component() {
        let model = LauncherModel::spawn(vec![AppInfo::new("com.x.a", "Alpha")]);
        model.upsert(AppInfo::new("com.x.a", "Alpha Renamed")).unwrap();
        let apps = model.snapshot().await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].title, "Alpha Renamed");
    }
}
