use std::{path::PathBuf, time::Duration};

use log::{error, info};

use crate::core::{camera::Camera, storage::SnapshotStore};

pub struct Poller {
    interval: u64,
    camera: Camera,
    store: SnapshotStore,
}

impl Poller {
    pub fn new(interval: u64, camera: Camera, store: SnapshotStore) -> Self {
        Self {
            interval,
            camera,
            store,
        }
    }

    /// Runs the sequential polling loop. A failed snapshot is logged and the
    /// loop continues, iterations never overlap.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("polling the camera every {} seconds", self.interval);

        let duration = Duration::from_secs(self.interval);

        loop {
            match self.tick().await {
                Err(e) => {
                    error!("snapshot failed: {}", e);
                }
                _ => {}
            }

            tokio::time::sleep(duration).await;
        }
    }

    /// Fetches and stores a single snapshot.
    pub async fn tick(&mut self) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
        let bytes = self.camera.snapshot().await?;

        let path = self.store.store(&bytes).await?;

        info!("saved snapshot to {}", path.display());

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::Poller;
    use crate::core::camera::camera_error::TransportError;
    use crate::core::camera::common::MockSnapshotSource;
    use crate::core::camera::Camera;
    use crate::core::storage::SnapshotStore;

    fn temp_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("uvc_snapshot_poller_{}_{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn tick_stores_fetched_snapshot_test() {
        let mut source = MockSnapshotSource::new();
        source
            .expect_fetch_snapshot()
            .times(1)
            .returning(|| Ok(b"\xFF\xD8\xFF\xD9".to_vec()));

        let root = temp_root("tick_ok");
        let store = SnapshotStore::new(root.to_owned(), None);
        let mut poller = Poller::new(60, Camera::new(Box::new(source)), store);

        let path = poller.tick().await.expect("tick failed");

        let written = tokio::fs::read(&path).await.expect("file missing");
        assert_eq!(b"\xFF\xD8\xFF\xD9".to_vec(), written);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn tick_propagates_fetch_failure_test() {
        let mut source = MockSnapshotSource::new();
        source.expect_fetch_snapshot().times(1).returning(|| {
            Err(Box::new(TransportError::new("connection reset".to_string())) as _)
        });

        let root = temp_root("tick_err");
        let store = SnapshotStore::new(root.to_owned(), None);
        let mut poller = Poller::new(60, Camera::new(Box::new(source)), store);

        let res = poller.tick().await;

        assert!(res.is_err());
        assert!(!root.exists());
    }
}
