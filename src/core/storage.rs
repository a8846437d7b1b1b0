use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::{debug, info};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};

/// Writes snapshot bytes verbatim, overwriting an existing file.
pub async fn write_bytes(
    path: &Path,
    bytes: &[u8],
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if path.exists() {
        match std::fs::remove_file(path) {
            Err(e) => return Err(Box::new(e)),
            _ => {}
        };
    }

    let mut file = match File::create(path).await {
        Err(e) => return Err(Box::new(e)),
        Ok(f) => f,
    };

    match file.write_all(bytes).await {
        Err(e) => {
            match file.shutdown().await {
                Err(e) => return Err(Box::new(e)),
                _ => {}
            };
            return Err(Box::new(e));
        }
        _ => {}
    }

    match file.shutdown().await {
        Err(e) => return Err(Box::new(e)),
        _ => {}
    };

    Ok(())
}

/// Writes snapshots into a dated directory layout,
/// `output/YYYY/MM/DD/YYYYmmddHHMMSS.jpg`, optionally duplicating the first
/// snapshot of each day into an archive directory.
pub struct SnapshotStore {
    output_directory: PathBuf,
    archive_directory: Option<PathBuf>,
    last_archived_day: Option<NaiveDate>,
}

impl SnapshotStore {
    pub fn new(output_directory: PathBuf, archive_directory: Option<PathBuf>) -> Self {
        Self {
            output_directory,
            archive_directory,
            last_archived_day: None,
        }
    }

    pub async fn store(
        &mut self,
        bytes: &[u8],
    ) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
        let now = Local::now();

        let dir = self
            .output_directory
            .join(now.format("%Y").to_string())
            .join(now.format("%m").to_string())
            .join(now.format("%d").to_string());

        fs::create_dir_all(&dir).await?;

        let path = dir.join(format!("{}.jpg", now.format("%Y%m%d%H%M%S")));

        write_bytes(&path, bytes).await?;

        debug!("stored snapshot at {}", path.display());

        self.archive(&path, now.date_naive()).await?;

        Ok(path)
    }

    async fn archive(
        &mut self,
        source: &Path,
        day: NaiveDate,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let directory = match self.archive_directory.to_owned() {
            Some(d) => d,
            None => return Ok(()),
        };

        if self.last_archived_day == Some(day) {
            return Ok(());
        }

        fs::create_dir_all(&directory).await?;

        let target = directory.join(format!("{}.jpg", day.format("%Y-%m-%d")));

        fs::copy(source, &target).await?;

        info!("archived snapshot to {}", target.display());

        self.last_archived_day = Some(day);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{write_bytes, SnapshotStore};

    fn temp_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("uvc_snapshot_store_{}_{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn store_creates_dated_layout_test() {
        let root = temp_root("layout");
        let mut store = SnapshotStore::new(root.to_owned(), None);

        let path = store.store(b"\xFF\xD8\xFF\xD9").await.expect("store failed");

        let written = tokio::fs::read(&path).await.expect("file missing");
        assert_eq!(b"\xFF\xD8\xFF\xD9".to_vec(), written);

        // output/YYYY/MM/DD/YYYYmmddHHMMSS.jpg
        let relative = path.strip_prefix(&root).expect("path outside output root");
        assert_eq!(4, relative.components().count());

        let stem = path.file_stem().unwrap().to_str().unwrap();
        assert_eq!(14, stem.len());
        assert!(stem.chars().all(|c| c.is_ascii_digit()));

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn archive_copies_first_snapshot_of_day_only_test() {
        let root = temp_root("archive");
        let archive = root.join("archive");
        let mut store = SnapshotStore::new(root.join("snaps"), Some(archive.to_owned()));

        store.store(b"first").await.expect("store failed");
        store.store(b"second").await.expect("store failed");

        let mut entries = tokio::fs::read_dir(&archive).await.expect("archive missing");
        let entry = entries.next_entry().await.unwrap().expect("archive empty");
        assert!(entries.next_entry().await.unwrap().is_none());

        let archived = tokio::fs::read(entry.path()).await.unwrap();
        assert_eq!(b"first".to_vec(), archived);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn write_bytes_overwrites_existing_file_test() {
        let root = temp_root("overwrite");
        tokio::fs::create_dir_all(&root).await.unwrap();
        let path = root.join("snapshot.jpg");

        write_bytes(&path, b"old").await.expect("write failed");
        write_bytes(&path, b"new").await.expect("overwrite failed");

        let written = tokio::fs::read(&path).await.unwrap();
        assert_eq!(b"new".to_vec(), written);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
