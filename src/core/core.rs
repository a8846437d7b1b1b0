use std::path::{Path, PathBuf};

use log::info;

use crate::core::{
    camera::{self, Camera},
    configuration::Configuration,
    poller::Poller,
    storage::SnapshotStore,
};

const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Grabs a single snapshot and saves it to `output`, or to the configured
/// dated store when no explicit path is given.
pub async fn snap(
    conf: &Configuration,
    output: Option<String>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    conf.assert_camera_section_is_complete()?;

    let camera = Camera::connect(&conf.camera).await?;

    match output {
        Some(path) => {
            camera.save_snapshot(Path::new(&path)).await?;
            info!("saved snapshot to {}", path);
        }
        None => {
            conf.assert_output_dir_permissions()?;

            let mut store = snapshot_store(conf)?;
            let bytes = camera.snapshot().await?;
            let path = store.store(&bytes).await?;
            info!("saved snapshot to {}", path.display());
        }
    }

    Ok(())
}

/// Polls the camera for snapshots until interrupted.
pub async fn watch(
    conf: &Configuration,
    interval_override: Option<u64>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    conf.assert_camera_section_is_complete()?;
    conf.assert_output_dir_permissions()?;

    let camera = Camera::connect(&conf.camera).await?;
    let store = snapshot_store(conf)?;

    let interval = interval_override
        .or(conf.snapshot.interval)
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    let mut poller = Poller::new(interval, camera, store);

    poller.run().await
}

/// Logs in over the session flow and reports whether it worked.
pub async fn session_diagnostic(
    conf: &Configuration,
    show_token: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    conf.assert_camera_section_is_complete()?;

    let client = camera::session_client(&conf.camera)?;

    client.login().await?;

    info!("session established successfully");

    if show_token {
        match client.session_token().await {
            Some(t) => println!("SESSION_TOKEN: {}", t),
            None => {}
        }
    }

    Ok(())
}

fn snapshot_store(
    conf: &Configuration,
) -> Result<SnapshotStore, Box<dyn std::error::Error + Send + Sync>> {
    let output_directory = match conf.snapshot.output_directory.to_owned() {
        Some(d) => PathBuf::from(d),
        None => {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "output_directory is not configured",
            )))
        }
    };

    let archive_directory = conf
        .snapshot
        .archive_directory
        .to_owned()
        .map(PathBuf::from);

    Ok(SnapshotStore::new(output_directory, archive_directory))
}
