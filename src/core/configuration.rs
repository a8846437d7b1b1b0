use serde::Deserialize;
use std::{
    fs::{self},
    path::Path,
};
use tokio::{fs::File, io::AsyncReadExt};

#[derive(Deserialize, Clone, Debug)]
pub struct Configuration {
    pub camera: CameraConfiguration,
    pub snapshot: SnapshotConfiguration,
    pub log: LogConfiguration,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CameraConfiguration {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api: Option<String>,
    pub timeout: Option<u64>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SnapshotConfiguration {
    pub output_directory: Option<String>,
    pub interval: Option<u64>,
    pub archive_directory: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LogConfiguration {
    pub level: Option<String>,
    pub directory: Option<String>,
    pub retention: Option<usize>,
}

impl Configuration {
    pub fn assert_output_dir_permissions(&self) -> Result<(), &str> {
        let output_dir = match self.snapshot.output_directory.to_owned() {
            Some(d) => d,
            None => return Err("output_directory is not set"),
        };

        let path = Path::new(&output_dir);

        if !path.try_exists().expect("Access is denied") {
            return Err("output directory does not exist");
        }

        let permissions = fs::metadata(path).expect("cannot read metadata").permissions();

        if permissions.readonly() {
            return Err("output_directory cannot be readonly");
        }

        Ok(())
    }

    pub fn assert_camera_section_is_complete(&self) -> Result<(), &str> {
        match self.camera.host.as_deref().map(str::trim) {
            None | Some("") => return Err("camera host is not set"),
            _ => {}
        }
        match self.camera.username.as_deref().map(str::trim) {
            None | Some("") => return Err("camera username is not set"),
            _ => {}
        }
        match self.camera.password.as_deref().map(str::trim) {
            None | Some("") => return Err("camera password is not set"),
            _ => {}
        }

        Ok(())
    }
}

pub async fn get_configuration(
    file_path: String,
) -> Result<Configuration, Box<dyn std::error::Error + Send + Sync>> {
    let path = Path::new(&file_path);

    if !path.exists() {
        panic!("Configuration file is missing");
    }

    let mut file = File::open(path).await?;
    let mut buffer = vec![];

    file.read_to_end(&mut buffer).await?;

    let result = String::from_utf8(buffer)?;

    match toml::from_str::<Configuration>(&result) {
        Ok(c) => {
            return Ok(c);
        }
        Err(e) => {
            println!("{e:#?}");
            panic!("Configuration file is corrupted");
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use tokio::{
        fs::{self, File},
        io::AsyncWriteExt,
    };

    use crate::core::configuration::get_configuration;

    use super::{CameraConfiguration, Configuration, LogConfiguration, SnapshotConfiguration};

    async fn create_sample_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if path.exists() {
            fs::remove_file(path)
                .await
                .expect("cannot remove sample configuration file");
        }

        let mut file = File::create(path)
            .await
            .expect("cannot create sample configuration file");
        let content = "[camera]
host = \"192.168.0.100\"
username = \"ubnt\"
password = \"pass1234\"

# acceptable values: \"session\", \"direct\" or \"auto\"
api = \"auto\"

# per request timeout in seconds
timeout = 10

[snapshot]
output_directory = \"snaps\"

# interval in seconds
interval = 60
archive_directory = \"archive\"

[log]
level = \"Info\"
directory = \"logs\"
retention = 31";

        file.write_all(content.as_bytes())
            .await
            .expect("cannot write to sample configuration file");
        file.shutdown().await?;

        Ok(())
    }

    #[tokio::test]
    async fn should_match_expected_values() {
        let path = Path::new("./test_uvc_conf.toml");

        create_sample_file(path).await.unwrap();

        let conf = get_configuration("./test_uvc_conf.toml".to_string())
            .await
            .expect("cannot load configuration");

        fs::remove_file(path)
            .await
            .expect("cannot cleanup sample configuration file");

        assert_eq!("192.168.0.100", conf.camera.host.unwrap());
        assert_eq!("ubnt", conf.camera.username.unwrap());
        assert_eq!("pass1234", conf.camera.password.unwrap());
        assert_eq!("auto", conf.camera.api.unwrap());
        assert_eq!(10, conf.camera.timeout.unwrap());

        assert_eq!("snaps", conf.snapshot.output_directory.unwrap());
        assert_eq!(60, conf.snapshot.interval.unwrap());
        assert_eq!("archive", conf.snapshot.archive_directory.unwrap());

        assert_eq!("Info", conf.log.level.unwrap());
        assert_eq!("logs", conf.log.directory.unwrap());
        assert_eq!(31, conf.log.retention.unwrap());
    }

    fn sample_configuration(output_directory: Option<String>) -> Configuration {
        Configuration {
            camera: CameraConfiguration {
                host: Some("192.168.0.100".to_string()),
                username: Some("ubnt".to_string()),
                password: Some("pass1234".to_string()),
                api: None,
                timeout: None,
            },
            snapshot: SnapshotConfiguration {
                output_directory,
                interval: None,
                archive_directory: None,
            },
            log: LogConfiguration {
                level: None,
                directory: None,
                retention: None,
            },
        }
    }

    #[test]
    fn assert_output_dir_permissions_tests() {
        let conf = sample_configuration(Some("nowhere".to_string()));
        let conf2 = sample_configuration(Some("".to_string()));
        let conf3 = sample_configuration(Some(".".to_string()));
        let conf4 = sample_configuration(None);

        assert_eq!(true, conf.assert_output_dir_permissions().is_err());
        assert_eq!(true, conf2.assert_output_dir_permissions().is_err());
        assert_eq!(true, conf3.assert_output_dir_permissions().is_ok());
        assert_eq!(true, conf4.assert_output_dir_permissions().is_err());
    }

    #[test]
    fn assert_camera_section_is_complete_tests() {
        let conf = sample_configuration(None);
        assert_eq!(Ok(()), conf.assert_camera_section_is_complete());

        let mut conf2 = sample_configuration(None);
        conf2.camera.host = None;
        assert_eq!(true, conf2.assert_camera_section_is_complete().is_err());

        let mut conf3 = sample_configuration(None);
        conf3.camera.password = Some(" ".to_string());
        assert_eq!(true, conf3.assert_camera_section_is_complete().is_err());

        let mut conf4 = sample_configuration(None);
        conf4.camera.username = Some("".to_string());
        assert_eq!(true, conf4.assert_camera_section_is_complete().is_err());
    }
}
