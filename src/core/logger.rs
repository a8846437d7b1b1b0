use flexi_logger::{
    filter::{self, LogLineFilter},
    Age, Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
};

use crate::core::configuration::LogConfiguration;

pub struct IgnoreReqwest;

impl LogLineFilter for IgnoreReqwest {
    fn write(
        &self,
        now: &mut flexi_logger::DeferredNow,
        record: &log::Record,
        log_line_writer: &dyn filter::LogLineWriter,
    ) -> std::io::Result<()> {
        let path = record.module_path().unwrap_or_default();

        if path.starts_with("reqwest") || path.starts_with("hyper") {
            return Ok(());
        }

        log_line_writer.write(now, record)
    }
}

/// Starts the logger, the CLI verbosity takes precedence over the configured level.
pub fn init(
    conf: &LogConfiguration,
    verbosity: Option<log::LevelFilter>,
) -> Result<LoggerHandle, FlexiLoggerError> {
    let level = match verbosity {
        Some(v) => v.to_string(),
        None => conf.level.to_owned().unwrap_or_else(|| "info".to_string()),
    };

    let mut logger = Logger::try_with_str(level)?.filter(Box::new(IgnoreReqwest));

    if let Some(directory) = conf.directory.to_owned() {
        logger = logger
            .log_to_file(FileSpec::default().directory(directory))
            .rotate(
                Criterion::Age(Age::Day),
                Naming::Timestamps,
                Cleanup::KeepCompressedFiles(conf.retention.unwrap_or(31)),
            )
            .duplicate_to_stderr(Duplicate::All);
    }

    logger.start()
}
