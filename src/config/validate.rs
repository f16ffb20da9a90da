// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{JobError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::JobError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.storage, raw.run))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_storage(cfg)?;
    validate_run(cfg)?;
    Ok(())
}

fn validate_storage(cfg: &RawConfigFile) -> Result<()> {
    if cfg.storage.database.as_os_str().is_empty() {
        return Err(JobError::ConfigError(
            "[storage].database must not be empty".to_string(),
        ));
    }
    if cfg.storage.data_dir.as_os_str().is_empty() {
        return Err(JobError::ConfigError(
            "[storage].data_dir must not be empty".to_string(),
        ));
    }
    if cfg.storage.database.starts_with(&cfg.storage.data_dir) {
        return Err(JobError::ConfigError(format!(
            "[storage].database {:?} must not live inside [storage].data_dir {:?}",
            cfg.storage.database, cfg.storage.data_dir
        )));
    }
    Ok(())
}

fn validate_run(cfg: &RawConfigFile) -> Result<()> {
    if cfg.run.operation_timeout_secs == 0 {
        return Err(JobError::ConfigError(
            "[run].operation_timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
