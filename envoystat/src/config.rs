use std::{path::PathBuf, time::Duration};

use admin_stats::parse_admin_url;
use clap::{Parser, ValueEnum};
use ext_config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::{
    args::Args,
    error::ConfigError,
    fields::{resolve_fields, FieldSpec, DEFAULT_FIELDS},
};

pub const DEFAULT_ADMIN: &str = "http://localhost:9901";
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;
pub const DEFAULT_TIMEOUT_MS: u64 = 100;
const ENV_PREFIX: &str = "ENVOYSTAT";

/// What the sampling loop does when a tick cannot produce a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    /// Report the error and try again next interval
    #[default]
    Skip,
    /// Stop sampling and exit with the error
    Abort,
}

/// Values read from the optional config file and `ENVOYSTAT_*` variables
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    admin: Option<String>,
    prefix: Option<String>,
    interval_secs: Option<f64>,
    fields: Option<Vec<String>>,
    timeout_ms: Option<u64>,
    on_fetch_error: Option<FetchFailurePolicy>,
}

impl FileSettings {
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("fields"),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}

/// Fully resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub admin: String,
    pub prefix: String,
    pub interval: Duration,
    pub fields: Vec<FieldSpec>,
    pub timeout: Duration,
    pub on_fetch_error: FetchFailurePolicy,
    pub log_file: Option<PathBuf>,
    pub list_fields: bool,
}

impl Settings {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = Args::parse();

        let config_path = args
            .config_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
        let file = FileSettings::load(config_path.as_deref())?;

        Self::resolve(args, file)
    }

    /// Merge CLI arguments over file settings over built-in defaults
    pub fn resolve(args: Args, file: FileSettings) -> Result<Self, ConfigError> {
        let admin = args
            .admin
            .or(file.admin)
            .unwrap_or_else(|| DEFAULT_ADMIN.to_string());
        parse_admin_url(&admin)?;

        let prefix = args.prefix.or(file.prefix).unwrap_or_default();

        let interval_secs = args
            .interval_secs
            .or(file.interval_secs)
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        if !interval_secs.is_finite() || interval_secs <= 0.0 {
            return Err(ConfigError::Interval(interval_secs));
        }
        let interval = Duration::try_from_secs_f64(interval_secs)
            .map_err(|_| ConfigError::Interval(interval_secs))?;

        let timeout_ms = args
            .timeout_ms
            .or(file.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::Timeout);
        }

        let fields = match args.fields.or(file.fields) {
            Some(tokens) => resolve_fields(tokens.as_slice(), &prefix)?,
            None => resolve_fields(DEFAULT_FIELDS, &prefix)?,
        };

        Ok(Settings {
            admin,
            prefix,
            interval,
            fields,
            timeout: Duration::from_millis(timeout_ms),
            on_fetch_error: args
                .on_fetch_error
                .or(file.on_fetch_error)
                .unwrap_or_default(),
            log_file: args.log_file,
            list_fields: args.list_fields,
        })
    }
}
