use serde::Deserialize;
use tracing::Level;

use crate::error::ResourceError;

/// Number of concurrent uploads when `threads` is unset or not positive
pub const DEFAULT_UPLOAD_THREADS: usize = 3;

/// Resource `source` configuration, shared by `check` and `out`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Source {
    /// Artifactory base URL, e.g. `https://artifactory.example.com/artifactory`
    pub url: String,
    pub user: String,
    pub password: String,
    pub api_key: String,
    pub access_token: String,
    /// Search pattern: `repository/path/to/*.zip`
    pub pattern: String,
    /// Properties as `key1=value1;key2=value2`
    pub props: String,
    pub recursive: bool,
    pub regexp: bool,
    /// Version constraint; empty means versions are not tracked
    pub version: String,
    pub log_level: LogLevel,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            url: String::new(),
            user: String::new(),
            password: String::new(),
            api_key: String::new(),
            access_token: String::new(),
            pattern: String::new(),
            props: String::new(),
            recursive: true,
            regexp: false,
            version: String::new(),
            log_level: LogLevel::default(),
        }
    }
}

impl Source {
    pub fn validate(&self) -> Result<(), ResourceError> {
        if self.url.trim().is_empty() {
            return Err(ResourceError::Config(
                "You must set an url to your artifactory in source.".to_string(),
            ));
        }
        Ok(())
    }
}

/// `out` step parameters
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OutParams {
    /// `repository_name/repository_path`
    pub target: String,
    /// File or pattern relative to the build's working directory
    pub source: String,
    pub threads: i64,
    pub explode_archive: bool,
}

impl OutParams {
    pub fn validate(&self) -> Result<(), ResourceError> {
        if self.target.trim().is_empty() {
            return Err(ResourceError::Config(
                "You must set a target (in the form of: [repository_name]/[repository_path]) in out parameter."
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn threads(&self) -> usize {
        if self.threads <= 0 {
            DEFAULT_UPLOAD_THREADS
        } else {
            self.threads as usize
        }
    }
}

/// Log verbosity accepted in `source.log_level`
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[serde(alias = "error")]
    Error,
    #[serde(alias = "warn")]
    Warn,
    #[default]
    #[serde(alias = "info")]
    Info,
    #[serde(alias = "debug")]
    Debug,
}

impl LogLevel {
    pub fn as_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
        }
    }
}
