//! Connection settings, layered: built-in defaults, then an optional
//! `cycframe.toml`, then `CYCFRAME_*` environment variables.

use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{CycError, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5008;
pub const DEFAULT_TIMEOUT_SECS: u64 = 360;
pub const DEFAULT_FILE: &str = "cycframe.toml";
pub const ENV_PREFIX: &str = "CYCFRAME";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    host: String,
    port: u16,
    timeout_secs: u64,
    debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debug: false,
        }
    }
}

impl Settings {
    /// Reads `cycframe.toml` from the working directory if present.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_FILE)
    }
    pub fn load_from(path: &str) -> Result<Self> {
        let config = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("debug", false)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        let settings: Settings = config.try_deserialize()?;
        if settings.host.trim().is_empty() {
            return Err(CycError::Config("host must not be empty".into()));
        }
        Ok(settings)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }
    pub fn port(&self) -> u16 {
        self.port
    }
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
    pub fn debug(&self) -> bool {
        self.debug
    }
}
