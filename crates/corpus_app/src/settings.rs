//! Settings file for the terminal driver.
//!
//! The file is RON and every field is optional; a missing file means all
//! defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use corpus_client::ClientSettings;
use corpus_core::CoreSettings;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SETTINGS_FILE: &str = "corpus.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub base_url: String,
    pub page_size: usize,
    pub cursor_count: usize,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Also write `./corpus.log`.
    pub log_to_file: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        let client = ClientSettings::default();
        let core = CoreSettings::default();
        Self {
            base_url: client.base_url,
            page_size: core.page_size,
            cursor_count: core.cursor_count,
            poll_interval_ms: core.poll_interval.as_millis() as u64,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            log_to_file: false,
        }
    }
}

impl AppSettings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading settings from {path:?}"));
            }
        };
        ron::from_str(&content).with_context(|| format!("parsing settings from {path:?}"))
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings {
            page_size: self.page_size,
            cursor_count: self.cursor_count,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}
