use std::path::PathBuf;

use anyhow::{Context, Result};
use platform_db::SlotSettings;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub top_positions: usize,
    pub top_departments: usize,
    pub log_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: SlotSettings::default().data_dir(),
            top_positions: 6,
            top_departments: 5,
            log_filter: None,
            otlp_endpoint: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            data_dir: SlotSettings::from_env().data_dir(),
            top_positions: env_usize("HR_TOP_POSITIONS", defaults.top_positions)?,
            top_departments: env_usize("HR_TOP_DEPARTMENTS", defaults.top_departments)?,
            log_filter: env_optional("RUST_LOG"),
            otlp_endpoint: env_optional("OTLP_ENDPOINT"),
        })
    }

    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn env_usize(key: &str, default: usize) -> Result<usize> {
    match env_optional(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}")),
        None => Ok(default),
    }
}
