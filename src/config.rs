use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::refresh::WidgetId;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store:   StoreConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    /// Shared store file; defaults to `<data_dir>/deadline-widget/widget_data.json`.
    pub path: Option<PathBuf>,
}

fn default_poll_seconds() -> u64            { 2 }
fn default_widget_ids()   -> Vec<WidgetId> { vec![1, 2] }

#[derive(Debug, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_poll_seconds")]
    pub poll_seconds: u64,
    #[serde(default = "default_widget_ids")]
    pub widget_ids:   Vec<WidgetId>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { poll_seconds: default_poll_seconds(), widget_ids: default_widget_ids() }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path = config_dir().join("config.toml");
        if path.exists() {
            Self::from_toml(&std::fs::read_to_string(&path)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn store_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(|| data_dir().join("widget_data.json"))
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deadline-widget")
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deadline-widget")
}
