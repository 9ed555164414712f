use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::instance::SearchPolicy;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub instance: InstanceConfig,
    #[serde(default)]
    pub localization: LocalizationConfig,
}

/// Single-instance coordination settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Name of the process-wide lock (default: "padlaunch-instance").
    #[serde(default = "default_mutex_name")]
    pub mutex_name: String,
    /// Well-known name the primary registers its endpoint under
    /// (default: "padlaunch-main-window").
    #[serde(default = "default_window_class")]
    pub window_class: String,
    /// Never hand off to a running instance (default: false).
    #[serde(default)]
    pub always_multi_instance: bool,
    /// Extra lookups after the first miss (default: 5).
    #[serde(default = "default_search_retries")]
    pub search_retries: u32,
    /// Pause before each extra lookup in milliseconds (default: 100).
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
    /// Where the lock and endpoint files live.
    /// Defaults to the user runtime dir, or the temp dir where there is none.
    #[serde(default)]
    pub runtime_dir: Option<PathBuf>,
}

/// Localization settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizationConfig {
    /// Directory holding `<locale>.xml` files (default: `<settings dir>/localization`).
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_mutex_name() -> String {
    "padlaunch-instance".to_string()
}

fn default_window_class() -> String {
    "padlaunch-main-window".to_string()
}

fn default_search_retries() -> u32 {
    5
}

fn default_search_delay_ms() -> u64 {
    100
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            mutex_name: default_mutex_name(),
            window_class: default_window_class(),
            always_multi_instance: false,
            search_retries: default_search_retries(),
            search_delay_ms: default_search_delay_ms(),
            runtime_dir: None,
        }
    }
}

impl InstanceConfig {
    pub fn search_policy(&self) -> SearchPolicy {
        SearchPolicy {
            retries: self.search_retries,
            delay: Duration::from_millis(self.search_delay_ms),
        }
    }

    pub fn runtime_dir(&self) -> PathBuf {
        self.runtime_dir
            .clone()
            .or_else(dirs::runtime_dir)
            .unwrap_or_else(std::env::temp_dir)
    }
}

impl LocalizationConfig {
    pub fn dir(&self, settings_dir: &Path) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| settings_dir.join("localization"))
    }
}
