//! Project layout: where build artifacts live and which markers must appear.
//!
//! Defaults describe the CSI firmware project. Any subset of fields can be
//! overridden from a TOML file:
//!
//! ```toml
//! project_root = "firmware"
//! firmware_binary = "my_app.bin"
//! required_settings = ["CONFIG_ESP32_WIFI_CSI_ENABLED=y"]
//! ```

use crate::PreflightError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project root used when none is given. The harness historically lives one
/// directory below the firmware root.
pub const DEFAULT_PROJECT_ROOT: &str = "..";

/// Largest firmware image accepted without OTA partitioning (1 MiB).
pub const MAX_FIRMWARE_SIZE: u64 = 1024 * 1024;

/// Paths and markers every check resolves against `project_root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectLayout {
    pub project_root: PathBuf,

    pub build_dir: PathBuf,
    pub firmware_binary: String,
    pub max_firmware_size: u64,

    pub config_file: PathBuf,
    pub required_settings: Vec<String>,

    pub components_dir: PathBuf,
    pub required_components: Vec<String>,
    /// Either of these inside a component directory counts as a build descriptor
    pub component_descriptors: Vec<String>,

    /// Tried in order; the first one present is inspected
    pub partition_tables: Vec<PathBuf>,
    pub required_partitions: Vec<String>,

    pub build_descriptor: PathBuf,
    pub project_marker: String,

    pub main_dir: PathBuf,
    /// Tried in order inside `main_dir`
    pub main_sources: Vec<String>,
    pub entry_point: String,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        ProjectLayout {
            project_root: PathBuf::from(DEFAULT_PROJECT_ROOT),
            build_dir: PathBuf::from("build"),
            firmware_binary: "csi_firmware.bin".to_string(),
            max_firmware_size: MAX_FIRMWARE_SIZE,
            config_file: PathBuf::from("sdkconfig"),
            required_settings: strings(&[
                "CONFIG_ESP32_WIFI_CSI_ENABLED=y",
                "CONFIG_FREERTOS_UNICORE=n",
            ]),
            components_dir: PathBuf::from("components"),
            required_components: strings(&[
                "csi_collector",
                "mqtt_client",
                "ntp_sync",
                "web_server",
                "ota_updater",
            ]),
            component_descriptors: strings(&["CMakeLists.txt", "component.mk"]),
            partition_tables: vec![
                PathBuf::from("partitions.csv"),
                PathBuf::from("partitions_4mb_ota.csv"),
            ],
            required_partitions: strings(&["nvs", "phy_init", "app"]),
            build_descriptor: PathBuf::from("CMakeLists.txt"),
            project_marker: "project(".to_string(),
            main_dir: PathBuf::from("main"),
            main_sources: strings(&["main.c", "app_main.c"]),
            entry_point: "app_main".to_string(),
        }
    }
}

impl ProjectLayout {
    /// Default layout rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        ProjectLayout {
            project_root: root.into(),
            ..Default::default()
        }
    }

    /// Resolve a project-relative path.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_root.join(relative)
    }

    pub fn build_path(&self) -> PathBuf {
        self.resolve(&self.build_dir)
    }

    pub fn firmware_path(&self) -> PathBuf {
        self.build_path().join(&self.firmware_binary)
    }

    pub fn main_path(&self) -> PathBuf {
        self.resolve(&self.main_dir)
    }

    pub fn components_path(&self) -> PathBuf {
        self.resolve(&self.components_dir)
    }

    /// Parse a layout override. Fields left out keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a layout override file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreflightError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PreflightError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| PreflightError::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
