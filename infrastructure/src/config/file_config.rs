//! Configuration file structure

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from TOML files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub simulation: SimulationConfig,
}

/// `[storage]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding session JSON files. Defaults to
    /// `~/.local/share/voter/sessions` (platform equivalent).
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: None }
    }
}

impl StorageConfig {
    /// Effective data directory, falling back to the platform data dir.
    pub fn effective_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voter")
            .join("sessions")
    }
}

/// `[session]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// K-ahead threshold used when `--k` is not given
    pub default_k: u32,
    /// Turn limit used when `--max-turns` is not given
    pub default_max_turns: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_k: 2,
            default_max_turns: 10,
        }
    }
}

/// `[simulation]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Strategy used when `--strategy` is not given
    pub default_strategy: String,
    /// Agent count used when `--agents` is not given
    pub default_agents: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_strategy: "random".to_string(),
            default_agents: 3,
        }
    }
}
