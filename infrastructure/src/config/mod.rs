pub mod file_config;
pub mod loader;

pub use file_config::{FileConfig, SessionConfig, SimulationConfig, StorageConfig};
pub use loader::ConfigLoader;
