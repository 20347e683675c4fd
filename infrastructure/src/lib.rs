//! Infrastructure layer for voter
//!
//! Concrete adapters behind the application layer's ports: JSON file
//! session storage and TOML configuration loading.

pub mod config;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use storage::JsonSessionStore;
