//! Ports - abstractions implemented by the infrastructure layer

pub mod session_store;

pub use session_store::{InMemorySessionStore, SessionStore, StoreError};
