//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, PORT override)
//!     → validation.rs (semantic checks)
//!     → ForwarderConfig (validated, immutable)
//!     → handed to the server and forwarder at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_with_env, ConfigError};
pub use schema::{
    ForwarderConfig, ForwardingConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    SecurityConfig, TlsConfig,
};
pub use validation::ValidationError;
