//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PoolConfig (validated, immutable)
//!     → LoadBalancedDispatcher::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the node pool is fixed for the
//!   dispatcher's lifetime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{DispatchConfig, EndpointConfig, HttpConfig, ObservabilityConfig, PoolConfig};
pub use validation::{validate_config, ValidationError};
