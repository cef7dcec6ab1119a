//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → ApiConfig (immutable)
//!     → handed to each Api at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - No semantic validation layer: no cross-field constraints exist here

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::ApiConfig;
