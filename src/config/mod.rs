//! Policy file subsystem.
//!
//! # Data Flow
//! ```text
//! policy file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks, all errors at once)
//!     → PolicyFile
//!     → PolicyFile::apply (through the builder setters)
//!     → ContextPolicyBuilder::build
//! ```
//!
//! # Design Decisions
//! - Files only carry plain values; code-bearing fields stay programmatic
//! - Every value goes through the same setter a caller would use
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{builder_from_file, load_policy_file, ConfigError};
pub use schema::{ObservabilityConfig, PolicyFile};
pub use validation::{validate_policy_file, ValidationError};
