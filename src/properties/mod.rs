//! Client identification properties.
//!
//! # Data Flow
//! ```text
//! host.rs (process + kernel identity, probed once)
//!     → client.rs (ClientProperties seeded with the defaulted keys)
//!     → caller overrides via the policy builder
//!         → keys.rs (reserved / defaulted / custom check)
//!     → snapshot handed to the connection layer
//!     → connection layer adds the reserved keys at handshake
//! ```
//!
//! # Design Decisions
//! - Key policy is data (two const tables), checked by one routine
//! - Reserved keys are rejected, not silently dropped
//! - Field tables are ordered maps so encoding is deterministic

pub mod client;
pub mod field;
pub mod host;
pub mod keys;

pub use client::ClientProperties;
pub use field::{FieldTable, FieldValue};
pub use host::HostIdentity;
pub use keys::{
    classify, validate_property_name, PropertyKeyClass, DEFAULT_CLIENT_PROPERTIES,
    RESERVED_CLIENT_PROPERTIES,
};
