//! Client-property key policy.
//!
//! # Key Classes
//! - Reserved: filled in by the connection layer for broker-side client
//!   identification; callers may never set them.
//! - Defaulted: populated from the host at builder construction; callers may
//!   overwrite them.
//! - Custom: anything else that is a valid AMQP `shortstr`.
//!
//! The tables below are a versioned contract with the broker. Renaming an
//! entry breaks client identification in the management UI.

use crate::error::{PolicyError, PolicyResult};

/// Keys the connection layer owns.
pub const RESERVED_CLIENT_PROPERTIES: [&str; 5] =
    ["capabilities", "platform", "product", "version", "connection_name"];

/// Keys populated from the host that callers may overwrite.
pub const DEFAULT_CLIENT_PROPERTIES: [&str; 5] = ["task", "pid", "os", "os_version", "os_patch"];

/// Field-table keys are encoded as `shortstr`.
pub const MAX_PROPERTY_NAME_LEN: usize = 255;

/// Classification of a client-property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKeyClass {
    Reserved,
    Defaulted,
    Custom,
}

/// Look up the class of `name` in the key tables.
pub fn classify(name: &str) -> PropertyKeyClass {
    if RESERVED_CLIENT_PROPERTIES.contains(&name) {
        PropertyKeyClass::Reserved
    } else if DEFAULT_CLIENT_PROPERTIES.contains(&name) {
        PropertyKeyClass::Defaulted
    } else {
        PropertyKeyClass::Custom
    }
}

/// Check that a caller may set the property `name`.
///
/// This is the only place the reserved-key policy is enforced; both the
/// builder setter and policy-file validation go through it.
pub fn validate_property_name(name: &str) -> PolicyResult<PropertyKeyClass> {
    if name.is_empty() {
        return Err(PolicyError::InvalidClientPropertyName {
            name: name.to_string(),
            reason: "name is empty",
        });
    }
    if name.len() > MAX_PROPERTY_NAME_LEN {
        return Err(PolicyError::InvalidClientPropertyName {
            name: name.to_string(),
            reason: "name exceeds 255 bytes",
        });
    }

    match classify(name) {
        PropertyKeyClass::Reserved => Err(PolicyError::ReservedClientProperty {
            name: name.to_string(),
        }),
        class => Ok(class),
    }
}
