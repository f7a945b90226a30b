//! The client-properties table sent in `connection.start-ok`.

use serde::Serialize;

use crate::error::PolicyResult;
use crate::properties::field::{FieldTable, FieldValue};
use crate::properties::host::HostIdentity;
use crate::properties::keys::{validate_property_name, PropertyKeyClass};

/// Caller-visible client properties.
///
/// Never contains a reserved key: every insert goes through
/// [`validate_property_name`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClientProperties {
    table: FieldTable,
}

impl ClientProperties {
    /// An empty table, without the host defaults.
    pub fn empty() -> Self {
        Self {
            table: FieldTable::new(),
        }
    }

    /// Table seeded from the given host identity.
    pub fn from_host(host: &HostIdentity) -> Self {
        Self {
            table: host
                .client_properties()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// Insert or overwrite `name`. Leaves the table untouched on error.
    pub fn set(&mut self, name: &str, value: FieldValue) -> PolicyResult<PropertyKeyClass> {
        let class = validate_property_name(name)?;
        self.table.insert(name.to_string(), value);
        Ok(class)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.table.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.table.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for ClientProperties {
    fn default() -> Self {
        Self::from_host(HostIdentity::current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolicyError;

    fn sample_host() -> HostIdentity {
        HostIdentity {
            task: "worker".into(),
            pid: 7,
            os: "Linux".into(),
            os_version: "6.1.0".into(),
            os_patch: "#1 SMP".into(),
        }
    }

    #[test]
    fn test_from_host() {
        let props = ClientProperties::from_host(&sample_host());
        assert_eq!(props.len(), 5);
        assert_eq!(props.get("task").and_then(FieldValue::as_str), Some("worker"));
        assert_eq!(props.get("pid").and_then(FieldValue::as_int), Some(7));
    }

    #[test]
    fn test_rejected_set_leaves_table() {
        let mut props = ClientProperties::from_host(&sample_host());
        let before = props.clone();

        let err = props.set("product", "mine".into()).unwrap_err();
        assert!(matches!(err, PolicyError::ReservedClientProperty { .. }));
        assert_eq!(props, before);
    }

    #[test]
    fn test_custom_key() {
        let mut props = ClientProperties::empty();
        let class = props.set("team", "payments".into()).unwrap();
        assert_eq!(class, PropertyKeyClass::Custom);
        assert_eq!(props.iter().count(), 1);
    }
}
