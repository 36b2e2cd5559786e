//! Registry handles returned by `register/{type}/{name}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Result of registering a named entity with the space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryHandle {
    /// Namespace assigned by the server.
    pub namespace: String,
    /// Server-defined parameters, uninterpreted by the client.
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl RegistryHandle {
    /// Decode one parameter into a concrete type.
    ///
    /// Returns `Ok(None)` when the parameter is absent.
    pub fn parameter<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.parameters
            .get(key)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_handle() {
        let body = r#"{"namespace": "ns-42", "parameters": {"url": "s3://bucket", "count": 3}}"#;
        let handle: RegistryHandle = serde_json::from_str(body).unwrap();

        assert_eq!(handle.namespace, "ns-42");
        assert_eq!(handle.parameters.len(), 2);
        assert_eq!(
            handle.parameter::<String>("url").unwrap().as_deref(),
            Some("s3://bucket")
        );
        assert_eq!(handle.parameter::<u32>("count").unwrap(), Some(3));
        assert_eq!(handle.parameter::<u32>("missing").unwrap(), None);
    }

    #[test]
    fn test_parameter_type_error() {
        let body = r#"{"namespace": "n", "parameters": {"count": "three"}}"#;
        let handle: RegistryHandle = serde_json::from_str(body).unwrap();
        assert!(handle.parameter::<u32>("count").is_err());
    }

    #[test]
    fn test_missing_parameters_default_empty() {
        let handle: RegistryHandle = serde_json::from_str(r#"{"namespace": "n"}"#).unwrap();
        assert!(handle.parameters.is_empty());
    }
}
