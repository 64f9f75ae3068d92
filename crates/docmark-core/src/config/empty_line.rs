use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DocmarkError, DocmarkResult};

use super::AppConfig;

const FIELDS: [&str; 4] = [
    "enabled",
    "remove_consecutive",
    "remove_trailing",
    "preserve_single_empty",
];

/// Switches controlling blank line and empty row handling.
///
/// All four switches default to `true`. Values coming from configuration
/// files go through [`EmptyLineConfig::from_value`], which rejects anything
/// that is not a JSON boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct EmptyLineConfig {
    enabled: bool,
    remove_consecutive: bool,
    remove_trailing: bool,
    preserve_single_empty: bool,
}

impl EmptyLineConfig {
    /// Default configuration: every switch on.
    pub const DEFAULT: EmptyLineConfig = EmptyLineConfig {
        enabled: true,
        remove_consecutive: true,
        remove_trailing: true,
        preserve_single_empty: true,
    };

    pub const fn new(
        enabled: bool,
        remove_consecutive: bool,
        remove_trailing: bool,
        preserve_single_empty: bool,
    ) -> Self {
        Self {
            enabled,
            remove_consecutive,
            remove_trailing,
            preserve_single_empty,
        }
    }

    /// Configuration with normalization turned off entirely.
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::DEFAULT
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn remove_consecutive(&self) -> bool {
        self.remove_consecutive
    }

    pub fn remove_trailing(&self) -> bool {
        self.remove_trailing
    }

    pub fn preserve_single_empty(&self) -> bool {
        self.preserve_single_empty
    }

    /// Build from a raw mapping, validating every field.
    ///
    /// Missing keys take their default. Unknown keys and non-boolean values
    /// are configuration errors naming the field and the received value.
    pub fn from_value(value: &Value) -> DocmarkResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::DEFAULT),
            other => {
                return Err(DocmarkError::configuration(
                    "empty_line_handling",
                    other,
                    "must be a mapping",
                ))
            }
        };

        if let Some(key) = map.keys().find(|k| !FIELDS.contains(&k.as_str())) {
            return Err(DocmarkError::configuration(
                key.as_str(),
                &map[key],
                "is not a recognized empty line option",
            ));
        }

        Ok(Self {
            enabled: bool_field(map, "enabled")?,
            remove_consecutive: bool_field(map, "remove_consecutive")?,
            remove_trailing: bool_field(map, "remove_trailing")?,
            preserve_single_empty: bool_field(map, "preserve_single_empty")?,
        })
    }

    /// Serializable map projection.
    pub fn as_dict(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("enabled".into(), Value::Bool(self.enabled));
        map.insert(
            "remove_consecutive".into(),
            Value::Bool(self.remove_consecutive),
        );
        map.insert("remove_trailing".into(), Value::Bool(self.remove_trailing));
        map.insert(
            "preserve_single_empty".into(),
            Value::Bool(self.preserve_single_empty),
        );
        map
    }

    /// Pick the configuration to use for a conversion.
    ///
    /// Returns the application's section when one is given, the default
    /// otherwise. Never fails.
    pub fn resolve(config: Option<&AppConfig>) -> Self {
        match config {
            Some(config) => config.empty_line_handling,
            None => Self::DEFAULT,
        }
    }
}

impl Default for EmptyLineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<Value> for EmptyLineConfig {
    type Error = DocmarkError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

fn bool_field(map: &Map<String, Value>, field: &str) -> DocmarkResult<bool> {
    match map.get(field) {
        None => Ok(true),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(DocmarkError::configuration(
            field,
            other,
            "must be a boolean",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_all_true() {
        let config = EmptyLineConfig::default();
        assert!(config.enabled());
        assert!(config.remove_consecutive());
        assert!(config.remove_trailing());
        assert!(config.preserve_single_empty());
        assert_eq!(config, EmptyLineConfig::DEFAULT);
    }

    #[test]
    fn test_from_value_partial() {
        let config = EmptyLineConfig::from_value(&json!({"remove_trailing": false})).unwrap();
        assert!(config.enabled());
        assert!(!config.remove_trailing());
    }

    #[test]
    fn test_from_value_rejects_non_boolean() {
        let err = EmptyLineConfig::from_value(&json!({"enabled": "yes"})).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("enabled"));
        assert!(msg.contains("\"yes\""));

        assert!(EmptyLineConfig::from_value(&json!({"enabled": 1})).is_err());
    }

    #[test]
    fn test_from_value_rejects_unknown_key() {
        let err = EmptyLineConfig::from_value(&json!({"collapse": true})).unwrap_err();
        assert!(err.to_string().contains("collapse"));
    }

    #[test]
    fn test_deserialize_validates() {
        let parsed: Result<EmptyLineConfig, _> =
            serde_json::from_value(json!({"preserve_single_empty": "no"}));
        assert!(parsed.is_err());

        let parsed: EmptyLineConfig =
            serde_json::from_value(json!({"enabled": false})).unwrap();
        assert!(!parsed.enabled());
    }

    #[test]
    fn test_as_dict() {
        let dict = EmptyLineConfig::disabled().as_dict();
        assert_eq!(dict["enabled"], json!(false));
        assert_eq!(dict["remove_consecutive"], json!(true));
        assert_eq!(dict.len(), 4);
    }

    #[test]
    fn test_resolve_without_config() {
        assert_eq!(EmptyLineConfig::resolve(None), EmptyLineConfig::DEFAULT);
    }

    #[test]
    fn test_resolve_with_config() {
        let app = AppConfig {
            empty_line_handling: EmptyLineConfig::disabled(),
            ..AppConfig::default()
        };
        assert!(!EmptyLineConfig::resolve(Some(&app)).enabled());
    }
}
