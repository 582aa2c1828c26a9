//! Configuration loading
//!
//! Configuration files may be written in TOML, JSON or YAML; the format
//! is picked from the file extension. Layers are merged as JSON values,
//! later layers overriding earlier ones key by key.

use serde::{Deserialize, Serialize};
use std::path::Path;

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Parse configuration text in the given format into any deserializable type
pub fn parse_config<T>(content: &str, format: &str) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    match format {
        "toml" => toml::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("TOML parse error: {e}"))),
        "json" => serde_json::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("JSON parse error: {e}"))),
        "yml" | "yaml" => serde_yaml::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("YAML parse error: {e}"))),
        other => Err(crate::UtilError::Config(format!(
            "Unsupported config format: {other}"
        ))),
    }
}

/// Load configuration from file (format chosen by extension)
pub fn load_config<T>(path: &Path) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, &extension_of(path))
}

/// Merge two JSON values (second overrides first)
fn merge_json_values(base: &mut serde_json::Value, override_value: serde_json::Value) {
    match (base, override_value) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(override_obj)) => {
            for (key, value) in override_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, override_value) => {
            *base_value = override_value;
        }
    }
}

/// Merge two configurations (second overrides first)
pub fn merge_configs<T>(base: &mut T, override_config: T) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let override_value = serde_json::to_value(override_config).map_err(|e| {
        crate::UtilError::Serialization(format!("Override serialization error: {e}"))
    })?;
    merge_value(base, override_value)
}

/// Merge a raw JSON layer into a typed configuration
fn merge_value<T>(base: &mut T, layer: serde_json::Value) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let mut base_value = serde_json::to_value(&*base)
        .map_err(|e| crate::UtilError::Serialization(format!("Base serialization error: {e}")))?;

    merge_json_values(&mut base_value, layer);

    *base = serde_json::from_value(base_value).map_err(|e| {
        crate::UtilError::Serialization(format!("Result deserialization error: {e}"))
    })?;

    Ok(())
}

/// Configuration builder layering defaults, files and overrides
#[derive(Debug)]
pub struct ConfigBuilder<T> {
    config: T,
}

impl<T> ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    /// Create new config builder with defaults
    pub fn new() -> Self {
        Self {
            config: T::default(),
        }
    }

    /// Load a file and merge only the keys it actually sets
    pub fn load_file(mut self, path: &Path) -> crate::Result<Self> {
        let layer: serde_json::Value = load_config(path)?;
        merge_value(&mut self.config, layer)?;
        Ok(self)
    }

    /// Load a file if it exists, otherwise keep the current layers
    pub fn load_optional_file(self, path: &Path) -> crate::Result<Self> {
        if path.is_file() {
            self.load_file(path)
        } else {
            Ok(self)
        }
    }

    /// Merge a partial JSON layer (e.g. command-line overrides)
    pub fn merge_value(mut self, layer: serde_json::Value) -> crate::Result<Self> {
        merge_value(&mut self.config, layer)?;
        Ok(self)
    }

    /// Finish building
    pub fn build(self) -> T {
        self.config
    }
}

impl<T> Default for ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    fn default() -> Self {
        Self::new()
    }
}
