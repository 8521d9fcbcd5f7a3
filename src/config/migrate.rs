use super::{Config, KNOWN_KEYS};
use crate::errors::{AppError, AppResult};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

fn default_value(key: &str, defaults: &Value) -> Value {
    defaults
        .as_mapping()
        .and_then(|m| m.get(Value::String(key.to_string())))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Add every missing key to the config file at `path`, with its default
/// value. Existing values are left untouched. Returns the keys added.
pub fn fill_missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let mut yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))?;

    if yaml.is_null() {
        yaml = Value::Mapping(Default::default());
    }
    let Some(map) = yaml.as_mapping_mut() else {
        return Err(AppError::Config(format!(
            "{} is not a key/value file",
            path.display()
        )));
    };

    let defaults = serde_yaml::to_value(Config::default())
        .map_err(|e| AppError::Config(e.to_string()))?;

    let mut added = Vec::new();
    for key in KNOWN_KEYS {
        let k = Value::String(key.to_string());
        if !map.contains_key(&k) {
            map.insert(k, default_value(key, &defaults));
            added.push(key.to_string());
        }
    }

    if !added.is_empty() {
        let serialized =
            serde_yaml::to_string(&yaml).map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(path, serialized)?;
    }

    Ok(added)
}
