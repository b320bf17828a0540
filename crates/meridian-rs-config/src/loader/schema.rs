//! Structural checks for Meridian JSON5 settings.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single settings layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "sources", "output"], layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("sources") {
        validate_sources(value, layer, "sources")?;
    }
    if let Some(value) = map.get("output") {
        validate_output(value, layer, "output")?;
    }
    Ok(())
}

/// Validate the "sources" block.
fn validate_sources(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["paths", "namespace"], layer, path)?;
    if let Some(value) = map.get("paths") {
        validate_string_array(value, layer, &join_path(path, "paths"))?;
    }
    if let Some(value) = map.get("namespace") {
        expect_string(value, layer, &join_path(path, "namespace"))?;
    }
    Ok(())
}

/// Validate the "output" block.
fn validate_output(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["dir", "manifest", "extension"], layer, path)?;
    if let Some(value) = map.get("dir") {
        expect_string(value, layer, &join_path(path, "dir"))?;
    }
    if let Some(value) = map.get("manifest") {
        expect_bool(value, layer, &join_path(path, "manifest"))?;
    }
    if let Some(value) = map.get("extension") {
        expect_string(value, layer, &join_path(path, "extension"))?;
    }
    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(arr) = value else {
        return Err(invalid_field(layer, path, "expected array"));
    };
    for (idx, entry) in arr.iter().enumerate() {
        if !entry.is_string() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid_field(layer, &join_path(path, key), "unknown key")),
        None => Ok(()),
    }
}

/// Join nested paths for error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{path}"),
        message: message.to_string(),
    }
}
