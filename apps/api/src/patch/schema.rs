//! Patch schema: the only shape a patch may take when it crosses a boundary.
//!
//! Incoming patches (from the text-generation service or from API clients) are
//! walked as raw `serde_json::Value`s so a violation reports the exact field path
//! instead of a line/column. Unknown fields are rejected at every level.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Replacement content for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    pub id: String,
    /// Never empty once validated.
    pub replace_with: Vec<String>,
}

/// A validated set of region replacements plus free-text notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub blocks: Vec<BlockPatch>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// A schema violation, located by field path (`blocks[1].replaceWith`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct SchemaError {
    pub path: String,
    pub message: String,
}

impl SchemaError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validates a raw JSON value against the patch schema and converts it.
pub fn validate_patch(value: &Value) -> Result<Patch, SchemaError> {
    let root = expect_object(value, "$", &["blocks", "notes"])?;

    let blocks_value = root
        .get("blocks")
        .ok_or_else(|| SchemaError::new("blocks", "is required"))?;
    let block_values = blocks_value
        .as_array()
        .ok_or_else(|| SchemaError::new("blocks", "must be an array"))?;
    if block_values.is_empty() {
        return Err(SchemaError::new("blocks", "must contain at least 1 item"));
    }

    let blocks = block_values
        .iter()
        .enumerate()
        .map(|(i, v)| validate_block(v, &format!("blocks[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let notes = match root.get("notes") {
        None => Vec::new(),
        Some(v) => expect_string_array(v, "notes")?,
    };

    Ok(Patch { blocks, notes })
}

/// Checks an in-memory patch against the same constraints `validate_patch` enforces.
pub fn check_patch(patch: &Patch) -> Result<(), SchemaError> {
    if patch.blocks.is_empty() {
        return Err(SchemaError::new("blocks", "must contain at least 1 item"));
    }
    for (i, block) in patch.blocks.iter().enumerate() {
        if block.id.is_empty() {
            return Err(SchemaError::new(format!("blocks[{i}].id"), "must not be empty"));
        }
        if block.replace_with.is_empty() {
            return Err(SchemaError::new(
                format!("blocks[{i}].replaceWith"),
                "must contain at least 1 item",
            ));
        }
    }
    Ok(())
}

fn validate_block(value: &Value, path: &str) -> Result<BlockPatch, SchemaError> {
    let obj = expect_object(value, path, &["id", "replaceWith"])?;

    let id = obj
        .get("id")
        .ok_or_else(|| SchemaError::new(format!("{path}.id"), "is required"))?
        .as_str()
        .ok_or_else(|| SchemaError::new(format!("{path}.id"), "must be a string"))?;
    if id.is_empty() {
        return Err(SchemaError::new(format!("{path}.id"), "must not be empty"));
    }

    let replace_path = format!("{path}.replaceWith");
    let replace_value = obj
        .get("replaceWith")
        .ok_or_else(|| SchemaError::new(replace_path.clone(), "is required"))?;
    let replace_with = expect_string_array(replace_value, &replace_path)?;
    if replace_with.is_empty() {
        return Err(SchemaError::new(replace_path, "must contain at least 1 item"));
    }

    Ok(BlockPatch {
        id: id.to_string(),
        replace_with,
    })
}

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    allowed: &[&str],
) -> Result<&'a Map<String, Value>, SchemaError> {
    let obj = value
        .as_object()
        .ok_or_else(|| SchemaError::new(path, "must be an object"))?;
    if let Some(unknown) = obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        let field_path = if path == "$" {
            unknown.clone()
        } else {
            format!("{path}.{unknown}")
        };
        return Err(SchemaError::new(field_path, "is not an allowed property"));
    }
    Ok(obj)
}

fn expect_string_array(value: &Value, path: &str) -> Result<Vec<String>, SchemaError> {
    let items = value
        .as_array()
        .ok_or_else(|| SchemaError::new(path, "must be an array"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| SchemaError::new(format!("{path}[{i}]"), "must be a string"))
        })
        .collect()
}

/// JSON Schema handed to the text-generation service. Mirrors `validate_patch`.
pub fn patch_json_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "blocks": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "replaceWith": {
                            "type": "array",
                            "minItems": 1,
                            "items": { "type": "string" }
                        }
                    },
                    "required": ["id", "replaceWith"]
                }
            },
            "notes": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["blocks"]
    })
}
