//! JSON wire format of the flat block list.
//!
//! Blocks are stored as `{"id", "type", ...camelCase fields}` objects. Unknown
//! `type` tags decode to [`FlatBlock::Unrecognized`] rather than failing the
//! whole list; the builder drops them later.
//!
//! Reference blocks also carry their label under a kind-specific key
//! (`articleTitle`, `conceptName`, `questionText`) next to `text`. A non-empty
//! label under that key wins over `text` on decode.

use super::{BlockError, FlatBlock};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

pub fn encode_blocks(blocks: &[FlatBlock]) -> Result<String, BlockError> {
    let mut value = serde_json::to_value(blocks)?;
    if let Some(entries) = value.as_array_mut() {
        for entry in entries {
            write_label(entry);
        }
    }
    Ok(serde_json::to_string(&value)?)
}

pub fn decode_blocks(input: &str) -> Result<Vec<FlatBlock>, BlockError> {
    let mut values: Vec<Value> = serde_json::from_str(input)?;
    for value in &mut values {
        read_label(value);
    }
    let blocks = values
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<FlatBlock>, _>>()?;
    let unrecognized = blocks
        .iter()
        .filter(|block| matches!(block, FlatBlock::Unrecognized))
        .count();
    if unrecognized > 0 {
        debug!(unrecognized, total = blocks.len(), "decoded blocks with unknown types");
    }
    Ok(blocks)
}

/// Label key stored next to `text` for reference block tags.
fn label_key(tag: &str) -> Option<&'static str> {
    match tag {
        "article_ref" | "article-ref" => Some("articleTitle"),
        "concept_ref" | "concept-ref" => Some("conceptName"),
        "question_ref" | "question-ref" => Some("questionText"),
        _ => None,
    }
}

fn write_label(block: &mut Value) {
    let Some(object) = block.as_object_mut() else {
        return;
    };
    let Some(key) = object.get("type").and_then(Value::as_str).and_then(label_key) else {
        return;
    };
    let label = object.get("text").cloned().unwrap_or_default();
    object.insert(key.into(), label);
}

fn read_label(block: &mut Value) {
    let Some(object) = block.as_object_mut() else {
        return;
    };
    let Some(key) = object.get("type").and_then(Value::as_str).and_then(label_key) else {
        return;
    };
    if let Some(Value::String(label)) = object.get(key)
        && !label.is_empty()
    {
        let label = Value::String(label.clone());
        object.insert("text".into(), label);
    }
}

/// Reports the first empty or repeated block id.
///
/// `flatten` and `build` never run this check themselves.
pub fn check_unique_ids(blocks: &[FlatBlock]) -> Result<(), BlockError> {
    let mut seen = HashSet::with_capacity(blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        let Some(id) = block.id() else {
            continue;
        };
        if id.is_empty() {
            return Err(BlockError::EmptyIdentifier { index });
        }
        if !seen.insert(id.as_str()) {
            return Err(BlockError::IdentifierCollision { id: id.clone() });
        }
    }
    Ok(())
}
