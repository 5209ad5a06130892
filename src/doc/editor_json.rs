//! Adapter between the editor host's JSON tree and [`DocumentNode`].
//!
//! The host emits nodes shaped `{"type", "attrs", "content", "text"}`. This is
//! also the serialized form persisted for reload. Reading never fails: unknown
//! node types are kept as [`DocumentNode::Other`] with their attributes, and
//! anything that is not an object reads as an empty `Other`.

use super::{DocumentNode, HighlightRef, RefKind};
use crate::core::BlockId;
use serde_json::{Map, Value, json};

impl DocumentNode {
    pub fn from_editor_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Other {
                kind: String::new(),
                attrs: Map::new(),
                children: Vec::new(),
            };
        };

        let kind = object.get("type").and_then(Value::as_str).unwrap_or_default();
        let attrs = Attrs(object.get("attrs").and_then(Value::as_object));
        let content: &[Value] = object
            .get("content")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        match kind {
            "doc" => Self::Document {
                children: nodes_from(content),
            },
            "paragraph" => Self::Paragraph {
                block_id: attrs.block_id(),
                text: json_text(content),
                list_indent: attrs
                    .get("listIndent")
                    .and_then(Value::as_u64)
                    .and_then(|indent| usize::try_from(indent).ok()),
            },
            "heading" => Self::Heading {
                block_id: attrs.block_id(),
                level: attrs
                    .get("level")
                    .and_then(Value::as_u64)
                    .and_then(|level| u8::try_from(level).ok())
                    .unwrap_or(1),
                text: json_text(content),
            },
            "blockquote" => {
                let highlight_id = attrs.string("highlightId");
                let snippet = attrs.string("highlightText");
                let highlight = (highlight_id.is_some() || snippet.is_some())
                    .then(|| HighlightRef {
                        highlight_id,
                        snippet,
                    });
                Self::Quote {
                    block_id: attrs.block_id(),
                    text: json_text(content),
                    highlight,
                }
            }
            "highlightRef" => {
                let snippet = attrs.string("highlightText");
                Self::Quote {
                    block_id: attrs.block_id(),
                    text: snippet.clone().unwrap_or_default(),
                    highlight: Some(HighlightRef {
                        highlight_id: attrs.string("highlightId"),
                        snippet,
                    }),
                }
            }
            "bulletList" => Self::BulletGroup {
                items: nodes_from(content),
            },
            "orderedList" => Self::NumberedGroup {
                items: nodes_from(content),
            },
            "listItem" => Self::ListItem {
                block_id: attrs.block_id(),
                children: nodes_from(content),
            },
            "articleRef" => attrs.reference(RefKind::Article),
            "conceptRef" => attrs.reference(RefKind::Concept),
            "questionRef" => attrs.reference(RefKind::Question),
            "text" => Self::Text {
                text: object
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            other => Self::Other {
                kind: other.to_string(),
                attrs: attrs.0.cloned().unwrap_or_default(),
                children: nodes_from(content),
            },
        }
    }

    pub fn to_editor_json(&self) -> Value {
        match self {
            Self::Document { children } => json!({
                "type": "doc",
                "content": nodes_to(children),
            }),
            Self::Paragraph {
                block_id,
                text,
                list_indent,
            } => {
                let mut attrs = Map::new();
                attrs.insert("blockId".into(), json!(block_id));
                if let Some(indent) = list_indent {
                    attrs.insert("listIndent".into(), json!(indent));
                }
                json!({
                    "type": "paragraph",
                    "attrs": attrs,
                    "content": text_content(text),
                })
            }
            Self::Heading {
                block_id,
                level,
                text,
            } => json!({
                "type": "heading",
                "attrs": { "level": level, "blockId": block_id },
                "content": text_content(text),
            }),
            Self::Quote {
                block_id,
                text,
                highlight: None,
            } => json!({
                "type": "blockquote",
                "attrs": { "blockId": block_id },
                "content": [{ "type": "paragraph", "content": text_content(text) }],
            }),
            // The atom form only carries the snippet, so a body that differs
            // from it is kept in a blockquote.
            Self::Quote {
                block_id,
                text,
                highlight: Some(highlight),
            } => match highlight.snippet.as_deref() {
                Some(snippet) if snippet != text => {
                    let mut attrs = Map::new();
                    attrs.insert("blockId".into(), json!(block_id));
                    if let Some(highlight_id) = &highlight.highlight_id {
                        attrs.insert("highlightId".into(), json!(highlight_id));
                    }
                    attrs.insert("highlightText".into(), json!(snippet));
                    json!({
                        "type": "blockquote",
                        "attrs": attrs,
                        "content": [{ "type": "paragraph", "content": text_content(text) }],
                    })
                }
                _ => json!({
                    "type": "highlightRef",
                    "attrs": {
                        "highlightId": highlight.highlight_id,
                        "highlightText": text,
                        "blockId": block_id,
                    },
                }),
            },
            Self::BulletGroup { items } => json!({
                "type": "bulletList",
                "content": nodes_to(items),
            }),
            Self::NumberedGroup { items } => json!({
                "type": "orderedList",
                "content": nodes_to(items),
            }),
            Self::ListItem { block_id, children } => json!({
                "type": "listItem",
                "attrs": { "blockId": block_id },
                "content": nodes_to(children),
            }),
            Self::Reference {
                block_id,
                kind,
                target_id,
                label,
            } => {
                let (node_type, id_key, label_key) = reference_keys(*kind);
                let mut attrs = Map::new();
                attrs.insert(id_key.into(), json!(target_id));
                attrs.insert(label_key.into(), json!(label));
                attrs.insert("blockId".into(), json!(block_id));
                json!({ "type": node_type, "attrs": attrs })
            }
            Self::Text { text } => json!({ "type": "text", "text": text }),
            Self::Other {
                kind,
                attrs,
                children,
            } => {
                let mut object = Map::new();
                object.insert("type".into(), json!(kind));
                if !attrs.is_empty() {
                    object.insert("attrs".into(), Value::Object(attrs.clone()));
                }
                if !children.is_empty() {
                    object.insert("content".into(), nodes_to(children));
                }
                Value::Object(object)
            }
        }
    }
}

/// Editor node type, id attribute and label attribute for a reference kind.
fn reference_keys(kind: RefKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        RefKind::Article => ("articleRef", "articleId", "articleTitle"),
        RefKind::Concept => ("conceptRef", "conceptId", "conceptName"),
        RefKind::Question => ("questionRef", "questionId", "questionText"),
    }
}

#[derive(Clone, Copy)]
struct Attrs<'a>(Option<&'a Map<String, Value>>);

impl<'a> Attrs<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.and_then(|attrs| attrs.get(key))
    }

    /// String attribute; numeric ids are accepted and rendered as strings.
    fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }

    fn block_id(&self) -> Option<BlockId> {
        self.string("blockId")
            .filter(|id| !id.is_empty())
            .map(BlockId::from)
    }

    fn reference(&self, kind: RefKind) -> DocumentNode {
        let (_, id_key, label_key) = reference_keys(kind);
        DocumentNode::Reference {
            block_id: self.block_id(),
            kind,
            target_id: self.string(id_key),
            label: self.string(label_key).unwrap_or_default(),
        }
    }
}

fn nodes_from(content: &[Value]) -> Vec<DocumentNode> {
    content.iter().map(DocumentNode::from_editor_json).collect()
}

fn nodes_to(nodes: &[DocumentNode]) -> Value {
    Value::Array(nodes.iter().map(DocumentNode::to_editor_json).collect())
}

fn text_content(text: &str) -> Value {
    if text.is_empty() {
        json!([])
    } else {
        json!([{ "type": "text", "text": text }])
    }
}

/// Leaf text of editor nodes, concatenated with no separator.
fn json_text(content: &[Value]) -> String {
    let mut out = String::new();
    for node in content {
        push_json_text(node, &mut out);
    }
    out
}

fn push_json_text(node: &Value, out: &mut String) {
    if let Some(text) = node.get("text").and_then(Value::as_str) {
        out.push_str(text);
    }
    if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
            push_json_text(child, out);
        }
    }
}
