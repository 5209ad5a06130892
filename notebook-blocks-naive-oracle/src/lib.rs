//! A naive, simple oracle implementation for differential testing.
//!
//! Walks the editor host's raw JSON directly, without going through
//! `DocumentNode`, and never writes ids back.
use notebook_blocks::{BlockId, FlatBlock};
use serde_json::Value;

pub fn flatten_editor_json(
    doc: &Value,
    create_id: &mut dyn FnMut() -> BlockId,
) -> Vec<FlatBlock> {
    let mut blocks = Vec::new();
    walk(doc, 0, create_id, &mut blocks);
    blocks
}

fn walk(
    node: &Value,
    indent: usize,
    create_id: &mut dyn FnMut() -> BlockId,
    out: &mut Vec<FlatBlock>,
) {
    match type_of(node) {
        "paragraph" => {
            let id = id_of(node, create_id);
            let text = extract_text(node);
            let list_indent = attr(node, "listIndent")
                .and_then(Value::as_u64)
                .and_then(|indent| usize::try_from(indent).ok());
            match list_indent {
                Some(indent) => out.push(FlatBlock::Bullet { id, indent, text }),
                None => out.push(FlatBlock::Paragraph { id, text }),
            }
        }
        "heading" => {
            let id = id_of(node, create_id);
            let level = attr(node, "level")
                .and_then(Value::as_u64)
                .and_then(|level| u8::try_from(level).ok())
                .unwrap_or(1);
            out.push(FlatBlock::Heading {
                id,
                level,
                text: extract_text(node),
            });
        }
        "highlightRef" => {
            let id = id_of(node, create_id);
            out.push(FlatBlock::HighlightRef {
                id,
                highlight_id: attr_string(node, "highlightId"),
                text: attr_string(node, "highlightText").unwrap_or_default(),
            });
        }
        "blockquote" => {
            let id = id_of(node, create_id);
            let highlight_id = attr_string(node, "highlightId");
            let snippet = attr_string(node, "highlightText");
            match (highlight_id, snippet) {
                (None, None) => out.push(FlatBlock::Quote {
                    id,
                    text: extract_text(node),
                }),
                (highlight_id, snippet) => out.push(FlatBlock::HighlightRef {
                    id,
                    highlight_id,
                    text: snippet.unwrap_or_else(|| extract_text(node)),
                }),
            }
        }
        "articleRef" => {
            let id = id_of(node, create_id);
            out.push(FlatBlock::ArticleRef {
                id,
                article_id: attr_string(node, "articleId"),
                text: attr_string(node, "articleTitle").unwrap_or_default(),
            });
        }
        "conceptRef" => {
            let id = id_of(node, create_id);
            out.push(FlatBlock::ConceptRef {
                id,
                concept_id: attr_string(node, "conceptId"),
                text: attr_string(node, "conceptName").unwrap_or_default(),
            });
        }
        "questionRef" => {
            let id = id_of(node, create_id);
            out.push(FlatBlock::QuestionRef {
                id,
                question_id: attr_string(node, "questionId"),
                text: attr_string(node, "questionText").unwrap_or_default(),
            });
        }
        "listItem" => {
            let id = id_of(node, create_id);
            let content = children(node);
            let text = match content.iter().find(|child| type_of(child) == "paragraph") {
                Some(paragraph) => extract_text(paragraph),
                None => content
                    .iter()
                    .filter(|child| !is_list(child))
                    .map(extract_text)
                    .collect(),
            };
            out.push(FlatBlock::Bullet { id, indent, text });
            for child in content {
                if is_list(child) {
                    for grandchild in children(child) {
                        walk(grandchild, indent + 1, create_id, out);
                    }
                }
            }
        }
        "text" => {}
        _ => {
            for child in children(node) {
                walk(child, indent, create_id, out);
            }
        }
    }
}

fn type_of(node: &Value) -> &str {
    node.get("type").and_then(Value::as_str).unwrap_or("")
}

fn is_list(node: &Value) -> bool {
    matches!(type_of(node), "bulletList" | "orderedList")
}

fn children(node: &Value) -> &[Value] {
    node.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn attr<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    node.get("attrs").and_then(|attrs| attrs.get(key))
}

fn attr_string(node: &Value, key: &str) -> Option<String> {
    match attr(node, key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn id_of(node: &Value, create_id: &mut dyn FnMut() -> BlockId) -> BlockId {
    match attr_string(node, "blockId") {
        Some(id) if !id.is_empty() => BlockId::new(id),
        _ => create_id(),
    }
}

fn extract_text(node: &Value) -> String {
    match type_of(node) {
        "text" => node
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        "highlightRef" => attr_string(node, "highlightText").unwrap_or_default(),
        _ => children(node).iter().map(extract_text).collect(),
    }
}
