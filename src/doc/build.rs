//! Blocks-to-tree building.
//!
//! Every flat block becomes a top-level node stamped with the block's id.
//! `build(flatten(tree))` is not structurally equal to `tree`; only
//! `flatten(build(blocks))` is required to reproduce `blocks`.

use super::{DocumentNode, FlatBlock, HighlightRef, RefKind};
use crate::core::BlockId;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListLayout {
    /// Bullets load as paragraphs tagged with their indent.
    #[default]
    Flat,
    /// Runs of well-formed bullets load as nested list groups.
    Nested,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub list_layout: ListLayout,
}

impl BuildConfig {
    pub fn flat() -> Self {
        Self {
            list_layout: ListLayout::Flat,
        }
    }

    pub fn nested() -> Self {
        Self {
            list_layout: ListLayout::Nested,
        }
    }
}

pub fn build(blocks: &[FlatBlock]) -> DocumentNode {
    build_with_config(blocks, &BuildConfig::default())
}

/// Builds a document tree from `blocks`. Unrecognized blocks are dropped, so
/// the tree may hold fewer block nodes than the input.
pub fn build_with_config(blocks: &[FlatBlock], config: &BuildConfig) -> DocumentNode {
    let mut children = Vec::with_capacity(blocks.len());
    let mut dropped = 0usize;
    let mut index = 0;

    while index < blocks.len() {
        if config.list_layout == ListLayout::Nested {
            let run = bullet_run(&blocks[index..]);
            if !run.is_empty() {
                if is_well_formed(&run) {
                    children.push(DocumentNode::BulletGroup {
                        items: nest_items(&run, 0),
                    });
                } else {
                    children.extend(run.iter().map(BulletEntry::to_tagged_paragraph));
                }
                index += run.len();
                continue;
            }
        }

        match node_for_block(&blocks[index]) {
            Some(node) => children.push(node),
            None => {
                warn!(position = index, "dropping block with unrecognized type");
                dropped += 1;
            }
        }
        index += 1;
    }

    debug!(
        blocks = blocks.len(),
        nodes = children.len(),
        dropped,
        "built document"
    );
    DocumentNode::Document { children }
}

fn node_for_block(block: &FlatBlock) -> Option<DocumentNode> {
    let node = match block {
        FlatBlock::Paragraph { id, text } => DocumentNode::Paragraph {
            block_id: Some(id.clone()),
            text: text.clone(),
            list_indent: None,
        },
        FlatBlock::Heading { id, level, text } => DocumentNode::Heading {
            block_id: Some(id.clone()),
            level: *level,
            text: text.clone(),
        },
        FlatBlock::Bullet { id, indent, text } => DocumentNode::Paragraph {
            block_id: Some(id.clone()),
            text: text.clone(),
            list_indent: Some(*indent),
        },
        FlatBlock::Quote { id, text } => DocumentNode::Quote {
            block_id: Some(id.clone()),
            text: text.clone(),
            highlight: None,
        },
        FlatBlock::HighlightRef {
            id,
            highlight_id,
            text,
        } => DocumentNode::Quote {
            block_id: Some(id.clone()),
            text: text.clone(),
            highlight: Some(HighlightRef {
                highlight_id: highlight_id.clone(),
                snippet: Some(text.clone()),
            }),
        },
        FlatBlock::ArticleRef {
            id,
            article_id,
            text,
        } => reference(id, RefKind::Article, article_id, text),
        FlatBlock::ConceptRef {
            id,
            concept_id,
            text,
        } => reference(id, RefKind::Concept, concept_id, text),
        FlatBlock::QuestionRef {
            id,
            question_id,
            text,
        } => reference(id, RefKind::Question, question_id, text),
        FlatBlock::Unrecognized => return None,
    };
    Some(node)
}

fn reference(id: &BlockId, kind: RefKind, target_id: &Option<String>, text: &str) -> DocumentNode {
    DocumentNode::Reference {
        block_id: Some(id.clone()),
        kind,
        target_id: target_id.clone(),
        label: text.to_string(),
    }
}

struct BulletEntry<'a> {
    id: &'a BlockId,
    indent: usize,
    text: &'a str,
}

impl BulletEntry<'_> {
    fn to_tagged_paragraph(&self) -> DocumentNode {
        DocumentNode::Paragraph {
            block_id: Some(self.id.clone()),
            text: self.text.to_string(),
            list_indent: Some(self.indent),
        }
    }
}

/// Leading run of consecutive bullet blocks.
fn bullet_run(blocks: &[FlatBlock]) -> Vec<BulletEntry<'_>> {
    blocks
        .iter()
        .map_while(|block| match block {
            FlatBlock::Bullet { id, indent, text } => Some(BulletEntry {
                id,
                indent: *indent,
                text,
            }),
            _ => None,
        })
        .collect()
}

/// A run can be nested only if it starts at the top level and never skips a
/// level on the way down.
fn is_well_formed(run: &[BulletEntry<'_>]) -> bool {
    let Some(first) = run.first() else {
        return false;
    };
    if first.indent != 0 {
        return false;
    }
    run.windows(2)
        .all(|pair| pair[1].indent <= pair[0].indent + 1)
}

// Every entry in `run` has indent >= depth and the first has indent == depth.
fn nest_items(run: &[BulletEntry<'_>], depth: usize) -> Vec<DocumentNode> {
    let mut items = Vec::new();
    let mut start = 0;
    while start < run.len() {
        let entry = &run[start];
        let mut end = start + 1;
        while end < run.len() && run[end].indent > depth {
            end += 1;
        }

        let mut children = vec![DocumentNode::paragraph(entry.text)];
        if end > start + 1 {
            children.push(DocumentNode::BulletGroup {
                items: nest_items(&run[start + 1..end], depth + 1),
            });
        }
        items.push(DocumentNode::ListItem {
            block_id: Some(entry.id.clone()),
            children,
        });
        start = end;
    }
    items
}
