//! Tree-to-blocks flattening.
//!
//! Walks a [`DocumentNode`] tree in pre-order and emits one [`FlatBlock`] per
//! block-bearing node. Nodes without an id get a fresh one from the injected
//! [`IdGenerator`], written back into the tree so the next flatten reuses it.

use super::{DocumentNode, FlatBlock, RefKind};
use crate::core::{BlockId, IdGenerator};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    pub blocks: Vec<FlatBlock>,
    /// True when at least one id was assigned during the walk.
    pub changed: bool,
}

/// Flattens `tree`, healing missing block ids in place.
pub fn flatten<G>(tree: &mut DocumentNode, ids: &mut G) -> Flattened
where
    G: IdGenerator + ?Sized,
{
    let mut walker = Walker {
        ids,
        blocks: Vec::new(),
        changed: false,
    };
    walker.walk(tree, 0);
    debug!(
        blocks = walker.blocks.len(),
        changed = walker.changed,
        "flattened document"
    );
    Flattened {
        blocks: walker.blocks,
        changed: walker.changed,
    }
}

/// Owned variant of [`flatten`], returning the healed tree.
pub fn flatten_owned<G>(mut tree: DocumentNode, ids: &mut G) -> (DocumentNode, Flattened)
where
    G: IdGenerator + ?Sized,
{
    let flattened = flatten(&mut tree, ids);
    (tree, flattened)
}

/// Assigns ids to every block-bearing node that lacks one, anywhere in the
/// tree. Returns whether anything was assigned.
///
/// This covers a superset of the nodes [`flatten`] stamps (paragraphs nested
/// in list items get ids too), so flattening afterwards reports no change.
pub fn ensure_block_ids<G>(tree: &mut DocumentNode, ids: &mut G) -> bool
where
    G: IdGenerator + ?Sized,
{
    let mut changed = false;
    if let Some(slot) = tree.block_id_slot()
        && needs_id(slot)
    {
        *slot = Some(ids.next_id());
        changed = true;
    }
    if let Some(children) = tree.children_mut() {
        for child in children {
            changed |= ensure_block_ids(child, ids);
        }
    }
    changed
}

fn needs_id(slot: &Option<BlockId>) -> bool {
    slot.as_ref().is_none_or(BlockId::is_empty)
}

struct Walker<'a, G: ?Sized> {
    ids: &'a mut G,
    blocks: Vec<FlatBlock>,
    changed: bool,
}

impl<G> Walker<'_, G>
where
    G: IdGenerator + ?Sized,
{
    fn ensure_id(&mut self, slot: &mut Option<BlockId>) -> BlockId {
        if let Some(id) = slot.as_ref()
            && !id.is_empty()
        {
            return id.clone();
        }
        let id = self.ids.next_id();
        trace!(%id, "assigned block id");
        *slot = Some(id.clone());
        self.changed = true;
        id
    }

    fn walk(&mut self, node: &mut DocumentNode, indent: usize) {
        match node {
            DocumentNode::Document { children } | DocumentNode::Other { children, .. } => {
                for child in children {
                    self.walk(child, indent);
                }
            }
            DocumentNode::BulletGroup { items } | DocumentNode::NumberedGroup { items } => {
                for item in items {
                    self.walk(item, indent);
                }
            }
            DocumentNode::Paragraph {
                block_id,
                text,
                list_indent,
            } => {
                let id = self.ensure_id(block_id);
                let text = text.clone();
                let block = match list_indent {
                    Some(indent) => FlatBlock::Bullet {
                        id,
                        indent: *indent,
                        text,
                    },
                    None => FlatBlock::Paragraph { id, text },
                };
                self.blocks.push(block);
            }
            DocumentNode::Heading {
                block_id,
                level,
                text,
            } => {
                let id = self.ensure_id(block_id);
                self.blocks.push(FlatBlock::Heading {
                    id,
                    level: *level,
                    text: text.clone(),
                });
            }
            DocumentNode::Quote {
                block_id,
                text,
                highlight,
            } => {
                let id = self.ensure_id(block_id);
                let block = match highlight {
                    Some(highlight) => FlatBlock::HighlightRef {
                        id,
                        highlight_id: highlight.highlight_id.clone(),
                        text: highlight.snippet.clone().unwrap_or_else(|| text.clone()),
                    },
                    None => FlatBlock::Quote {
                        id,
                        text: text.clone(),
                    },
                };
                self.blocks.push(block);
            }
            DocumentNode::Reference {
                block_id,
                kind,
                target_id,
                label,
            } => {
                let id = self.ensure_id(block_id);
                let target = target_id.clone();
                let text = label.clone();
                let block = match kind {
                    RefKind::Article => FlatBlock::ArticleRef {
                        id,
                        article_id: target,
                        text,
                    },
                    RefKind::Concept => FlatBlock::ConceptRef {
                        id,
                        concept_id: target,
                        text,
                    },
                    RefKind::Question => FlatBlock::QuestionRef {
                        id,
                        question_id: target,
                        text,
                    },
                };
                self.blocks.push(block);
            }
            DocumentNode::ListItem { block_id, children } => {
                let id = self.ensure_id(block_id);
                let text = list_item_text(children);
                self.blocks.push(FlatBlock::Bullet { id, indent, text });
                // Only nested groups contribute further blocks; one bullet per item.
                for child in children.iter_mut().filter(|child| child.is_list_group()) {
                    self.walk(child, indent + 1);
                }
            }
            DocumentNode::Text { .. } => {}
        }
    }
}

/// Text of the item's first paragraph, or everything it owns outside nested
/// lists when it has none.
fn list_item_text(children: &[DocumentNode]) -> String {
    children
        .iter()
        .find_map(|child| match child {
            DocumentNode::Paragraph { text, .. } => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_else(|| {
            children
                .iter()
                .filter(|child| !child.is_list_group())
                .map(DocumentNode::text_content)
                .collect()
        })
}
