//! Nested document tree, flat block list, and the transforms between them.
//!
//! The editor host owns a [`DocumentNode`] tree while a note is open. At the
//! save boundary the tree is flattened into [`FlatBlock`]s, each carrying a
//! stable [`BlockId`] that backlinks and deep links address. At the load
//! boundary the blocks are built back into a tree.

use crate::core::BlockId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod build;
pub mod codec;
pub mod editor_json;
pub mod flatten;

pub use build::{BuildConfig, ListLayout, build, build_with_config};
pub use codec::{check_unique_ids, decode_blocks, encode_blocks};
pub use flatten::{Flattened, ensure_block_ids, flatten, flatten_owned};

/// Cached pointer to a highlight captured elsewhere in the system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightRef {
    pub highlight_id: Option<String>,
    pub snippet: Option<String>,
}

/// Kind of record a [`DocumentNode::Reference`] embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Article,
    Concept,
    Question,
}

/// A node of the editable document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    Document {
        children: Vec<DocumentNode>,
    },
    Paragraph {
        block_id: Option<BlockId>,
        text: String,
        /// Set when the paragraph stands in for a flat `bullet` block.
        list_indent: Option<usize>,
    },
    Heading {
        block_id: Option<BlockId>,
        level: u8,
        text: String,
    },
    Quote {
        block_id: Option<BlockId>,
        text: String,
        highlight: Option<HighlightRef>,
    },
    BulletGroup {
        items: Vec<DocumentNode>,
    },
    NumberedGroup {
        items: Vec<DocumentNode>,
    },
    ListItem {
        block_id: Option<BlockId>,
        children: Vec<DocumentNode>,
    },
    Reference {
        block_id: Option<BlockId>,
        kind: RefKind,
        target_id: Option<String>,
        label: String,
    },
    Text {
        text: String,
    },
    /// A node kind this crate does not model. Children are still visited.
    Other {
        kind: String,
        attrs: Map<String, Value>,
        children: Vec<DocumentNode>,
    },
}

impl DocumentNode {
    pub fn document(children: Vec<DocumentNode>) -> Self {
        Self::Document { children }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            block_id: None,
            text: text.into(),
            list_indent: None,
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            block_id: None,
            level,
            text: text.into(),
        }
    }

    pub fn quote(text: impl Into<String>) -> Self {
        Self::Quote {
            block_id: None,
            text: text.into(),
            highlight: None,
        }
    }

    pub fn highlight_quote(highlight_id: impl Into<String>, snippet: impl Into<String>) -> Self {
        let snippet = snippet.into();
        Self::Quote {
            block_id: None,
            text: snippet.clone(),
            highlight: Some(HighlightRef {
                highlight_id: Some(highlight_id.into()),
                snippet: Some(snippet),
            }),
        }
    }

    pub fn bullet_list(items: Vec<DocumentNode>) -> Self {
        Self::BulletGroup { items }
    }

    pub fn numbered_list(items: Vec<DocumentNode>) -> Self {
        Self::NumberedGroup { items }
    }

    pub fn list_item(children: Vec<DocumentNode>) -> Self {
        Self::ListItem {
            block_id: None,
            children,
        }
    }

    pub fn reference(kind: RefKind, target_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Reference {
            block_id: None,
            kind,
            target_id: Some(target_id.into()),
            label: label.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn other(kind: impl Into<String>, children: Vec<DocumentNode>) -> Self {
        Self::Other {
            kind: kind.into(),
            attrs: Map::new(),
            children,
        }
    }

    /// Returns the node with its block id set. Nodes without identity are
    /// returned unchanged.
    pub fn with_block_id(mut self, id: impl Into<BlockId>) -> Self {
        if let Some(slot) = self.block_id_slot() {
            *slot = Some(id.into());
        }
        self
    }

    /// Name of the node kind as the editor host spells it.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Document { .. } => "doc",
            Self::Paragraph { .. } => "paragraph",
            Self::Heading { .. } => "heading",
            Self::Quote {
                highlight: Some(_), ..
            } => "highlightRef",
            Self::Quote { .. } => "blockquote",
            Self::BulletGroup { .. } => "bulletList",
            Self::NumberedGroup { .. } => "orderedList",
            Self::ListItem { .. } => "listItem",
            Self::Reference { kind, .. } => match kind {
                RefKind::Article => "articleRef",
                RefKind::Concept => "conceptRef",
                RefKind::Question => "questionRef",
            },
            Self::Text { .. } => "text",
            Self::Other { kind, .. } => kind,
        }
    }

    pub fn block_id(&self) -> Option<&BlockId> {
        match self {
            Self::Paragraph { block_id, .. }
            | Self::Heading { block_id, .. }
            | Self::Quote { block_id, .. }
            | Self::ListItem { block_id, .. }
            | Self::Reference { block_id, .. } => block_id.as_ref(),
            _ => None,
        }
    }

    /// Mutable access to the id slot of a block-bearing node.
    pub fn block_id_slot(&mut self) -> Option<&mut Option<BlockId>> {
        match self {
            Self::Paragraph { block_id, .. }
            | Self::Heading { block_id, .. }
            | Self::Quote { block_id, .. }
            | Self::ListItem { block_id, .. }
            | Self::Reference { block_id, .. } => Some(block_id),
            _ => None,
        }
    }

    pub fn is_block_bearing(&self) -> bool {
        matches!(
            self,
            Self::Paragraph { .. }
                | Self::Heading { .. }
                | Self::Quote { .. }
                | Self::ListItem { .. }
                | Self::Reference { .. }
        )
    }

    pub fn is_list_group(&self) -> bool {
        matches!(self, Self::BulletGroup { .. } | Self::NumberedGroup { .. })
    }

    pub fn children(&self) -> &[DocumentNode] {
        match self {
            Self::Document { children }
            | Self::ListItem { children, .. }
            | Self::Other { children, .. } => children,
            Self::BulletGroup { items } | Self::NumberedGroup { items } => items,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<DocumentNode>> {
        match self {
            Self::Document { children }
            | Self::ListItem { children, .. }
            | Self::Other { children, .. } => Some(children),
            Self::BulletGroup { items } | Self::NumberedGroup { items } => Some(items),
            _ => None,
        }
    }

    /// Concatenated leaf text of this node and its descendants.
    ///
    /// Reference nodes are atoms and contribute no text.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Self::Paragraph { text, .. }
            | Self::Heading { text, .. }
            | Self::Quote { text, .. }
            | Self::Text { text } => out.push_str(text),
            Self::Reference { .. } => {}
            _ => {
                for child in self.children() {
                    child.push_text(out);
                }
            }
        }
    }

    /// Finds the node bearing `id`, searching in document order.
    pub fn find_block(&self, id: &str) -> Option<&DocumentNode> {
        if self.block_id().is_some_and(|own| own.as_str() == id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_block(id))
    }

    /// Child-index path from this node to the node bearing `id`.
    pub fn block_path(&self, id: &str) -> Option<Vec<usize>> {
        if self.block_id().is_some_and(|own| own.as_str() == id) {
            return Some(Vec::new());
        }
        self.children()
            .iter()
            .enumerate()
            .find_map(|(index, child)| {
                child.block_path(id).map(|mut path| {
                    path.insert(0, index);
                    path
                })
            })
    }

    /// Every block id in the tree, in document order.
    pub fn block_ids(&self) -> Vec<&BlockId> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a BlockId>) {
        if let Some(id) = self.block_id() {
            out.push(id);
        }
        for child in self.children() {
            child.collect_ids(out);
        }
    }
}

impl Default for DocumentNode {
    fn default() -> Self {
        Self::Document {
            children: Vec::new(),
        }
    }
}

/// One addressable unit of note content, as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum FlatBlock {
    Paragraph {
        id: BlockId,
        #[serde(default)]
        text: String,
    },
    Heading {
        id: BlockId,
        #[serde(default = "default_heading_level")]
        level: u8,
        #[serde(default)]
        text: String,
    },
    Bullet {
        id: BlockId,
        #[serde(default)]
        indent: usize,
        #[serde(default)]
        text: String,
    },
    Quote {
        id: BlockId,
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "highlight_embed", alias = "highlight-ref", alias = "highlightRef")]
    HighlightRef {
        id: BlockId,
        highlight_id: Option<String>,
        #[serde(default)]
        text: String,
    },
    #[serde(alias = "article-ref")]
    ArticleRef {
        id: BlockId,
        article_id: Option<String>,
        #[serde(default)]
        text: String,
    },
    #[serde(alias = "concept-ref")]
    ConceptRef {
        id: BlockId,
        concept_id: Option<String>,
        #[serde(default)]
        text: String,
    },
    #[serde(alias = "question-ref")]
    QuestionRef {
        id: BlockId,
        question_id: Option<String>,
        #[serde(default)]
        text: String,
    },
    /// A stored block whose `type` tag this crate does not know.
    #[serde(other)]
    Unrecognized,
}

fn default_heading_level() -> u8 {
    1
}

impl FlatBlock {
    pub fn id(&self) -> Option<&BlockId> {
        match self {
            Self::Paragraph { id, .. }
            | Self::Heading { id, .. }
            | Self::Bullet { id, .. }
            | Self::Quote { id, .. }
            | Self::HighlightRef { id, .. }
            | Self::ArticleRef { id, .. }
            | Self::ConceptRef { id, .. }
            | Self::QuestionRef { id, .. } => Some(id),
            Self::Unrecognized => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Paragraph { text, .. }
            | Self::Heading { text, .. }
            | Self::Bullet { text, .. }
            | Self::Quote { text, .. }
            | Self::HighlightRef { text, .. }
            | Self::ArticleRef { text, .. }
            | Self::ConceptRef { text, .. }
            | Self::QuestionRef { text, .. } => text,
            Self::Unrecognized => "",
        }
    }

    /// The storage `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Paragraph { .. } => "paragraph",
            Self::Heading { .. } => "heading",
            Self::Bullet { .. } => "bullet",
            Self::Quote { .. } => "quote",
            Self::HighlightRef { .. } => "highlight_embed",
            Self::ArticleRef { .. } => "article_ref",
            Self::ConceptRef { .. } => "concept_ref",
            Self::QuestionRef { .. } => "question_ref",
            Self::Unrecognized => "unrecognized",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("duplicate block id: {id}")]
    IdentifierCollision { id: BlockId },
    #[error("block at position {index} has an empty id")]
    EmptyIdentifier { index: usize },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
