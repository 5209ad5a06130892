//! notebook-blocks: stable block identity for structured notes.
//!
//! A note is edited as a nested rich-text tree and stored as a flat list of
//! blocks. Each block carries an id that backlinks, deep links and highlight
//! embeds address, and that id survives further edits. This crate provides:
//!
//! - **Identity** - [`BlockId`] and injectable [`IdGenerator`]s
//! - **Flattening** - tree to ordered blocks, healing missing ids in place
//! - **Building** - blocks back to a loadable tree, ids preserved
//! - **Adapters** - the editor host's JSON tree and the stored block format
//!
//! # Quick Start
//!
//! ```rust
//! use notebook_blocks::{DocumentNode, UuidIds, build, flatten};
//!
//! let mut tree = DocumentNode::document(vec![
//!     DocumentNode::heading(1, "Intro"),
//!     DocumentNode::bullet_list(vec![DocumentNode::list_item(vec![
//!         DocumentNode::paragraph("First point"),
//!     ])]),
//! ]);
//!
//! let saved = flatten(&mut tree, &mut UuidIds);
//! assert!(saved.changed);
//!
//! // Flattening again reuses the ids written back into the tree.
//! assert_eq!(flatten(&mut tree, &mut UuidIds).blocks, saved.blocks);
//!
//! // Loading rebuilds a tree that reads back the same blocks.
//! let mut loaded = build(&saved.blocks);
//! assert_eq!(flatten(&mut loaded, &mut UuidIds).blocks, saved.blocks);
//! ```
//!
//! # Features
//!
//! - `dhat-heap` - Enables heap profiling with dhat

// Identifiers and id generation
pub mod core;

// Document tree, flat blocks, and the transforms between them
pub mod doc;

pub use crate::core::{BlockId, IdGenerator, SequentialIds, UuidIds};

pub use doc::{
    BlockError, BuildConfig, DocumentNode, FlatBlock, Flattened, HighlightRef, ListLayout,
    RefKind, build, build_with_config, check_unique_ids, decode_blocks, encode_blocks,
    ensure_block_ids, flatten, flatten_owned,
};
