use notebook_blocks::{
    BlockId, DocumentNode, FlatBlock, HighlightRef, RefKind, SequentialIds, UuidIds, build,
    flatten,
};
use std::collections::HashSet;

fn nested_list() -> DocumentNode {
    DocumentNode::document(vec![DocumentNode::bullet_list(vec![
        DocumentNode::list_item(vec![
            DocumentNode::paragraph("level 0"),
            DocumentNode::numbered_list(vec![DocumentNode::list_item(vec![
                DocumentNode::paragraph("level 1"),
                DocumentNode::bullet_list(vec![DocumentNode::list_item(vec![
                    DocumentNode::paragraph("level 2"),
                ])]),
            ])]),
        ]),
    ])])
}

fn indents(blocks: &[FlatBlock]) -> Vec<usize> {
    blocks
        .iter()
        .filter_map(|block| match block {
            FlatBlock::Bullet { indent, .. } => Some(*indent),
            _ => None,
        })
        .collect()
}

#[test]
fn stability_existing_ids_are_reused_verbatim() {
    let mut tree = DocumentNode::document(vec![
        DocumentNode::heading(2, "Notes").with_block_id("h-1"),
        DocumentNode::paragraph("body").with_block_id("p-1"),
        DocumentNode::bullet_list(vec![
            DocumentNode::list_item(vec![DocumentNode::paragraph("item")]).with_block_id("li-1"),
        ]),
        DocumentNode::quote("quoted").with_block_id("q-1"),
    ]);
    let before = tree.clone();

    let result = flatten(&mut tree, &mut SequentialIds::new("fresh"));

    assert!(!result.changed);
    assert_eq!(tree, before, "tree must not be touched when every id exists");
    let ids: Vec<&str> = result
        .blocks
        .iter()
        .filter_map(FlatBlock::id)
        .map(BlockId::as_str)
        .collect();
    assert_eq!(ids, vec!["h-1", "p-1", "li-1", "q-1"]);
}

#[test]
fn healing_assigns_ids_and_second_flatten_is_stable() {
    let mut tree = nested_list();
    let first = flatten(&mut tree, &mut UuidIds);
    assert!(first.changed);

    let ids: HashSet<&BlockId> = first.blocks.iter().filter_map(FlatBlock::id).collect();
    assert_eq!(ids.len(), first.blocks.len(), "ids must be distinct");
    assert!(ids.iter().all(|id| !id.is_empty()));

    let second = flatten(&mut tree, &mut UuidIds);
    assert!(!second.changed);
    assert_eq!(second.blocks, first.blocks);
}

#[test]
fn healing_writes_ids_back_into_tree() {
    let mut tree = nested_list();
    let result = flatten(&mut tree, &mut SequentialIds::new("n"));
    for block in &result.blocks {
        let id = block.id().expect("flatten only emits identified blocks");
        assert!(tree.find_block(id.as_str()).is_some(), "missing {id}");
    }
}

#[test]
fn indent_matches_list_nesting_depth() {
    let mut tree = nested_list();
    let result = flatten(&mut tree, &mut SequentialIds::default());
    assert_eq!(indents(&result.blocks), vec![0, 1, 2]);
    let texts: Vec<&str> = result.blocks.iter().map(FlatBlock::text).collect();
    assert_eq!(texts, vec!["level 0", "level 1", "level 2"]);
}

#[test]
fn sibling_groups_do_not_increase_indent() {
    let mut tree = DocumentNode::document(vec![
        DocumentNode::bullet_list(vec![DocumentNode::list_item(vec![
            DocumentNode::paragraph("a"),
        ])]),
        DocumentNode::numbered_list(vec![DocumentNode::list_item(vec![
            DocumentNode::paragraph("b"),
        ])]),
    ]);
    let result = flatten(&mut tree, &mut SequentialIds::default());
    assert_eq!(indents(&result.blocks), vec![0, 0]);
}

#[test]
fn highlight_id_survives_flatten_build_flatten() {
    let mut tree = DocumentNode::document(vec![DocumentNode::Quote {
        block_id: None,
        text: "original passage".into(),
        highlight: Some(HighlightRef {
            highlight_id: Some("hl-42".into()),
            snippet: Some("X".into()),
        }),
    }]);

    let first = flatten(&mut tree, &mut SequentialIds::new("q"));
    assert_eq!(
        first.blocks,
        vec![FlatBlock::HighlightRef {
            id: "q-1".into(),
            highlight_id: Some("hl-42".into()),
            text: "X".into(),
        }]
    );

    let mut rebuilt = build(&first.blocks);
    let second = flatten(&mut rebuilt, &mut SequentialIds::new("unused"));
    assert!(!second.changed);
    assert_eq!(second.blocks, first.blocks);
}

#[test]
fn unknown_node_kind_passes_children_through() {
    let mut tree = DocumentNode::document(vec![DocumentNode::other(
        "columnLayout",
        vec![DocumentNode::paragraph("left"), DocumentNode::paragraph("right")],
    )]);
    let result = flatten(&mut tree, &mut SequentialIds::default());
    assert_eq!(result.blocks.len(), 2);
    assert_eq!(result.blocks[0].text(), "left");
    assert_eq!(result.blocks[1].text(), "right");
}

#[test]
fn reference_nodes_flatten_to_reference_blocks() {
    let mut tree = DocumentNode::document(vec![
        DocumentNode::reference(RefKind::Article, "art-1", "On Writing"),
        DocumentNode::reference(RefKind::Question, "qq-2", "Why?"),
    ]);
    let result = flatten(&mut tree, &mut SequentialIds::new("r"));
    assert_eq!(
        result.blocks,
        vec![
            FlatBlock::ArticleRef {
                id: "r-1".into(),
                article_id: Some("art-1".into()),
                text: "On Writing".into(),
            },
            FlatBlock::QuestionRef {
                id: "r-2".into(),
                question_id: Some("qq-2".into()),
                text: "Why?".into(),
            },
        ]
    );
}

#[test]
fn backlink_target_is_found_after_load() {
    let mut tree = nested_list();
    let saved = flatten(&mut tree, &mut UuidIds).blocks;
    let target = saved[2].id().cloned().expect("bullet has id");

    let loaded = build(&saved);
    let node = loaded
        .find_block(target.as_str())
        .expect("backlink target present after build");
    assert_eq!(node.text_content(), "level 2");
    assert_eq!(loaded.block_path(target.as_str()), Some(vec![2]));
}
