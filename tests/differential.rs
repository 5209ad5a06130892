use notebook_blocks::{
    BlockId, DocumentNode, FlatBlock, HighlightRef, IdGenerator, RefKind, SequentialIds,
    ensure_block_ids, flatten,
};
use notebook_blocks_naive_oracle::flatten_editor_json;
use serde_json::json;
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

fn text() -> impl Strategy<Value = String> {
    "[a-z ]{0,10}"
}

fn maybe_id() -> impl Strategy<Value = Option<String>> {
    option::weighted(0.4, "[a-z]{3,8}")
}

fn with_id(node: DocumentNode, id: Option<String>) -> DocumentNode {
    match id {
        Some(id) => node.with_block_id(id),
        None => node,
    }
}

fn leaf() -> BoxedStrategy<DocumentNode> {
    prop_oneof![
        (text(), maybe_id()).prop_map(|(text, id)| with_id(DocumentNode::paragraph(text), id)),
        (1u8..=3, text(), maybe_id())
            .prop_map(|(level, text, id)| with_id(DocumentNode::heading(level, text), id)),
        (text(), maybe_id()).prop_map(|(text, id)| with_id(DocumentNode::quote(text), id)),
        ("hl-[0-9]{1,3}", text(), maybe_id()).prop_map(|(highlight, snippet, id)| {
            with_id(DocumentNode::highlight_quote(highlight, snippet), id)
        }),
        (
            prop_oneof![
                Just(RefKind::Article),
                Just(RefKind::Concept),
                Just(RefKind::Question)
            ],
            "[0-9]{1,4}",
            text(),
            maybe_id()
        )
            .prop_map(|(kind, target, label, id)| {
                with_id(DocumentNode::reference(kind, target, label), id)
            }),
        (
            text(),
            option::of("hl-[0-9]{1,3}"),
            option::of(text()),
            maybe_id()
        )
            .prop_map(|(text, highlight_id, snippet, id)| {
                let quote = DocumentNode::Quote {
                    block_id: None,
                    text,
                    highlight: Some(HighlightRef {
                        highlight_id,
                        snippet,
                    }),
                };
                with_id(quote, id)
            }),
        text().prop_map(DocumentNode::text),
    ]
    .boxed()
}

fn tree() -> impl Strategy<Value = DocumentNode> {
    let node = leaf().prop_recursive(4, 64, 5, |inner| {
        let item = (
            option::of(text()),
            vec(inner.clone(), 0..3),
            maybe_id(),
        )
            .prop_map(|(lead, rest, id)| {
                let mut children = Vec::new();
                if let Some(lead) = lead {
                    children.push(DocumentNode::paragraph(lead));
                }
                children.extend(rest);
                with_id(DocumentNode::list_item(children), id)
            })
            .boxed();
        prop_oneof![
            vec(item.clone(), 0..4).prop_map(DocumentNode::bullet_list),
            vec(item, 0..4).prop_map(DocumentNode::numbered_list),
            vec(inner, 0..4).prop_map(|children| DocumentNode::other("callout", children)),
        ]
    });
    vec(node, 0..8).prop_map(DocumentNode::document)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_config::cases()))]
    #[test]
    fn differential_flatten_matches_naive_oracle(tree in tree()) {
        let json = tree.to_editor_json();

        let mut ours = tree;
        let flattened = flatten(&mut ours, &mut SequentialIds::new("x"));

        let mut oracle_ids = SequentialIds::new("x");
        let oracle = flatten_editor_json(&json, &mut || oracle_ids.next_id());

        prop_assert_eq!(flattened.blocks, oracle, "flatten should match the naive oracle");
    }

    #[test]
    fn prop_editor_json_reload_reads_the_same(tree in tree()) {
        let mut original = tree;
        ensure_block_ids(&mut original, &mut SequentialIds::new("e"));
        let mut reloaded = DocumentNode::from_editor_json(&original.to_editor_json());

        let expected = flatten(&mut original, &mut SequentialIds::new("unexpected"));
        let actual = flatten(&mut reloaded, &mut SequentialIds::new("unexpected"));
        prop_assert!(!expected.changed);
        prop_assert!(!actual.changed);
        prop_assert_eq!(actual.blocks, expected.blocks);
    }

    #[test]
    fn prop_second_flatten_is_stable(tree in tree()) {
        let mut tree = tree;
        let first = flatten(&mut tree, &mut SequentialIds::new("s"));
        let second = flatten(&mut tree, &mut SequentialIds::new("never"));
        prop_assert!(!second.changed);
        prop_assert_eq!(second.blocks, first.blocks);
    }

    #[test]
    fn prop_every_block_is_addressable(tree in tree()) {
        let mut tree = tree;
        let result = flatten(&mut tree, &mut SequentialIds::new("a"));
        for block in &result.blocks {
            let id: &BlockId = block.id().expect("flatten only emits identified blocks");
            prop_assert!(!id.is_empty());
            prop_assert!(tree.find_block(id.as_str()).is_some());
        }
    }
}

#[test]
fn highlighted_quote_in_list_item_agrees_with_oracle() {
    let mut tree = DocumentNode::document(vec![DocumentNode::bullet_list(vec![
        DocumentNode::list_item(vec![DocumentNode::Quote {
            block_id: Some("q".into()),
            text: "body".into(),
            highlight: Some(HighlightRef {
                highlight_id: Some("hl-1".into()),
                snippet: Some("X".into()),
            }),
        }])
        .with_block_id("li"),
    ])]);
    let json = tree.to_editor_json();

    let ours = flatten(&mut tree, &mut SequentialIds::default()).blocks;
    let oracle = flatten_editor_json(&json, &mut || BlockId::from("unused"));
    assert_eq!(
        ours[0],
        FlatBlock::Bullet {
            id: "li".into(),
            indent: 0,
            text: "body".into(),
        }
    );
    assert_eq!(ours, oracle);
}

#[test]
fn out_of_range_attrs_agree_with_oracle() {
    let json = json!({
        "type": "doc",
        "content": [
            { "type": "heading", "attrs": { "level": 256, "blockId": "h" },
              "content": [{ "type": "text", "text": "Title" }] },
            { "type": "paragraph", "attrs": { "blockId": "p", "listIndent": -1 } }
        ]
    });
    let mut tree = DocumentNode::from_editor_json(&json);
    let ours = flatten(&mut tree, &mut SequentialIds::default()).blocks;
    let oracle = flatten_editor_json(&json, &mut || BlockId::from("unused"));
    assert_eq!(
        ours,
        vec![
            FlatBlock::Heading {
                id: "h".into(),
                level: 1,
                text: "Title".into(),
            },
            FlatBlock::Paragraph {
                id: "p".into(),
                text: String::new(),
            },
        ]
    );
    assert_eq!(ours, oracle);
}
