#![no_main]

use libfuzzer_sys::fuzz_target;
use notebook_blocks::{DocumentNode, SequentialIds, build, flatten};

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let mut tree = DocumentNode::from_editor_json(&value);
    let saved = flatten(&mut tree, &mut SequentialIds::new("f"));
    assert!(!flatten(&mut tree, &mut SequentialIds::new("g")).changed);

    let mut rebuilt = build(&saved.blocks);
    let reread = flatten(&mut rebuilt, &mut SequentialIds::new("h"));
    assert_eq!(reread.blocks, saved.blocks);
});
