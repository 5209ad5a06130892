#![no_main]

use libfuzzer_sys::fuzz_target;
use notebook_blocks::{SequentialIds, build, check_unique_ids, decode_blocks, flatten};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    if let Ok(blocks) = decode_blocks(&input) {
        let _ = check_unique_ids(&blocks);
        let mut tree = build(&blocks);
        let _ = flatten(&mut tree, &mut SequentialIds::default());
    }
});
