#![no_main]
use libfuzzer_sys::fuzz_target;

use lz4_adaptive::block::VARIANT_COUNT;
use lz4_adaptive::{decompress_variant, ADDITIONAL_BYTES_AT_END_OF_BUFFER};

const SLACK: usize = ADDITIONAL_BYTES_AT_END_OF_BUFFER;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes through every variant.  Err results are expected;
    // what we verify is no panics, no UB, agreement between variants, and
    // that nothing lands past the destination slack.
    let mut source = data.to_vec();
    source.resize(data.len() + SLACK, 0);

    // Output sizes: tiny, typical, and as large as the input could claim.
    let large = data.len().saturating_mul(255).min(1 << 20);
    for dest_size in [1usize, 4096, large.max(1)] {
        let mut first: Option<(Result<(), _>, Vec<u8>)> = None;
        for index in 0..VARIANT_COUNT {
            let mut dest = vec![0xCCu8; dest_size + SLACK + 16];
            let result = decompress_variant(
                index,
                &source,
                data.len(),
                &mut dest[..dest_size + SLACK],
                dest_size,
            );
            assert!(dest[dest_size + SLACK..].iter().all(|&b| b == 0xCC));
            dest.truncate(dest_size);
            match &first {
                None => first = Some((result, dest)),
                Some((r, out)) => {
                    assert_eq!(&result, r, "variant {index} disagrees");
                    if result.is_ok() {
                        assert_eq!(&dest, out, "variant {index} output differs");
                    }
                }
            }
        }
    }
});
