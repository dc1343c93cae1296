#![no_main]
use libfuzzer_sys::fuzz_target;

use lz4_adaptive::block::VARIANT_COUNT;
use lz4_adaptive::{decompress_padded, decompress_variant, PaddedBuffer, PerformanceStatistics};

fuzz_target!(|data: &[u8]| {
    let source = PaddedBuffer::from_slice(&lz4_flex::block::compress(data));

    // Every variant must reproduce the input exactly.
    for index in 0..VARIANT_COUNT {
        let mut dest = PaddedBuffer::with_len(data.len());
        decompress_variant(index, source.padded(), source.len(), dest.padded_mut(), data.len())
            .unwrap_or_else(|e| panic!("variant {index}: {e}"));
        assert_eq!(dest.as_slice(), data, "block round-trip mismatch on variant {index}");
    }

    // A truncated block must never decode.
    if source.len() > 1 && !data.is_empty() {
        let cut = PaddedBuffer::from_slice(&source.as_slice()[..source.len() - 1]);
        let mut dest = PaddedBuffer::with_len(data.len());
        assert!(decompress_padded(&cut, &mut dest, &PerformanceStatistics::new()).is_err());
    }
});
