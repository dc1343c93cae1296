// Block constants and DecompressError

use lz4_adaptive::block::types::MAX_COPY_WIDTH;
use lz4_adaptive::block::{DecompressError, ADDITIONAL_BYTES_AT_END_OF_BUFFER, MINMATCH};

// --- constants ---

/// A short match at the very end of the output may spill 2 * W - MINMATCH
/// bytes; the slack must cover the widest variant.
#[test]
fn slack_covers_widest_spill() {
    assert!(ADDITIONAL_BYTES_AT_END_OF_BUFFER >= 2 * MAX_COPY_WIDTH - MINMATCH);
    assert_eq!(ADDITIONAL_BYTES_AT_END_OF_BUFFER, 64);
}

// --- DecompressError ---

#[test]
fn only_malformed_input_is_corruption() {
    assert!(DecompressError::MalformedInput.is_corrupted_data());
    assert!(!DecompressError::SourceTooShort { required: 2, available: 1 }.is_corrupted_data());
    assert!(!DecompressError::DestinationTooShort { required: 2, available: 1 }.is_corrupted_data());
    assert!(!DecompressError::UnknownVariant(7).is_corrupted_data());
}

#[test]
fn display_messages() {
    assert!(DecompressError::MalformedInput.to_string().contains("corrupted"));
    let msg = DecompressError::DestinationTooShort { required: 74, available: 10 }.to_string();
    assert!(msg.contains("74") && msg.contains("10"), "{msg}");
    assert!(DecompressError::UnknownVariant(5).to_string().contains('5'));
}

#[test]
fn usable_as_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(DecompressError::MalformedInput);
    assert!(err.source().is_none());
}
