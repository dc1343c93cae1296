//! LZ4 block constants, the little-endian offset reader, and the decoder
//! error type.

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Token-stream constants
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum match length encoded in an LZ4 block.  The stored match length is
/// biased by this amount.
pub const MINMATCH: usize = 4;

pub const ML_BITS: u32 = 4;
pub const ML_MASK: u32 = (1u32 << ML_BITS) - 1;
pub const RUN_BITS: u32 = 8 - ML_BITS;
pub const RUN_MASK: u32 = (1u32 << RUN_BITS) - 1;

/// Widest copy stride used by any decoder variant.
pub const MAX_COPY_WIDTH: usize = 32;

/// Extra bytes that must be allocated after the logical end of both the
/// source and the destination buffer.
///
/// The decoder copies in fixed-size strides and is allowed to run past the
/// logical end of either buffer:
///
/// * literal wild copies read up to `W - 1` bytes past the last source byte;
/// * a minimum-length match at the very end of the output writes up to
///   `2 * W - MINMATCH` bytes past the logical output end (60 for `W = 32`).
///
/// Every public entry point checks for this slack once per call and refuses
/// buffers that do not carry it.
pub const ADDITIONAL_BYTES_AT_END_OF_BUFFER: usize = 64;

const _: () = assert!(ADDITIONAL_BYTES_AT_END_OF_BUFFER >= 2 * MAX_COPY_WIDTH - MINMATCH);

pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;

// ─────────────────────────────────────────────────────────────────────────────
// Memory helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read a little-endian `u16` from an unaligned pointer.
///
/// # Safety
/// `ptr` must be valid for reads of at least 2 bytes.
#[inline(always)]
pub unsafe fn read_le16(ptr: *const u8) -> u16 {
    u16::from_le_bytes(core::ptr::read_unaligned(ptr as *const [u8; 2]))
}

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by block decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressError {
    /// The compressed data is malformed or truncated, a match points before
    /// the start of the output, or the declared sizes do not fit the stream.
    MalformedInput,
    /// The source slice does not hold `source_size` bytes plus
    /// [`ADDITIONAL_BYTES_AT_END_OF_BUFFER`] bytes of slack.
    SourceTooShort { required: usize, available: usize },
    /// The destination slice does not hold `dest_size` bytes plus
    /// [`ADDITIONAL_BYTES_AT_END_OF_BUFFER`] bytes of slack.
    DestinationTooShort { required: usize, available: usize },
    /// A variant index outside `0..VARIANT_COUNT` was requested.
    UnknownVariant(usize),
}

impl DecompressError {
    /// `true` when the failure is caused by the compressed bytes themselves.
    ///
    /// Readers of framed data report this as "corrupted compressed data";
    /// every other variant is a caller bug.
    pub fn is_corrupted_data(&self) -> bool {
        matches!(self, DecompressError::MalformedInput)
    }
}

impl fmt::Display for DecompressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompressError::MalformedInput => {
                write!(f, "corrupted compressed data: malformed LZ4 block")
            }
            DecompressError::SourceTooShort { required, available } => write!(
                f,
                "source buffer too short: need {} bytes including slack, have {}",
                required, available
            ),
            DecompressError::DestinationTooShort { required, available } => write!(
                f,
                "destination buffer too short: need {} bytes including slack, have {}",
                required, available
            ),
            DecompressError::UnknownVariant(index) => {
                write!(f, "unknown decompression variant {}", index)
            }
        }
    }
}

impl std::error::Error for DecompressError {}
