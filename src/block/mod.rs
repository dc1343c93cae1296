//! LZ4 block decoding.
//!
//! The decoder is one generic loop ([`decompress_core`]) instantiated for
//! three copy widths ([`variant`]), built on fixed-stride copies ([`copy`])
//! and period-replicating overlap copies ([`overlap`]).

pub mod buffer;
pub mod copy;
pub mod decompress_core;
pub mod overlap;
pub mod types;
pub mod variant;

pub use buffer::PaddedBuffer;
pub use decompress_core::{check_buffers, decompress_block, decompress_impl};
#[cfg(target_arch = "x86_64")]
pub use decompress_core::decompress_impl_ssse3;
pub use overlap::{runtime_backend, Backend};
pub use types::{DecompressError, ADDITIONAL_BYTES_AT_END_OF_BUFFER, MINMATCH};
pub use variant::{Copy16, Copy32, Copy8, CopyVariant, Portable, VARIANT_COUNT, VARIANT_WIDTHS};
#[cfg(target_arch = "x86_64")]
pub use variant::{Ssse3Copy16, Ssse3Copy32, Ssse3Copy8};
