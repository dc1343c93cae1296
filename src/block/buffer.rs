//! Byte buffer that always carries decoder slack after its logical end.

use super::types::ADDITIONAL_BYTES_AT_END_OF_BUFFER;

/// Owned byte buffer with [`ADDITIONAL_BYTES_AT_END_OF_BUFFER`] zero-initialised
/// bytes allocated past its logical length.
///
/// The slack is invisible through [`as_slice`](Self::as_slice) and
/// [`as_mut_slice`](Self::as_mut_slice); only the decoder sees it, through
/// [`padded`](Self::padded) / [`padded_mut`](Self::padded_mut).  Holding a
/// `PaddedBuffer` is therefore enough to satisfy the decoder's buffer
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedBuffer {
    data: Vec<u8>,
    len: usize,
}

impl PaddedBuffer {
    /// Zero-filled buffer of `len` logical bytes.
    pub fn with_len(len: usize) -> Self {
        PaddedBuffer { data: vec![0u8; len + ADDITIONAL_BYTES_AT_END_OF_BUFFER], len }
    }

    /// Copy `bytes` into a new padded buffer.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut data = Vec::with_capacity(bytes.len() + ADDITIONAL_BYTES_AT_END_OF_BUFFER);
        data.extend_from_slice(bytes);
        data.resize(bytes.len() + ADDITIONAL_BYTES_AT_END_OF_BUFFER, 0);
        PaddedBuffer { data, len: bytes.len() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The logical contents.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The logical contents, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }

    /// The whole allocation, logical bytes followed by the slack.
    #[inline]
    pub fn padded(&self) -> &[u8] {
        &self.data
    }

    /// The whole allocation, mutably.  Bytes past [`len`](Self::len) are
    /// scratch space for the decoder.
    #[inline]
    pub fn padded_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Change the logical length, keeping the slack behind it.  New bytes
    /// are zero.
    pub fn resize(&mut self, len: usize) {
        self.data.truncate(len.min(self.len));
        self.data.resize(len + ADDITIONAL_BYTES_AT_END_OF_BUFFER, 0);
        self.len = len;
    }

    /// Drop the slack and return the logical contents.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.data.truncate(self.len);
        self.data
    }
}

impl Default for PaddedBuffer {
    fn default() -> Self {
        PaddedBuffer::with_len(0)
    }
}

impl From<&[u8]> for PaddedBuffer {
    fn from(bytes: &[u8]) -> Self {
        PaddedBuffer::from_slice(bytes)
    }
}

impl AsRef<[u8]> for PaddedBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
