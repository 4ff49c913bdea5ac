//! Binary serialization infrastructure for NanoTDF
//!
//! Decoding works over in-memory byte slices through [`ByteReader`]; encoding
//! appends to a `Vec<u8>` or writes into a caller-provided slice. All
//! multi-byte integers use big-endian byte order as specified in the NanoTDF
//! specification.

use crate::error::ProtocolError;

pub mod traits;

pub use traits::{BinaryParse, BinarySerialize};

/// Cursor over an in-memory byte buffer.
///
/// Every read either consumes exactly the requested bytes or fails with
/// [`ProtocolError::TruncatedInput`] and leaves the position unchanged.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader over `buf`, positioned at the start
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read a u32 (big-endian)
    pub fn read_u32_be(&mut self) -> Result<u32, ProtocolError> {
        let bytes: [u8; 4] = self.read_array()?;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Read exactly `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        if self.remaining() < n {
            return Err(ProtocolError::TruncatedInput {
                needed: n - self.remaining(),
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read a fixed-size byte array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ProtocolError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }
}

/// Append a u32 (big-endian)
pub fn write_u32_be(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
