//! Traits for binary serialization and deserialization

use crate::binary::ByteReader;
use crate::error::ProtocolError;

/// Trait for types that can be decoded from the binary format
pub trait BinaryParse: Sized {
    /// Decode this type from a reader, consuming exactly its wire bytes
    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, ProtocolError>;

    /// Decode this type from the front of a byte slice.
    ///
    /// Trailing bytes are permitted; an envelope payload usually follows
    /// the structure being parsed.
    fn parse(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let mut reader = ByteReader::new(bytes);
        Self::read_from(&mut reader)
    }
}

/// Trait for types that can be encoded to the binary format
pub trait BinarySerialize {
    /// Size in bytes when serialized
    fn serialized_size(&self) -> usize;

    /// Append the wire encoding to `out`
    fn write_into(&self, out: &mut Vec<u8>) -> Result<(), ProtocolError>;

    /// Produce the wire encoding as an owned buffer
    fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut out = Vec::with_capacity(self.serialized_size());
        self.write_into(&mut out)?;
        Ok(out)
    }

    /// Write the wire encoding into a caller-provided slice.
    ///
    /// Returns the number of bytes written, or
    /// [`ProtocolError::BufferTooSmall`] if `out` is shorter than
    /// [`serialized_size`](Self::serialized_size).
    fn write_to_slice(&self, out: &mut [u8]) -> Result<usize, ProtocolError> {
        let needed = self.serialized_size();
        if out.len() < needed {
            return Err(ProtocolError::BufferTooSmall {
                needed,
                capacity: out.len(),
            });
        }
        let encoded = self.to_bytes()?;
        out[..needed].copy_from_slice(&encoded);
        Ok(needed)
    }
}
