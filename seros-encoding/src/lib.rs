//! Message codec contract for the Seros stack
//!
//! Messages cross the serial link as byte-aligned little-endian records.
//! Variable-length fields (strings and arrays) carry a `u32` element count
//! followed by the elements, matching the host's wire encoding.
//!
//! Message types implement [`Serialize`] and [`Deserialize`] over the cursor
//! types defined here. Generated and hand-written types behave the same way;
//! the node core only sees the traits.
#![no_std]

/// Failure modes of [`Deserialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeserializeError {
    /// The record ended before the field could be read
    OutOfData,
    /// A string field held invalid UTF-8
    Utf8,
    /// A variable-length field exceeds the receiving buffer's capacity
    Capacity,
}

/// Writes fields into a byte buffer, advancing an internal position.
///
/// The caller is responsible for providing a buffer of at least
/// [`Serialize::size_bytes`] bytes; the cursor does not re-check capacity.
pub struct WriteCursor<'a> {
    bytes: &'a mut [u8],
    position: usize,
}

impl<'a> WriteCursor<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Number of bytes written so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes[self.position] = value;
        self.position += 1;
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        self.bytes[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    /// Count-prefixed string field
    pub fn write_str(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.write_bytes(value.as_bytes());
    }
}

/// Reads fields from a byte buffer, advancing an internal position.
pub struct ReadCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ReadCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left in the record
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn read_u8(&mut self) -> Result<u8, DeserializeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DeserializeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DeserializeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DeserializeError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, DeserializeError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8], DeserializeError> {
        let end = self
            .position
            .checked_add(length)
            .ok_or(DeserializeError::OutOfData)?;
        let bytes = self
            .bytes
            .get(self.position..end)
            .ok_or(DeserializeError::OutOfData)?;
        self.position = end;
        Ok(bytes)
    }

    /// Count-prefixed string field, borrowed from the record
    pub fn read_str(&mut self) -> Result<&'a str, DeserializeError> {
        let length = self.read_u32()? as usize;
        let bytes = self.read_bytes(length)?;
        core::str::from_utf8(bytes).map_err(|_| DeserializeError::Utf8)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializeError> {
        let mut array = [0; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }
}

/// Types that can be written to the wire.
///
/// Object safe so that framing code can accept `&dyn Serialize`.
pub trait Serialize {
    /// Exact number of bytes [`Self::serialize`] will write
    fn size_bytes(&self) -> usize;

    /// Writes the record. The cursor's buffer holds at least `size_bytes()` bytes.
    fn serialize(&self, cursor: &mut WriteCursor<'_>);

    /// Serializes into `bytes` and returns the record length
    fn serialize_to_bytes(&self, bytes: &mut [u8]) -> usize {
        let mut cursor = WriteCursor::new(bytes);
        self.serialize(&mut cursor);
        cursor.position()
    }
}

/// Types that can be read back from the wire.
pub trait Deserialize: Sized {
    fn deserialize(cursor: &mut ReadCursor<'_>) -> Result<Self, DeserializeError>;

    fn deserialize_from_bytes(bytes: &[u8]) -> Result<Self, DeserializeError> {
        let mut cursor = ReadCursor::new(bytes);
        Self::deserialize(&mut cursor)
    }
}

/// Static message metadata announced to the host during topic negotiation
pub trait DataType {
    /// Fully qualified message type name, e.g. `std_msgs/Int32`
    const NAME: &'static str;
}

/// A complete topic message: named, encodable, and decodable
pub trait Message: DataType + Serialize + Deserialize {}
