//! Scalar and byte-block codecs.
//!
//! Every primitive the field interpreter can move over the wire lives
//! here: fixed-width integers, floats, booleans, length-prefixed UTF-8
//! strings, UUIDs, packed block positions, item stacks, and opaque byte
//! blocks. All reads are bounds-checked against the cursor and fail with
//! [`ProtocolError::UnexpectedEndOfInput`] instead of panicking.

use bytes::{Buf, BufMut, Bytes};
use uuid::Uuid;

use crate::error::{ProtocolError, Result};
use crate::varint::{read_varint, write_varint};

/// A decoded field value.
///
/// Equality is field-by-field; floats compare by IEEE equality, which is
/// what the round-trip laws need (the codecs never alter a payload).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean, one byte on the wire (0 or 1).
    Bool(bool),
    /// An unsigned byte.
    U8(u8),
    /// A signed byte.
    I8(i8),
    /// A big-endian signed 16-bit integer.
    I16(i16),
    /// A big-endian unsigned 16-bit integer.
    U16(u16),
    /// A big-endian signed 32-bit integer.
    I32(i32),
    /// A big-endian signed 64-bit integer.
    I64(i64),
    /// A big-endian IEEE 754 single.
    F32(f32),
    /// A big-endian IEEE 754 double.
    F64(f64),
    /// A variable-length 32-bit integer.
    VarInt(i32),
    /// A `VarInt`-length-prefixed UTF-8 string.
    Str(String),
    /// A 128-bit identifier.
    Uuid(Uuid),
    /// A packed block position.
    Position(Position),
    /// An item stack; `None` is the empty slot.
    Stack(Option<ItemStack>),
    /// An opaque byte block.
    Bytes(Bytes),
}

impl Value {
    /// Widen any integer-kinded value to `i64` for predicate comparison.
    #[must_use]
    pub(crate) fn as_int(&self) -> Option<i64> {
        match *self {
            Self::U8(v) => Some(i64::from(v)),
            Self::I8(v) => Some(i64::from(v)),
            Self::I16(v) => Some(i64::from(v)),
            Self::U16(v) => Some(i64::from(v)),
            Self::I32(v) | Self::VarInt(v) => Some(i64::from(v)),
            Self::I64(v) => Some(v),
            _ => None,
        }
    }
}

/// A block position packed into 8 bytes: 26 bits of x, 12 bits of y and
/// 26 bits of z, all two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// X coordinate, legal range -2^25 .. 2^25 - 1.
    pub x: i32,
    /// Y coordinate, legal range -2^11 .. 2^11 - 1.
    pub y: i32,
    /// Z coordinate, legal range -2^25 .. 2^25 - 1.
    pub z: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Pack into the wire representation.
    #[allow(clippy::cast_sign_loss)]
    #[must_use]
    pub const fn pack(self) -> u64 {
        ((self.x as i64 & 0x3FF_FFFF) << 38
            | (self.y as i64 & 0xFFF) << 26
            | (self.z as i64 & 0x3FF_FFFF)) as u64
    }

    /// Unpack from the wire representation, sign-extending each field.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn unpack(raw: u64) -> Self {
        let raw = raw as i64;
        Self {
            x: (raw >> 38) as i32,
            y: ((raw << 26) >> 52) as i32,
            z: ((raw << 38) >> 38) as i32,
        }
    }
}

/// A non-empty item stack. The empty slot is `None` at the `Value` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStack {
    /// Item id, legal range 0 .. `i16::MAX` (-1 on the wire means empty).
    pub id: i16,
    /// Stack size.
    pub count: u8,
    /// Item damage / metadata.
    pub damage: i16,
}

/// Fail with [`ProtocolError::UnexpectedEndOfInput`] unless `needed`
/// bytes are available.
fn ensure(buf: &impl Buf, needed: usize) -> Result<()> {
    let available = buf.remaining();
    if available < needed {
        return Err(ProtocolError::UnexpectedEndOfInput { needed, available });
    }
    Ok(())
}

/// Read a boolean (one byte, 0 or 1).
///
/// # Errors
///
/// Returns an error if the buffer is exhausted or the byte is neither
/// 0 nor 1.
pub fn read_bool(buf: &mut impl Buf) -> Result<bool> {
    ensure(buf, 1)?;
    match buf.get_u8() {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(ProtocolError::InvalidEncoding(format!(
            "boolean byte must be 0 or 1, got {other}"
        ))),
    }
}

/// Write a boolean as a single byte.
pub fn write_bool(buf: &mut impl BufMut, value: bool) {
    buf.put_u8(u8::from(value));
}

/// Read an unsigned byte.
///
/// # Errors
///
/// Returns an error if the buffer is exhausted.
pub fn read_u8(buf: &mut impl Buf) -> Result<u8> {
    ensure(buf, 1)?;
    Ok(buf.get_u8())
}

/// Read a signed byte.
///
/// # Errors
///
/// Returns an error if the buffer is exhausted.
pub fn read_i8(buf: &mut impl Buf) -> Result<i8> {
    ensure(buf, 1)?;
    Ok(buf.get_i8())
}

/// Read a big-endian signed 16-bit integer.
///
/// # Errors
///
/// Returns an error if fewer than 2 bytes remain.
pub fn read_i16(buf: &mut impl Buf) -> Result<i16> {
    ensure(buf, 2)?;
    Ok(buf.get_i16())
}

/// Read a big-endian unsigned 16-bit integer.
///
/// # Errors
///
/// Returns an error if fewer than 2 bytes remain.
pub fn read_u16(buf: &mut impl Buf) -> Result<u16> {
    ensure(buf, 2)?;
    Ok(buf.get_u16())
}

/// Read a big-endian signed 32-bit integer.
///
/// # Errors
///
/// Returns an error if fewer than 4 bytes remain.
pub fn read_i32(buf: &mut impl Buf) -> Result<i32> {
    ensure(buf, 4)?;
    Ok(buf.get_i32())
}

/// Read a big-endian signed 64-bit integer.
///
/// # Errors
///
/// Returns an error if fewer than 8 bytes remain.
pub fn read_i64(buf: &mut impl Buf) -> Result<i64> {
    ensure(buf, 8)?;
    Ok(buf.get_i64())
}

/// Read a big-endian IEEE 754 single.
///
/// # Errors
///
/// Returns an error if fewer than 4 bytes remain.
pub fn read_f32(buf: &mut impl Buf) -> Result<f32> {
    ensure(buf, 4)?;
    Ok(buf.get_f32())
}

/// Read a big-endian IEEE 754 double.
///
/// # Errors
///
/// Returns an error if fewer than 8 bytes remain.
pub fn read_f64(buf: &mut impl Buf) -> Result<f64> {
    ensure(buf, 8)?;
    Ok(buf.get_f64())
}

/// Read a `VarInt`-length-prefixed UTF-8 string.
///
/// # Errors
///
/// Returns an error if the prefix is malformed or negative, the buffer
/// is too short, or the bytes are not valid UTF-8.
pub fn read_string(buf: &mut impl Buf) -> Result<String> {
    let len = read_varint(buf)?;
    let len = usize::try_from(len).map_err(|_| {
        ProtocolError::InvalidEncoding(format!("negative string length {len}"))
    })?;

    ensure(buf, len)?;
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);

    String::from_utf8(bytes)
        .map_err(|e| ProtocolError::InvalidEncoding(format!("invalid UTF-8 string: {e}")))
}

/// Write a string as `VarInt` length plus UTF-8 bytes.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn write_string(buf: &mut impl BufMut, s: &str) {
    let bytes = s.as_bytes();
    write_varint(buf, bytes.len() as i32);
    buf.put_slice(bytes);
}

/// Read a UUID in its raw form: 16 big-endian bytes.
///
/// # Errors
///
/// Returns an error if fewer than 16 bytes remain.
pub fn read_uuid_raw(buf: &mut impl Buf) -> Result<Uuid> {
    ensure(buf, 16)?;
    Ok(Uuid::from_u128(buf.get_u128()))
}

/// Write a UUID in its raw form: 16 big-endian bytes.
pub fn write_uuid_raw(buf: &mut impl BufMut, uuid: Uuid) {
    buf.put_u128(uuid.as_u128());
}

/// Read a UUID in its default form: a length-prefixed hyphenated string.
///
/// # Errors
///
/// Returns an error if the string is malformed or not a UUID.
pub fn read_uuid(buf: &mut impl Buf) -> Result<Uuid> {
    let text = read_string(buf)?;
    Uuid::parse_str(&text)
        .map_err(|e| ProtocolError::InvalidEncoding(format!("invalid UUID `{text}`: {e}")))
}

/// Write a UUID in its default form: a length-prefixed hyphenated string.
pub fn write_uuid(buf: &mut impl BufMut, uuid: Uuid) {
    write_string(buf, &uuid.hyphenated().to_string());
}

/// Read a packed block position.
///
/// # Errors
///
/// Returns an error if fewer than 8 bytes remain.
pub fn read_position(buf: &mut impl Buf) -> Result<Position> {
    ensure(buf, 8)?;
    Ok(Position::unpack(buf.get_u64()))
}

/// Write a packed block position.
pub fn write_position(buf: &mut impl BufMut, pos: Position) {
    buf.put_u64(pos.pack());
}

/// Read an item stack in its default (abbreviated) form: a 16-bit id,
/// then count and damage only when the slot is non-empty.
///
/// # Errors
///
/// Returns an error if the buffer is exhausted mid-value.
pub fn read_stack(buf: &mut impl Buf) -> Result<Option<ItemStack>> {
    let id = read_i16(buf)?;
    if id == -1 {
        return Ok(None);
    }
    let count = read_u8(buf)?;
    let damage = read_i16(buf)?;
    Ok(Some(ItemStack { id, count, damage }))
}

/// Write an item stack in its default (abbreviated) form.
pub fn write_stack(buf: &mut impl BufMut, stack: Option<ItemStack>) {
    match stack {
        None => buf.put_i16(-1),
        Some(stack) => {
            buf.put_i16(stack.id);
            buf.put_u8(stack.count);
            buf.put_i16(stack.damage);
        }
    }
}

/// Read an item stack in its raw (full) form: id, count and damage are
/// always present, with id -1 marking the empty slot.
///
/// # Errors
///
/// Returns an error if fewer than 5 bytes remain.
pub fn read_stack_raw(buf: &mut impl Buf) -> Result<Option<ItemStack>> {
    let id = read_i16(buf)?;
    let count = read_u8(buf)?;
    let damage = read_i16(buf)?;
    if id == -1 {
        return Ok(None);
    }
    Ok(Some(ItemStack { id, count, damage }))
}

/// Write an item stack in its raw (full) form.
pub fn write_stack_raw(buf: &mut impl BufMut, stack: Option<ItemStack>) {
    match stack {
        None => {
            buf.put_i16(-1);
            buf.put_u8(0);
            buf.put_i16(0);
        }
        Some(stack) => {
            buf.put_i16(stack.id);
            buf.put_u8(stack.count);
            buf.put_i16(stack.damage);
        }
    }
}

/// Read a byte block with a `VarInt` length prefix. A zero-length block
/// is legal and yields empty bytes.
///
/// # Errors
///
/// Returns an error if the prefix is malformed or negative, or fewer
/// bytes remain than it declares.
pub fn read_prefixed_bytes(buf: &mut impl Buf) -> Result<Bytes> {
    let len = read_varint(buf)?;
    let len = usize::try_from(len).map_err(|_| {
        ProtocolError::InvalidEncoding(format!("negative byte block length {len}"))
    })?;
    read_exact_bytes(buf, len)
}

/// Write a byte block with a `VarInt` length prefix.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn write_prefixed_bytes(buf: &mut impl BufMut, bytes: &[u8]) {
    write_varint(buf, bytes.len() as i32);
    buf.put_slice(bytes);
}

/// Read exactly `len` bytes. The "remaining" length policy resolves to
/// this once the interpreter has computed the budget.
///
/// # Errors
///
/// Returns an error if fewer than `len` bytes remain.
pub fn read_exact_bytes(buf: &mut impl Buf, len: usize) -> Result<Bytes> {
    ensure(buf, len)?;
    Ok(buf.copy_to_bytes(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_roundtrip() {
        let mut buf = Vec::new();
        write_string(&mut buf, "こんにちは world");

        let mut cursor = &buf[..];
        assert_eq!(read_string(&mut cursor).unwrap(), "こんにちは world");
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_empty_string() {
        let mut buf = Vec::new();
        write_string(&mut buf, "");
        assert_eq!(buf, vec![0x00]);

        let mut cursor = &buf[..];
        assert_eq!(read_string(&mut cursor).unwrap(), "");
    }

    #[test]
    fn test_invalid_utf8() {
        // Length 2, then a lone continuation byte pair
        let bytes = [0x02u8, 0xC3, 0x28];
        let mut cursor = &bytes[..];
        assert!(matches!(
            read_string(&mut cursor),
            Err(ProtocolError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_string_declares_more_than_available() {
        let bytes = [0x05u8, b'a', b'b'];
        let mut cursor = &bytes[..];
        assert!(matches!(
            read_string(&mut cursor),
            Err(ProtocolError::UnexpectedEndOfInput {
                needed: 5,
                available: 2
            })
        ));
    }

    #[test]
    fn test_bool_rejects_garbage() {
        let bytes = [0x02u8];
        let mut cursor = &bytes[..];
        assert!(matches!(
            read_bool(&mut cursor),
            Err(ProtocolError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_fixed_width_eof() {
        let bytes = [0x00u8, 0x01, 0x02];
        let mut cursor = &bytes[..];
        assert!(matches!(
            read_i64(&mut cursor),
            Err(ProtocolError::UnexpectedEndOfInput {
                needed: 8,
                available: 3
            })
        ));
    }

    #[test]
    fn test_position_roundtrip() {
        let cases = [
            Position::new(0, 0, 0),
            Position::new(100, 64, -100),
            Position::new(-33_554_432, -2048, 33_554_431),
            Position::new(33_554_431, 2047, -33_554_432),
        ];

        for pos in cases {
            let mut buf = Vec::new();
            write_position(&mut buf, pos);
            assert_eq!(buf.len(), 8);

            let mut cursor = &buf[..];
            assert_eq!(read_position(&mut cursor).unwrap(), pos);
        }
    }

    #[test]
    fn test_position_known_packing() {
        // x=1 sits at bit 38, y=1 at bit 26, z=1 at bit 0
        let pos = Position::new(1, 1, 1);
        assert_eq!(pos.pack(), (1u64 << 38) | (1u64 << 26) | 1);
        assert_eq!(Position::unpack(pos.pack()), pos);
    }

    #[test]
    fn test_uuid_both_forms() {
        let uuid = Uuid::from_u128(0x1234_5678_9abc_def0_0fed_cba9_8765_4321);

        let mut raw = Vec::new();
        write_uuid_raw(&mut raw, uuid);
        assert_eq!(raw.len(), 16);
        let mut cursor = &raw[..];
        assert_eq!(read_uuid_raw(&mut cursor).unwrap(), uuid);

        let mut text = Vec::new();
        write_uuid(&mut text, uuid);
        // 1-byte length prefix plus 36 hyphenated characters
        assert_eq!(text.len(), 37);
        let mut cursor = &text[..];
        assert_eq!(read_uuid(&mut cursor).unwrap(), uuid);
    }

    #[test]
    fn test_stack_default_form() {
        let stack = Some(ItemStack {
            id: 276,
            count: 1,
            damage: 12,
        });

        let mut buf = Vec::new();
        write_stack(&mut buf, stack);
        assert_eq!(buf.len(), 5);
        let mut cursor = &buf[..];
        assert_eq!(read_stack(&mut cursor).unwrap(), stack);

        // Empty slot is just the -1 id
        let mut buf = Vec::new();
        write_stack(&mut buf, None);
        assert_eq!(buf, vec![0xFF, 0xFF]);
        let mut cursor = &buf[..];
        assert_eq!(read_stack(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_stack_raw_form() {
        let stack = Some(ItemStack {
            id: 1,
            count: 64,
            damage: 0,
        });

        let mut buf = Vec::new();
        write_stack_raw(&mut buf, stack);
        assert_eq!(buf.len(), 5);
        let mut cursor = &buf[..];
        assert_eq!(read_stack_raw(&mut cursor).unwrap(), stack);

        // Raw empty slot still carries count and damage bytes
        let mut buf = Vec::new();
        write_stack_raw(&mut buf, None);
        assert_eq!(buf.len(), 5);
        let mut cursor = &buf[..];
        assert_eq!(read_stack_raw(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_prefixed_bytes_roundtrip() {
        let payload = b"plugin payload".as_slice();
        let mut buf = Vec::new();
        write_prefixed_bytes(&mut buf, payload);

        let mut cursor = &buf[..];
        assert_eq!(read_prefixed_bytes(&mut cursor).unwrap(), payload);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_zero_length_block_is_legal() {
        let mut buf = Vec::new();
        write_prefixed_bytes(&mut buf, &[]);
        assert_eq!(buf, vec![0x00]);

        let mut cursor = &buf[..];
        assert_eq!(read_prefixed_bytes(&mut cursor).unwrap().len(), 0);
    }

    #[test]
    fn test_exact_bytes_underrun() {
        let bytes = [1u8, 2, 3];
        let mut cursor = &bytes[..];
        assert!(matches!(
            read_exact_bytes(&mut cursor, 4),
            Err(ProtocolError::UnexpectedEndOfInput {
                needed: 4,
                available: 3
            })
        ));
    }
}
