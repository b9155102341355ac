//! `VarInt` encoding/decoding.
//!
//! The protocol uses a variable-length integer encoding where each byte
//! carries 7 bits of payload and a high continuation bit. A 32-bit value
//! never takes more than 5 bytes.

use bytes::{Buf, BufMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ProtocolError, Result};

/// Segment bits mask (lower 7 bits).
const SEGMENT_BITS: u8 = 0x7F;

/// Continue bit (high bit).
const CONTINUE_BIT: u8 = 0x80;

/// Read a `VarInt` from a buffer.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedVarInt`] if the value does not
/// terminate within 5 bytes, or [`ProtocolError::UnexpectedEndOfInput`]
/// if the buffer is exhausted first.
pub fn read_varint(buf: &mut impl Buf) -> Result<i32> {
    let mut value: i32 = 0;
    let mut position: u32 = 0;

    loop {
        if !buf.has_remaining() {
            return Err(ProtocolError::UnexpectedEndOfInput {
                needed: 1,
                available: 0,
            });
        }
        let byte = buf.get_u8();
        value |= i32::from(byte & SEGMENT_BITS) << position;

        if byte & CONTINUE_BIT == 0 {
            break;
        }

        position += 7;
        if position >= 32 {
            return Err(ProtocolError::MalformedVarInt);
        }
    }

    Ok(value)
}

/// Write a `VarInt` to a buffer.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn write_varint(buf: &mut impl BufMut, mut value: i32) {
    loop {
        #[allow(clippy::cast_possible_truncation)]
        let mut byte = (value & i32::from(SEGMENT_BITS)) as u8;
        value = ((value as u32) >> 7) as i32;

        if value != 0 {
            byte |= CONTINUE_BIT;
        }

        buf.put_u8(byte);

        if value == 0 {
            break;
        }
    }
}

/// Calculate the number of bytes needed to encode a `VarInt`.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn varint_len(value: i32) -> usize {
    // Convert to unsigned for bit manipulation
    let value = value as u32;

    if value == 0 {
        return 1;
    }

    let bits_needed = 32 - value.leading_zeros();
    (bits_needed as usize).div_ceil(7)
}

/// Read a `VarInt` from an async reader. Used by the frame layer, which
/// has to pull the length prefix straight off the stream.
///
/// # Errors
///
/// Returns an error if an I/O error occurs or the `VarInt` is longer
/// than 5 bytes.
pub async fn read_varint_async<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32> {
    let mut value: i32 = 0;
    let mut position: u32 = 0;

    loop {
        let byte = reader.read_u8().await?;
        value |= i32::from(byte & SEGMENT_BITS) << position;

        if byte & CONTINUE_BIT == 0 {
            break;
        }

        position += 7;
        if position >= 32 {
            return Err(ProtocolError::MalformedVarInt);
        }
    }

    Ok(value)
}

/// Write a `VarInt` to an async writer.
///
/// # Errors
///
/// Returns an error if an I/O error occurs.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub async fn write_varint_async<W: AsyncWrite + Unpin>(writer: &mut W, mut value: i32) -> Result<()> {
    loop {
        #[allow(clippy::cast_possible_truncation)]
        let mut byte = (value & i32::from(SEGMENT_BITS)) as u8;
        value = ((value as u32) >> 7) as i32;

        if value != 0 {
            byte |= CONTINUE_BIT;
        }

        writer.write_u8(byte).await?;

        if value == 0 {
            break;
        }
    }

    Ok(())
}
