//! Packet framing over async streams.
//!
//! Frames on the wire are `[VarInt length][body...]`, where the length
//! counts the body only (identifier plus fields), not itself. This layer
//! is the collaborator that hands `frame_length` to the codec engine; it
//! never interprets the body.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ProtocolError, Result};
use crate::varint::{read_varint_async, varint_len};

/// Maximum frame size (2 MiB, same as vanilla). Applied before any body
/// allocation, so a hostile length prefix cannot balloon memory.
pub const MAX_FRAME_SIZE: usize = 2 * 1024 * 1024;

/// Read one frame from an async reader, returning its body.
///
/// # Errors
///
/// Returns an error if:
/// - An I/O error occurs
/// - The declared length is negative or exceeds [`MAX_FRAME_SIZE`]
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<BytesMut> {
    let length = read_varint_async(reader).await?;

    let length = usize::try_from(length).map_err(|_| ProtocolError::FrameTooLong {
        len: 0,
        max: MAX_FRAME_SIZE,
    })?;

    if length > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLong {
            len: length,
            max: MAX_FRAME_SIZE,
        });
    }

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await?;

    Ok(BytesMut::from(&body[..]))
}

/// Write one frame to an async writer: length prefix, then body.
///
/// # Errors
///
/// Returns an error if the body exceeds [`MAX_FRAME_SIZE`] or an I/O
/// error occurs.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, body: &[u8]) -> Result<()> {
    if body.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLong {
            len: body.len(),
            max: MAX_FRAME_SIZE,
        });
    }

    let len = body.len() as i32;
    let mut buf = Vec::with_capacity(varint_len(len) + body.len());
    crate::varint::write_varint(&mut buf, len);
    buf.extend_from_slice(body);

    writer.write_all(&buf).await?;

    Ok(())
}
