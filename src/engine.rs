//! The codec engine facade.
//!
//! Ties identifier dispatch to field interpretation: reads a packet
//! identifier, resolves its schema through the registry, and hands the
//! body to the interpreter. Stateless apart from the immutable registry,
//! so one engine serves any number of concurrent connections.

use bytes::{Buf, BufMut};

use tracing::trace;

use crate::error::{ProtocolError, Result};
use crate::interpreter;
use crate::record::Record;
use crate::registry::{Direction, PacketRegistry, ProtocolState};
use crate::varint::{read_varint, write_varint};

/// Stateless packet codec over an immutable registry.
#[derive(Debug)]
pub struct CodecEngine {
    registry: PacketRegistry,
}

impl CodecEngine {
    /// Create an engine over a constructed registry.
    #[must_use]
    pub const fn new(registry: PacketRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry, for name-based schema lookup.
    #[must_use]
    pub const fn registry(&self) -> &PacketRegistry {
        &self.registry
    }

    /// Decode one packet body: identifier, then fields.
    ///
    /// `frame_length` is the total framed length of the packet body
    /// (identifier included), as reported by the transport's frame
    /// layer; it is what a trailing "remaining"-length byte block is
    /// measured against. The cursor may hold bytes past this packet;
    /// they are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NotRegistered`] for an unknown
    /// identifier, with no body bytes consumed past the identifier, so
    /// the caller can skip the rest of the frame if it chooses to.
    /// Any field decode error aborts the packet; a partial record is
    /// never returned.
    pub fn decode_packet(
        &self,
        state: ProtocolState,
        direction: Direction,
        buf: &mut impl Buf,
        frame_length: usize,
    ) -> Result<Record> {
        let start = buf.remaining();
        let id = read_varint(buf)?;
        let schema = self.registry.resolve(state, direction, id)?;

        let id_len = start - buf.remaining();
        let body_len =
            frame_length
                .checked_sub(id_len)
                .ok_or(ProtocolError::UnexpectedEndOfInput {
                    needed: id_len,
                    available: frame_length,
                })?;

        trace!(?state, ?direction, id, packet = schema.name, "decoding packet");

        interpreter::decode_fields(schema, buf, body_len)
    }

    /// Encode one packet: identifier, then fields. No outer length
    /// prefix is written; framing belongs to the transport layer.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NotRegistered`] if the record's schema
    /// is not the one registered under its identifier in the given
    /// table, or any field encode error.
    pub fn encode_packet(
        &self,
        state: ProtocolState,
        direction: Direction,
        record: &Record,
        buf: &mut impl BufMut,
    ) -> Result<()> {
        let schema = record.schema();
        let registered = self.registry.resolve(state, direction, schema.id)?;
        if registered.as_ref() != schema {
            return Err(ProtocolError::NotRegistered {
                state,
                direction,
                id: schema.id,
            });
        }

        trace!(?state, ?direction, id = schema.id, packet = schema.name, "encoding packet");

        write_varint(buf, schema.id);
        interpreter::encode_fields(record, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CatalogEntry;
    use crate::scalar::Value;
    use crate::schema::{FieldKind, LengthPolicy, PacketDef};
    use std::sync::Arc;

    fn engine() -> CodecEngine {
        let registry = PacketRegistry::new([
            CatalogEntry::new(
                ProtocolState::Play,
                Direction::Serverbound,
                PacketDef::new("KeepAlive", 0x0B).field("ID", FieldKind::I64),
            ),
            CatalogEntry::new(
                ProtocolState::Play,
                Direction::Serverbound,
                PacketDef::new("PluginMessage", 0x09)
                    .field("Channel", FieldKind::String)
                    .field("Data", FieldKind::ByteArray(LengthPolicy::Remaining)),
            ),
        ])
        .unwrap();
        CodecEngine::new(registry)
    }

    fn play_record(engine: &CodecEngine, name: &str) -> Record {
        let schema = engine
            .registry()
            .by_name(ProtocolState::Play, Direction::Serverbound, name)
            .unwrap();
        Record::new(Arc::clone(schema))
    }

    #[test]
    fn test_keep_alive_echo() {
        let engine = engine();
        let mut record = play_record(&engine, "KeepAlive");
        record.set("ID", Value::I64(123_456_789)).unwrap();

        let mut buf = Vec::new();
        engine
            .encode_packet(ProtocolState::Play, Direction::Serverbound, &record, &mut buf)
            .unwrap();

        // One identifier byte plus 8 big-endian bytes
        assert_eq!(buf, vec![0x0B, 0x00, 0x00, 0x00, 0x00, 0x07, 0x5B, 0xCD, 0x15]);

        let frame_length = buf.len();
        let mut cursor = &buf[..];
        let decoded = engine
            .decode_packet(
                ProtocolState::Play,
                Direction::Serverbound,
                &mut cursor,
                frame_length,
            )
            .unwrap();
        assert_eq!(decoded.get("ID"), Some(&Value::I64(123_456_789)));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_remaining_budget_spans_frame() {
        let engine = engine();
        let mut record = play_record(&engine, "PluginMessage");
        record.set("Channel", Value::Str("MC|Brand".to_owned())).unwrap();
        record
            .set("Data", Value::Bytes(bytes::Bytes::from_static(b"vanilla")))
            .unwrap();

        let mut buf = Vec::new();
        engine
            .encode_packet(ProtocolState::Play, Direction::Serverbound, &record, &mut buf)
            .unwrap();

        let frame_length = buf.len();
        // A second packet queued behind the first must survive untouched
        buf.extend_from_slice(&[0x0B, 0, 0, 0, 0, 0, 0, 0, 1]);

        let mut cursor = &buf[..];
        let decoded = engine
            .decode_packet(
                ProtocolState::Play,
                Direction::Serverbound,
                &mut cursor,
                frame_length,
            )
            .unwrap();
        assert_eq!(
            decoded.get("Data"),
            Some(&Value::Bytes(bytes::Bytes::from_static(b"vanilla")))
        );
        assert_eq!(cursor.len(), 9);
    }

    #[test]
    fn test_unknown_id_consumes_only_identifier() {
        let engine = engine();
        let buf = [0x7Fu8, 0xAA, 0xBB];
        let mut cursor = &buf[..];

        let result = engine.decode_packet(
            ProtocolState::Play,
            Direction::Serverbound,
            &mut cursor,
            buf.len(),
        );
        assert!(matches!(
            result,
            Err(ProtocolError::NotRegistered { id: 0x7F, .. })
        ));
        // The body is left for the caller to skip or inspect
        assert_eq!(cursor.len(), 2);
    }

    #[test]
    fn test_encode_rejects_foreign_schema() {
        let engine = engine();
        // A schema that shares id 0x0B but is not the registered one
        let impostor = Arc::new(
            PacketDef::new("Impostor", 0x0B)
                .field("X", FieldKind::F32)
                .compile()
                .unwrap(),
        );
        let mut record = Record::new(impostor);
        record.set("X", Value::F32(0.0)).unwrap();

        let mut buf = Vec::new();
        let result = engine.encode_packet(
            ProtocolState::Play,
            Direction::Serverbound,
            &record,
            &mut buf,
        );
        assert!(matches!(result, Err(ProtocolError::NotRegistered { .. })));
    }
}
