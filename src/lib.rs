//! Schema-driven packet codec for the Minecraft network protocol.
//!
//! Packets are described declaratively: an ordered list of field
//! descriptors giving each field's wire kind, an optional presence
//! predicate over sibling fields, an optional byte-block length policy,
//! and an optional raw-encoding override. A registry maps packet
//! identifiers to schemas per (state, direction), and the engine facade
//! turns identifiers plus bytes into records and back. All of it is
//! data-driven: adding a packet is a catalog change, never a code change.
//!
//! ```
//! use sculk_wire::catalog::vanilla_registry;
//! use sculk_wire::engine::CodecEngine;
//! use sculk_wire::record::Record;
//! use sculk_wire::registry::{Direction, ProtocolState};
//! use sculk_wire::scalar::Value;
//! use std::sync::Arc;
//!
//! let engine = CodecEngine::new(vanilla_registry().unwrap());
//! let schema = engine
//!     .registry()
//!     .by_name(ProtocolState::Play, Direction::Serverbound, "KeepAlive")
//!     .unwrap();
//!
//! let mut record = Record::new(Arc::clone(schema));
//! record.set("ID", Value::I64(123_456_789)).unwrap();
//!
//! let mut buf = Vec::new();
//! engine
//!     .encode_packet(ProtocolState::Play, Direction::Serverbound, &record, &mut buf)
//!     .unwrap();
//!
//! let frame_length = buf.len();
//! let mut cursor = &buf[..];
//! let decoded = engine
//!     .decode_packet(ProtocolState::Play, Direction::Serverbound, &mut cursor, frame_length)
//!     .unwrap();
//! assert_eq!(decoded, record);
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod framing;
pub mod interpreter;
pub mod record;
pub mod registry;
pub mod scalar;
pub mod schema;
pub mod varint;

pub use engine::CodecEngine;
pub use error::{ProtocolError, Result};
pub use record::Record;
pub use registry::{CatalogEntry, Direction, PacketRegistry, ProtocolState};
pub use scalar::{ItemStack, Position, Value};
pub use schema::{FieldDescriptor, FieldKind, LengthPolicy, PacketDef, PacketSchema, Predicate};
