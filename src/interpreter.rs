//! The field rule interpreter.
//!
//! Walks a packet schema's descriptors in declared order and moves each
//! field over the wire, evaluating presence predicates against sibling
//! values that are already materialized. Entirely schema-driven: no
//! packet is ever special-cased by name, so swapping the catalog never
//! touches this module.

use std::sync::Arc;

use bytes::{Buf, BufMut};

use crate::error::{ProtocolError, Result};
use crate::record::Record;
use crate::scalar::{self, Value};
use crate::schema::{FieldDescriptor, FieldKind, LengthPolicy, Literal, PacketSchema, Predicate};

/// Evaluate a predicate against the sibling values materialized so far.
///
/// `field` is the gated field, for diagnostics. A referent with no value
/// is [`ProtocolError::UnresolvedPredicateReference`], never a default.
fn eval_predicate(predicate: &Predicate, record: &Record, field: &'static str) -> Result<bool> {
    for clause in predicate.clauses() {
        let Some(value) = record.get(&clause.field) else {
            return Err(ProtocolError::UnresolvedPredicateReference {
                packet: record.schema().name,
                field,
                referent: clause.field.clone(),
            });
        };

        let matched = match clause.literal {
            Literal::Bool(expected) => match value {
                Value::Bool(actual) => *actual == expected,
                _ => {
                    return Err(ProtocolError::KindMismatch {
                        packet: record.schema().name,
                        field,
                    });
                }
            },
            Literal::Int(expected) => match value.as_int() {
                Some(actual) => actual == expected,
                None => {
                    return Err(ProtocolError::KindMismatch {
                        packet: record.schema().name,
                        field,
                    });
                }
            },
        };

        if matched {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Decode a packet body into a record.
///
/// `body_len` is the packet body's total framed length in bytes; it is
/// what a trailing "remaining"-length byte block is measured against.
/// The cursor may hold more bytes than one body.
///
/// # Errors
///
/// Propagates any scalar or byte-block decode error immediately; a
/// partial record is never returned.
pub fn decode_fields(
    schema: &Arc<PacketSchema>,
    buf: &mut impl Buf,
    body_len: usize,
) -> Result<Record> {
    let start = buf.remaining();
    let mut record = Record::new(Arc::clone(schema));

    for (index, field) in schema.fields.iter().enumerate() {
        if let Some(predicate) = &field.predicate {
            if !eval_predicate(predicate, &record, field.name)? {
                continue;
            }
        }

        let value = match field.kind {
            FieldKind::Bool => Value::Bool(scalar::read_bool(buf)?),
            FieldKind::U8 => Value::U8(scalar::read_u8(buf)?),
            FieldKind::I8 => Value::I8(scalar::read_i8(buf)?),
            FieldKind::I16 => Value::I16(scalar::read_i16(buf)?),
            FieldKind::U16 => Value::U16(scalar::read_u16(buf)?),
            FieldKind::I32 => Value::I32(scalar::read_i32(buf)?),
            FieldKind::I64 => Value::I64(scalar::read_i64(buf)?),
            FieldKind::F32 => Value::F32(scalar::read_f32(buf)?),
            FieldKind::F64 => Value::F64(scalar::read_f64(buf)?),
            FieldKind::VarInt => Value::VarInt(crate::varint::read_varint(buf)?),
            FieldKind::String => Value::Str(scalar::read_string(buf)?),
            FieldKind::Uuid if field.raw => Value::Uuid(scalar::read_uuid_raw(buf)?),
            FieldKind::Uuid => Value::Uuid(scalar::read_uuid(buf)?),
            FieldKind::Position => Value::Position(scalar::read_position(buf)?),
            FieldKind::ItemStack if field.raw => Value::Stack(scalar::read_stack_raw(buf)?),
            FieldKind::ItemStack => Value::Stack(scalar::read_stack(buf)?),
            FieldKind::ByteArray(LengthPolicy::Prefixed) => {
                Value::Bytes(scalar::read_prefixed_bytes(buf)?)
            }
            FieldKind::ByteArray(LengthPolicy::Remaining) => {
                let consumed = start - buf.remaining();
                let budget = body_len.checked_sub(consumed).ok_or(
                    ProtocolError::UnexpectedEndOfInput {
                        needed: consumed,
                        available: body_len,
                    },
                )?;
                Value::Bytes(scalar::read_exact_bytes(buf, budget)?)
            }
        };

        record.put(index, value);
    }

    Ok(record)
}

/// Encode a record's fields in declared order.
///
/// # Errors
///
/// Returns [`ProtocolError::MissingField`] if a field its predicates
/// require has no value, [`ProtocolError::KindMismatch`] if a value does
/// not match its declared kind, or a predicate evaluation error.
pub fn encode_fields(record: &Record, buf: &mut impl BufMut) -> Result<()> {
    let schema = record.schema();

    for (index, field) in schema.fields.iter().enumerate() {
        if let Some(predicate) = &field.predicate {
            if !eval_predicate(predicate, record, field.name)? {
                continue;
            }
        }

        let Some(value) = record.value_at(index) else {
            return Err(ProtocolError::MissingField {
                packet: schema.name,
                field: field.name,
            });
        };

        write_field(buf, field, value, schema.name)?;
    }

    Ok(())
}

/// Write one value under its descriptor's encoding choice.
fn write_field(
    buf: &mut impl BufMut,
    field: &FieldDescriptor,
    value: &Value,
    packet: &'static str,
) -> Result<()> {
    match (field.kind, value) {
        (FieldKind::Bool, Value::Bool(v)) => scalar::write_bool(buf, *v),
        (FieldKind::U8, Value::U8(v)) => buf.put_u8(*v),
        (FieldKind::I8, Value::I8(v)) => buf.put_i8(*v),
        (FieldKind::I16, Value::I16(v)) => buf.put_i16(*v),
        (FieldKind::U16, Value::U16(v)) => buf.put_u16(*v),
        (FieldKind::I32, Value::I32(v)) => buf.put_i32(*v),
        (FieldKind::I64, Value::I64(v)) => buf.put_i64(*v),
        (FieldKind::F32, Value::F32(v)) => buf.put_f32(*v),
        (FieldKind::F64, Value::F64(v)) => buf.put_f64(*v),
        (FieldKind::VarInt, Value::VarInt(v)) => crate::varint::write_varint(buf, *v),
        (FieldKind::String, Value::Str(v)) => scalar::write_string(buf, v),
        (FieldKind::Uuid, Value::Uuid(v)) if field.raw => scalar::write_uuid_raw(buf, *v),
        (FieldKind::Uuid, Value::Uuid(v)) => scalar::write_uuid(buf, *v),
        (FieldKind::Position, Value::Position(v)) => scalar::write_position(buf, *v),
        (FieldKind::ItemStack, Value::Stack(v)) if field.raw => scalar::write_stack_raw(buf, *v),
        (FieldKind::ItemStack, Value::Stack(v)) => scalar::write_stack(buf, *v),
        (FieldKind::ByteArray(LengthPolicy::Prefixed), Value::Bytes(v)) => {
            scalar::write_prefixed_bytes(buf, v);
        }
        (FieldKind::ByteArray(LengthPolicy::Remaining), Value::Bytes(v)) => buf.put_slice(v),
        _ => {
            return Err(ProtocolError::KindMismatch {
                packet,
                field: field.name,
            });
        }
    }

    Ok(())
}
