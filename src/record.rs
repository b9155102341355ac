//! Decoded packet records.

use std::sync::Arc;

use crate::error::{ProtocolError, Result};
use crate::scalar::Value;
use crate::schema::PacketSchema;

/// An ordered set of named field values conforming to a packet schema.
///
/// A field whose presence predicate evaluated false has no value at all;
/// [`Record::get`] returns `None` for it, never a default.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<PacketSchema>,
    values: Vec<Option<Value>>,
}

impl Record {
    /// Create an empty record for the given schema.
    #[must_use]
    pub fn new(schema: Arc<PacketSchema>) -> Self {
        let values = vec![None; schema.fields.len()];
        Self { schema, values }
    }

    /// The record's schema.
    #[must_use]
    pub fn schema(&self) -> &PacketSchema {
        &self.schema
    }

    /// The value of a field, or `None` if the field is absent (or the
    /// name is not in the schema).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.schema.field_index(name)?;
        self.values[index].as_ref()
    }

    /// Set the value of a field by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownField`] if the schema declares no
    /// such field.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let index =
            self.schema
                .field_index(name)
                .ok_or_else(|| ProtocolError::UnknownField {
                    packet: self.schema.name,
                    field: name.to_owned(),
                })?;
        self.values[index] = Some(value);
        Ok(())
    }

    /// The value at a field index, for the interpreter's in-order walk.
    #[must_use]
    pub(crate) fn value_at(&self, index: usize) -> Option<&Value> {
        self.values[index].as_ref()
    }

    /// Store a decoded value at a field index.
    pub(crate) fn put(&mut self, index: usize, value: Value) {
        self.values[index] = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, PacketDef};

    fn schema() -> Arc<PacketSchema> {
        Arc::new(
            PacketDef::new("Test", 0x00)
                .field("OnGround", FieldKind::Bool)
                .compile()
                .unwrap(),
        )
    }

    #[test]
    fn test_set_and_get() {
        let mut record = Record::new(schema());
        assert_eq!(record.get("OnGround"), None);

        record.set("OnGround", Value::Bool(true)).unwrap();
        assert_eq!(record.get("OnGround"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_unknown_field() {
        let mut record = Record::new(schema());
        assert!(matches!(
            record.set("Nope", Value::Bool(false)),
            Err(ProtocolError::UnknownField { .. })
        ));
        assert_eq!(record.get("Nope"), None);
    }
}
