//! Packet schemas: the declarative field metadata the interpreter runs on.
//!
//! A packet is authored as a [`PacketDef`]: an identifier plus an ordered
//! list of field rules, with presence predicates still in their source
//! text form (e.g. `".Type==0 .Type==2"`). Registry construction compiles
//! each definition into an immutable [`PacketSchema`], parsing predicates
//! and rejecting anything that violates the structural invariants.

use crate::error::{ProtocolError, Result};

/// The wire kind of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One-byte boolean.
    Bool,
    /// Unsigned byte.
    U8,
    /// Signed byte.
    I8,
    /// Big-endian signed 16-bit integer.
    I16,
    /// Big-endian unsigned 16-bit integer.
    U16,
    /// Big-endian signed 32-bit integer.
    I32,
    /// Big-endian signed 64-bit integer.
    I64,
    /// Big-endian IEEE 754 single.
    F32,
    /// Big-endian IEEE 754 double.
    F64,
    /// Variable-length 32-bit integer.
    VarInt,
    /// `VarInt`-length-prefixed UTF-8 string.
    String,
    /// 128-bit identifier. Default form is the hyphenated text form;
    /// the raw override selects the 16-byte form.
    Uuid,
    /// Packed block position.
    Position,
    /// Item stack. Default form is abbreviated; the raw override selects
    /// the full form.
    ItemStack,
    /// Opaque byte block under the given length policy.
    ByteArray(LengthPolicy),
}

impl FieldKind {
    /// Whether an integer predicate literal can compare against this kind.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::U8 | Self::I8 | Self::I16 | Self::U16 | Self::I32 | Self::I64 | Self::VarInt
        )
    }

    /// Whether the kind has a distinct raw wire form the raw override
    /// can select.
    #[must_use]
    pub const fn has_raw_form(self) -> bool {
        matches!(self, Self::Uuid | Self::ItemStack)
    }
}

/// How a byte block's length is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPolicy {
    /// A `VarInt` length prefix precedes the bytes.
    Prefixed,
    /// The block consumes every byte left in the packet body. Must be
    /// the last field of its packet.
    Remaining,
}

/// A literal a predicate clause compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    /// A boolean literal (`true` / `false`).
    Bool(bool),
    /// A decimal integer literal.
    Int(i64),
}

/// One equality clause of a predicate: `.Field==literal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// The referenced sibling field.
    pub field: String,
    /// The literal the sibling's value must equal.
    pub literal: Literal,
}

/// A presence predicate: an OR-list of equality clauses over sibling
/// fields, parsed once at registry construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// Parse predicate source text: whitespace-separated clauses of the
    /// form `.Field==literal`, where the literal is `true`, `false`, or
    /// a decimal integer. Clauses OR together.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::SchemaInvariantViolation`] if the text
    /// does not fit that grammar. `packet` is only used for diagnostics.
    pub fn parse(source: &str, packet: &'static str) -> Result<Self> {
        let malformed = |reason: String| ProtocolError::SchemaInvariantViolation {
            packet,
            reason,
        };

        let mut clauses = Vec::new();
        for clause in source.split_whitespace() {
            let Some(rest) = clause.strip_prefix('.') else {
                return Err(malformed(format!(
                    "predicate clause `{clause}` must start with `.`"
                )));
            };
            let Some((field, literal)) = rest.split_once("==") else {
                return Err(malformed(format!(
                    "predicate clause `{clause}` must contain `==`"
                )));
            };
            if field.is_empty() {
                return Err(malformed(format!(
                    "predicate clause `{clause}` names no field"
                )));
            }

            let literal = match literal {
                "true" => Literal::Bool(true),
                "false" => Literal::Bool(false),
                other => match other.parse::<i64>() {
                    Ok(value) => Literal::Int(value),
                    Err(_) => {
                        return Err(malformed(format!(
                            "predicate literal `{other}` is not a boolean or integer"
                        )));
                    }
                },
            };

            clauses.push(Clause {
                field: field.to_owned(),
                literal,
            });
        }

        if clauses.is_empty() {
            return Err(malformed("predicate has no clauses".to_owned()));
        }

        Ok(Self { clauses })
    }

    /// The clauses, in source order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

/// An authored field rule, predicate still in source text form.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Field name, unique within the packet.
    pub name: &'static str,
    /// Wire kind.
    pub kind: FieldKind,
    /// Presence predicate source text, if the field is conditional.
    pub when: Option<&'static str>,
    /// Whether the raw wire form is selected.
    pub raw: bool,
}

/// An authored packet definition: what the schema catalog supplies.
#[derive(Debug, Clone)]
pub struct PacketDef {
    /// Packet name, for diagnostics and encode-side lookup.
    pub name: &'static str,
    /// Packet identifier within its (state, direction) table.
    pub id: i32,
    /// Ordered field rules; order is the wire order.
    pub fields: Vec<FieldRule>,
}

impl PacketDef {
    /// Start a definition with no fields.
    #[must_use]
    pub const fn new(name: &'static str, id: i32) -> Self {
        Self {
            name,
            id,
            fields: Vec::new(),
        }
    }

    /// Append an unconditional field.
    #[must_use]
    pub fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldRule {
            name,
            kind,
            when: None,
            raw: false,
        });
        self
    }

    /// Append a field gated on a presence predicate.
    #[must_use]
    pub fn field_when(mut self, name: &'static str, kind: FieldKind, when: &'static str) -> Self {
        self.fields.push(FieldRule {
            name,
            kind,
            when: Some(when),
            raw: false,
        });
        self
    }

    /// Append a field coded with its raw wire form.
    #[must_use]
    pub fn raw_field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldRule {
            name,
            kind,
            when: None,
            raw: true,
        });
        self
    }

    /// Compile into an immutable [`PacketSchema`], parsing predicates and
    /// checking every structural invariant.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::SchemaInvariantViolation`] if:
    /// - the identifier is negative,
    /// - a field name repeats,
    /// - a raw override is placed on a kind with no raw form,
    /// - a predicate fails to parse, references a field that does not
    ///   precede it, references a field that is itself conditional, or
    ///   compares a literal against an incompatible kind,
    /// - a "remaining" byte block is not the last field.
    pub fn compile(self) -> Result<PacketSchema> {
        let packet = self.name;
        let violation = |reason: String| ProtocolError::SchemaInvariantViolation {
            packet,
            reason,
        };

        if self.id < 0 {
            return Err(violation(format!("negative packet id {}", self.id)));
        }

        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(self.fields.len());
        for (index, rule) in self.fields.iter().enumerate() {
            if fields.iter().any(|f| f.name == rule.name) {
                return Err(violation(format!("duplicate field name `{}`", rule.name)));
            }

            if rule.raw && !rule.kind.has_raw_form() {
                return Err(violation(format!(
                    "field `{}` has a raw override but kind {:?} has no raw form",
                    rule.name, rule.kind
                )));
            }

            if matches!(rule.kind, FieldKind::ByteArray(LengthPolicy::Remaining))
                && index != self.fields.len() - 1
            {
                return Err(violation(format!(
                    "remaining-length field `{}` must be the last field",
                    rule.name
                )));
            }

            let predicate = match rule.when {
                None => None,
                Some(source) => {
                    let predicate = Predicate::parse(source, packet)?;
                    for clause in predicate.clauses() {
                        let Some(referent) =
                            fields.iter().find(|f| f.name == clause.field)
                        else {
                            return Err(violation(format!(
                                "predicate on `{}` references `{}`, which does not precede it",
                                rule.name, clause.field
                            )));
                        };
                        if referent.predicate.is_some() {
                            return Err(violation(format!(
                                "predicate on `{}` references conditional field `{}`",
                                rule.name, clause.field
                            )));
                        }
                        let compatible = match clause.literal {
                            Literal::Bool(_) => referent.kind == FieldKind::Bool,
                            Literal::Int(_) => referent.kind.is_integer(),
                        };
                        if !compatible {
                            return Err(violation(format!(
                                "predicate on `{}` compares `{}` ({:?}) against {:?}",
                                rule.name, clause.field, referent.kind, clause.literal
                            )));
                        }
                    }
                    Some(predicate)
                }
            };

            fields.push(FieldDescriptor {
                name: rule.name,
                kind: rule.kind,
                predicate,
                raw: rule.raw,
            });
        }

        Ok(PacketSchema {
            name: packet,
            id: self.id,
            fields,
        })
    }
}

/// A compiled field descriptor: name, kind, parsed predicate and raw flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, unique within the packet.
    pub name: &'static str,
    /// Wire kind.
    pub kind: FieldKind,
    /// Parsed presence predicate, if the field is conditional.
    pub predicate: Option<Predicate>,
    /// Whether the raw wire form is selected.
    pub raw: bool,
}

/// A compiled, validated packet schema. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketSchema {
    /// Packet name.
    pub name: &'static str,
    /// Packet identifier.
    pub id: i32,
    /// Ordered field descriptors; order is the wire order.
    pub fields: Vec<FieldDescriptor>,
}

impl PacketSchema {
    /// Index of a field by name, in declaration order.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}
