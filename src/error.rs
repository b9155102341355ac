//! Protocol error types.

use std::io;

use thiserror::Error;

use crate::registry::{Direction, ProtocolState};

/// Errors that can occur when reading or writing protocol data, or when
/// constructing a packet registry from a schema catalog.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An I/O error occurred (frame layer only).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A `VarInt` did not terminate within 5 bytes.
    #[error("malformed VarInt: exceeds 5 bytes")]
    MalformedVarInt,

    /// The cursor ran out of bytes mid-value.
    #[error("unexpected end of input: needed {needed} byte(s), {available} available")]
    UnexpectedEndOfInput {
        /// Bytes required to finish the current value.
        needed: usize,
        /// Bytes actually left in the cursor.
        available: usize,
    },

    /// Decoded bytes were not a valid encoding for the field's kind
    /// (bad UTF-8, negative length prefix, un-parseable UUID text).
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Two packets share an identifier within one (state, direction) table.
    #[error("duplicate packet id {id:#04x} in {state:?} {direction:?}: `{first}` and `{second}`")]
    DuplicateIdentifier {
        /// The protocol state of the colliding table.
        state: ProtocolState,
        /// The direction of the colliding table.
        direction: Direction,
        /// The colliding identifier.
        id: i32,
        /// Name of the packet registered first.
        first: &'static str,
        /// Name of the packet that collided with it.
        second: &'static str,
    },

    /// The schema catalog violates a structural invariant. Fatal to
    /// registry construction.
    #[error("schema invariant violation in packet `{packet}`: {reason}")]
    SchemaInvariantViolation {
        /// The offending packet's name.
        packet: &'static str,
        /// Human-readable description of the violation.
        reason: String,
    },

    /// No packet is registered under this identifier. Recoverable; the
    /// caller decides whether to skip the body or drop the connection.
    #[error("no packet registered for id {id:#04x} in {state:?} {direction:?}")]
    NotRegistered {
        /// The protocol state that was looked up.
        state: ProtocolState,
        /// The direction that was looked up.
        direction: Direction,
        /// The unrecognized identifier.
        id: i32,
    },

    /// A presence predicate referenced a sibling field that has no value.
    /// Fatal for the current packet; never silently defaulted.
    #[error("predicate on `{field}` in packet `{packet}` references `{referent}`, which has no value")]
    UnresolvedPredicateReference {
        /// The packet being coded.
        packet: &'static str,
        /// The predicate-gated field.
        field: &'static str,
        /// The sibling the predicate needed.
        referent: String,
    },

    /// A record is missing a value for a field its predicates require
    /// to be present.
    #[error("missing value for field `{field}` in packet `{packet}`")]
    MissingField {
        /// The packet being encoded.
        packet: &'static str,
        /// The field with no value.
        field: &'static str,
    },

    /// A record value does not match its field's declared kind.
    #[error("value for field `{field}` in packet `{packet}` does not match its declared kind")]
    KindMismatch {
        /// The packet being coded.
        packet: &'static str,
        /// The mismatched field.
        field: &'static str,
    },

    /// A record names a field its schema does not declare.
    #[error("packet `{packet}` has no field named `{field}`")]
    UnknownField {
        /// The packet the caller addressed.
        packet: &'static str,
        /// The unknown field name.
        field: String,
    },

    /// A frame exceeded the maximum length (frame layer only).
    #[error("frame too long: {len} bytes (max {max})")]
    FrameTooLong {
        /// The declared frame length.
        len: usize,
        /// The maximum allowed length.
        max: usize,
    },
}

/// Result type alias using [`ProtocolError`].
pub type Result<T> = std::result::Result<T, ProtocolError>;
