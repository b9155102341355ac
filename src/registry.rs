//! The packet registry: identifier dispatch per protocol state and
//! direction.
//!
//! Built once from a static schema catalog, then immutable; lookups are
//! read-only and safe to share across threads without locking.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::schema::{PacketDef, PacketSchema};

/// The connection state a packet belongs to. Each state has its own
/// identifier space per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolState {
    /// Initial connection state.
    Handshaking,
    /// Server list ping.
    Status,
    /// Authentication.
    Login,
    /// In-game.
    Play,
}

/// Which endpoint originates a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Client to server.
    Serverbound,
    /// Server to client.
    Clientbound,
}

/// One catalog entry: a packet definition placed in its (state,
/// direction) table.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// The protocol state the packet belongs to.
    pub state: ProtocolState,
    /// The direction the packet travels.
    pub direction: Direction,
    /// The packet definition.
    pub def: PacketDef,
}

impl CatalogEntry {
    /// Create a catalog entry.
    #[must_use]
    pub const fn new(state: ProtocolState, direction: Direction, def: PacketDef) -> Self {
        Self {
            state,
            direction,
            def,
        }
    }
}

/// Bidirectional mapping between packet identifiers and schemas, keyed
/// by (state, direction). Immutable once constructed.
#[derive(Debug)]
pub struct PacketRegistry {
    tables: HashMap<(ProtocolState, Direction), HashMap<i32, Arc<PacketSchema>>>,
}

impl PacketRegistry {
    /// Build a registry from a schema catalog, compiling and validating
    /// every definition.
    ///
    /// # Errors
    ///
    /// Fails fast with [`ProtocolError::DuplicateIdentifier`] if two
    /// packets share an id within one table, or with
    /// [`ProtocolError::SchemaInvariantViolation`] if any definition is
    /// structurally invalid. No partially-usable registry is returned.
    pub fn new(catalog: impl IntoIterator<Item = CatalogEntry>) -> Result<Self> {
        let mut tables: HashMap<(ProtocolState, Direction), HashMap<i32, Arc<PacketSchema>>> =
            HashMap::new();
        let mut total = 0usize;

        for entry in catalog {
            let schema = entry.def.compile()?;
            let table = tables.entry((entry.state, entry.direction)).or_default();

            if let Some(existing) = table.get(&schema.id) {
                return Err(ProtocolError::DuplicateIdentifier {
                    state: entry.state,
                    direction: entry.direction,
                    id: schema.id,
                    first: existing.name,
                    second: schema.name,
                });
            }

            table.insert(schema.id, Arc::new(schema));
            total += 1;
        }

        debug!(packets = total, tables = tables.len(), "packet registry built");

        Ok(Self { tables })
    }

    /// Resolve an identifier to its packet schema.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NotRegistered`] if the table has no such
    /// identifier. That error is recoverable by design: the caller owns
    /// the decision to skip the body or drop the connection.
    pub fn resolve(
        &self,
        state: ProtocolState,
        direction: Direction,
        id: i32,
    ) -> Result<&Arc<PacketSchema>> {
        self.tables
            .get(&(state, direction))
            .and_then(|table| table.get(&id))
            .ok_or(ProtocolError::NotRegistered {
                state,
                direction,
                id,
            })
    }

    /// Look up a packet schema by name, for encode-side construction.
    #[must_use]
    pub fn by_name(
        &self,
        state: ProtocolState,
        direction: Direction,
        name: &str,
    ) -> Option<&Arc<PacketSchema>> {
        self.tables
            .get(&(state, direction))
            .and_then(|table| table.values().find(|schema| schema.name == name))
    }

    /// Iterate every registered (state, direction, schema) triple, in
    /// no particular order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (ProtocolState, Direction, &Arc<PacketSchema>)> {
        self.tables.iter().flat_map(|(&(state, direction), table)| {
            table.values().map(move |schema| (state, direction, schema))
        })
    }

    /// Number of packets registered across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    /// Whether the registry holds no packets at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
