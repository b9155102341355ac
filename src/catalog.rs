//! The vanilla packet catalog.
//!
//! Static schema data for the serverbound Status and Play tables. This
//! is plain data consumed by [`PacketRegistry::new`]; the engine has no
//! knowledge of any packet listed here, and extending the catalog never
//! requires an interpreter change.

use crate::error::Result;
use crate::registry::{CatalogEntry, Direction, PacketRegistry, ProtocolState};
use crate::schema::{FieldKind, LengthPolicy, PacketDef};

use FieldKind::{Bool, ByteArray, F32, F64, I16, I64, ItemStack, Position, String, VarInt, Uuid, U8};

/// The serverbound Status table.
#[must_use]
pub fn status_serverbound() -> Vec<CatalogEntry> {
    let defs = vec![
        // Signals the server to send its status response.
        PacketDef::new("StatusRequest", 0x00),
        // Latency probe; the server echoes the timestamp back.
        PacketDef::new("StatusPing", 0x01).field("Time", I64),
    ];

    defs.into_iter()
        .map(|def| CatalogEntry::new(ProtocolState::Status, Direction::Serverbound, def))
        .collect()
}

/// The serverbound Play table.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn play_serverbound() -> Vec<CatalogEntry> {
    let defs = vec![
        PacketDef::new("TeleportConfirm", 0x00).field("TeleportID", VarInt),
        // Tab completion in the chat box; the target position rides
        // along only when the player is looking at a block.
        PacketDef::new("TabComplete", 0x01)
            .field("Text", String)
            .field("AssumeCommand", Bool)
            .field("HasTarget", Bool)
            .field_when("Target", Position, ".HasTarget==true"),
        PacketDef::new("ChatMessage", 0x02).field("Message", String),
        PacketDef::new("ClientStatus", 0x03).field("ActionID", VarInt),
        PacketDef::new("ClientSettings", 0x04)
            .field("Locale", String)
            .field("ViewDistance", U8)
            .field("ChatMode", U8)
            .field("ChatColors", Bool)
            .field("DisplayedSkinParts", U8)
            .field("MainHand", VarInt),
        PacketDef::new("ConfirmTransaction", 0x05)
            .field("ID", U8)
            .field("ActionNumber", I16)
            .field("Accepted", Bool),
        PacketDef::new("EnchantItem", 0x06)
            .field("ID", U8)
            .field("Enchantment", U8),
        PacketDef::new("ClickWindow", 0x07)
            .field("ID", U8)
            .field("Slot", I16)
            .field("Button", U8)
            .field("ActionNumber", I16)
            .field("Mode", U8)
            .raw_field("ClickedItem", ItemStack),
        PacketDef::new("CloseWindow", 0x08).field("ID", U8),
        // Custom plugin channels; the payload is whatever is left of
        // the packet body.
        PacketDef::new("PluginMessage", 0x09)
            .field("Channel", String)
            .field("Data", ByteArray(LengthPolicy::Remaining)),
        // Interact (Type 0), attack (Type 1) or interact-at (Type 2).
        PacketDef::new("UseEntity", 0x0A)
            .field("TargetID", VarInt)
            .field("Type", VarInt)
            .field_when("TargetX", F32, ".Type==2")
            .field_when("TargetY", F32, ".Type==2")
            .field_when("TargetZ", F32, ".Type==2")
            .field_when("Hand", VarInt, ".Type==0 .Type==2"),
        PacketDef::new("KeepAlive", 0x0B).field("ID", I64),
        PacketDef::new("Player", 0x0C).field("OnGround", Bool),
        PacketDef::new("PlayerPosition", 0x0D)
            .field("X", F64)
            .field("Y", F64)
            .field("Z", F64)
            .field("OnGround", Bool),
        PacketDef::new("PlayerPositionLook", 0x0E)
            .field("X", F64)
            .field("Y", F64)
            .field("Z", F64)
            .field("Yaw", F32)
            .field("Pitch", F32)
            .field("OnGround", Bool),
        PacketDef::new("PlayerLook", 0x0F)
            .field("Yaw", F32)
            .field("Pitch", F32)
            .field("OnGround", Bool),
        PacketDef::new("PlayerVehicleMove", 0x10)
            .field("X", F64)
            .field("Y", F64)
            .field("Z", F64)
            .field("Yaw", F32)
            .field("Pitch", F32),
        PacketDef::new("SteerBoat", 0x11)
            .field("LeftPaddle", Bool)
            .field("RightPaddle", Bool),
        PacketDef::new("CraftRecipeRequest", 0x12)
            .field("WindowID", U8)
            .field("RecipeID", VarInt)
            .field("MakeAll", Bool),
        PacketDef::new("ClientAbilities", 0x13)
            .field("Flags", U8)
            .field("FlyingSpeed", F32)
            .field("WalkingSpeed", F32),
        PacketDef::new("PlayerDigging", 0x14)
            .field("Status", U8)
            .field("Location", Position)
            .field("Face", U8),
        PacketDef::new("PlayerAction", 0x15)
            .field("EntityID", VarInt)
            .field("ActionID", VarInt)
            .field("JumpBoost", VarInt),
        PacketDef::new("SteerVehicle", 0x16)
            .field("Sideways", F32)
            .field("Forward", F32)
            .field("Flags", U8),
        // Type 0 displays a recipe, type 1 updates the book's state.
        PacketDef::new("CraftingBookData", 0x17)
            .field("Type", VarInt)
            .field_when("RecipeID", F32, ".Type==0")
            .field_when("CraftingBookOpen", Bool, ".Type==1")
            .field_when("CraftingBookFilter", Bool, ".Type==1"),
        PacketDef::new("ResourcePackStatus", 0x18).field("Result", VarInt),
        PacketDef::new("AdvancementTab", 0x19)
            .field("Action", VarInt)
            .field_when("TabID", VarInt, ".Action==0"),
        PacketDef::new("HeldItemChange", 0x1A).field("Slot", I16),
        PacketDef::new("CreativeInventoryAction", 0x1B)
            .field("Slot", I16)
            .raw_field("ClickedItem", ItemStack),
        PacketDef::new("SetSign", 0x1C)
            .field("Location", Position)
            .field("Line1", String)
            .field("Line2", String)
            .field("Line3", String)
            .field("Line4", String),
        PacketDef::new("ArmSwing", 0x1D).field("Hand", VarInt),
        PacketDef::new("SpectateTeleport", 0x1E).raw_field("Target", Uuid),
        PacketDef::new("PlayerBlockPlacement", 0x1F)
            .field("Location", Position)
            .field("Face", VarInt)
            .field("Hand", VarInt)
            .field("CursorX", F32)
            .field("CursorY", F32)
            .field("CursorZ", F32),
        PacketDef::new("UseItem", 0x20).field("Hand", VarInt),
    ];

    defs.into_iter()
        .map(|def| CatalogEntry::new(ProtocolState::Play, Direction::Serverbound, def))
        .collect()
}

/// Every table in the catalog.
#[must_use]
pub fn vanilla_catalog() -> Vec<CatalogEntry> {
    let mut entries = status_serverbound();
    entries.extend(play_serverbound());
    entries
}

/// Build a registry over the whole vanilla catalog.
///
/// # Errors
///
/// Returns an error if the catalog violates a registry invariant, which
/// would be a bug in this module.
pub fn vanilla_registry() -> Result<PacketRegistry> {
    PacketRegistry::new(vanilla_catalog())
}
