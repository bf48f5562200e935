//! Vertex declaration layout.
//!
//! A [`VertexDecl`] is the engine-facing description of one draw call's
//! interleaved vertex buffer: a fixed table of 64 layout entries (16 groups
//! of 4) plus the packed stride. The tables are fixed-size regardless of how
//! few channels are active; unused cells hold `Unassigned` sentinels, which
//! is what the engine's shader pipeline expects to find.

mod packer;
mod slots;

pub use packer::pack_layout;
pub use slots::{assign_slots, attrib_slot_index, AttribSlot, ATTRIB_SLOT_COUNT};

use crate::types::{VertexComponent, VertexFormat, VertexProperty};

/// Fixed capacity of the declaration table, in entries.
pub const DECL_CAPACITY: usize = 64;

/// One packed (property, component, offset, format) unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub property: VertexProperty,
    pub component: VertexComponent,
    /// Byte offset of this component within one vertex's slot.
    pub offset: u16,
    pub format: VertexFormat,
}

impl LayoutEntry {
    /// Padding/unused cell sentinel.
    pub const UNASSIGNED: LayoutEntry = LayoutEntry {
        property: VertexProperty::Unassigned,
        component: VertexComponent::Unassigned,
        offset: 0,
        format: VertexFormat::Unassigned,
    };

    /// Whether this entry describes a real component.
    pub fn is_assigned(&self) -> bool {
        self.property != VertexProperty::Unassigned
    }
}

/// The complete vertex declaration for one draw call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexDecl {
    entries: [LayoutEntry; DECL_CAPACITY],
    stride: u16,
}

impl VertexDecl {
    pub(crate) fn new(entries: [LayoutEntry; DECL_CAPACITY], stride: u16) -> Self {
        Self { entries, stride }
    }

    /// All 64 entries, padding cells included.
    pub fn entries(&self) -> &[LayoutEntry; DECL_CAPACITY] {
        &self.entries
    }

    /// Only the entries that describe real components.
    pub fn assigned_entries(&self) -> impl Iterator<Item = &LayoutEntry> {
        self.entries.iter().filter(|e| e.is_assigned())
    }

    /// Bytes per vertex in the packed buffer.
    pub fn stride(&self) -> u16 {
        self.stride
    }

    /// The entry for a specific property component, if laid out.
    pub fn find(&self, property: VertexProperty, component: VertexComponent) -> Option<&LayoutEntry> {
        self.entries
            .iter()
            .find(|e| e.property == property && e.component == component)
    }

    /// Whether a property has any laid-out component.
    pub fn contains(&self, property: VertexProperty) -> bool {
        self.entries.iter().any(|e| e.property == property)
    }

    /// The 16 four-wide property groups, in table order.
    pub fn property_groups(&self) -> impl Iterator<Item = &[LayoutEntry]> {
        self.entries.chunks_exact(4)
    }
}
