//! Attribute slot assignment.
//!
//! The consuming shader binds channels by slot index, not by name. Every
//! channel owns a fixed slot; a slot aggregates the channel's X/Y/Z/W layout
//! entries into one addressable binding. Slots whose channel is absent for a
//! mesh stay unassigned, and three slots (7, 12, 17) belong to channels the
//! resolver never activates, so they are permanently unassigned.

use crate::layout::VertexDecl;
use crate::registry;
use crate::types::{VertexComponent, VertexFormat, VertexProperty};

/// Number of engine-addressable attribute slots.
pub const ATTRIB_SLOT_COUNT: usize = 19;

/// Fixed slot index for a channel. `None` only for the unassigned sentinel.
pub fn attrib_slot_index(property: VertexProperty) -> Option<usize> {
    match property {
        VertexProperty::Position => Some(0),
        VertexProperty::DiffuseTexcoords => Some(1),
        VertexProperty::Normal => Some(2),
        VertexProperty::LodPosition => Some(3),
        VertexProperty::GeometryTypeHint => Some(4),
        VertexProperty::LeafCardCorner => Some(5),
        VertexProperty::LeafCardLodScalar => Some(6),
        VertexProperty::LeafCardSelfShadowOffset => Some(7),
        VertexProperty::WindBranchData => Some(8),
        VertexProperty::WindExtraData => Some(9),
        VertexProperty::WindFlags => Some(10),
        VertexProperty::LeafAnchorPoint => Some(11),
        VertexProperty::BoneId => Some(12),
        VertexProperty::BranchSeamDiffuse => Some(13),
        VertexProperty::BranchSeamDetail => Some(14),
        VertexProperty::DetailTexcoords => Some(15),
        VertexProperty::Tangent => Some(16),
        VertexProperty::LightmapTexcoords => Some(17),
        VertexProperty::AmbientOcclusion => Some(18),
        VertexProperty::Unassigned => None,
    }
}

/// One engine-addressable attribute binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribSlot {
    pub format: VertexFormat,
    pub properties: [VertexProperty; 4],
    pub components: [VertexComponent; 4],
    pub offsets: [u16; 4],
}

impl AttribSlot {
    /// Empty binding sentinel.
    pub const UNASSIGNED: AttribSlot = AttribSlot {
        format: VertexFormat::Unassigned,
        properties: [VertexProperty::Unassigned; 4],
        components: [VertexComponent::Unassigned; 4],
        offsets: [0; 4],
    };

    /// Whether any component is bound to this slot.
    pub fn is_assigned(&self) -> bool {
        self.format != VertexFormat::Unassigned
    }

    /// Number of bound component cells.
    pub fn component_count(&self) -> usize {
        self.properties
            .iter()
            .filter(|p| **p != VertexProperty::Unassigned)
            .count()
    }
}

/// Build the fixed 19-slot attribute table for a declaration.
///
/// Pure aggregation: scans the declaration for each channel's X/Y/Z/W
/// entries and records their offsets at the channel's fixed slot index.
pub fn assign_slots(decl: &VertexDecl) -> [AttribSlot; ATTRIB_SLOT_COUNT] {
    let mut slots = [AttribSlot::UNASSIGNED; ATTRIB_SLOT_COUNT];

    for property in registry::ALL_PROPERTIES {
        let Some(slot_index) = attrib_slot_index(property) else {
            continue;
        };

        let mut cell = 0;
        for component in VertexComponent::ALL {
            if let Some(entry) = decl.find(property, component) {
                let slot = &mut slots[slot_index];
                slot.format = entry.format;
                slot.properties[cell] = property;
                slot.components[cell] = component;
                slot.offsets[cell] = entry.offset;
                cell += 1;
            }
        }
    }

    slots
}
