//! SRT JSON document model.
//!
//! Serde mapping of the engine's JSON dump. Enum-valued cells are carried as
//! the engine's identifier strings (`VERTEX_PROPERTY_*`, `VERTEX_FORMAT_*`,
//! `VERTEX_COMPONENT_*`); parsing an unrecognized identifier is a schema
//! mismatch and fails the whole import. The declaration tables are fixed
//! size on the wire exactly as in memory: 16 four-wide property groups and
//! 19 attribute slots, with unassigned cells spelled out.

use crate::error::{Result, SrtError};
use crate::layout::{
    assign_slots, AttribSlot, LayoutEntry, VertexDecl, ATTRIB_SLOT_COUNT, DECL_CAPACITY,
};
use crate::types::{GeometryFlags, VertexComponent, VertexFormat, VertexProperty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A whole dumped asset: one entry per draw call, in draw-call order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrtDocument {
    #[serde(rename = "DrawCalls")]
    pub draw_calls: Vec<SJsonDrawCall>,
}

/// One draw call of the dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SJsonDrawCall {
    #[serde(rename = "RenderState")]
    pub render_state: SRenderState,
    #[serde(rename = "VertexCount")]
    pub vertex_count: u32,
    #[serde(rename = "IndexCount")]
    pub index_count: u32,
    /// Axis-aligned bounds of the draw call's positions.
    #[serde(rename = "Extents", skip_serializing_if = "Option::is_none", default)]
    pub extents: Option<SExtents>,
    /// JSON-dump payload variant: one named-array map per vertex. Absent
    /// when the payload travels as an external binary buffer.
    #[serde(rename = "Vertices", skip_serializing_if = "Option::is_none", default)]
    pub vertices: Option<Vec<BTreeMap<String, Vec<f32>>>>,
    /// Triangle indices, passed through untouched.
    #[serde(rename = "Indices", skip_serializing_if = "Vec::is_empty", default)]
    pub indices: Vec<u32>,
}

/// Geometry-class flags plus the vertex declaration, as the engine nests
/// them under each draw call's render state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SRenderState {
    #[serde(rename = "BranchesPresent")]
    pub branches_present: bool,
    #[serde(rename = "FrondsPresent")]
    pub fronds_present: bool,
    #[serde(rename = "LeavesPresent")]
    pub leaves_present: bool,
    #[serde(rename = "FacingLeavesPresent")]
    pub facing_leaves_present: bool,
    #[serde(rename = "RigidMeshesPresent")]
    pub rigid_meshes_present: bool,
    #[serde(rename = "UsedAsGrass")]
    pub used_as_grass: bool,
    #[serde(rename = "SVertexDecl")]
    pub vertex_decl: SVertexDecl,
}

impl SRenderState {
    pub fn flags(&self) -> GeometryFlags {
        GeometryFlags {
            branches: self.branches_present,
            fronds: self.fronds_present,
            leaves: self.leaves_present,
            facing_leaves: self.facing_leaves_present,
            rigid_meshes: self.rigid_meshes_present,
            grass: self.used_as_grass,
        }
    }

    pub fn from_flags(flags: GeometryFlags, vertex_decl: SVertexDecl) -> Self {
        Self {
            branches_present: flags.branches,
            fronds_present: flags.fronds,
            leaves_present: flags.leaves,
            facing_leaves_present: flags.facing_leaves,
            rigid_meshes_present: flags.rigid_meshes,
            used_as_grass: flags.grass,
            vertex_decl,
        }
    }
}

/// The vertex declaration tables as dumped by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SVertexDecl {
    /// Final packed stride in bytes.
    #[serde(rename = "size")]
    pub size: u16,
    /// The 19 attribute slots.
    #[serde(rename = "AsAttributes")]
    pub as_attributes: Vec<SAttrib>,
    /// The 64-entry layout table in 16 four-wide rows.
    #[serde(rename = "AsProperties")]
    pub as_properties: Vec<[SProperty; 4]>,
}

/// One attribute slot row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SAttrib {
    #[serde(rename = "format")]
    pub format: String,
    #[serde(rename = "properties")]
    pub properties: [String; 4],
    #[serde(rename = "components")]
    pub components: [String; 4],
    #[serde(rename = "offsets")]
    pub offsets: [u16; 4],
}

/// One layout table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SProperty {
    #[serde(rename = "property")]
    pub property: String,
    #[serde(rename = "component")]
    pub component: String,
    #[serde(rename = "offset")]
    pub offset: u16,
    #[serde(rename = "format")]
    pub format: String,
}

/// Axis-aligned bounding box on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SExtents {
    #[serde(rename = "Min")]
    pub min: [f32; 3],
    #[serde(rename = "Max")]
    pub max: [f32; 3],
}

fn parse_property(s: &str) -> Result<VertexProperty> {
    VertexProperty::from_str(s).ok_or_else(|| SrtError::UnknownSemanticChannel(s.to_string()))
}

fn parse_component(s: &str) -> Result<VertexComponent> {
    VertexComponent::from_str(s).ok_or_else(|| SrtError::UnknownSemanticChannel(s.to_string()))
}

fn parse_format(s: &str) -> Result<VertexFormat> {
    VertexFormat::from_str(s).ok_or_else(|| SrtError::UnknownSemanticChannel(s.to_string()))
}

impl SVertexDecl {
    /// Dump a declaration and its slot table to the wire form.
    pub fn from_decl(decl: &VertexDecl, slots: &[AttribSlot; ATTRIB_SLOT_COUNT]) -> Self {
        let as_attributes = slots
            .iter()
            .map(|slot| SAttrib {
                format: slot.format.as_str().to_string(),
                properties: slot.properties.map(|p| p.as_str().to_string()),
                components: slot.components.map(|c| c.as_str().to_string()),
                offsets: slot.offsets,
            })
            .collect();

        let as_properties = decl
            .property_groups()
            .map(|group| {
                [0, 1, 2, 3].map(|i| {
                    let entry = &group[i];
                    SProperty {
                        property: entry.property.as_str().to_string(),
                        component: entry.component.as_str().to_string(),
                        offset: entry.offset,
                        format: entry.format.as_str().to_string(),
                    }
                })
            })
            .collect();

        Self {
            size: decl.stride(),
            as_attributes,
            as_properties,
        }
    }

    /// Reconstruct the in-memory declaration from the wire form.
    ///
    /// The attribute table is not read back: it is derivable from the layout
    /// table, and re-deriving it guarantees the two stay consistent.
    pub fn to_decl(&self) -> Result<VertexDecl> {
        if self.as_properties.len() != DECL_CAPACITY / 4 {
            return Err(SrtError::Import(format!(
                "AsProperties has {} rows, expected {}",
                self.as_properties.len(),
                DECL_CAPACITY / 4
            )));
        }

        let mut entries = [LayoutEntry::UNASSIGNED; DECL_CAPACITY];
        for (row, group) in self.as_properties.iter().enumerate() {
            for (cell, wire) in group.iter().enumerate() {
                entries[row * 4 + cell] = LayoutEntry {
                    property: parse_property(&wire.property)?,
                    component: parse_component(&wire.component)?,
                    offset: wire.offset,
                    format: parse_format(&wire.format)?,
                };
            }
        }

        Ok(VertexDecl::new(entries, self.size))
    }

    /// Re-derive the slot table from the layout table.
    pub fn to_slots(&self) -> Result<[AttribSlot; ATTRIB_SLOT_COUNT]> {
        Ok(assign_slots(&self.to_decl()?))
    }
}
