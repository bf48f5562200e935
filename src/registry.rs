//! Semantic channel registry.
//!
//! Read-only lookup from channel name to component count and storage format.
//! This is the single source of truth both the layout packer and the buffer
//! codec consult; it is constant and shared freely across draw calls.

use crate::types::{VertexFormat, VertexProperty};

/// Every named channel the engine recognizes, in registry order.
///
/// Three of these (leaf-card-self-shadow-offset, bone-id,
/// lightmap-texcoords) own permanently reserved attribute slots and are
/// never activated by the presence resolver.
pub const ALL_PROPERTIES: [VertexProperty; 19] = [
    VertexProperty::Position,
    VertexProperty::LodPosition,
    VertexProperty::DiffuseTexcoords,
    VertexProperty::GeometryTypeHint,
    VertexProperty::LeafCardCorner,
    VertexProperty::LeafCardLodScalar,
    VertexProperty::LeafCardSelfShadowOffset,
    VertexProperty::WindBranchData,
    VertexProperty::WindExtraData,
    VertexProperty::WindFlags,
    VertexProperty::LeafAnchorPoint,
    VertexProperty::BoneId,
    VertexProperty::BranchSeamDiffuse,
    VertexProperty::BranchSeamDetail,
    VertexProperty::DetailTexcoords,
    VertexProperty::LightmapTexcoords,
    VertexProperty::Normal,
    VertexProperty::AmbientOcclusion,
    VertexProperty::Tangent,
];

/// Number of components (1-4) a channel carries per vertex.
pub fn component_count(property: VertexProperty) -> u8 {
    match property {
        VertexProperty::Position => 3,
        VertexProperty::LodPosition => 3,
        VertexProperty::DiffuseTexcoords => 2,
        VertexProperty::GeometryTypeHint => 1,
        VertexProperty::LeafCardCorner => 3,
        VertexProperty::LeafCardLodScalar => 1,
        VertexProperty::LeafCardSelfShadowOffset => 1,
        VertexProperty::WindBranchData => 4,
        VertexProperty::WindExtraData => 3,
        VertexProperty::WindFlags => 1,
        VertexProperty::LeafAnchorPoint => 3,
        VertexProperty::BoneId => 1,
        VertexProperty::BranchSeamDiffuse => 3,
        VertexProperty::BranchSeamDetail => 1,
        VertexProperty::DetailTexcoords => 2,
        VertexProperty::LightmapTexcoords => 2,
        VertexProperty::Normal => 3,
        VertexProperty::AmbientOcclusion => 1,
        VertexProperty::Tangent => 3,
        VertexProperty::Unassigned => 0,
    }
}

/// Storage format class of a channel.
pub fn format(property: VertexProperty) -> VertexFormat {
    match property {
        VertexProperty::Normal | VertexProperty::AmbientOcclusion | VertexProperty::Tangent => {
            VertexFormat::Byte
        }
        VertexProperty::Unassigned => VertexFormat::Unassigned,
        _ => VertexFormat::HalfFloat,
    }
}
