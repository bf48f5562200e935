//! Draw-call import: the SRT interchange form back to host mesh arrays.
//!
//! Import trusts the declaration stored in the document, since that is what
//! the buffer was written with, but cross-checks it against what the resolver
//! would produce for the stored flags, logging a warning on divergence so
//! schema drift is visible without failing usable files.

use crate::buffer::read_vertex_buffer;
use crate::error::{Result, SrtError};
use crate::layout::{pack_layout, VertexDecl};
use crate::registry;
use crate::resolver::resolve_channels;
use crate::srt::{SJsonDrawCall, SrtDocument};
use crate::types::{ChannelData, GeometryFlags, VertexProperty};

/// One draw call read back from an SRT document.
#[derive(Debug, Clone)]
pub struct UnpackedDrawCall {
    pub flags: GeometryFlags,
    pub vertex_count: u32,
    pub index_count: u32,
    pub decl: VertexDecl,
    /// Named per-vertex arrays, when the document carried a payload.
    pub channels: ChannelData,
    pub indices: Vec<u32>,
}

/// Parse a whole SRT JSON document text.
pub fn import_json(json: &str) -> Result<Vec<UnpackedDrawCall>> {
    let document: SrtDocument = serde_json::from_str(json)?;
    import_document(&document)
}

/// Unpack every draw call of a parsed document, in document order.
pub fn import_document(document: &SrtDocument) -> Result<Vec<UnpackedDrawCall>> {
    document
        .draw_calls
        .iter()
        .enumerate()
        .map(|(index, call)| unpack_draw_call(call).map_err(|e| e.for_draw_call(index)))
        .collect()
}

/// Unpack one draw call from its wire form.
pub fn unpack_draw_call(call: &SJsonDrawCall) -> Result<UnpackedDrawCall> {
    let flags = call.render_state.flags();
    let decl = call.render_state.vertex_decl.to_decl()?;

    if let Ok(expected) = pack_layout(&resolve_channels(flags)) {
        if expected != decl {
            log::warn!(
                "stored declaration diverges from the one resolved for {flags:?}; \
                 trusting the stored tables"
            );
        }
    }

    let channels = match &call.vertices {
        Some(vertices) => parse_vertices(&decl, vertices, call.vertex_count)?,
        None => ChannelData::new(),
    };

    Ok(UnpackedDrawCall {
        flags,
        vertex_count: call.vertex_count,
        index_count: call.index_count,
        decl,
        channels,
        indices: call.indices.clone(),
    })
}

/// Unpack a draw call whose payload travels as an interleaved binary buffer
/// (the variant handled by the external converter executable).
pub fn unpack_vertex_bytes(call: &SJsonDrawCall, bytes: &[u8]) -> Result<ChannelData> {
    let decl = call.render_state.vertex_decl.to_decl()?;
    read_vertex_buffer(&decl, bytes, call.vertex_count as usize)
}

/// Rebuild flat channel arrays from the JSON-dump per-vertex maps.
fn parse_vertices(
    decl: &VertexDecl,
    vertices: &[std::collections::BTreeMap<String, Vec<f32>>],
    vertex_count: u32,
) -> Result<ChannelData> {
    let vertex_count = vertex_count as usize;
    if vertices.len() != vertex_count {
        return Err(SrtError::Import(format!(
            "document has {} vertex rows, render state says {}",
            vertices.len(),
            vertex_count
        )));
    }

    let mut arrays: std::collections::HashMap<VertexProperty, Vec<f32>> =
        std::collections::HashMap::new();
    for property in registry::ALL_PROPERTIES {
        if decl.contains(property) {
            let n = registry::component_count(property) as usize;
            arrays.insert(property, vec![0.0; vertex_count * n]);
        }
    }

    for (vertex, row) in vertices.iter().enumerate() {
        for (name, values) in row {
            let property = VertexProperty::from_str(name)
                .ok_or_else(|| SrtError::UnknownSemanticChannel(name.clone()))?;
            let n = registry::component_count(property) as usize;
            let Some(array) = arrays.get_mut(&property) else {
                // A channel the declaration does not lay out: schema drift.
                return Err(SrtError::Import(format!(
                    "vertex {vertex} carries {name} but the declaration does not lay it out"
                )));
            };
            if values.len() != n {
                return Err(SrtError::Import(format!(
                    "vertex {vertex} has {} values for {name}, expected {n}",
                    values.len()
                )));
            }
            array[vertex * n..vertex * n + n].copy_from_slice(values);
        }
    }

    let mut data = ChannelData::new();
    for (property, values) in arrays {
        data.insert(property, values);
    }
    Ok(data)
}
