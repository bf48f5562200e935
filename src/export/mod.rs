//! Draw-call export: host mesh arrays to the SRT interchange form.
//!
//! Each draw call runs the same pipeline: resolve active channels from its
//! geometry flags, pack the layout, assign attribute slots, then serialize
//! the vertex data. Draw calls are independent (nothing is cached or shared
//! between them except the read-only channel registry) and results are
//! written into an index-addressed output vector, so output order always
//! matches input enumeration order.

use crate::buffer::write_vertex_buffer;
use crate::error::{Result, SrtError};
use crate::layout::{assign_slots, pack_layout, AttribSlot, VertexDecl, ATTRIB_SLOT_COUNT};
use crate::registry;
use crate::resolver::resolve_channels;
use crate::srt::{SExtents, SJsonDrawCall, SRenderState, SVertexDecl, SrtDocument};
use crate::types::{ChannelData, DrawCall, Extents, VertexProperty};
use std::collections::BTreeMap;

/// How the packer treats a resolved-active channel with no usable source
/// array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingChannelPolicy {
    /// Substitute a zero-filled array and report a warning (default).
    ZeroFill,
    /// Fail the draw call with `MissingChannelData`.
    Strict,
}

/// Packer configuration.
#[derive(Debug, Clone)]
pub struct PackerConfig {
    pub missing_channels: MissingChannelPolicy,
    /// Emit the per-vertex named arrays into the document (the JSON-dump
    /// payload variant). When off, only the declaration tables travel and
    /// the byte payload is left to the external converter.
    pub emit_vertices: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            missing_channels: MissingChannelPolicy::ZeroFill,
            emit_vertices: true,
        }
    }
}

/// A channel that was zero-filled during packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackWarning {
    pub draw_call: usize,
    pub property: VertexProperty,
}

/// One packed draw call.
#[derive(Debug, Clone)]
pub struct PackedDrawCall {
    pub decl: VertexDecl,
    pub slots: [AttribSlot; ATTRIB_SLOT_COUNT],
    /// The interleaved vertex buffer, `vertex_count * stride` bytes.
    pub buffer: Vec<u8>,
    /// The (possibly zero-filled) source arrays the buffer was written from.
    pub channels: ChannelData,
    pub extents: Option<Extents>,
}

/// Everything produced for one asset.
#[derive(Debug, Clone)]
pub struct PackReport {
    pub draw_calls: Vec<PackedDrawCall>,
    pub warnings: Vec<PackWarning>,
}

/// The main packer.
pub struct SrtPacker {
    config: PackerConfig,
}

impl Default for SrtPacker {
    fn default() -> Self {
        Self::new()
    }
}

impl SrtPacker {
    /// Create a packer with the default configuration.
    pub fn new() -> Self {
        Self {
            config: PackerConfig::default(),
        }
    }

    /// Create a packer with a custom configuration.
    pub fn with_config(config: PackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PackerConfig {
        &self.config
    }

    /// Pack a single draw call.
    ///
    /// Returns the packed result plus the channels that had to be
    /// zero-filled (empty under [`MissingChannelPolicy::Strict`], which
    /// errors instead).
    pub fn pack_draw_call(&self, call: &DrawCall) -> Result<(PackedDrawCall, Vec<VertexProperty>)> {
        let channels = resolve_channels(call.flags);
        let decl = pack_layout(&channels)?;
        let slots = assign_slots(&decl);

        let vertex_count = call.vertex_count as usize;
        let mut data = call.channels.clone();
        let mut zero_filled = Vec::new();

        for property in registry::ALL_PROPERTIES {
            if !decl.contains(property) {
                continue;
            }
            let expected = vertex_count * registry::component_count(property) as usize;
            let usable = data.get(property).is_some_and(|v| v.len() == expected);
            if usable {
                continue;
            }
            match self.config.missing_channels {
                MissingChannelPolicy::Strict => {
                    return Err(SrtError::MissingChannelData {
                        property,
                        expected,
                        actual: data.get(property).map_or(0, <[f32]>::len),
                    });
                }
                MissingChannelPolicy::ZeroFill => {
                    log::warn!("zero-filling missing channel {property:?}");
                    data.insert(property, vec![0.0; expected]);
                    zero_filled.push(property);
                }
            }
        }

        let buffer = write_vertex_buffer(&decl, &data, vertex_count, call.flags)?;
        let extents = data
            .get(VertexProperty::Position)
            .and_then(Extents::from_positions);

        Ok((
            PackedDrawCall {
                decl,
                slots,
                buffer,
                channels: data,
                extents,
            },
            zero_filled,
        ))
    }

    /// Pack every draw call of an asset, in input order.
    ///
    /// Fatal errors carry the index of the draw call that failed.
    pub fn pack(&self, calls: &[DrawCall]) -> Result<PackReport> {
        let mut draw_calls = Vec::with_capacity(calls.len());
        let mut warnings = Vec::new();

        for (index, call) in calls.iter().enumerate() {
            let (packed, zero_filled) = self
                .pack_draw_call(call)
                .map_err(|e| e.for_draw_call(index))?;
            warnings.extend(zero_filled.into_iter().map(|property| PackWarning {
                draw_call: index,
                property,
            }));
            draw_calls.push(packed);
        }

        Ok(PackReport {
            draw_calls,
            warnings,
        })
    }

    /// Pack an asset and build the interchange document.
    pub fn export_document(&self, calls: &[DrawCall]) -> Result<SrtDocument> {
        if calls.is_empty() {
            return Err(SrtError::Export("cannot export empty asset".to_string()));
        }
        let report = self.pack(calls)?;

        let draw_calls = calls
            .iter()
            .zip(&report.draw_calls)
            .map(|(call, packed)| {
                let wire_decl = SVertexDecl::from_decl(&packed.decl, &packed.slots);
                SJsonDrawCall {
                    render_state: SRenderState::from_flags(call.flags, wire_decl),
                    vertex_count: call.vertex_count,
                    index_count: call.indices.len() as u32,
                    extents: packed.extents.map(|e| SExtents {
                        min: e.min,
                        max: e.max,
                    }),
                    vertices: self
                        .config
                        .emit_vertices
                        .then(|| dump_vertices(&packed.decl, &packed.channels, call.vertex_count)),
                    indices: call.indices.clone(),
                }
            })
            .collect();

        Ok(SrtDocument { draw_calls })
    }

    /// Pack an asset straight to its JSON text form.
    pub fn export_json(&self, calls: &[DrawCall]) -> Result<String> {
        let document = self.export_document(calls)?;
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

/// Build the JSON-dump payload: one named-array map per vertex, covering
/// exactly the channels the declaration lays out.
fn dump_vertices(
    decl: &VertexDecl,
    data: &ChannelData,
    vertex_count: u32,
) -> Vec<BTreeMap<String, Vec<f32>>> {
    (0..vertex_count as usize)
        .map(|vertex| {
            let mut row = BTreeMap::new();
            for property in registry::ALL_PROPERTIES {
                if !decl.contains(property) {
                    continue;
                }
                if let Some(values) = data.vertex_values(property, vertex) {
                    row.insert(property.as_str().to_string(), values.to_vec());
                }
            }
            row
        })
        .collect()
}
