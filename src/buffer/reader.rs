//! Vertex buffer reader.

use crate::buffer::{decode_byte, decode_half};
use crate::error::{Result, SrtError};
use crate::layout::VertexDecl;
use crate::registry;
use crate::types::{ChannelData, VertexFormat};

/// Deserialize an interleaved byte buffer back into named per-vertex arrays.
///
/// The declaration must be the one the buffer was written with; the reader
/// trusts its offsets completely. Byte channels come back through the
/// documented per-channel decode rules (see the module docs for the
/// deliberate ambient-occlusion and tangent asymmetry).
pub fn read_vertex_buffer(
    decl: &VertexDecl,
    bytes: &[u8],
    vertex_count: usize,
) -> Result<ChannelData> {
    let stride = decl.stride() as usize;
    let expected = vertex_count * stride;
    if bytes.len() != expected {
        return Err(SrtError::Import(format!(
            "vertex buffer is {} bytes, expected {} ({} vertices x {} stride)",
            bytes.len(),
            expected,
            vertex_count,
            stride
        )));
    }

    let mut data = ChannelData::new();

    for property in registry::ALL_PROPERTIES {
        if !decl.contains(property) {
            continue;
        }
        let component_count = registry::component_count(property) as usize;
        let mut values = vec![0.0f32; vertex_count * component_count];

        for component in crate::types::VertexComponent::ALL.iter().take(component_count) {
            let entry = decl.find(property, *component).ok_or_else(|| {
                SrtError::Import(format!(
                    "declaration lays out {property:?} without component {component:?}"
                ))
            })?;
            let cell = component.index().expect("addressable component");
            let offset = entry.offset as usize;

            for vertex in 0..vertex_count {
                let at = vertex * stride + offset;
                values[vertex * component_count + cell] = match entry.format {
                    VertexFormat::HalfFloat => decode_half([bytes[at], bytes[at + 1]]),
                    VertexFormat::Byte => decode_byte(property, bytes[at]),
                    VertexFormat::Unassigned => {
                        return Err(SrtError::Import(format!(
                            "declaration entry for {property:?} has no format"
                        )))
                    }
                };
            }
        }

        data.insert(property, values);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::write_vertex_buffer;
    use crate::layout::pack_layout;
    use crate::resolver::resolve_channels;
    use crate::types::{GeometryFlags, VertexProperty};

    /// Deterministic pseudo-values spread over a small range.
    fn source_values(seed: usize, len: usize, lo: f32, hi: f32) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = ((seed * 31 + i * 7) % 97) as f32 / 96.0;
                lo + t * (hi - lo)
            })
            .collect()
    }

    fn full_data(flags: GeometryFlags, vertex_count: usize) -> ChannelData {
        let mut data = ChannelData::new();
        let decl = pack_layout(&resolve_channels(flags)).unwrap();
        for (seed, property) in registry::ALL_PROPERTIES.into_iter().enumerate() {
            if !decl.contains(property) {
                continue;
            }
            let n = registry::component_count(property) as usize;
            let range = match registry::format(property) {
                VertexFormat::Byte => (-1.0, 1.0),
                _ => (-8.0, 8.0),
            };
            data.insert(
                property,
                source_values(seed, vertex_count * n, range.0, range.1),
            );
        }
        // Ambient occlusion weights live in [0, 1].
        data.insert(
            VertexProperty::AmbientOcclusion,
            source_values(40, vertex_count, 0.0, 1.0),
        );
        data
    }

    #[test]
    fn test_round_trip_all_combinations() {
        let vertex_count = 4;
        for flags in GeometryFlags::all_combinations() {
            let decl = pack_layout(&resolve_channels(flags)).unwrap();
            let data = full_data(flags, vertex_count);
            let bytes = write_vertex_buffer(&decl, &data, vertex_count, flags).unwrap();
            let read = read_vertex_buffer(&decl, &bytes, vertex_count).unwrap();

            for (property, written) in data.iter() {
                let got = read.get(property).unwrap();
                assert_eq!(got.len(), written.len());

                for (w, g) in written.iter().zip(got) {
                    match property {
                        // Normals invert their byte mapping: 1/255 steps.
                        VertexProperty::Normal => {
                            assert!((g - w).abs() <= 2.0 / 255.0, "{property:?}: {w} vs {g}")
                        }
                        // Ambient occlusion comes back forward-inverted.
                        VertexProperty::AmbientOcclusion => {
                            assert!(((1.0 - w) - g).abs() <= 1.0 / 255.0, "{w} vs {g}")
                        }
                        // Tangents come back in their stored unsigned scale.
                        VertexProperty::Tangent => {
                            assert!(((w / 2.0 + 0.5) - g).abs() <= 1.0 / 255.0, "{w} vs {g}")
                        }
                        // Half floats: relative binary16 precision.
                        _ => {
                            let tolerance = w.abs().max(1.0) / 1024.0;
                            assert!((g - w).abs() <= tolerance, "{property:?}: {w} vs {g}")
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_read_reports_channel_set_of_declaration() {
        let flags = GeometryFlags::new().with_leaves();
        let decl = pack_layout(&resolve_channels(flags)).unwrap();
        let data = full_data(flags, 3);
        let bytes = write_vertex_buffer(&decl, &data, 3, flags).unwrap();
        let read = read_vertex_buffer(&decl, &bytes, 3).unwrap();

        assert_eq!(read.channel_count(), data.channel_count());
        assert!(read.contains(VertexProperty::LeafAnchorPoint));
        assert!(!read.contains(VertexProperty::BranchSeamDiffuse));
    }

    #[test]
    fn test_truncated_buffer_is_an_error() {
        let flags = GeometryFlags::new();
        let decl = pack_layout(&resolve_channels(flags)).unwrap();
        let data = full_data(flags, 2);
        let mut bytes = write_vertex_buffer(&decl, &data, 2, flags).unwrap();
        bytes.pop();

        assert!(matches!(
            read_vertex_buffer(&decl, &bytes, 2),
            Err(SrtError::Import(_))
        ));
    }
}
