//! Vertex buffer writer.

use crate::buffer::{encode_byte, encode_half};
use crate::error::{Result, SrtError};
use crate::layout::VertexDecl;
use crate::registry;
use crate::types::{ChannelData, GeometryFlags, VertexFormat, VertexProperty};

/// Serialize named per-vertex arrays into the interleaved byte layout.
///
/// Every channel the declaration lays out must be present in `data` with
/// exactly `vertex_count * component_count` values; anything else is a
/// [`MissingChannelData`](SrtError::MissingChannelData) error. Substituting
/// zero-filled defaults for absent channels is the caller's decision, not
/// the writer's.
///
/// When `flags.grass` is set, every geometry-type-hint value is written as
/// the constant 1.0 regardless of the source array.
pub fn write_vertex_buffer(
    decl: &VertexDecl,
    data: &ChannelData,
    vertex_count: usize,
    flags: GeometryFlags,
) -> Result<Vec<u8>> {
    let stride = decl.stride() as usize;
    let mut bytes = vec![0u8; vertex_count * stride];

    // Bind each laid-out component to its source array up front so the
    // per-vertex loop is straight-line.
    struct Bound<'a> {
        values: &'a [f32],
        component_count: usize,
        component: usize,
        offset: usize,
        format: VertexFormat,
        property: VertexProperty,
    }

    let mut bound = Vec::new();
    for entry in decl.assigned_entries() {
        let component_count = registry::component_count(entry.property) as usize;
        let expected = vertex_count * component_count;
        let values = data
            .get(entry.property)
            .filter(|v| v.len() == expected)
            .ok_or_else(|| SrtError::MissingChannelData {
                property: entry.property,
                expected,
                actual: data.get(entry.property).map_or(0, <[f32]>::len),
            })?;
        let component = entry.component.index().ok_or_else(|| {
            SrtError::Import(format!(
                "layout entry for {:?} has no addressable component",
                entry.property
            ))
        })?;
        bound.push(Bound {
            values,
            component_count,
            component,
            offset: entry.offset as usize,
            format: entry.format,
            property: entry.property,
        });
    }

    let grass_hint = flags.grass;
    for vertex in 0..vertex_count {
        let base = vertex * stride;
        for b in &bound {
            let mut value = b.values[vertex * b.component_count + b.component];
            if grass_hint && b.property == VertexProperty::GeometryTypeHint {
                value = 1.0;
            }
            match b.format {
                VertexFormat::HalfFloat => {
                    bytes[base + b.offset..base + b.offset + 2]
                        .copy_from_slice(&encode_half(value));
                }
                VertexFormat::Byte => {
                    bytes[base + b.offset] = encode_byte(b.property, value);
                }
                VertexFormat::Unassigned => {
                    return Err(SrtError::Import(format!(
                        "layout entry for {:?} has no format",
                        b.property
                    )))
                }
            }
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::pack_layout;
    use crate::resolver::resolve_channels;

    fn filled(vertex_count: usize, component_count: usize, scale: f32) -> Vec<f32> {
        (0..vertex_count * component_count)
            .map(|i| i as f32 * scale)
            .collect()
    }

    fn branch_data(vertex_count: usize) -> ChannelData {
        let mut data = ChannelData::new();
        for property in [
            VertexProperty::Position,
            VertexProperty::LodPosition,
            VertexProperty::DiffuseTexcoords,
            VertexProperty::GeometryTypeHint,
            VertexProperty::BranchSeamDiffuse,
            VertexProperty::WindBranchData,
            VertexProperty::BranchSeamDetail,
            VertexProperty::DetailTexcoords,
        ] {
            let n = registry::component_count(property) as usize;
            data.insert(property, filled(vertex_count, n, 0.25));
        }
        data.insert(VertexProperty::Normal, vec![0.0; vertex_count * 3]);
        data.insert(VertexProperty::AmbientOcclusion, vec![0.5; vertex_count]);
        data.insert(VertexProperty::Tangent, vec![1.0; vertex_count * 3]);
        data
    }

    #[test]
    fn test_buffer_size_is_count_times_stride() {
        let flags = GeometryFlags::new().with_branches();
        let decl = pack_layout(&resolve_channels(flags)).unwrap();
        let bytes = write_vertex_buffer(&decl, &branch_data(5), 5, flags).unwrap();
        assert_eq!(bytes.len(), 5 * decl.stride() as usize);
    }

    #[test]
    fn test_component_bytes_land_at_layout_offsets() {
        let flags = GeometryFlags::new().with_branches();
        let decl = pack_layout(&resolve_channels(flags)).unwrap();

        let mut data = branch_data(2);
        data.insert(VertexProperty::Position, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let bytes = write_vertex_buffer(&decl, &data, 2, flags).unwrap();

        let stride = decl.stride() as usize;
        // Vertex 1's position y lives at stride + offset 2.
        let half = u16::from_le_bytes([bytes[stride + 2], bytes[stride + 3]]);
        assert_eq!(half::f16::from_bits(half).to_f32(), 5.0);
        // Tangent 1.0 maps to 255 in the byte block (offset 44).
        assert_eq!(bytes[44], 255);
        assert_eq!(bytes[stride + 44], 255);
    }

    #[test]
    fn test_missing_channel_is_an_error() {
        let flags = GeometryFlags::new().with_branches();
        let decl = pack_layout(&resolve_channels(flags)).unwrap();

        let mut data = branch_data(3);
        data.remove(VertexProperty::WindBranchData);

        let err = write_vertex_buffer(&decl, &data, 3, flags).unwrap_err();
        match err {
            SrtError::MissingChannelData {
                property,
                expected,
                actual,
            } => {
                assert_eq!(property, VertexProperty::WindBranchData);
                assert_eq!(expected, 12);
                assert_eq!(actual, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let flags = GeometryFlags::new().with_branches();
        let decl = pack_layout(&resolve_channels(flags)).unwrap();

        let mut data = branch_data(3);
        data.insert(VertexProperty::Normal, vec![0.0; 5]);

        let err = write_vertex_buffer(&decl, &data, 3, flags).unwrap_err();
        match err {
            SrtError::MissingChannelData {
                property, actual, ..
            } => {
                assert_eq!(property, VertexProperty::Normal);
                assert_eq!(actual, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_grass_overrides_geometry_type_hint() {
        let flags = GeometryFlags::new().with_branches().with_grass();
        let decl = pack_layout(&resolve_channels(flags)).unwrap();

        let mut data = branch_data(2);
        data.insert(VertexProperty::GeometryTypeHint, vec![0.0, 3.0]);
        let bytes = write_vertex_buffer(&decl, &data, 2, flags).unwrap();

        let hint = decl
            .find(VertexProperty::GeometryTypeHint, crate::types::VertexComponent::X)
            .unwrap();
        for vertex in 0..2 {
            let at = vertex * decl.stride() as usize + hint.offset as usize;
            let half = u16::from_le_bytes([bytes[at], bytes[at + 1]]);
            assert_eq!(half::f16::from_bits(half).to_f32(), 1.0);
        }
    }
}
