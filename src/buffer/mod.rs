//! Interleaved vertex buffer serialization.
//!
//! The writer and reader are the two halves of one codec: both walk the same
//! [`VertexDecl`](crate::layout::VertexDecl) and therefore agree on every
//! byte offset. Half-float channels quantize through IEEE 754 binary16; byte
//! channels carry per-channel numeric remappings (normals and tangents are
//! recentered into unsigned bytes, ambient occlusion is stored inverted).
//!
//! Decoding is deliberately asymmetric for two byte channels: ambient
//! occlusion keeps its stored (inverted) scale and tangents are never
//! remapped back to signed range. Downstream consumers of the unpacked
//! arrays expect those forward-mapped values.

mod reader;
mod writer;

pub use reader::read_vertex_buffer;
pub use writer::write_vertex_buffer;

use crate::types::VertexProperty;
use half::f16;

/// Quantize one half-float component.
fn encode_half(value: f32) -> [u8; 2] {
    f16::from_f32(value).to_bits().to_le_bytes()
}

/// Expand one half-float component.
fn decode_half(bytes: [u8; 2]) -> f32 {
    f16::from_bits(u16::from_le_bytes(bytes)).to_f32()
}

/// Encode one byte-format component with its channel's remapping rule.
fn encode_byte(property: VertexProperty, value: f32) -> u8 {
    let scaled = match property {
        VertexProperty::Normal | VertexProperty::Tangent => (value / 2.0 + 0.5) * 255.0,
        VertexProperty::AmbientOcclusion => (1.0 - value) * 255.0,
        _ => value * 255.0,
    };
    scaled.round().clamp(0.0, 255.0) as u8
}

/// Decode one byte-format component.
///
/// Only normals are remapped back to [-1, 1]; ambient occlusion and tangent
/// values stay in their stored unsigned scale.
fn decode_byte(property: VertexProperty, byte: u8) -> f32 {
    let unorm = byte as f32 / 255.0;
    match property {
        VertexProperty::Normal => (unorm - 0.5) * 2.0,
        _ => unorm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_round_trip() {
        for value in [0.0f32, 1.0, -1.0, 0.5, 13.25, -1024.0] {
            let decoded = decode_half(encode_half(value));
            assert_eq!(decoded, value, "exactly representable value changed");
        }
        // Non-representable values stay within binary16 precision.
        let decoded = decode_half(encode_half(0.1));
        assert!((decoded - 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_normal_encoding() {
        assert_eq!(encode_byte(VertexProperty::Normal, -1.0), 0);
        assert_eq!(encode_byte(VertexProperty::Normal, 1.0), 255);
        assert_eq!(encode_byte(VertexProperty::Normal, 0.0), 128);
        // Out-of-range input clamps instead of wrapping.
        assert_eq!(encode_byte(VertexProperty::Normal, 2.5), 255);
        assert_eq!(encode_byte(VertexProperty::Normal, -7.0), 0);

        let decoded = decode_byte(VertexProperty::Normal, 0);
        assert_eq!(decoded, -1.0);
        let decoded = decode_byte(VertexProperty::Normal, 255);
        assert_eq!(decoded, 1.0);
    }

    #[test]
    fn test_ambient_occlusion_stays_inverted() {
        // Stored inverted: full occlusion weight writes 0, none writes 255.
        assert_eq!(encode_byte(VertexProperty::AmbientOcclusion, 1.0), 0);
        assert_eq!(encode_byte(VertexProperty::AmbientOcclusion, 0.0), 255);
        // Reading does not re-invert.
        assert_eq!(decode_byte(VertexProperty::AmbientOcclusion, 0), 0.0);
        assert_eq!(decode_byte(VertexProperty::AmbientOcclusion, 255), 1.0);
    }

    #[test]
    fn test_tangent_is_not_unmapped_on_decode() {
        let encoded = encode_byte(VertexProperty::Tangent, 1.0);
        assert_eq!(encoded, 255);
        // Forward value comes back, not the signed original.
        assert_eq!(decode_byte(VertexProperty::Tangent, encoded), 1.0);

        let encoded = encode_byte(VertexProperty::Tangent, -1.0);
        assert_eq!(decode_byte(VertexProperty::Tangent, encoded), 0.0);
    }
}
