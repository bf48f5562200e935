//! # SRT Mesher
//!
//! A Rust library for exchanging tree meshes with the SRT runtime format.
//!
//! ## Overview
//!
//! The heart of the library is the vertex declaration pipeline: given a draw
//! call's geometry-class flags, it decides which per-vertex semantic
//! channels exist, packs them into an interleaved layout with fixed-size
//! declaration tables, and serializes the vertex data. The same layout
//! computation runs on import, so the engine's shader pipeline sees
//! bit-identical tables either way.
//!
//! ## Quick Start
//!
//! ```ignore
//! use srt_mesher::{DrawCall, GeometryFlags, SrtPacker, import_json};
//!
//! // Describe a draw call: flags, counts and named per-vertex arrays
//! let call = DrawCall {
//!     flags: GeometryFlags::new().with_branches(),
//!     vertex_count: 3,
//!     channels: my_channels,
//!     indices: vec![0, 1, 2],
//! };
//!
//! // Export to the SRT JSON interchange form
//! let json = SrtPacker::new().export_json(&[call])?;
//!
//! // ... and read it back
//! let draw_calls = import_json(&json)?;
//! ```
//!
//! ## Pipeline
//!
//! Export runs presence resolution, layout packing, attribute slot
//! assignment and buffer writing in that order; import reads the stored
//! declaration and mirrors the buffer decoding. Every draw call is computed independently
//! from only its own inputs, so callers may parallelize over draw calls as
//! long as results keep their input order.

pub mod buffer;
pub mod error;
pub mod export;
pub mod import;
pub mod layout;
pub mod registry;
pub mod resolver;
pub mod srt;
pub mod types;

// Re-export main types for convenience
pub use buffer::{read_vertex_buffer, write_vertex_buffer};
pub use error::{Result, SrtError};
pub use export::{
    MissingChannelPolicy, PackReport, PackWarning, PackedDrawCall, PackerConfig, SrtPacker,
};
pub use import::{
    import_document, import_json, unpack_draw_call, unpack_vertex_bytes, UnpackedDrawCall,
};
pub use layout::{
    assign_slots, pack_layout, AttribSlot, LayoutEntry, VertexDecl, ATTRIB_SLOT_COUNT,
    DECL_CAPACITY,
};
pub use resolver::{resolve_channels, ActiveChannel, ChannelVariant};
pub use srt::{SJsonDrawCall, SRenderState, SVertexDecl, SrtDocument};
pub use types::{
    ChannelData, DrawCall, Extents, GeometryFlags, VertexComponent, VertexFormat, VertexProperty,
};

/// Compute the vertex declaration for a set of geometry-class flags.
///
/// Convenience over resolve + pack for callers that only need the tables.
pub fn vertex_decl_for(flags: GeometryFlags) -> Result<VertexDecl> {
    pack_layout(&resolve_channels(flags))
}

/// Read an SRT JSON document from a file path.
pub fn import_file<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<UnpackedDrawCall>> {
    let json = std::fs::read_to_string(path)?;
    import_json(&json)
}

/// Pack draw calls and write the SRT JSON document to a file path.
pub fn export_file<P: AsRef<std::path::Path>>(path: P, calls: &[DrawCall]) -> Result<()> {
    let json = SrtPacker::new().export_json(calls)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_decl_for() {
        let decl = vertex_decl_for(GeometryFlags::new().with_branches()).unwrap();
        assert_eq!(decl.stride(), 48);
        assert!(decl.contains(VertexProperty::BranchSeamDiffuse));
    }

    #[test]
    fn test_file_round_trip() {
        let mut channels = ChannelData::new();
        let flags = GeometryFlags::new();
        let decl = vertex_decl_for(flags).unwrap();
        for property in registry::ALL_PROPERTIES {
            if decl.contains(property) {
                let n = registry::component_count(property) as usize;
                channels.insert(property, vec![0.25; 3 * n]);
            }
        }
        let call = DrawCall {
            flags,
            vertex_count: 3,
            channels,
            indices: vec![0, 1, 2],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.srt.json");
        export_file(&path, &[call]).unwrap();

        let back = import_file(&path).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].vertex_count, 3);
        assert_eq!(back[0].decl, decl);

        // A missing file surfaces as an I/O error, not a panic.
        assert!(matches!(
            import_file(dir.path().join("absent.json")),
            Err(SrtError::Io(_))
        ));
    }
}
