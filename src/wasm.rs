//! WASM bindings for srt-mesher.
//!
//! This module provides JavaScript-friendly APIs for use in the browser.
//! Payloads travel as JSON strings on both sides.

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

/// Result of packing an asset.
#[wasm_bindgen]
pub struct PackResult {
    document_json: String,
    draw_call_count: usize,
    warning_count: usize,
}

#[wasm_bindgen]
impl PackResult {
    /// The SRT document as JSON text.
    #[wasm_bindgen(getter)]
    pub fn document_json(&self) -> String {
        self.document_json.clone()
    }

    /// Number of draw calls packed.
    #[wasm_bindgen(getter)]
    pub fn draw_call_count(&self) -> usize {
        self.draw_call_count
    }

    /// Number of zero-filled channels.
    #[wasm_bindgen(getter)]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }
}

/// Pack raw draw-call JSON into an SRT document.
///
/// JSON format:
/// ```json
/// {
///   "drawCalls": [
///     {
///       "branches": true,
///       "vertexCount": 3,
///       "indices": [0, 1, 2],
///       "channels": { "VERTEX_PROPERTY_POSITION": [0, 0, 0, 1, 0, 0, 0, 1, 0] }
///     }
///   ]
/// }
/// ```
#[wasm_bindgen]
pub fn pack_json(json: &str) -> Result<PackResult, JsError> {
    #[derive(serde::Deserialize)]
    struct AssetInput {
        #[serde(rename = "drawCalls")]
        draw_calls: Vec<DrawCallInput>,
    }

    #[derive(serde::Deserialize)]
    struct DrawCallInput {
        #[serde(default)]
        branches: bool,
        #[serde(default)]
        fronds: bool,
        #[serde(default)]
        leaves: bool,
        #[serde(rename = "facingLeaves", default)]
        facing_leaves: bool,
        #[serde(rename = "rigidMeshes", default)]
        rigid_meshes: bool,
        #[serde(default)]
        grass: bool,
        #[serde(rename = "vertexCount")]
        vertex_count: u32,
        #[serde(default)]
        indices: Vec<u32>,
        #[serde(default)]
        channels: std::collections::BTreeMap<String, Vec<f32>>,
    }

    let asset: AssetInput =
        serde_json::from_str(json).map_err(|e| JsError::new(&format!("Invalid JSON: {}", e)))?;

    let mut calls = Vec::with_capacity(asset.draw_calls.len());
    for input in asset.draw_calls {
        let mut channels = crate::ChannelData::new();
        for (name, values) in input.channels {
            let property = crate::VertexProperty::from_str(&name)
                .ok_or_else(|| JsError::new(&format!("unknown channel name: {}", name)))?;
            channels.insert(property, values);
        }
        calls.push(crate::DrawCall {
            flags: crate::GeometryFlags {
                branches: input.branches,
                fronds: input.fronds,
                leaves: input.leaves,
                facing_leaves: input.facing_leaves,
                rigid_meshes: input.rigid_meshes,
                grass: input.grass,
            },
            vertex_count: input.vertex_count,
            channels,
            indices: input.indices,
        });
    }

    let packer = crate::SrtPacker::new();
    let report = packer
        .pack(&calls)
        .map_err(|e| JsError::new(&e.to_string()))?;
    let document_json = packer
        .export_json(&calls)
        .map_err(|e| JsError::new(&e.to_string()))?;

    Ok(PackResult {
        document_json,
        draw_call_count: report.draw_calls.len(),
        warning_count: report.warnings.len(),
    })
}

/// Unpack an SRT document and return raw draw-call JSON.
#[wasm_bindgen]
pub fn unpack_json(json: &str) -> Result<String, JsError> {
    let draw_calls = crate::import_json(json).map_err(|e| JsError::new(&e.to_string()))?;

    #[derive(serde::Serialize)]
    struct DrawCallOutput {
        branches: bool,
        fronds: bool,
        leaves: bool,
        #[serde(rename = "facingLeaves")]
        facing_leaves: bool,
        #[serde(rename = "rigidMeshes")]
        rigid_meshes: bool,
        grass: bool,
        #[serde(rename = "vertexCount")]
        vertex_count: u32,
        stride: u16,
        indices: Vec<u32>,
        channels: std::collections::BTreeMap<String, Vec<f32>>,
    }

    let output: Vec<DrawCallOutput> = draw_calls
        .iter()
        .map(|call| DrawCallOutput {
            branches: call.flags.branches,
            fronds: call.flags.fronds,
            leaves: call.flags.leaves,
            facing_leaves: call.flags.facing_leaves,
            rigid_meshes: call.flags.rigid_meshes,
            grass: call.flags.grass,
            vertex_count: call.vertex_count,
            stride: call.decl.stride(),
            indices: call.indices.clone(),
            channels: call
                .channels
                .iter()
                .map(|(p, v)| (p.as_str().to_string(), v.to_vec()))
                .collect(),
        })
        .collect();

    serde_json::to_string(&output).map_err(|e| JsError::new(&e.to_string()))
}
