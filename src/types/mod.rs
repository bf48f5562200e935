//! Shared types used throughout the library.

mod property;

pub use property::{VertexComponent, VertexFormat, VertexProperty};

use crate::registry;
use glam::Vec3;
use std::collections::HashMap;

/// The geometry-class feature vector controlling which channels are active.
///
/// One instance per draw call (mesh × material combination). Built from
/// material flags at export time, or decoded from a draw call's render
/// state at import time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryFlags {
    pub branches: bool,
    pub fronds: bool,
    pub leaves: bool,
    pub facing_leaves: bool,
    pub rigid_meshes: bool,
    /// Grass override: forces every written geometry-type-hint value to 1.0.
    /// Does not change which channels are emitted.
    pub grass: bool,
}

impl GeometryFlags {
    pub const fn new() -> Self {
        Self {
            branches: false,
            fronds: false,
            leaves: false,
            facing_leaves: false,
            rigid_meshes: false,
            grass: false,
        }
    }

    pub fn with_branches(mut self) -> Self {
        self.branches = true;
        self
    }

    pub fn with_fronds(mut self) -> Self {
        self.fronds = true;
        self
    }

    pub fn with_leaves(mut self) -> Self {
        self.leaves = true;
        self
    }

    pub fn with_facing_leaves(mut self) -> Self {
        self.facing_leaves = true;
        self
    }

    pub fn with_rigid_meshes(mut self) -> Self {
        self.rigid_meshes = true;
        self
    }

    pub fn with_grass(mut self) -> Self {
        self.grass = true;
        self
    }

    /// Enumerate all 32 combinations of the five geometry-class booleans
    /// (grass off). Used by exhaustive layout tests.
    pub fn all_combinations() -> impl Iterator<Item = GeometryFlags> {
        (0u8..32).map(|bits| GeometryFlags {
            branches: bits & 1 != 0,
            fronds: bits & 2 != 0,
            leaves: bits & 4 != 0,
            facing_leaves: bits & 8 != 0,
            rigid_meshes: bits & 16 != 0,
            grass: false,
        })
    }
}

/// Named per-vertex float arrays for one draw call.
///
/// Each property maps to a flat array of `vertex_count * component_count`
/// floats, component-interleaved per vertex (`x0 y0 z0 x1 y1 z1 ...`).
#[derive(Debug, Clone, Default)]
pub struct ChannelData {
    arrays: HashMap<VertexProperty, Vec<f32>>,
}

impl ChannelData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a channel's flat value array, replacing any existing one.
    pub fn insert(&mut self, property: VertexProperty, values: Vec<f32>) {
        self.arrays.insert(property, values);
    }

    /// Builder-style insert.
    pub fn with(mut self, property: VertexProperty, values: Vec<f32>) -> Self {
        self.insert(property, values);
        self
    }

    /// Get a channel's flat value array.
    pub fn get(&self, property: VertexProperty) -> Option<&[f32]> {
        self.arrays.get(&property).map(Vec::as_slice)
    }

    /// Remove a channel, returning its values if it was present.
    pub fn remove(&mut self, property: VertexProperty) -> Option<Vec<f32>> {
        self.arrays.remove(&property)
    }

    /// Whether a channel is present.
    pub fn contains(&self, property: VertexProperty) -> bool {
        self.arrays.contains_key(&property)
    }

    /// Iterate over the stored channels.
    pub fn iter(&self) -> impl Iterator<Item = (VertexProperty, &[f32])> {
        self.arrays.iter().map(|(p, v)| (*p, v.as_slice()))
    }

    /// Number of stored channels.
    pub fn channel_count(&self) -> usize {
        self.arrays.len()
    }

    /// One vertex's component values for a property, if present and in range.
    pub fn vertex_values(&self, property: VertexProperty, vertex: usize) -> Option<&[f32]> {
        let n = registry::component_count(property) as usize;
        let values = self.arrays.get(&property)?;
        values.get(vertex * n..vertex * n + n)
    }
}

/// One mesh × material combination to be packed.
#[derive(Debug, Clone, Default)]
pub struct DrawCall {
    pub flags: GeometryFlags,
    pub vertex_count: u32,
    /// Per-vertex source arrays for the channels the resolver activates.
    pub channels: ChannelData,
    /// Triangle indices, passed through to the interchange format untouched.
    pub indices: Vec<u32>,
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Extents {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// Compute extents from a flat position array (3 floats per vertex).
    /// `None` for an empty array.
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut points = positions.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2]));
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self {
            min: min.to_array(),
            max: max.to_array(),
        })
    }

    pub fn dimensions(&self) -> [f32; 3] {
        (Vec3::from_array(self.max) - Vec3::from_array(self.min)).to_array()
    }
}
