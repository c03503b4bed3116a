//! Imported scene data, laid out the way scene-interchange containers store it.
//!
//! These types are the boundary with whatever parses the model file. Matrices
//! are row-major (`a1..a4` is the first row), quaternions are stored `w, x, y, z`
//! and key times are double precision ticks. Nothing here is engine-ready; see
//! [`convert`](super::convert) and [`loader`](super::loader).

use bytemuck::{Pod, Zeroable};

/// Row-major 4×4 matrix as stored by the asset container.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AssetMatrix4 {
    pub a1: f32,
    pub a2: f32,
    pub a3: f32,
    pub a4: f32,
    pub b1: f32,
    pub b2: f32,
    pub b3: f32,
    pub b4: f32,
    pub c1: f32,
    pub c2: f32,
    pub c3: f32,
    pub c4: f32,
    pub d1: f32,
    pub d2: f32,
    pub d3: f32,
    pub d4: f32,
}

impl AssetMatrix4 {
    pub const IDENTITY: Self = Self::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    #[must_use]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let [a, b, c, d] = rows;
        Self {
            a1: a[0],
            a2: a[1],
            a3: a[2],
            a4: a[3],
            b1: b[0],
            b2: b[1],
            b3: b[2],
            b4: b[3],
            c1: c[0],
            c2: c[1],
            c3: c[2],
            c4: c[3],
            d1: d[0],
            d2: d[1],
            d3: d[2],
            d4: d[3],
        }
    }

    #[must_use]
    pub const fn rows(&self) -> [[f32; 4]; 4] {
        [
            [self.a1, self.a2, self.a3, self.a4],
            [self.b1, self.b2, self.b3, self.b4],
            [self.c1, self.c2, self.c3, self.c4],
            [self.d1, self.d2, self.d3, self.d4],
        ]
    }
}

impl Default for AssetMatrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Quaternion in container order: scalar part first.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AssetQuaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for AssetQuaternion {
    fn default() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct AssetVector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AssetVector3 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorKey {
    pub time: f64,
    pub value: AssetVector3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuatKey {
    pub time: f64,
    pub value: AssetQuaternion,
}

/// Keys for one animated node. Each list carries its own timestamps.
#[derive(Debug, Clone, Default)]
pub struct ImportedChannel {
    pub node_name: String,
    pub position_keys: Vec<VectorKey>,
    pub rotation_keys: Vec<QuatKey>,
    pub scaling_keys: Vec<VectorKey>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportedAnimation {
    pub name: String,
    /// Duration in ticks.
    pub duration: f64,
    /// `0.0` when the container does not specify a rate.
    pub ticks_per_second: f64,
    pub channels: Vec<ImportedChannel>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportedWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

#[derive(Debug, Clone)]
pub struct ImportedBone {
    pub name: String,
    /// Mesh space → bone space in bind pose.
    pub offset_matrix: AssetMatrix4,
    pub weights: Vec<ImportedWeight>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportedMesh {
    pub name: String,
    pub vertex_count: usize,
    pub bones: Vec<ImportedBone>,
}

impl ImportedMesh {
    #[must_use]
    pub fn has_bones(&self) -> bool {
        !self.bones.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportedNode {
    pub name: String,
    /// Local transform relative to the parent node.
    pub transformation: AssetMatrix4,
    /// Indices into [`ImportedScene::meshes`].
    pub meshes: Vec<usize>,
    pub children: Vec<ImportedNode>,
}

impl ImportedNode {
    #[must_use]
    pub fn new(name: impl Into<String>, transformation: AssetMatrix4) -> Self {
        Self {
            name: name.into(),
            transformation,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_meshes(mut self, meshes: Vec<usize>) -> Self {
        self.meshes = meshes;
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: ImportedNode) -> Self {
        self.children.push(child);
        self
    }
}

/// A whole imported file: node tree, meshes and animations.
#[derive(Debug, Clone, Default)]
pub struct ImportedScene {
    pub root: ImportedNode,
    pub meshes: Vec<ImportedMesh>,
    pub animations: Vec<ImportedAnimation>,
}
