//! The flat triangle-soup output of triangulation, independent of the
//! B-rep it was derived from — the shape a format writer or renderer
//! actually wants to consume.

use nmg_math::{Point3, Vec3};
use nmg_topo::FaceId;

/// A mesh vertex: position plus the flat face normal it was generated
/// with (NMG faces are planar, so there is no need to average normals
/// across adjacent faces).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space.
    pub position: Point3,
    /// The owning face's outward normal.
    pub normal: Vec3,
}

/// One triangle of the mesh, indexing into [`Mesh::vertices`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertex indices, counter-clockwise when viewed from outside.
    pub indices: [u32; 3],
    /// The NMG face this triangle was cut from.
    pub face: FaceId,
}

/// Triangulated output of one or more faces.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Flat vertex buffer.
    pub vertices: Vec<Vertex>,
    /// Flat triangle buffer.
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex, returning its index.
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Append a triangle by vertex index.
    pub fn push_triangle(&mut self, indices: [u32; 3], face: FaceId) {
        self.triangles.push(Triangle { indices, face });
    }

    /// Merge another mesh's vertices and triangles into this one,
    /// re-basing the other mesh's triangle indices.
    pub fn extend(&mut self, other: Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.triangles.extend(other.triangles.into_iter().map(|t| Triangle {
            indices: [t.indices[0] + base, t.indices[1] + base, t.indices[2] + base],
            face: t.face,
        }));
    }
}
