//! Entity keys and per-entity data records.
//!
//! Every kind of topological object lives in its own [`slotmap::SlotMap`],
//! keyed by a dedicated key type. This is the arena-of-dense-indices
//! replacement for the source's raw-pointer graph with a magic-number tag
//! at the head of every struct: the key *is* the tag, and `slotmap` hands
//! out generational indices so a stale handle to a killed object is
//! detected rather than dereferenced.

use nmg_math::{BoundingBox3, Plane, Point3};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a [`crate::model::RegionData`].
    pub struct RegionId;
    /// Handle to a [`crate::model::ShellData`].
    pub struct ShellId;
    /// Handle to a [`crate::model::FaceData`].
    pub struct FaceId;
    /// Handle to a [`crate::model::FaceUseData`].
    pub struct FaceUseId;
    /// Handle to a [`crate::model::LoopData`].
    pub struct LoopId;
    /// Handle to a [`crate::model::LoopUseData`].
    pub struct LoopUseId;
    /// Handle to a [`crate::model::EdgeData`].
    pub struct EdgeId;
    /// Handle to a [`crate::model::EdgeUseData`].
    pub struct EdgeUseId;
    /// Handle to a [`crate::model::VertexData`].
    pub struct VertexId;
    /// Handle to a [`crate::model::VertexUseData`].
    pub struct VertexUseId;
}

/// Orientation tag carried by every "use" record: OT_SAME agrees with the
/// orientation of the underlying element, OT_OPPOSITE reverses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// OT_SAME
    Same,
    /// OT_OPPOSITE
    Opposite,
}

impl Orientation {
    /// The orientation of this use's mate.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Same => Orientation::Opposite,
            Orientation::Opposite => Orientation::Same,
        }
    }

    /// `true` for OT_SAME.
    #[inline]
    pub fn is_same(self) -> bool {
        matches!(self, Orientation::Same)
    }
}

/// A single "any index" handle over every entity kind, carrying its own
/// variant tag. Used by bitmark arrays and by generic traversal code that
/// must treat heterogeneous handles uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnyId {
    /// A region handle.
    Region(RegionId),
    /// A shell handle.
    Shell(ShellId),
    /// A face handle.
    Face(FaceId),
    /// A face-use handle.
    FaceUse(FaceUseId),
    /// A loop handle.
    Loop(LoopId),
    /// A loop-use handle.
    LoopUse(LoopUseId),
    /// An edge handle.
    Edge(EdgeId),
    /// An edge-use handle.
    EdgeUse(EdgeUseId),
    /// A vertex handle.
    Vertex(VertexId),
    /// A vertex-use handle.
    VertexUse(VertexUseId),
}

/// Who owns an edge-use's position in a traversal ring: a loop-use's
/// polygon boundary, or a shell's wire-edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeUseParent {
    /// Member of a loop-use's edge-use ring.
    LoopUse(LoopUseId),
    /// Member of a shell's wire-edge list.
    WireShell(ShellId),
}

/// Who owns a vertex-use: an edge-use's start reference, a point-loop's
/// sole reference, or a shell's lone-vertex list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexUseParent {
    /// Start vertex-use of an edge-use.
    EdgeUse(EdgeUseId),
    /// Sole vertex-use of a point loop-use.
    LoopUse(LoopUseId),
    /// Lone vertex-use directly in a shell.
    Shell(ShellId),
}

/// A loop-use's content: either a polygon ring of `>= 3` edge-uses, or a
/// single point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoopKind {
    /// Cyclic sequence of edge-uses bounding the loop, in traversal order.
    Ring(Vec<EdgeUseId>),
    /// A degenerate "loop" that is really a single vertex.
    Point(VertexUseId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegionData {
    pub index: u64,
    pub shells: Vec<ShellId>,
    pub bbox: Option<BoundingBox3>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ShellData {
    pub index: u64,
    pub region: RegionId,
    pub faceuses: Vec<FaceUseId>,
    pub wire_loopuses: Vec<LoopUseId>,
    pub wire_edgeuses: Vec<EdgeUseId>,
    pub lone_vertexuses: Vec<VertexUseId>,
    pub bbox: Option<BoundingBox3>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FaceData {
    pub index: u64,
    pub plane: Plane,
    /// `[OT_SAME use, OT_OPPOSITE use]`.
    pub faceuses: [FaceUseId; 2],
    pub bbox: Option<BoundingBox3>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FaceUseData {
    pub index: u64,
    pub face: FaceId,
    pub orientation: Orientation,
    pub mate: FaceUseId,
    pub shell: ShellId,
    pub loopuses: Vec<LoopUseId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoopData {
    pub index: u64,
    /// `[OT_SAME use, OT_OPPOSITE use]`.
    pub loopuses: [LoopUseId; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoopUseData {
    pub index: u64,
    pub loop_id: LoopId,
    pub orientation: Orientation,
    pub mate: LoopUseId,
    pub faceuse: FaceUseId,
    pub kind: LoopKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EdgeData {
    pub index: u64,
    /// Any one edge-use on this edge's radial chain; the chain itself is
    /// threaded through [`EdgeUseData::radial_next`] / `radial_prev`.
    pub first_edgeuse: EdgeUseId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EdgeUseData {
    pub index: u64,
    pub edge: EdgeId,
    pub orientation: Orientation,
    pub mate: EdgeUseId,
    pub radial_next: EdgeUseId,
    pub radial_prev: EdgeUseId,
    pub vertex_use: VertexUseId,
    pub next: EdgeUseId,
    pub prev: EdgeUseId,
    pub parent: EdgeUseParent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct VertexData {
    pub index: u64,
    pub point: Point3,
    pub vertexuses: Vec<VertexUseId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct VertexUseData {
    pub index: u64,
    pub vertex: VertexId,
    pub parent: VertexUseParent,
}
