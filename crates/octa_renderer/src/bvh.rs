//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A fixed-depth octree over a mesh's bounding box. Every node is split into
//! eight equal octants down to the maximum depth, regardless of how faces are
//! distributed. Each face is stored at the deepest node whose box fully
//! contains it, so faces straddling a split stay with the parent and no face
//! is stored twice.

use std::sync::Arc;

use octa_core::{CoreError, Face, Material, Mesh};
use octa_math::{Aabb, LineSegment, Ray, Vec3};

/// Default octree depth.
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Relative padding applied to the root box, so meshes lying in an axis
/// plane still have a box with volume to clip rays against.
const ROOT_PADDING: f32 = 0.01;

/// A face stored in the hierarchy, with the material of its piece.
#[derive(Debug, Clone)]
pub struct BvhEntry {
    pub face: Face,
    pub material: Arc<Material>,
}

/// One octree node.
#[derive(Debug)]
pub struct BvhNode {
    aabb: Aabb,
    children: Option<Box<[BvhNode; 8]>>,
    entries: Vec<BvhEntry>,
}

impl BvhNode {
    /// Build a complete octree of the given remaining depth below `aabb`.
    fn new(aabb: Aabb, remaining_depth: u32) -> Self {
        let children = (remaining_depth > 0).then(|| {
            let octants = Self::octants(&aabb);
            Box::new(std::array::from_fn(|i| {
                BvhNode::new(octants[i], remaining_depth - 1)
            }))
        });

        Self {
            aabb,
            children,
            entries: Vec::new(),
        }
    }

    /// The eight octants of a box: the four upper ones (y from the centre
    /// up) first, then the four lower ones.
    fn octants(aabb: &Aabb) -> [Aabb; 8] {
        let (min, max) = (aabb.min, aabb.max);
        let c = aabb.center();

        [
            // Upper
            Aabb::new(Vec3::new(min.x, c.y, min.z), Vec3::new(c.x, max.y, c.z)),
            Aabb::new(Vec3::new(c.x, c.y, min.z), Vec3::new(max.x, max.y, c.z)),
            Aabb::new(Vec3::new(min.x, c.y, c.z), Vec3::new(c.x, max.y, max.z)),
            Aabb::new(c, max),
            // Lower
            Aabb::new(min, c),
            Aabb::new(Vec3::new(c.x, min.y, min.z), Vec3::new(max.x, c.y, c.z)),
            Aabb::new(Vec3::new(min.x, min.y, c.z), Vec3::new(c.x, c.y, max.z)),
            Aabb::new(Vec3::new(c.x, min.y, c.z), Vec3::new(max.x, c.y, max.z)),
        ]
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn children(&self) -> Option<&[BvhNode; 8]> {
        self.children.as_deref()
    }

    pub fn entries(&self) -> &[BvhEntry] {
        &self.entries
    }

    /// Push a face down to the first child that contains it, or keep it here.
    fn insert(&mut self, entry: BvhEntry, face_aabb: &Aabb, depth: u32) {
        if let Some(children) = self.children.as_deref_mut() {
            if let Some(child) = children.iter_mut().find(|c| c.aabb.contains(face_aabb)) {
                child.insert(entry, face_aabb, depth + 1);
                return;
            }
        }
        log::trace!("{:indent$}face stored at depth {}", "", depth, indent = depth as usize * 2);
        self.entries.push(entry);
    }

    /// Report this node's faces, then recurse into every child the segment
    /// passes through.
    fn traverse<F>(&self, segment: &LineSegment, visitor: &mut F)
    where
        F: FnMut(&Face, &Arc<Material>),
    {
        for entry in &self.entries {
            visitor(&entry.face, &entry.material);
        }

        if let Some(children) = self.children.as_deref() {
            for child in children {
                if let Some(clipped) = child.aabb.clip_segment(segment) {
                    child.traverse(&clipped, visitor);
                }
            }
        }
    }

    fn face_count(&self) -> usize {
        self.entries.len()
            + self
                .children()
                .map_or(0, |c| c.iter().map(BvhNode::face_count).sum())
    }

    fn node_count(&self) -> usize {
        1 + self
            .children()
            .map_or(0, |c| c.iter().map(BvhNode::node_count).sum())
    }

    fn log_debug_information(&self, depth: usize) {
        log::debug!(
            "{:indent$}node min {:?} max {:?}: {} faces",
            "",
            self.aabb.min,
            self.aabb.max,
            self.entries.len(),
            indent = depth * 2
        );
        if let Some(children) = self.children() {
            for child in children {
                child.log_debug_information(depth + 1);
            }
        }
    }
}

/// Octree over one mesh. Built once, read-only afterwards.
#[derive(Debug)]
pub struct Bvh {
    root: BvhNode,
    mesh: Arc<Mesh>,
}

impl Bvh {
    /// Build the octree and insert every face of the mesh, piece by piece:
    /// flat faces first, then smoothing groups.
    ///
    /// Fails if a piece has no resolved material or a face indexes past the
    /// vertex array.
    pub fn build(mesh: Arc<Mesh>, max_depth: u32) -> Result<Self, CoreError> {
        let bounds = if mesh.vertices.is_empty() {
            Aabb::default()
        } else {
            let bounds = mesh.bounds();
            let pad = Vec3::splat(ROOT_PADDING * bounds.size().max_element().max(1.0));
            Aabb::new(bounds.min - pad, bounds.max + pad)
        };

        log::debug!(
            "Building BVH for '{}': depth {}, bounds {:?} .. {:?}",
            mesh.name,
            max_depth,
            bounds.min,
            bounds.max
        );
        let mut root = BvhNode::new(bounds, max_depth);

        for piece in &mesh.pieces {
            let material = piece
                .material
                .clone()
                .ok_or_else(|| CoreError::UnresolvedMaterial {
                    piece: piece.name.clone(),
                    material: piece.material_name.clone(),
                })?;

            log::debug!("Inserting {} faces for piece '{}'", piece.face_count(), piece.name);
            for face in piece.faces() {
                let face_aabb = face.aabb(&mesh.vertices).ok_or_else(|| CoreError::InvalidIndex {
                    piece: piece.name.clone(),
                    kind: "vertex",
                    index: face.corners.iter().map(|c| c.vertex).max().unwrap_or(0),
                    len: mesh.vertices.len(),
                })?;
                let entry = BvhEntry {
                    face: *face,
                    material: material.clone(),
                };
                root.insert(entry, &face_aabb, 0);
            }
        }

        Ok(Self { root, mesh })
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    pub fn bounds(&self) -> &Aabb {
        &self.root.aabb
    }

    /// Visit every face that could be hit by the bounded ray.
    ///
    /// Faces are reported in no particular distance order; the visitor is
    /// responsible for keeping the nearest hit.
    pub fn traverse<F>(&self, ray: &Ray, mut visitor: F)
    where
        F: FnMut(&Face, &Arc<Material>),
    {
        if let Some(segment) = self.root.aabb.clip_ray(ray) {
            self.root.traverse(&segment, &mut visitor);
        }
    }

    pub fn face_count(&self) -> usize {
        self.root.face_count()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Dump the tree at `debug` level, one line per node, indented by depth.
    pub fn log_debug_information(&self) {
        log::debug!(
            "BVH for '{}': {} nodes, {} faces",
            self.mesh.name,
            self.node_count(),
            self.face_count()
        );
        self.root.log_debug_information(0);
    }
}
