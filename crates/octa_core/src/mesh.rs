//! Triangle mesh representation for the ray tracer.
//!
//! A mesh owns flat vertex, normal and texture-coordinate arrays shared by
//! all of its faces. Faces are grouped into pieces, each bound to one
//! material, and each piece holds a flat-shaded face list plus any number of
//! smoothing groups.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use octa_math::{Aabb, Vec2, Vec3};

use crate::error::{CoreError, Result};
use crate::material::Material;

/// One corner of a face: indices into the mesh's shared arrays.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FaceVertex {
    pub vertex: usize,
    pub tex_coord: Option<usize>,
    pub normal: Option<usize>,
}

impl FaceVertex {
    pub fn new(vertex: usize, tex_coord: Option<usize>, normal: Option<usize>) -> Self {
        Self {
            vertex,
            tex_coord,
            normal,
        }
    }

    pub fn position_only(vertex: usize) -> Self {
        Self::new(vertex, None, None)
    }
}

/// A triangle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Face {
    pub corners: [FaceVertex; 3],
}

impl Face {
    pub fn new(corners: [FaceVertex; 3]) -> Self {
        Self { corners }
    }

    /// Triangle from three vertex indices with no texture coordinates or normals.
    pub fn from_vertices(a: usize, b: usize, c: usize) -> Self {
        Self::new([
            FaceVertex::position_only(a),
            FaceVertex::position_only(b),
            FaceVertex::position_only(c),
        ])
    }

    /// Corner positions, or `None` if an index is out of range.
    pub fn positions(&self, vertices: &[Vec3]) -> Option<[Vec3; 3]> {
        let [a, b, c] = self.corners;
        Some([
            *vertices.get(a.vertex)?,
            *vertices.get(b.vertex)?,
            *vertices.get(c.vertex)?,
        ])
    }

    /// Corner texture coordinates, if every corner has one in range.
    pub fn tex_coords(&self, tex_coords: &[Vec2]) -> Option<[Vec2; 3]> {
        let [a, b, c] = self.corners;
        Some([
            *tex_coords.get(a.tex_coord?)?,
            *tex_coords.get(b.tex_coord?)?,
            *tex_coords.get(c.tex_coord?)?,
        ])
    }

    /// The box spanned by the three corner positions.
    pub fn aabb(&self, vertices: &[Vec3]) -> Option<Aabb> {
        self.positions(vertices).map(Aabb::from_points)
    }
}

/// Faces sharing one material.
#[derive(Clone, Debug, Default)]
pub struct Piece {
    pub name: String,
    pub material_name: String,

    /// Set by [`Mesh::resolve_materials`]
    pub material: Option<Arc<Material>>,

    pub flat_faces: Vec<Face>,
    pub smoothing_groups: BTreeMap<u32, Vec<Face>>,
}

impl Piece {
    pub fn new(name: impl Into<String>, material_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material_name: material_name.into(),
            ..Default::default()
        }
    }

    /// All faces of the piece: flat faces first, then smoothing groups by id.
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.flat_faces
            .iter()
            .chain(self.smoothing_groups.values().flatten())
    }

    pub fn face_count(&self) -> usize {
        self.flat_faces.len() + self.smoothing_groups.values().map(Vec::len).sum::<usize>()
    }
}

/// A mesh of triangles with shared vertex data.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub pieces: Vec<Piece>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Box bounding every vertex of the mesh.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().copied())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.pieces.iter().map(Piece::face_count).sum()
    }

    /// Bind every piece to its material by name.
    ///
    /// Fails on the first piece whose material isn't in `materials`.
    pub fn resolve_materials(&mut self, materials: &HashMap<String, Arc<Material>>) -> Result<()> {
        for piece in &mut self.pieces {
            let material = materials.get(&piece.material_name).ok_or_else(|| {
                CoreError::UnresolvedMaterial {
                    piece: piece.name.clone(),
                    material: piece.material_name.clone(),
                }
            })?;
            piece.material = Some(material.clone());
        }
        Ok(())
    }

    /// Check every face index against the shared arrays.
    pub fn validate(&self) -> Result<()> {
        for piece in &self.pieces {
            for face in piece.faces() {
                for corner in &face.corners {
                    check_index(piece, "vertex", Some(corner.vertex), self.vertices.len())?;
                    check_index(piece, "texture coordinate", corner.tex_coord, self.tex_coords.len())?;
                    check_index(piece, "normal", corner.normal, self.normals.len())?;
                }
            }
        }
        Ok(())
    }
}

fn check_index(piece: &Piece, kind: &'static str, index: Option<usize>, len: usize) -> Result<()> {
    match index {
        Some(index) if index >= len => Err(CoreError::InvalidIndex {
            piece: piece.name.clone(),
            kind,
            index,
            len,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> Mesh {
        let mut mesh = Mesh::new("quad");
        mesh.vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        let mut piece = Piece::new("quad", "Red");
        piece.flat_faces.push(Face::from_vertices(0, 1, 2));
        piece.smoothing_groups.insert(1, vec![Face::from_vertices(1, 3, 2)]);
        mesh.pieces.push(piece);
        mesh
    }

    #[test]
    fn test_mesh_counts() {
        let mesh = quad_mesh();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.pieces[0].faces().count(), 2);
    }

    #[test]
    fn test_face_aabb_from_vertices_only() {
        let vertices = vec![
            Vec3::new(2.0, 3.0, 4.0),
            Vec3::new(5.0, 3.0, 4.0),
            Vec3::new(2.0, 6.0, 5.0),
        ];
        let aabb = Face::from_vertices(0, 1, 2).aabb(&vertices).unwrap();

        assert_eq!(aabb.min, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(aabb.max, Vec3::new(5.0, 6.0, 5.0));
    }

    #[test]
    fn test_face_out_of_range() {
        let vertices = vec![Vec3::ZERO, Vec3::X];
        assert!(Face::from_vertices(0, 1, 2).positions(&vertices).is_none());
        assert!(Face::from_vertices(0, 1, 1).tex_coords(&[]).is_none());
    }

    #[test]
    fn test_bounds_computation() {
        let mesh = quad_mesh();
        let bounds = mesh.bounds();

        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_resolve_materials() {
        let mut mesh = quad_mesh();
        let mut materials = HashMap::new();
        materials.insert("Red".to_string(), Arc::new(Material::shiny_red()));

        mesh.resolve_materials(&materials).unwrap();
        assert!(mesh.pieces[0].material.is_some());
    }

    #[test]
    fn test_resolve_materials_missing() {
        let mut mesh = quad_mesh();
        let result = mesh.resolve_materials(&HashMap::new());

        assert!(matches!(
            result,
            Err(CoreError::UnresolvedMaterial { ref material, .. }) if material == "Red"
        ));
    }

    #[test]
    fn test_validate() {
        let mut mesh = quad_mesh();
        assert!(mesh.validate().is_ok());

        mesh.pieces[0].flat_faces.push(Face::from_vertices(0, 1, 9));
        assert!(matches!(mesh.validate(), Err(CoreError::InvalidIndex { index: 9, .. })));
    }
}
