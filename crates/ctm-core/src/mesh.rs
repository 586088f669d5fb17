use crate::geometry_indices::{AttribMapId, UvMapId};
use crate::status::{CtmError, Status};
use crate::vertex_map::{AttributeMap, UvMap};

/// Triangle mesh with optional normals and any number of UV and attribute
/// maps. Capacity limits are enforced by the owning context, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<[f32; 3]>,
    triangles: Vec<[u32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    uv_maps: Vec<UvMap>,
    attrib_maps: Vec<AttributeMap>,
}

impl Mesh {
    pub fn new(
        vertices: Vec<[f32; 3]>,
        triangles: Vec<[u32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
    ) -> Self {
        Self {
            vertices,
            triangles,
            normals,
            uv_maps: Vec::new(),
            attrib_maps: Vec::new(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.normals.as_deref()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn set_normals(&mut self, normals: Option<Vec<[f32; 3]>>) {
        self.normals = normals;
    }

    pub fn uv_maps(&self) -> &[UvMap] {
        &self.uv_maps
    }

    pub fn attrib_maps(&self) -> &[AttributeMap] {
        &self.attrib_maps
    }

    pub fn uv_map(&self, id: UvMapId) -> Option<&UvMap> {
        self.uv_maps.get(id.index())
    }

    pub fn uv_map_mut(&mut self, id: UvMapId) -> Option<&mut UvMap> {
        self.uv_maps.get_mut(id.index())
    }

    pub fn attrib_map(&self, id: AttribMapId) -> Option<&AttributeMap> {
        self.attrib_maps.get(id.index())
    }

    pub fn attrib_map_mut(&mut self, id: AttribMapId) -> Option<&mut AttributeMap> {
        self.attrib_maps.get_mut(id.index())
    }

    pub fn add_uv_map(&mut self, map: UvMap) -> UvMapId {
        self.uv_maps.push(map);
        UvMapId::from(self.uv_maps.len() - 1)
    }

    pub fn add_attrib_map(&mut self, map: AttributeMap) -> AttribMapId {
        self.attrib_maps.push(map);
        AttribMapId::from(self.attrib_maps.len() - 1)
    }

    /// First UV map whose name equals `name`.
    pub fn find_uv_map(&self, name: &str) -> Option<UvMapId> {
        self.uv_maps
            .iter()
            .position(|m| m.name() == Some(name))
            .map(UvMapId::from)
    }

    /// First attribute map whose name equals `name`.
    pub fn find_attrib_map(&self, name: &str) -> Option<AttribMapId> {
        self.attrib_maps
            .iter()
            .position(|m| m.name() == Some(name))
            .map(AttribMapId::from)
    }

    /// Axis-aligned bounds of the vertex positions, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices[1..] {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        Some((min, max))
    }

    /// Checks everything a stream must satisfy before it is written or after
    /// it has been read.
    pub fn check_integrity(&self) -> Status {
        let num_vertices = self.vertices.len();
        if num_vertices == 0 {
            return Err(CtmError::InvalidMesh("mesh has no vertices".into()));
        }
        if self.triangles.is_empty() {
            return Err(CtmError::InvalidMesh("mesh has no triangles".into()));
        }
        if num_vertices > u32::MAX as usize {
            return Err(CtmError::InvalidMesh("too many vertices".into()));
        }
        for (t, tri) in self.triangles.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&i| i as usize >= num_vertices) {
                return Err(CtmError::InvalidMesh(format!(
                    "triangle {} references vertex {} of {}",
                    t, bad, num_vertices
                )));
            }
        }
        if !all_finite(self.vertices.iter().flatten()) {
            return Err(CtmError::InvalidMesh("non-finite vertex coordinate".into()));
        }
        if let Some(normals) = &self.normals {
            if normals.len() != num_vertices {
                return Err(CtmError::InvalidMesh(format!(
                    "{} normals for {} vertices",
                    normals.len(),
                    num_vertices
                )));
            }
            if !all_finite(normals.iter().flatten()) {
                return Err(CtmError::InvalidMesh("non-finite normal".into()));
            }
        }
        for map in &self.uv_maps {
            if map.len() != num_vertices || !all_finite(map.coords().iter().flatten()) {
                return Err(CtmError::InvalidMesh(format!(
                    "UV map {:?} does not cover every vertex with finite values",
                    map.name().unwrap_or_default()
                )));
            }
        }
        for map in &self.attrib_maps {
            if map.len() != num_vertices || !all_finite(map.values().iter()) {
                return Err(CtmError::InvalidMesh(format!(
                    "attribute map {:?} does not cover every vertex with finite values",
                    map.name().unwrap_or_default()
                )));
            }
        }
        Ok(())
    }
}

fn all_finite<'a>(mut values: impl Iterator<Item = &'a f32>) -> bool {
    values.all(|v| v.is_finite())
}
