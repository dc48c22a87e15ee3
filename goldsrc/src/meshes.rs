use std::sync::Arc;

use common::vertex::{LightmappedVertex, Vertex};
use glam::Vec3;

use crate::{
    bsp::{
        edges::{BSPEdge, BSPSurfEdge},
        face::BSPFace,
        lightmap::{full_bright_uv, LightmapExtents, LightmapTile},
        textures::BSPTexInfo,
        BSPFile,
    },
    error::BspError,
    texture::Texture,
};

#[derive(Default)]
pub struct MeshBuilder<V: Vertex + Default> {
    tris: Vec<u32>,
    verts: Vec<V>,
}

impl<V: Vertex + Default> MeshBuilder<V> {
    /// Appends a vertex, returning its index.
    pub fn add_vert(&mut self, vert: V) -> u32 {
        self.verts.push(vert);
        self.verts.len() as u32 - 1
    }

    fn add_tri(&mut self, tri: [u32; 3]) {
        self.tris.extend_from_slice(&tri);
    }

    /// Triangulates the last `count` vertices as a convex polygon.
    pub fn push_fan(&mut self, count: usize) {
        let base = (self.verts.len() - count.min(self.verts.len())) as u32;
        for tri in fan_triangulate(count).chunks_exact(3) {
            self.add_tri([base + tri[0], base + tri[1], base + tri[2]]);
        }
    }

    pub fn into_parts(self) -> (Vec<V>, Vec<u32>) {
        (self.verts, self.tris)
    }
}

/// Index list of a triangle fan around vertex 0 of a convex polygon.
///
/// `n` vertices give `n - 2` triangles `(0, v, v + 1)`; fewer than 3 give none.
pub fn fan_triangulate(n: usize) -> Vec<u32> {
    (1..n.saturating_sub(1))
        .flat_map(|v| [0, v as u32, v as u32 + 1])
        .collect()
}

/// World space vertices of a surface, in winding order.
///
/// Each surfedge contributes the vertex its directed edge starts from.
pub fn surface_polygon(file: &BSPFile, face: &BSPFace) -> Result<Vec<Vec3>, BspError> {
    face.edges()
        .map(|i| {
            let edge_ref = file.get::<BSPSurfEdge>(i)?.edge_ref();
            let edge = file.get::<BSPEdge>(edge_ref.index)?;
            file.get::<Vec3>(edge_ref.start_vertex(&edge) as usize)
        })
        .collect()
}

/// Renderable geometry of one surface.
#[derive(Debug)]
pub struct SurfaceMesh {
    surface: usize,
    vertices: Vec<LightmappedVertex>,
    indices: Vec<u32>,
    texture: Arc<Texture>,
    lightmap: Arc<LightmapTile>,
}

impl SurfaceMesh {
    /// Builds the mesh of a convex polygon.
    ///
    /// `extents` is `None` for surfaces drawn full bright, their lightmap coordinates all point
    /// at the first used texel of the tile.
    pub fn new(
        surface: usize,
        polygon: &[Vec3],
        tex_info: &BSPTexInfo,
        texture: Arc<Texture>,
        lightmap: Arc<LightmapTile>,
        extents: Option<&LightmapExtents>,
    ) -> Self {
        let mut builder = MeshBuilder::<LightmappedVertex>::default();

        for &position in polygon {
            let lightmap_uv = match extents {
                Some(extents) => extents.lightmap_uv(tex_info.project_f64(position)),
                None => full_bright_uv(),
            };
            builder.add_vert(LightmappedVertex {
                position,
                uv: tex_info.texture_uv(position, texture.width(), texture.height()),
                lightmap_uv,
            });
        }
        builder.push_fan(polygon.len());

        let (vertices, indices) = builder.into_parts();
        Self {
            surface,
            vertices,
            indices,
            texture,
            lightmap,
        }
    }

    /// Index of the surface in the face lump.
    pub fn surface(&self) -> usize {
        self.surface
    }

    pub fn vertices(&self) -> &[LightmappedVertex] {
        &self.vertices
    }

    /// Vertex data ready for upload, laid out as described by [`LightmappedVertex::ATTRIBUTES`].
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    pub fn lightmap(&self) -> &Arc<LightmapTile> {
        &self.lightmap
    }
}
