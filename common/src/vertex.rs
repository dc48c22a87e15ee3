use glam::{Vec2, Vec3};
use std::mem;

/// Describes one interleaved attribute of a vertex so a renderer can build its buffer layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    /// Byte offset into the vertex.
    pub offset: usize,
    /// Number of `f32` components.
    pub components: usize,
}

pub trait Vertex: bytemuck::Pod {
    const ATTRIBUTES: &'static [VertexAttribute];

    fn stride() -> usize {
        mem::size_of::<Self>()
    }
}

/// World space position with a texture and a lightmap coordinate.
///
/// Texture coordinates are normalised by the texture size and may wrap,
/// lightmap coordinates always fall inside the 32x32 tile of the surface.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightmappedVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub lightmap_uv: Vec2,
}

impl Vertex for LightmappedVertex {
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            name: "position",
            offset: 0,
            components: 3,
        },
        VertexAttribute {
            name: "uv",
            offset: mem::size_of::<Vec3>(),
            components: 2,
        },
        VertexAttribute {
            name: "lightmap_uv",
            offset: mem::size_of::<Vec3>() + mem::size_of::<Vec2>(),
            components: 2,
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lightmapped_vertex_is_tightly_packed() {
        assert_eq!(LightmappedVertex::stride(), 28);
        let last = LightmappedVertex::ATTRIBUTES.last().unwrap();
        assert_eq!(last.offset + last.components * 4, LightmappedVertex::stride());
    }

    #[test]
    fn casts_to_bytes() {
        let verts = [LightmappedVertex {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Default::default()
        }];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 28);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
    }
}
