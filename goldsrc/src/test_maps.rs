//! Builders for small in-memory maps and wads used by the tests.

use glam::Vec3;

use crate::bsp::consts::{LumpType, HEADER_LUMPS};

pub fn push_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn push_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn push_i16(buf: &mut Vec<u8>, v: i16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn push_f32(buf: &mut Vec<u8>, v: f32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn push_vec3(buf: &mut Vec<u8>, v: Vec3) {
    for c in v.to_array() {
        push_f32(buf, c);
    }
}

fn push_name(buf: &mut Vec<u8>, name: &str) {
    let mut raw = [0u8; 16];
    let len = name.len().min(15);
    raw[..len].copy_from_slice(&name.as_bytes()[..len]);
    buf.extend_from_slice(&raw);
}

/// Assembles a map file lump by lump. Lumps are written after the header in directory order.
pub struct MapBuilder {
    version: i32,
    lumps: [Vec<u8>; HEADER_LUMPS],
}

impl MapBuilder {
    pub fn new(version: i32) -> Self {
        Self {
            version,
            lumps: Default::default(),
        }
    }

    pub fn lump_mut(&mut self, lump: LumpType) -> &mut Vec<u8> {
        &mut self.lumps[lump as usize]
    }

    pub fn plane(&mut self, normal: Vec3, dist: f32, axis: i32) -> &mut Self {
        let buf = self.lump_mut(LumpType::Planes);
        push_vec3(buf, normal);
        push_f32(buf, dist);
        push_i32(buf, axis);
        self
    }

    pub fn node(&mut self, plane: i32, front: i16, back: i16) -> &mut Self {
        let buf = self.lump_mut(LumpType::Nodes);
        push_i32(buf, plane);
        push_i16(buf, front);
        push_i16(buf, back);
        buf.extend_from_slice(&[0; 12]); // bounds
        push_u16(buf, 0);
        push_u16(buf, 0);
        self
    }

    pub fn leaf(&mut self, contents: i32, vis_ofs: i32, first_mark: u16, count: u16) -> &mut Self {
        let buf = self.lump_mut(LumpType::Leaves);
        push_i32(buf, contents);
        push_i32(buf, vis_ofs);
        buf.extend_from_slice(&[0; 12]);
        push_u16(buf, first_mark);
        push_u16(buf, count);
        buf.extend_from_slice(&[0; 4]); // ambient
        self
    }

    pub fn hull(
        &mut self,
        head_node: i32,
        vis_leafs: i32,
        first_face: i32,
        num_faces: i32,
    ) -> &mut Self {
        let buf = self.lump_mut(LumpType::Models);
        push_vec3(buf, Vec3::splat(-4096.0));
        push_vec3(buf, Vec3::splat(4096.0));
        push_vec3(buf, Vec3::ZERO);
        for head in [head_node, 0, 0, 0] {
            push_i32(buf, head);
        }
        push_i32(buf, vis_leafs);
        push_i32(buf, first_face);
        push_i32(buf, num_faces);
        self
    }

    pub fn vertex(&mut self, v: Vec3) -> &mut Self {
        push_vec3(self.lump_mut(LumpType::Vertices), v);
        self
    }

    pub fn edge(&mut self, a: u16, b: u16) -> &mut Self {
        let buf = self.lump_mut(LumpType::Edges);
        push_u16(buf, a);
        push_u16(buf, b);
        self
    }

    pub fn surfedge(&mut self, id: i32) -> &mut Self {
        push_i32(self.lump_mut(LumpType::SurfEdges), id);
        self
    }

    pub fn face(
        &mut self,
        first_edge: i32,
        num_edges: u16,
        tex_info: u16,
        light_ofs: i32,
    ) -> &mut Self {
        let buf = self.lump_mut(LumpType::Faces);
        push_u16(buf, 0); // plane
        push_u16(buf, 0); // side
        push_i32(buf, first_edge);
        push_u16(buf, num_edges);
        push_u16(buf, tex_info);
        buf.extend_from_slice(&[0, 255, 255, 255]);
        push_i32(buf, light_ofs);
        self
    }

    pub fn texinfo(&mut self, s: Vec3, t: Vec3, tex_id: i32) -> &mut Self {
        let buf = self.lump_mut(LumpType::TexInfo);
        push_vec3(buf, s);
        push_f32(buf, 0.0);
        push_vec3(buf, t);
        push_f32(buf, 0.0);
        push_i32(buf, tex_id);
        push_i32(buf, 0);
        self
    }

    pub fn mark_surface(&mut self, surface: u16) -> &mut Self {
        push_u16(self.lump_mut(LumpType::MarkSurfaces), surface);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();
        push_i32(&mut data, self.version);

        let mut offset = 4 + HEADER_LUMPS * 8;
        for lump in &self.lumps {
            push_i32(&mut data, offset as i32);
            push_i32(&mut data, lump.len() as i32);
            offset += lump.len();
        }
        for lump in &self.lumps {
            data.extend_from_slice(lump);
        }
        data
    }
}

/// Mip texture header naming a texture stored in a wad.
pub fn miptex_external(name: &str, width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    push_name(&mut buf, name);
    buf.extend_from_slice(&width.to_le_bytes());
    buf.extend_from_slice(&height.to_le_bytes());
    buf.extend_from_slice(&[0; 16]);
    buf
}

/// Mip texture with every texel set to `fill`, followed by `palette` when given.
pub fn miptex_embedded(
    name: &str,
    width: u32,
    height: u32,
    fill: u8,
    palette: Option<&[u8]>,
) -> Vec<u8> {
    let texels = (width * height) as usize;
    let sizes = [texels, texels / 4, texels / 16, texels / 64];

    let mut buf = Vec::new();
    push_name(&mut buf, name);
    buf.extend_from_slice(&width.to_le_bytes());
    buf.extend_from_slice(&height.to_le_bytes());
    let mut ofs = 40;
    for size in sizes {
        buf.extend_from_slice(&(ofs as u32).to_le_bytes());
        ofs += size;
    }
    for size in sizes {
        buf.extend(std::iter::repeat(fill).take(size));
    }
    if let Some(palette) = palette {
        push_u16(&mut buf, 256);
        buf.extend_from_slice(palette);
        push_u16(&mut buf, 0);
    }
    buf
}

/// Mip texture lump, `None` entries become empty slots.
pub fn mip_lump(textures: &[Option<Vec<u8>>]) -> Vec<u8> {
    let mut buf = Vec::new();
    push_i32(&mut buf, textures.len() as i32);

    let mut ofs = 4 + textures.len() * 4;
    for tex in textures {
        match tex {
            Some(bytes) => {
                push_i32(&mut buf, ofs as i32);
                ofs += bytes.len();
            }
            None => push_i32(&mut buf, -1),
        }
    }
    for bytes in textures.iter().flatten() {
        buf.extend_from_slice(bytes);
    }
    buf
}

/// Wad archive of `(name, compressed, miptex)` entries, directory at the end.
pub fn wad3_bytes(entries: &[(&str, bool, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    let mut directory = Vec::new();
    for (name, compressed, bytes) in entries {
        let ofs = 12 + body.len();
        body.extend_from_slice(bytes);

        push_i32(&mut directory, ofs as i32);
        push_i32(&mut directory, bytes.len() as i32);
        push_i32(&mut directory, bytes.len() as i32);
        directory.push(0x43);
        directory.push(*compressed as u8);
        push_u16(&mut directory, 0);
        push_name(&mut directory, name);
    }

    let mut buf = b"WAD3".to_vec();
    push_i32(&mut buf, entries.len() as i32);
    push_i32(&mut buf, 12 + body.len() as i32);
    buf.extend_from_slice(&body);
    buf.extend_from_slice(&directory);
    buf
}

/// Palette mapping index `i` to `(i, i, i)`.
pub fn gray_palette() -> Vec<u8> {
    (0..=255u8).flat_map(|i| [i, i, i]).collect()
}

/// One plane at z = 0 splitting space into two empty leaves, no surfaces.
pub fn minimal_map() -> Vec<u8> {
    let mut map = MapBuilder::new(30);
    map.plane(Vec3::Z, 0.0, 2)
        .node(0, -1, -2)
        .leaf(-1, -1, 0, 0)
        .leaf(-1, -1, 0, 0)
        .hull(0, 2, 0, 0);
    map.build()
}

/// A 64x64 textured and lit quad at z = 0, seen from both leaves of an x = 0 split.
///
/// Leaf 0 has a visibility row showing leaf 1, leaf 1 has none.
pub struct QuadMap {
    version: i32,
    scale: f32,
    num_edges: u16,
    lit: bool,
    external: bool,
}

impl QuadMap {
    /// Value of every light sample.
    pub const LIGHT: u8 = 100;
    /// Palette index of every texel.
    pub const TEXEL: u8 = 7;
    /// Colour of [`Self::TEXEL`] in the palette embedded in version 30 textures.
    pub const EMBEDDED_COLOR: [u8; 3] = [200, 100, 50];
    pub const ENTITIES: &'static str = "{\n\"classname\" \"worldspawn\"\n}\n";

    pub fn new(version: i32) -> Self {
        Self {
            version,
            scale: 1.0,
            num_edges: 4,
            lit: true,
            external: false,
        }
    }

    pub fn unlit(mut self) -> Self {
        self.lit = false;
        self
    }

    pub fn external_texture(mut self) -> Self {
        self.external = true;
        self
    }

    pub fn edges(mut self, count: u16) -> Self {
        self.num_edges = count;
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut map = MapBuilder::new(self.version);
        let mut entities = Self::ENTITIES.as_bytes().to_vec();
        entities.push(0);
        *map.lump_mut(LumpType::Entities) = entities;

        map.plane(Vec3::X, 0.0, 0)
            .node(0, -1, -2)
            .leaf(-1, 0, 0, 1)
            .leaf(-1, -1, 0, 1)
            .mark_surface(0)
            .hull(0, 2, 0, 1);
        map.lump_mut(LumpType::Visibility).push(0b0000_0001);

        for v in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(64.0, 0.0, 0.0),
            Vec3::new(64.0, 64.0, 0.0),
            Vec3::new(0.0, 64.0, 0.0),
        ] {
            map.vertex(v * self.scale);
        }
        // edge 0 is never referenced
        map.edge(0, 0).edge(0, 1).edge(1, 2).edge(2, 3).edge(0, 3);
        map.surfedge(1).surfedge(2).surfedge(3).surfedge(-4);

        let light_ofs = if self.lit { 0 } else { -1 };
        map.face(0, self.num_edges, 0, light_ofs)
            .texinfo(Vec3::X, Vec3::Y, 0);

        let channels = if self.version == 29 { 1 } else { 3 };
        *map.lump_mut(LumpType::Lighting) = vec![Self::LIGHT; 5 * 5 * channels];

        let texture = if self.external {
            miptex_external("wall", 16, 16)
        } else if self.version == 29 {
            miptex_embedded("wall", 16, 16, Self::TEXEL, None)
        } else {
            let mut palette = vec![0; 768];
            let i = Self::TEXEL as usize * 3;
            palette[i..i + 3].copy_from_slice(&Self::EMBEDDED_COLOR);
            miptex_embedded("wall", 16, 16, Self::TEXEL, Some(palette.as_slice()))
        };
        *map.lump_mut(LumpType::MipTextures) = mip_lump(&[Some(texture)]);

        map.build()
    }
}

/// The default [`QuadMap`].
pub fn quad_map(version: i32) -> Vec<u8> {
    QuadMap::new(version).build()
}
