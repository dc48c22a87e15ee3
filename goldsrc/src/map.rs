use std::{ops::Range, sync::Arc};

use ahash::AHashMap;
use glam::Vec3;

use crate::{
    bsp::{
        clipnode::BSPClipNode,
        consts::LumpType,
        edges::BSPEdge,
        face::BSPFace,
        leaf::{BSPLeaf, BSPMarkSurface},
        lightmap::{extract_lightmap, LightmapExtents, LightmapTile},
        model::BSPHull,
        node::BSPNode,
        plane::BSPPlane,
        textures::BSPTexInfo,
        tree::find_leaf,
        vis::{PotentiallyVisible, VisibleLeaves},
        BSPFile,
    },
    error::{BspError, LoadWarning},
    game_data::{LoadOptions, UnlitSurfacePolicy},
    meshes::{surface_polygon, SurfaceMesh},
    palette::Palette,
    texture::{Texture, TextureResolver},
    wad::Wad3,
};

/// A loaded map.
///
/// Built once by [`Map::from_parts`] and immutable afterwards.
pub struct Map {
    file: BSPFile,
    palette: Palette,
    wads: Vec<Wad3>,
    textures: Vec<Option<Arc<Texture>>>,
    leaf_meshes: Vec<Vec<Arc<SurfaceMesh>>>,
    warnings: Vec<LoadWarning>,
}

impl Map {
    /// Parses `data` and builds the renderable surfaces of every leaf.
    ///
    /// `wads` are searched in order for textures the map does not embed.
    pub fn from_parts(
        data: Vec<u8>,
        palette: Palette,
        wads: Vec<Wad3>,
        options: LoadOptions,
    ) -> Result<Self, BspError> {
        let file = BSPFile::parse(data)?;
        let mut warnings: Vec<_> = wads
            .iter()
            .flat_map(Wad3::skipped)
            .map(|name| LoadWarning::CompressedEntrySkipped { name: name.clone() })
            .collect();

        let textures = TextureResolver::new(file.version(), &palette, &wads, options.missing_texture)
            .resolve_all(file.lump_bytes(LumpType::MipTextures), &mut warnings)?;

        let leaf_meshes = LeafMeshBuilder {
            file: &file,
            textures: &textures,
            options,
            full_bright: Arc::new(LightmapTile::full_bright()),
            cache: AHashMap::new(),
            warnings: &mut warnings,
        }
        .build()?;

        let map = Self {
            file,
            palette,
            wads,
            textures,
            leaf_meshes,
            warnings,
        };

        log::info!("Map version {}", map.version());
        log::info!("{} hulls", map.hull_count());
        log::info!("{} planes", map.plane_count());
        log::info!("{} surfaces", map.surface_count());
        log::info!("{} nodes", map.node_count());
        log::info!("{} leaves", map.leaf_count());
        log::info!("{} texture infos", map.texture_info_count());
        if !map.warnings.is_empty() {
            log::warn!("{} problems while loading", map.warnings.len());
        }

        Ok(map)
    }

    pub fn version(&self) -> i32 {
        self.file.version()
    }

    pub fn file(&self) -> &BSPFile {
        &self.file
    }

    /// Leaf of `hull_id`'s render tree containing `position`.
    pub fn find_leaf_at(&self, position: Vec3, hull_id: usize) -> Result<usize, BspError> {
        let hull = self.hull(hull_id)?;
        find_leaf(&self.file, hull.head_nodes()[0], position)
    }

    /// Leaves that may be seen from `leaf_id`.
    ///
    /// Leaves without a visibility row see the whole hull.
    pub fn potentially_visible(
        &self,
        leaf_id: usize,
        hull_id: usize,
    ) -> Result<PotentiallyVisible<'_>, BspError> {
        let hull = self.hull(hull_id)?;
        let leaf = self.leaf(leaf_id)?;

        Ok(match leaf.vis_offset() {
            Some(offset) => {
                PotentiallyVisible::Pvs(VisibleLeaves::new(self.visibility_list(offset), hull.vis_leafs()))
            }
            None => PotentiallyVisible::All(self.hull_leaves(hull_id)?),
        })
    }

    /// Visibility lump from `offset` to its end, empty past the end.
    pub fn visibility_list(&self, offset: usize) -> &[u8] {
        self.file
            .lump_bytes(LumpType::Visibility)
            .get(offset..)
            .unwrap_or(&[])
    }

    /// First leaf id belonging to a hull, the sum of the visible leaves of the hulls before it.
    pub fn hull_first_leaf_id(&self, hull_id: usize) -> Result<usize, BspError> {
        (0..hull_id).try_fold(0, |sum, h| Ok(sum + self.hull(h)?.vis_leafs()))
    }

    pub fn hull_leaves(&self, hull_id: usize) -> Result<Range<usize>, BspError> {
        let first = self.hull_first_leaf_id(hull_id)?;
        Ok(first..first + self.hull(hull_id)?.vis_leafs())
    }

    pub fn hull(&self, id: usize) -> Result<BSPHull, BspError> {
        self.file.get(id)
    }

    pub fn leaf(&self, id: usize) -> Result<BSPLeaf, BspError> {
        self.file.get(id)
    }

    pub fn plane(&self, id: usize) -> Result<BSPPlane, BspError> {
        self.file.get(id)
    }

    pub fn node(&self, id: usize) -> Result<BSPNode, BspError> {
        self.file.get(id)
    }

    pub fn face(&self, id: usize) -> Result<BSPFace, BspError> {
        self.file.get(id)
    }

    pub fn tex_info(&self, id: usize) -> Result<BSPTexInfo, BspError> {
        self.file.get(id)
    }

    pub fn clip_node(&self, id: usize) -> Result<BSPClipNode, BspError> {
        self.file.get(id)
    }

    /// Surfaces of a leaf in mark surface order. Unknown leaves have none.
    pub fn leaf_meshes(&self, leaf_id: usize) -> &[Arc<SurfaceMesh>] {
        self.leaf_meshes
            .get(leaf_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolved texture of a mip texture slot.
    pub fn texture(&self, tex_id: usize) -> Option<&Arc<Texture>> {
        self.textures.get(tex_id).and_then(Option::as_ref)
    }

    pub fn textures(&self) -> &[Option<Arc<Texture>>] {
        &self.textures
    }

    /// The raw entity lump, without its trailing NUL.
    pub fn entities(&self) -> String {
        let bytes = self.file.lump_bytes(LumpType::Entities);
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn wads(&self) -> &[Wad3] {
        &self.wads
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn plane_count(&self) -> usize {
        self.file.count::<BSPPlane>()
    }

    pub fn node_count(&self) -> usize {
        self.file.count::<BSPNode>()
    }

    pub fn leaf_count(&self) -> usize {
        self.file.count::<BSPLeaf>()
    }

    pub fn surface_count(&self) -> usize {
        self.file.count::<BSPFace>()
    }

    pub fn hull_count(&self) -> usize {
        self.file.count::<BSPHull>()
    }

    pub fn texture_info_count(&self) -> usize {
        self.file.count::<BSPTexInfo>()
    }

    pub fn vertex_count(&self) -> usize {
        self.file.count::<Vec3>()
    }

    pub fn edge_count(&self) -> usize {
        self.file.count::<BSPEdge>()
    }

    pub fn clip_node_count(&self) -> usize {
        self.file.count::<BSPClipNode>()
    }
}

/// Load time state for turning leaves into meshes. Surfaces shared by several leaves are
/// built once.
struct LeafMeshBuilder<'a> {
    file: &'a BSPFile,
    textures: &'a [Option<Arc<Texture>>],
    options: LoadOptions,
    full_bright: Arc<LightmapTile>,
    /// `None` marks surfaces that were dropped.
    cache: AHashMap<usize, Option<Arc<SurfaceMesh>>>,
    warnings: &'a mut Vec<LoadWarning>,
}

impl LeafMeshBuilder<'_> {
    fn build(mut self) -> Result<Vec<Vec<Arc<SurfaceMesh>>>, BspError> {
        let leaf_count = self.file.count::<BSPLeaf>();
        let mut leaves = Vec::with_capacity(leaf_count);

        for leaf_id in 0..leaf_count {
            let leaf = self.file.get::<BSPLeaf>(leaf_id)?;
            let mut meshes = Vec::with_capacity(leaf.num_mark_surfaces as usize);

            for mark in leaf.mark_surfaces() {
                let BSPMarkSurface(surface) = self.file.get::<BSPMarkSurface>(mark)?;
                if let Some(mesh) = self.surface(surface as usize)? {
                    meshes.push(mesh);
                }
            }
            leaves.push(meshes);
        }

        log::debug!("Built {} unique surfaces", self.cache.len());
        Ok(leaves)
    }

    fn surface(&mut self, id: usize) -> Result<Option<Arc<SurfaceMesh>>, BspError> {
        if let Some(mesh) = self.cache.get(&id) {
            return Ok(mesh.clone());
        }
        let mesh = self.build_surface(id)?.map(Arc::new);
        self.cache.insert(id, mesh.clone());
        Ok(mesh)
    }

    fn build_surface(&mut self, id: usize) -> Result<Option<SurfaceMesh>, BspError> {
        let face = self.file.get::<BSPFace>(id)?;
        let tex_info = self.file.get::<BSPTexInfo>(face.tex_info as usize)?;

        let tex_id = usize::try_from(tex_info.tex_id).unwrap_or(usize::MAX);
        let texture = match self.textures.get(tex_id) {
            Some(Some(texture)) => texture.clone(),
            Some(None) => {
                log::debug!("Surface {id} has no texture, skipped");
                return Ok(None);
            }
            None => {
                return Err(BspError::IndexOutOfRange {
                    lump: LumpType::MipTextures,
                    index: tex_id,
                    count: self.textures.len(),
                })
            }
        };

        let polygon = surface_polygon(self.file, &face)?;
        if polygon.len() < 3 {
            log::warn!("Surface {id} has {} edges, skipped", polygon.len());
            self.warnings.push(LoadWarning::DegenerateSurface {
                surface: id,
                edges: polygon.len(),
            });
            return Ok(None);
        }

        let Some(light_ofs) = face.light_offset() else {
            return Ok(match self.options.unlit_surface {
                UnlitSurfacePolicy::FullBright => Some(SurfaceMesh::new(
                    id,
                    &polygon,
                    &tex_info,
                    texture,
                    self.full_bright.clone(),
                    None,
                )),
                UnlitSurfacePolicy::Drop => {
                    log::debug!("Surface {id} has no lightmap, dropped");
                    self.warnings
                        .push(LoadWarning::UnlitSurfaceDropped { surface: id });
                    None
                }
            });
        };

        let extents =
            LightmapExtents::from_points(polygon.iter().map(|&p| tex_info.project_f64(p)));
        let lightmap = extract_lightmap(
            self.file.lump_bytes(LumpType::Lighting),
            light_ofs,
            &extents,
            self.file.version(),
        )?;

        Ok(Some(SurfaceMesh::new(
            id,
            &polygon,
            &tex_info,
            texture,
            Arc::new(lightmap),
            Some(&extents),
        )))
    }
}
