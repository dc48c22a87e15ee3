use std::{path::Path, process::ExitCode};

use common::vfile::VFileSystem;
use env_logger::Env;
use glam::Vec3;
use goldsrc::{load_map, Map, MapConfig};

/// bsp-readout <config.ini> [x y z]
fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(config_path) = args.first() else {
        log::error!("usage: bsp-readout <config.ini> [x y z]");
        return ExitCode::FAILURE;
    };

    let position = match parse_position(&args[1..]) {
        Ok(position) => position,
        Err(e) => {
            log::error!("Bad position: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match MapConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Cannot read {config_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    // paths in the config are relative to it
    let root = Path::new(config_path)
        .parent()
        .unwrap_or_else(|| Path::new("."));
    let fs = VFileSystem::new(root);

    let map = match load_map(&config, &fs) {
        Ok(map) => map,
        Err(e) => {
            log::error!("Failed to load {:?}: {e}", config.map());
            return ExitCode::FAILURE;
        }
    };

    readout(&map, position);
    ExitCode::SUCCESS
}

fn parse_position(args: &[String]) -> Result<Vec3, std::num::ParseFloatError> {
    match args {
        [x, y, z, ..] => Ok(Vec3::new(x.parse()?, y.parse()?, z.parse()?)),
        _ => Ok(Vec3::ZERO),
    }
}

fn readout(map: &Map, position: Vec3) {
    log::info!("Vertices: {}", map.vertex_count());
    log::info!("Edges: {}", map.edge_count());
    log::info!("Clip nodes: {}", map.clip_node_count());
    log::info!("Textures: {}", map.textures().iter().flatten().count());
    log::info!("Entities: {} bytes", map.entities().len());

    for warning in map.warnings() {
        log::warn!("{warning}");
    }

    for hull_id in 0..map.hull_count() {
        let leaf = match map.find_leaf_at(position, hull_id) {
            Ok(leaf) => leaf,
            Err(e) => {
                log::warn!("Hull {hull_id}: {e}");
                continue;
            }
        };

        let contents = map.leaf(leaf).ok().and_then(|l| l.contents());
        let visible = map
            .potentially_visible(leaf, hull_id)
            .map(|leaves| leaves.count())
            .unwrap_or_default();
        let surfaces: usize = map.leaf_meshes(leaf).len();

        log::info!(
            "Hull {hull_id}: {position} is in leaf {leaf} ({contents:?}), {surfaces} surfaces, {visible} leaves visible"
        );
    }
}
