use glam::Vec3;

use super::{
    file::BSPFile,
    leaf::BSPLeaf,
    node::{BSPNode, NodeChild},
    plane::BSPPlane,
};
use crate::error::BspError;

/// Walks the tree from `head_node` down to the leaf containing `position`.
///
/// A point exactly on a plane goes to the front child. The walk is iterative and refuses to
/// enter a node twice, so a cyclic tree is reported instead of looping forever.
pub fn find_leaf(file: &BSPFile, head_node: i32, position: Vec3) -> Result<usize, BspError> {
    let node_count = file.count::<BSPNode>();
    let leaf_count = file.count::<BSPLeaf>();
    let mut visited = vec![0u64; node_count.div_ceil(64)];

    let mut child = NodeChild::from_raw(head_node);
    loop {
        match child {
            NodeChild::Leaf(leaf) => {
                if leaf >= leaf_count {
                    return Err(BspError::corrupt(format!(
                        "tree points at leaf {leaf}, map has {leaf_count}"
                    )));
                }
                return Ok(leaf);
            }
            NodeChild::Node(index) => {
                if index >= node_count {
                    return Err(BspError::corrupt(format!(
                        "tree points at node {index}, map has {node_count}"
                    )));
                }
                let (word, bit) = (index / 64, 1u64 << (index % 64));
                if visited[word] & bit != 0 {
                    return Err(BspError::corrupt(format!("cycle through node {index}")));
                }
                visited[word] |= bit;

                let node = file.get::<BSPNode>(index)?;
                let plane_num = usize::try_from(node.plane_num).map_err(|_| {
                    BspError::corrupt(format!("node {index} has plane {}", node.plane_num))
                })?;
                let plane = file.get::<BSPPlane>(plane_num)?;

                child = if plane.distance_to(position) >= 0.0 {
                    node.front()
                } else {
                    node.back()
                };
            }
        }
    }
}
