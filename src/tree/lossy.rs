//! Adaptive variance-based lossy merge pass (spec §4.3).
//!
//! Resolves the Open Question in spec.md §9 by taking option (b): variances
//! are fully refreshed bottom-up (`variance::refresh`) before the top-down
//! merge decision runs, rather than recomputing a node's variance from
//! children that have not yet been refreshed this pass.

use crate::error::{CodecError, Result};
use crate::tree::variance::{refresh, summarize};
use crate::tree::{QuadNode, Tree};

/// Applies the lossy filter in place. `alpha` must be strictly greater than
/// one; `alpha <= 1` is rejected as an invalid parameter.
pub fn apply(tree: &mut Tree, alpha: f64) -> Result<()> {
    if alpha <= 1.0 {
        return Err(CodecError::invalid_parameter(format!(
            "lossy alpha must be > 1, got {alpha}"
        )));
    }
    refresh(&mut tree.root);
    let stats = summarize(&tree.root);
    if stats.max_variance == 0.0 {
        return Ok(());
    }
    let theta0 = stats.median_variance / stats.max_variance;
    merge(&mut tree.root, theta0, alpha);
    Ok(())
}

/// Visits `node` with merge threshold `theta`, returning whether the
/// subtree rooted at `node` ended up uniform. Scales the threshold by
/// `alpha` on each recursive step, so deeper (smaller, less salient)
/// regions merge more readily.
fn merge(node: &mut QuadNode, theta: f64, alpha: f64) -> bool {
    let Some(children) = node.children.as_mut() else {
        return node.u;
    };

    let child_theta = theta * alpha;
    let mut all_children_uniform = true;
    for child in children.iter_mut() {
        if !merge(child, child_theta, alpha) {
            all_children_uniform = false;
        }
    }

    if node.v <= theta && all_children_uniform {
        node.u = true;
        node.e = 0;
        node.children = None;
        return true;
    }

    let children = node.children.as_ref().unwrap();
    let all_equal_means = children.iter().all(|c| c.m == children[0].m);
    node.u = all_children_uniform && all_equal_means && node.e == 0;
    if node.u {
        // Mathematically this only triggers when `node.v` was already
        // `<= theta` (uniform, zero-variance children force v == 0), so
        // treat it identically to the merge branch above rather than
        // leaving a u=1 node with live children.
        node.e = 0;
        node.children = None;
    }
    node.u
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelBuffer;
    use crate::tree::builder::build;

    #[test]
    fn rejects_non_positive_alpha() {
        let buf = PixelBuffer::new(2, vec![1, 2, 3, 4]).unwrap();
        let mut tree = build(&buf).unwrap();
        assert!(apply(&mut tree, 1.0).is_err());
        assert!(apply(&mut tree, 0.5).is_err());
    }

    #[test]
    fn already_uniform_tree_is_a_no_op() {
        let buf = PixelBuffer::new(4, vec![3; 16]).unwrap();
        let mut tree = build(&buf).unwrap();
        let before = tree.node_count();
        apply(&mut tree, 2.0).unwrap();
        assert_eq!(tree.node_count(), before);
    }

    #[test]
    fn checkerboard_never_merges() {
        let pixels: Vec<u8> = (0..64)
            .map(|i| if (i / 8 + i % 8) % 2 == 0 { 0 } else { 255 })
            .collect();
        let buf = PixelBuffer::new(8, pixels).unwrap();
        let mut tree = build(&buf).unwrap();
        let before = tree.node_count();
        apply(&mut tree, 2.0).unwrap();
        assert_eq!(tree.node_count(), before);
    }

    #[test]
    fn half_uniform_image_collapses_that_half() {
        // Top half solid black, bottom half a checkerboard.
        let mut pixels = vec![0u8; 64];
        for r in 4..8 {
            for c in 0..8 {
                pixels[r * 8 + c] = if (r + c) % 2 == 0 { 0 } else { 255 };
            }
        }
        let buf = PixelBuffer::new(8, pixels).unwrap();
        let mut tree = build(&buf).unwrap();
        let before = tree.node_count();
        apply(&mut tree, 2.0).unwrap();
        assert!(tree.node_count() <= before);
        // The top-left quadrant at depth 1 should have collapsed.
        let children = tree.root.children.as_ref().unwrap();
        assert!(children[crate::tree::TOP_LEFT].u);
    }

    #[test]
    fn monotonic_retained_node_count() {
        let pixels: Vec<u8> = (0..256u32).map(|i| ((i * 37) % 256) as u8).collect();
        let buf = PixelBuffer::new(16, pixels).unwrap();
        let mut tree = build(&buf).unwrap();
        let before = tree.node_count();
        apply(&mut tree, 3.0).unwrap();
        assert!(tree.node_count() <= before);
    }
}
