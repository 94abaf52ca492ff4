//! Segmentation grid renderer (spec §4.9, collaborator).
//!
//! Draws one-pixel horizontal and vertical mid-lines (mid-gray) inside
//! every non-leaf region, plus an outer border. A trivial recursion over
//! the same tree; not part of the codec invariants.

use crate::error::Result;
use crate::raster::PixelBuffer;
use crate::tree::{Tree, BOTTOM_LEFT, BOTTOM_RIGHT, TOP_LEFT, TOP_RIGHT};

const MID_GRAY: u8 = 128;

/// Renders the tree's partition structure over its own reconstructed
/// pixels, for visual inspection of where the quadtree split.
pub fn render(tree: &Tree) -> Result<PixelBuffer> {
    let mut buf = crate::raster::reconstruct(tree)?;
    draw_border(&mut buf);
    draw_node(&mut buf, &tree.root, 0, 0, tree.side() as usize);
    Ok(buf)
}

fn draw_border(buf: &mut PixelBuffer) {
    let side = buf.side();
    for i in 0..side {
        buf.set(0, i, MID_GRAY);
        buf.set(side - 1, i, MID_GRAY);
        buf.set(i, 0, MID_GRAY);
        buf.set(i, side - 1, MID_GRAY);
    }
}

fn draw_node(buf: &mut PixelBuffer, node: &crate::tree::QuadNode, row: usize, col: usize, size: usize) {
    if node.u || size <= 1 {
        return;
    }
    let h = size / 2;
    for i in 0..size {
        buf.set(row + h, col + i, MID_GRAY);
        buf.set(row + i, col + h, MID_GRAY);
    }
    let Some(children) = &node.children else {
        return;
    };
    let positions = [
        (row, col),
        (row, col + h),
        (row + h, col + h),
        (row + h, col),
    ];
    draw_node(buf, &children[TOP_LEFT], positions[TOP_LEFT].0, positions[TOP_LEFT].1, h);
    draw_node(buf, &children[TOP_RIGHT], positions[TOP_RIGHT].0, positions[TOP_RIGHT].1, h);
    draw_node(buf, &children[BOTTOM_RIGHT], positions[BOTTOM_RIGHT].0, positions[BOTTOM_RIGHT].1, h);
    draw_node(buf, &children[BOTTOM_LEFT], positions[BOTTOM_LEFT].0, positions[BOTTOM_LEFT].1, h);
}
