//! Bottom-up construction of a quadtree from a pixel buffer (spec §4.1).

use crate::error::Result;
use crate::raster::PixelBuffer;
use crate::tree::{QuadNode, Tree};

/// Builds a tree of depth `log2(buf.side())` from the given pixel buffer.
pub fn build(buf: &PixelBuffer) -> Result<Tree> {
    let side = buf.side();
    let root = build_region(buf, 0, 0, side);
    Ok(Tree {
        root,
        depth: buf.depth(),
    })
}

fn build_region(buf: &PixelBuffer, row: usize, col: usize, size: usize) -> QuadNode {
    if size == 1 {
        return QuadNode::leaf(buf.get(row, col));
    }
    let h = size / 2;
    // Quadrant order: TopLeft, TopRight, BottomRight, BottomLeft.
    let children = [
        build_region(buf, row, col, h),
        build_region(buf, row, col + h, h),
        build_region(buf, row + h, col + h, h),
        build_region(buf, row + h, col, h),
    ];

    let sum: u32 = children.iter().map(|c| c.m as u32).sum();
    let m = (sum / 4) as u8;
    let e = (sum % 4) as u8;
    let all_equal = children.iter().all(|c| c.m == children[0].m);
    let u = children.iter().all(|c| c.u) && all_equal && e == 0;

    QuadNode {
        m,
        e,
        u,
        v: 0.0,
        children: if u { None } else { Some(Box::new(children)) },
    }
}
