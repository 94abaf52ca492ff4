//! The pixel buffer (spec §3 "Image") and the tree-to-pixels reconstructor
//! (spec §4.8).

use crate::error::{CodecError, Result};
use crate::tree::{Tree, BOTTOM_LEFT, BOTTOM_RIGHT, TOP_LEFT, TOP_RIGHT};

/// A square 8-bit grayscale raster, side `S = 2^L`, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    side: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Builds a buffer from row-major pixel data. `side` must be a power of
    /// two and `data.len()` must equal `side * side`.
    pub fn new(side: usize, data: Vec<u8>) -> Result<Self> {
        if side == 0 || !side.is_power_of_two() {
            return Err(CodecError::size(format!(
                "side {side} is not a positive power of two"
            )));
        }
        if data.len() != side * side {
            return Err(CodecError::size(format!(
                "expected {} pixels for side {side}, got {}",
                side * side,
                data.len()
            )));
        }
        Ok(PixelBuffer { side, data })
    }

    /// Allocates a blank (zero-filled) buffer of the given side.
    pub fn blank(side: usize) -> Result<Self> {
        if side == 0 || !side.is_power_of_two() {
            return Err(CodecError::size(format!(
                "side {side} is not a positive power of two"
            )));
        }
        Ok(PixelBuffer {
            side,
            data: vec![0u8; side * side],
        })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn depth(&self) -> u32 {
        self.side.trailing_zeros()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.side + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.data[row * self.side + col] = value;
    }

    /// Fills the square region `[row, row+size) x [col, col+size)` with a
    /// single value.
    fn fill_region(&mut self, row: usize, col: usize, size: usize, value: u8) {
        for r in row..row + size {
            let start = r * self.side + col;
            self.data[start..start + size].fill(value);
        }
    }
}

/// Reconstructs a pixel buffer from a decoded (or freshly built) tree.
pub fn reconstruct(tree: &Tree) -> Result<PixelBuffer> {
    let side = tree.side() as usize;
    let mut buf = PixelBuffer::blank(side)?;
    fill_node(&mut buf, &tree.root, 0, 0, side);
    Ok(buf)
}

fn fill_node(buf: &mut PixelBuffer, node: &crate::tree::QuadNode, row: usize, col: usize, size: usize) {
    if node.u || size == 1 {
        buf.fill_region(row, col, size, node.m);
        return;
    }
    let children = node
        .children
        .as_ref()
        .expect("non-uniform node above leaf level must have children");
    let h = size / 2;
    let positions = [
        (row, col),
        (row, col + h),
        (row + h, col + h),
        (row + h, col),
    ];
    fill_node(buf, &children[TOP_LEFT], positions[TOP_LEFT].0, positions[TOP_LEFT].1, h);
    fill_node(buf, &children[TOP_RIGHT], positions[TOP_RIGHT].0, positions[TOP_RIGHT].1, h);
    fill_node(buf, &children[BOTTOM_RIGHT], positions[BOTTOM_RIGHT].0, positions[BOTTOM_RIGHT].1, h);
    fill_node(buf, &children[BOTTOM_LEFT], positions[BOTTOM_LEFT].0, positions[BOTTOM_LEFT].1, h);
}
