//! Level-synchronized emission of header + packed tree (spec §4.6).

use std::io::Write;

use crate::bits::BitWriter;
use crate::codec::format::write_header;
use crate::error::Result;
use crate::logger::{NullSink, ProgressSink};
use crate::tree::{Tree, BOTTOM_LEFT, BOTTOM_RIGHT, TOP_LEFT, TOP_RIGHT};

const QUADRANT_ORDER: [usize; 4] = [TOP_LEFT, TOP_RIGHT, BOTTOM_RIGHT, BOTTOM_LEFT];

/// Encodes `tree` into a complete QTC byte stream (header + payload).
pub fn encode(tree: &Tree, out: &mut impl Write) -> Result<()> {
    encode_with_progress(tree, out, &NullSink)
}

pub fn encode_with_progress(tree: &Tree, out: &mut impl Write, progress: &dyn ProgressSink) -> Result<()> {
    progress.begin("encoding", tree.node_count() as u64);

    // Pass one: write the packed payload to a scratch sink so the exact bit
    // count is known before the header is framed.
    let mut scratch = BitWriter::new(Vec::new());
    emit_level_synchronous(tree, &mut scratch, progress)?;
    scratch.flush()?;
    let payload = scratch.into_inner();

    let rate = crate::compression_rate_pct(tree.side() as usize, payload.len());

    write_header(out, tree.depth, rate)?;
    out.write_all(&payload)?;
    progress.finish();
    Ok(())
}

/// Writes just the bit-packed tree payload (no header), returning the exact
/// bit count written. Exposed for testing against the worked scenarios in
/// spec.md §8.
pub fn encode_payload(tree: &Tree) -> Result<(Vec<u8>, u64)> {
    let mut writer = BitWriter::new(Vec::new());
    emit_level_synchronous(tree, &mut writer, &NullSink)?;
    let total_bits = writer.total_bits();
    writer.flush()?;
    Ok((writer.into_inner(), total_bits))
}

fn emit_level_synchronous(tree: &Tree, writer: &mut BitWriter<Vec<u8>>, progress: &dyn ProgressSink) -> Result<()> {
    let root = &tree.root;
    // The root is conceptually index 0 within its (nonexistent) parent, so
    // its mean is always transmitted.
    writer.write_bits(root.m as u32, 8)?;
    if tree.depth > 0 {
        writer.write_bits(root.e as u32, 2)?;
        if root.e == 0 {
            writer.write_bit(root.u)?;
        }
    }
    progress.advance(1);

    let mut frontier: Vec<&crate::tree::QuadNode> = vec![root];
    for level in 1..=tree.depth {
        let is_leaf_level = level == tree.depth;
        let mut next_frontier = Vec::new();
        for parent in frontier {
            if parent.u {
                continue;
            }
            let children = parent
                .children
                .as_ref()
                .expect("non-uniform node must have children");
            for (j, &idx) in QUADRANT_ORDER.iter().enumerate() {
                let child = &children[idx];
                let is_interpolated = j == 3;
                if !is_interpolated {
                    writer.write_bits(child.m as u32, 8)?;
                }
                if !is_leaf_level {
                    writer.write_bits(child.e as u32, 2)?;
                    if child.e == 0 {
                        writer.write_bit(child.u)?;
                    }
                }
                progress.advance(1);
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }
    Ok(())
}
