//! Header parse + level-synchronized tree reconstruction (spec §4.7).

use std::io::Read;

use crate::bits::BitReader;
use crate::codec::format::read_header;
use crate::error::{CodecError, Result};
use crate::logger::{NullSink, ProgressSink};
use crate::tree::{QuadNode, Tree};

/// Decodes a complete QTC byte stream (header + payload) into a tree.
pub fn decode(input: &mut impl Read) -> Result<Tree> {
    decode_with_progress(input, &NullSink)
}

pub fn decode_with_progress(input: &mut impl Read, progress: &dyn ProgressSink) -> Result<Tree> {
    let header = read_header(&mut *input)?;
    let mut reader = BitReader::new(input);
    progress.begin("decoding", 1u64 << (2 * header.depth).min(32));
    let root = decode_node_tree(&mut reader, header.depth, progress)?;
    if reader.has_error() {
        return Err(CodecError::format("truncated QTC payload"));
    }
    Ok(Tree {
        root,
        depth: header.depth,
    })
}

/// Decodes just the bit-packed payload given a known depth. Exposed for
/// testing against the worked scenarios in spec.md §8.
pub fn decode_payload(payload: &[u8], depth: u32) -> Result<Tree> {
    let mut reader = BitReader::new(payload);
    let root = decode_node_tree(&mut reader, depth, &NullSink)?;
    if reader.has_error() {
        return Err(CodecError::format("truncated QTC payload"));
    }
    Ok(Tree { root, depth })
}

fn decode_node_tree(reader: &mut BitReader<impl Read>, depth: u32, progress: &dyn ProgressSink) -> Result<QuadNode> {
    let m = reader.read_bits(8) as u8;
    let (e, u) = if depth > 0 {
        let e = reader.read_bits(2) as u8;
        let u = if e == 0 { reader.read_bit() } else { false };
        (e, u)
    } else {
        (0u8, true)
    };
    let mut root = QuadNode {
        m,
        e,
        u,
        v: 0.0,
        children: None,
    };
    progress.advance(1);

    let mut frontier: Vec<&mut QuadNode> = vec![&mut root];
    for level in 1..=depth {
        let is_leaf_level = level == depth;
        let mut next_frontier: Vec<&mut QuadNode> = Vec::new();
        for parent in frontier {
            if parent.u {
                continue;
            }
            let parent_m = parent.m as i32;
            let parent_e = parent.e as i32;
            let mut means = [0u8; 3];
            let mut kids: [QuadNode; 4] = std::array::from_fn(|_| QuadNode::leaf(0));
            for j in 0..4usize {
                let m_j = if j < 3 {
                    let v = reader.read_bits(8) as u8;
                    means[j] = v;
                    v
                } else {
                    let sum3 = means[0] as i32 + means[1] as i32 + means[2] as i32;
                    let target = 4 * parent_m + parent_e - sum3;
                    if !(0..=255).contains(&target) {
                        return Err(CodecError::format(format!(
                            "fourth-mean identity out of range: {target}"
                        )));
                    }
                    target as u8
                };
                let (e_j, u_j) = if is_leaf_level {
                    (0u8, true)
                } else {
                    let e_j = reader.read_bits(2) as u8;
                    let u_j = if e_j == 0 { reader.read_bit() } else { false };
                    (e_j, u_j)
                };
                kids[j] = QuadNode {
                    m: m_j,
                    e: e_j,
                    u: u_j,
                    v: 0.0,
                    children: None,
                };
                progress.advance(1);
            }
            parent.children = Some(Box::new(kids));
            for child in parent.children.as_mut().unwrap().iter_mut() {
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }
    Ok(root)
}
