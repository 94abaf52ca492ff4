//! Recursive node variance and summary statistics (spec §4.2).

use crate::tree::QuadNode;

/// Recomputes `v` bottom-up for every node in the subtree, in place.
/// Leaves (no children) always carry `v = 0.0`.
pub fn refresh(node: &mut QuadNode) {
    let Some(children) = node.children.as_mut() else {
        node.v = 0.0;
        return;
    };
    for child in children.iter_mut() {
        refresh(child);
    }
    let m = node.m as f64;
    let mu: f64 = children
        .iter()
        .map(|c| c.v * c.v + (m - c.m as f64).powi(2))
        .sum();
    node.v = (mu / 4.0).sqrt();
}

/// Summary statistics over all non-zero node variances in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeStats {
    pub median_variance: f64,
    pub max_variance: f64,
}

pub fn summarize(root: &QuadNode) -> TreeStats {
    let mut values = Vec::new();
    collect_nonzero(root, &mut values);
    if values.is_empty() {
        return TreeStats {
            median_variance: 0.0,
            max_variance: 0.0,
        };
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let median_variance = values[values.len() / 2];
    let max_variance = *values.last().unwrap();
    TreeStats {
        median_variance,
        max_variance,
    }
}

fn collect_nonzero(node: &QuadNode, out: &mut Vec<f64>) {
    if node.v != 0.0 {
        out.push(node.v);
    }
    if let Some(children) = &node.children {
        for c in children.iter() {
            collect_nonzero(c, out);
        }
    }
}
