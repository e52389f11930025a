//! Scaffold segments between two node rings.
//!
//! A single pointer walks the next ring while the current ring is visited
//! in order:
//!
//! | Action     | Connects                      | Pointer |
//! |------------|-------------------------------|---------|
//! | `Carry`    | `j → next[k]`                 | `k + 1` |
//! | `Increase` | `j → next[k]`, `j → next[k+1]`| `k + 2` |
//! | `Decrease` | `j → next[k]`                 | `k`     |
//!
//! Because the advances sum to the next count, every next node receives at
//! least one segment and segments never cross. Consecutive decreases keep
//! the pointer in place, so a run of `N` decreases merges `N + 1` current
//! stitches into one next stitch.

use crate::types::{Node, ScaffoldSegment, StitchAction};

/// Segments of one ring-to-ring step plus the index pairs they connect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scaffold {
    /// Segments in construction order.
    pub segments: Vec<ScaffoldSegment>,

    /// `(current_index, next_index)` for each segment.
    pub links: Vec<(usize, usize)>,
}

impl Scaffold {
    /// Next-ring indices fed by each current node.
    pub fn children(&self, current_count: usize) -> Vec<Vec<usize>> {
        let mut children = vec![Vec::new(); current_count];
        for &(from, to) in &self.links {
            if let Some(slot) = children.get_mut(from) {
                slot.push(to);
            }
        }
        children
    }

    /// Number of incoming segments per next node.
    pub fn in_degree(&self, next_count: usize) -> Vec<usize> {
        let mut degree = vec![0; next_count];
        for &(_, to) in &self.links {
            if let Some(slot) = degree.get_mut(to) {
                *slot += 1;
            }
        }
        degree
    }

    /// Attach a step label and object id to every segment.
    pub fn tag(&mut self, label: &str, object_id: &str) {
        for segment in &mut self.segments {
            segment.label = Some(label.to_string());
            segment.object_id = Some(object_id.to_string());
        }
    }
}

/// Connect `current` to `next` following `actions`.
///
/// `actions` should have one entry per current node; extra entries are
/// ignored and missing ones are treated as carries. An empty ring on
/// either side yields an empty scaffold.
pub fn build_scaffold(current: &[Node], next: &[Node], actions: &[StitchAction]) -> Scaffold {
    let mut scaffold = Scaffold::default();
    if current.is_empty() || next.is_empty() {
        return scaffold;
    }

    let n = next.len();
    let mut k = 0usize;
    let connect = |scaffold: &mut Scaffold, j: usize, target: usize| {
        scaffold
            .segments
            .push(ScaffoldSegment::new(current[j].position, next[target].position));
        scaffold.links.push((j, target));
    };

    for j in 0..current.len() {
        let action = actions.get(j).copied().unwrap_or(StitchAction::Carry);
        match action {
            StitchAction::Carry => {
                connect(&mut scaffold, j, k % n);
            }
            StitchAction::Increase => {
                connect(&mut scaffold, j, k % n);
                connect(&mut scaffold, j, (k + 1) % n);
            }
            StitchAction::Decrease => {
                connect(&mut scaffold, j, k % n);
            }
        }
        k += action.advance();
    }

    scaffold
}
