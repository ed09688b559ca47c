//! Collapses chains of purely series `VirtualResistor`s into single
//! `Line` components ("Line compression").

use std::collections::{HashMap, HashSet};

use crate::device::Part;
use crate::error::{CircuitError, Result};
use crate::pin::UnionFind;

/// A resistor segment fed to the `LineCompiler`, given in terms of
/// disjoint-set arena indices rather than final `PinId`s — virtual
/// resistors are a build-time-only concept that either get fused into a
/// `Line` or, in the degenerate single-segment case, become a `Line` of
/// one `Part`.
#[derive(Debug, Clone)]
pub struct VirtualResistor {
    pub resistance: f64,
    /// Arena indices of this resistor's two endpoint pins, `[pos, neg]`.
    pub pins: [usize; 2],
}

/// One maximal series chain, ready to become a `Line` component. `pos_root`
/// and `neg_root` are the disjoint-set roots of the surviving break-point
/// classes the compiled `Line`'s two pins must bind to.
#[derive(Debug, Clone)]
pub struct LineGraph {
    pub parts: Vec<Part>,
    pub pos_root: usize,
    pub neg_root: usize,
}

/// A union-find class is a break point — it must survive `build()` as a
/// real node — iff it is a singleton (a dangling external terminal), it
/// carries a real-marked pin (ground, or a non-virtual-resistor
/// component pin), or it is a fork of three or more virtual-resistor
/// pins. Anything else (exactly two virtual-resistor pins, no real) is
/// an interior series junction: not a break point, it gets merged into
/// a `Line`'s part chain instead of becoming a node.
fn is_break_point(uf: &mut UnionFind, root: usize, virtual_pin_count: usize) -> bool {
    uf.class_size(root) == 1 || uf.has_real(root) || virtual_pin_count >= 3
}

/// Partitions `virtual_resistors` into maximal series chains and returns
/// one `LineGraph` per chain. Fails with [`CircuitError::DanglingChain`]
/// if a cycle of virtual resistors with no real pin anywhere is found.
pub fn compile(virtual_resistors: &[VirtualResistor], uf: &mut UnionFind) -> Result<Vec<LineGraph>> {
    if virtual_resistors.is_empty() {
        return Ok(Vec::new());
    }

    // Group virtual-resistor pins by their post-union root, and record
    // which (resistor, local index) each arena slot belongs to.
    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut pin_to_vr: HashMap<usize, (usize, usize)> = HashMap::new();
    for (vi, vr) in virtual_resistors.iter().enumerate() {
        for (pi, &arena_idx) in vr.pins.iter().enumerate() {
            let root = uf.find(arena_idx);
            groups.entry(root).or_default().push(arena_idx);
            pin_to_vr.insert(arena_idx, (vi, pi));
        }
    }

    let mut is_break: HashMap<usize, bool> = HashMap::new();
    let roots: Vec<usize> = groups.keys().copied().collect();
    for root in roots {
        let count = groups[&root].len();
        is_break.insert(root, is_break_point(uf, root, count));
    }

    let mut visited: HashSet<usize> = HashSet::new();
    let mut graphs = Vec::new();

    for vi in 0..virtual_resistors.len() {
        if visited.contains(&vi) {
            continue;
        }
        let mut started = false;
        for pi in 0..2 {
            let root = uf.find(virtual_resistors[vi].pins[pi]);
            if *is_break.get(&root).unwrap_or(&false) {
                let graph = walk_chain(
                    vi,
                    pi,
                    root,
                    virtual_resistors,
                    uf,
                    &groups,
                    &pin_to_vr,
                    &is_break,
                    &mut visited,
                )?;
                graphs.push(graph);
                started = true;
                break;
            }
        }
        if !started {
            return Err(CircuitError::DanglingChain);
        }
    }

    Ok(graphs)
}

#[allow(clippy::too_many_arguments)]
fn walk_chain(
    start_vr: usize,
    start_pin_idx: usize,
    start_root: usize,
    virtual_resistors: &[VirtualResistor],
    uf: &mut UnionFind,
    groups: &HashMap<usize, Vec<usize>>,
    pin_to_vr: &HashMap<usize, (usize, usize)>,
    is_break: &HashMap<usize, bool>,
    visited: &mut HashSet<usize>,
) -> Result<LineGraph> {
    let mut parts = Vec::new();
    let mut vr_idx = start_vr;
    let mut arrived_idx = start_pin_idx;

    loop {
        if !visited.insert(vr_idx) {
            return Err(CircuitError::DanglingChain);
        }
        let vr = &virtual_resistors[vr_idx];
        let departing_idx = 1 - arrived_idx;
        let departing_arena = vr.pins[departing_idx];
        let departing_root = uf.find(departing_arena);
        parts.push(Part::new(vr.resistance));

        if *is_break.get(&departing_root).unwrap_or(&false) {
            return Ok(LineGraph {
                parts,
                pos_root: start_root,
                neg_root: departing_root,
            });
        }

        let members = groups
            .get(&departing_root)
            .expect("an interior class must still hold the virtual pins it was grouped under");
        debug_assert_eq!(
            members.len(),
            2,
            "a non-break class of pure virtual-resistor pins must have exactly two members"
        );
        let next_arena = *members
            .iter()
            .find(|&&m| m != departing_arena)
            .unwrap_or(&departing_arena);
        let (next_vr, next_idx) = pin_to_vr[&next_arena];
        vr_idx = next_vr;
        arrived_idx = next_idx;
    }
}
