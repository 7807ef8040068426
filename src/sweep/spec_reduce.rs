use crate::classes::{EquivClasses, NodeStatus};
use crate::{Aig, Signal};

/// Speculative reduction of a graph for one sweeping round
///
/// Every pending node is replaced by its representative, and an output checks the Xor of
/// the node's own logic with the representative. Output k checks `pairs[k]`, as
/// (representative, node). Logic that no output depends on is removed.
#[derive(Debug, Clone)]
pub struct SpecReduction {
    /// The reduced graph, with the same inputs as the original one
    pub aig: Aig,
    /// Representative and node checked by each output
    pub pairs: Vec<(u32, u32)>,
    /// Pending pairs that became structurally identical through proved replacements only
    pub identical: Vec<(u32, u32)>,
}

impl SpecReduction {
    /// Number of candidate pairs to check
    pub fn nb_outputs(&self) -> usize {
        self.pairs.len()
    }
}

/// Build the speculative reduction of a graph
///
/// Proved nodes are replaced by their representative without a check. Failed and disproved
/// nodes are kept as is, as are pairs where either node is above `level_max` (0 for no
/// limit).
/// A replaced node whose chain of replacements reaches `depth_max` (0 for no limit) is not
/// used further in this round, and neither is its transitive fanout.
pub fn spec_reduce(
    aig: &Aig,
    classes: &EquivClasses,
    level_max: u32,
    depth_max: u32,
) -> SpecReduction {
    assert_eq!(classes.nb_nodes(), aig.nb_nodes());
    let mut ret = Aig::new();
    let mut pairs = Vec::new();
    let mut identical = Vec::new();
    let mut copies: Vec<Option<Signal>> = vec![None; aig.nb_nodes()];
    let mut depths = vec![0u32; aig.nb_nodes()];
    copies[0] = Some(Signal::zero());
    for i in 0..aig.nb_inputs() {
        copies[aig.input(i).ind()] = Some(ret.add_input());
    }
    let copy = |copies: &[Option<Signal>], s: Signal| copies[s.ind()].map(|c| c ^ s.is_inverted());
    for n in 1..aig.nb_nodes() as u32 {
        let i = n as usize;
        let node = if aig.is_and(n) {
            let (a, b) = (aig.fanin0(n), aig.fanin1(n));
            let (Some(ca), Some(cb)) = (copy(&copies, a), copy(&copies, b)) else {
                continue;
            };
            depths[i] = depths[a.ind()].max(depths[b.ind()]);
            let x = ret.and(ca, cb);
            copies[i] = Some(x);
            x
        } else {
            match copies[i] {
                Some(x) => x,
                None => continue,
            }
        };
        let Some(r) = classes.repr(n) else {
            continue;
        };
        let status = classes.status(n);
        if status != NodeStatus::Pending && status != NodeStatus::Proved {
            continue;
        }
        let Some(repr) = copies[r as usize] else {
            continue;
        };
        let spec = repr ^ (aig.phase(n) ^ aig.phase(r));
        if repr.node() == node.node() {
            if status == NodeStatus::Pending
                && node == spec
                && depths[i] == 0
                && depths[r as usize] == 0
            {
                identical.push((r, n));
            }
            continue;
        }
        if level_max > 0 && (aig.level(n) > level_max || aig.level(r) > level_max) {
            continue;
        }
        copies[i] = Some(spec);
        if status == NodeStatus::Proved {
            depths[i] = depths[r as usize];
            continue;
        }
        let miter = ret.xor(node, spec);
        ret.add_output(miter);
        pairs.push((r, n));
        depths[i] = 1 + depths[i].max(depths[r as usize]);
        if depth_max > 0 && depths[i] >= depth_max {
            copies[i] = None;
        }
    }
    SpecReduction {
        aig: ret.cleanup(),
        pairs,
        identical,
    }
}
