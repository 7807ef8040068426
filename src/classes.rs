//! Candidate equivalence classes and their proof status
//!
//! Classes are found by simulation: nodes with the same simulation signature, up to their
//! structural phase, are candidates for merging. Each class has a representative, the node
//! with the smallest index, and every other member points to it.

use fxhash::FxHashMap;

use crate::Aig;

/// Status of a node with respect to its representative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeStatus {
    /// The node has no representative
    #[default]
    Unclassified,
    /// The equivalence with the representative is not resolved yet
    Pending,
    /// The node is equivalent to its representative
    Proved,
    /// A counterexample was found; the class must be refined before the next round
    Disproved,
    /// The solver gave up on this node
    Failed,
}

/// Candidate equivalence classes on a graph
///
/// Representatives always have a smaller index than their members, and have no
/// representative themselves.
#[derive(Debug, Clone)]
pub struct EquivClasses {
    reprs: Vec<Option<u32>>,
    status: Vec<NodeStatus>,
}

/// Simulation signature of a node, normalized so that it is zero in the first pattern
fn normalized(words: &[u64], phase: bool) -> Vec<u64> {
    let mask = if phase { !0u64 } else { 0 };
    words.iter().map(|w| w ^ mask).collect()
}

impl EquivClasses {
    /// Create classes with no candidate
    pub fn new(nb_nodes: usize) -> Self {
        EquivClasses {
            reprs: vec![None; nb_nodes],
            status: vec![NodeStatus::Unclassified; nb_nodes],
        }
    }

    /// Create classes from simulation values of all nodes
    ///
    /// Constant, inputs and And gates are all candidates.
    pub fn from_simulation(aig: &Aig, node_values: &[Vec<u64>]) -> Self {
        assert_eq!(node_values.len(), aig.nb_nodes());
        let mut ret = EquivClasses::new(aig.nb_nodes());
        let mut heads = FxHashMap::<Vec<u64>, u32>::default();
        for n in 0..aig.nb_nodes() as u32 {
            let sig = normalized(&node_values[n as usize], aig.phase(n));
            let head = *heads.entry(sig).or_insert(n);
            if head != n {
                ret.reprs[n as usize] = Some(head);
                ret.status[n as usize] = NodeStatus::Pending;
            }
        }
        ret
    }

    /// Number of nodes covered
    pub fn nb_nodes(&self) -> usize {
        self.reprs.len()
    }

    /// Representative of node n
    pub fn repr(&self, n: u32) -> Option<u32> {
        self.reprs[n as usize]
    }

    /// Status of node n
    pub fn status(&self, n: u32) -> NodeStatus {
        self.status[n as usize]
    }

    /// Returns true if node n is the representative of a class with other members
    pub fn is_head(&self, n: u32) -> bool {
        self.reprs.iter().any(|r| *r == Some(n))
    }

    /// Set the representative of node n; the node becomes pending
    pub fn set_repr(&mut self, n: u32, repr: Option<u32>) {
        if let Some(r) = repr {
            assert!(r < n, "Representative {r} must precede node {n}");
            assert!(self.reprs[r as usize].is_none(), "Representative {r} has a representative");
        }
        self.reprs[n as usize] = repr;
        self.status[n as usize] = match repr {
            Some(_) => NodeStatus::Pending,
            None => NodeStatus::Unclassified,
        };
    }

    /// Set the status of node n, which must have a representative
    pub fn set_status(&mut self, n: u32, status: NodeStatus) {
        assert!(
            self.reprs[n as usize].is_some() || status == NodeStatus::Unclassified,
            "Node {n} has no representative"
        );
        self.status[n as usize] = status;
    }

    /// Pairs (representative, node) of all nodes with a representative
    pub fn candidates(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.reprs
            .iter()
            .enumerate()
            .filter_map(|(n, r)| r.map(|r| (r, n as u32)))
    }

    /// Nodes with the given status
    pub fn nodes_with_status(&self, status: NodeStatus) -> impl Iterator<Item = u32> + '_ {
        (0..self.nb_nodes() as u32).filter(move |n| self.status[*n as usize] == status)
    }

    /// Number of nodes with the given status
    pub fn count(&self, status: NodeStatus) -> usize {
        self.status.iter().filter(|s| **s == status).count()
    }

    /// Number of nodes still to be resolved
    pub fn nb_pending(&self) -> usize {
        self.count(NodeStatus::Pending)
    }

    /// Number of proved nodes
    pub fn nb_proved(&self) -> usize {
        self.count(NodeStatus::Proved)
    }

    /// Make failed nodes pending again
    pub fn retry_failed(&mut self) {
        for s in &mut self.status {
            if *s == NodeStatus::Failed {
                *s = NodeStatus::Pending;
            }
        }
    }

    /// Split classes according to new simulation values of all nodes
    ///
    /// A node whose representative changes becomes pending (or unclassified if it is now
    /// alone). Disproved nodes must be separated from their representative, and proved
    /// nodes must never be.
    ///
    /// Returns the number of nodes whose representative changed.
    pub fn refine(&mut self, aig: &Aig, node_values: &[Vec<u64>]) -> usize {
        assert_eq!(node_values.len(), self.nb_nodes());
        let mut heads = FxHashMap::<(u32, Vec<u64>), u32>::default();
        let mut nb_changed = 0;
        for n in 0..self.nb_nodes() as u32 {
            let old = self.reprs[n as usize];
            let class = old.unwrap_or(n);
            let sig = normalized(&node_values[n as usize], aig.phase(n));
            let head = *heads.entry((class, sig)).or_insert(n);
            let new = if head == n { None } else { Some(head) };
            match self.status[n as usize] {
                NodeStatus::Disproved => assert!(
                    new != old,
                    "Node {n} was disproved but is still in the class of {class}"
                ),
                NodeStatus::Proved => assert!(
                    new == old,
                    "Node {n} was proved equivalent to {class} but simulation separates them"
                ),
                _ => (),
            }
            if new != old {
                nb_changed += 1;
                self.set_repr(n, new);
            }
        }
        nb_changed
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::{EquivClasses, NodeStatus};
    use crate::network::generators::testcases::and_associativity;
    use crate::sim::{random_inputs, simulate_nodes};
    use crate::Aig;

    #[test]
    fn test_from_simulation() {
        let (aig, x, y) = and_associativity();
        let mut rng = SmallRng::seed_from_u64(1);
        let values = simulate_nodes(&aig, &random_inputs(3, 2, &mut rng));
        let classes = EquivClasses::from_simulation(&aig, &values);
        assert_eq!(classes.repr(y), Some(x));
        assert_eq!(classes.status(y), NodeStatus::Pending);
        assert_eq!(classes.repr(x), None);
        assert!(classes.is_head(x));
        assert_eq!(classes.nb_pending(), 1);
        assert_eq!(classes.candidates().collect::<Vec<_>>(), vec![(x, y)]);
    }

    #[test]
    fn test_phase_normalization() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        // Xor and Xnor built from different gates: complementary functions with opposite phases
        let p = aig.xor(a, b);
        let ab = aig.and(a, b);
        let nab = aig.and(!a, !b);
        let q = aig.or(ab, nab);
        assert!(aig.phase(p.node()));
        assert!(!aig.phase(q.node()));
        let mut rng = SmallRng::seed_from_u64(2);
        let values = simulate_nodes(&aig, &random_inputs(2, 1, &mut rng));
        let classes = EquivClasses::from_simulation(&aig, &values);
        assert_eq!(classes.repr(q.node()), Some(p.node()));
        assert_eq!(classes.repr(ab.node()), None);
    }

    #[test]
    fn test_refine() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let x = aig.and(a, b).node();
        let y = aig.and(a, c).node();
        let z = aig.and(b, a).node();
        assert_eq!(x, z);
        let mut classes = EquivClasses::new(aig.nb_nodes());
        classes.set_repr(y, Some(x));
        classes.set_status(y, NodeStatus::Disproved);
        let mut rng = SmallRng::seed_from_u64(3);
        let values = simulate_nodes(&aig, &random_inputs(3, 2, &mut rng));
        assert_eq!(classes.refine(&aig, &values), 1);
        assert_eq!(classes.repr(y), None);
        assert_eq!(classes.status(y), NodeStatus::Unclassified);
    }

    #[test]
    #[should_panic]
    fn test_refine_unrefined_disproved() {
        let (aig, x, y) = and_associativity();
        let mut classes = EquivClasses::new(aig.nb_nodes());
        classes.set_repr(y, Some(x));
        classes.set_status(y, NodeStatus::Disproved);
        let mut rng = SmallRng::seed_from_u64(4);
        let values = simulate_nodes(&aig, &random_inputs(3, 1, &mut rng));
        classes.refine(&aig, &values);
    }

    #[test]
    fn test_retry() {
        let (aig, x, y) = and_associativity();
        let mut classes = EquivClasses::new(aig.nb_nodes());
        classes.set_repr(y, Some(x));
        classes.set_status(y, NodeStatus::Failed);
        assert_eq!(classes.nb_pending(), 0);
        classes.retry_failed();
        assert_eq!(classes.nb_pending(), 1);
        assert_eq!(classes.nodes_with_status(NodeStatus::Pending).collect::<Vec<_>>(), vec![y]);
    }
}
