//! Word-parallel simulation of a graph

mod simple_sim;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::Aig;

use simple_sim::SimpleSimulator;

/// Simulate a graph with 64b inputs; return the values of every node
///
/// All inputs must have the same number of words. The result has one entry per node,
/// including the constant node and the inputs.
pub fn simulate_nodes(aig: &Aig, input_values: &[Vec<u64>]) -> Vec<Vec<u64>> {
    let nb_words = input_values.first().map(|v| v.len()).unwrap_or(1);
    let mut sim = SimpleSimulator::from_aig(aig, nb_words);
    sim.run(input_values);
    sim.into_node_values()
}

/// Simulate a graph with 64b inputs; return the output values
pub fn simulate_multi(aig: &Aig, input_values: &[Vec<u64>]) -> Vec<Vec<u64>> {
    let nb_words = input_values.first().map(|v| v.len()).unwrap_or(1);
    let mut sim = SimpleSimulator::from_aig(aig, nb_words);
    sim.run(input_values);
    aig.outputs().iter().map(|o| sim.signal_values(*o)).collect()
}

/// Simulate a graph for a single input pattern; return the output values
pub fn simulate_comb(aig: &Aig, input_values: &[bool]) -> Vec<bool> {
    let multi: Vec<Vec<u64>> = input_values
        .iter()
        .map(|b| vec![if *b { !0 } else { 0 }])
        .collect();
    simulate_multi(aig, &multi)
        .iter()
        .map(|v| v[0] != 0)
        .collect()
}

/// Generate random words for each input
pub fn random_inputs(nb_inputs: usize, nb_words: usize, rng: &mut SmallRng) -> Vec<Vec<u64>> {
    (0..nb_inputs)
        .map(|_| (0..nb_words).map(|_| rng.gen::<u64>()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::Aig;

    use super::{random_inputs, simulate_comb, simulate_multi, simulate_nodes};

    #[test]
    fn test_basic() {
        let mut aig = Aig::default();
        let i0 = aig.add_input();
        let i1 = aig.add_input();
        let i2 = aig.add_input();
        let x1 = aig.xor(i0, i1);
        let x2 = aig.and(i0, i2);
        let x3 = aig.and(x2, !i1);
        aig.add_output(x1);
        aig.add_output(x3);

        assert_eq!(simulate_comb(&aig, &[false, false, false]), vec![false, false]);
        assert_eq!(simulate_comb(&aig, &[true, false, false]), vec![true, false]);
        assert_eq!(simulate_comb(&aig, &[true, false, true]), vec![true, true]);
        assert_eq!(simulate_comb(&aig, &[true, true, true]), vec![false, false]);
    }

    #[test]
    fn test_words() {
        let mut aig = Aig::default();
        let i0 = aig.add_input();
        let i1 = aig.add_input();
        let x = aig.and(i0, !i1);
        aig.add_output(x);
        aig.add_output(!x);
        let mut rng = SmallRng::seed_from_u64(1);
        let inputs = random_inputs(2, 3, &mut rng);
        let outputs = simulate_multi(&aig, &inputs);
        let nodes = simulate_nodes(&aig, &inputs);
        assert_eq!(nodes.len(), aig.nb_nodes());
        for k in 0..3 {
            assert_eq!(outputs[0][k], inputs[0][k] & !inputs[1][k]);
            assert_eq!(outputs[1][k], !outputs[0][k]);
            assert_eq!(nodes[x.node() as usize][k], outputs[0][k]);
            assert_eq!(nodes[0][k], 0);
        }
    }
}
