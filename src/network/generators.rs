//! Graph generators, mostly used to test equivalence checking

/// Adder generators
pub mod adder {
    use crate::{Aig, Signal};

    fn full_adder(aig: &mut Aig, a: Signal, b: Signal, c: Signal) -> (Signal, Signal) {
        let ab = aig.xor(a, b);
        let s = aig.xor(ab, c);
        let g = aig.and(a, b);
        let p = aig.and(ab, c);
        let co = aig.or(g, p);
        (s, co)
    }

    /// A simple and slow ripple-carry adder, with interleaved inputs a0, b0, a1, b1, ...
    pub fn ripple_carry(len: usize) -> Aig {
        let mut ret = Aig::new();
        let mut c = Signal::zero();
        for _ in 0..len {
            let a = ret.add_input();
            let b = ret.add_input();
            let (s, co) = full_adder(&mut ret, a, b, c);
            ret.add_output(s);
            c = co;
        }
        ret.add_output(c);
        ret.check();
        ret
    }

    /// Two ripple-carry adders over the same inputs, built with different gate structures
    ///
    /// The first copy uses xor-based full adders, the second uses majority and parity
    /// written out in sum-of-products form. Outputs are the sums and carries of the first
    /// copy followed by those of the second.
    pub fn ripple_carry_pair(len: usize) -> Aig {
        let mut ret = Aig::new();
        let inputs: Vec<(Signal, Signal)> = (0..len)
            .map(|_| (ret.add_input(), ret.add_input()))
            .collect();
        let mut c = Signal::zero();
        let mut outputs = Vec::new();
        for &(a, b) in &inputs {
            let (s, co) = full_adder(&mut ret, a, b, c);
            outputs.push(s);
            c = co;
        }
        outputs.push(c);
        let mut c = Signal::zero();
        for &(a, b) in &inputs {
            let s = parity_sop(&mut ret, a, b, c);
            let ab = ret.and(a, b);
            let ac = ret.and(a, c);
            let bc = ret.and(b, c);
            c = ret.or_n(&[ab, ac, bc]);
            outputs.push(s);
        }
        outputs.push(c);
        for o in outputs {
            ret.add_output(o);
        }
        ret.check();
        ret
    }

    fn parity_sop(aig: &mut Aig, a: Signal, b: Signal, c: Signal) -> Signal {
        let mut terms = Vec::new();
        for m in 0..8u32 {
            if m.count_ones() % 2 == 1 {
                let t = [a ^ (m & 1 == 0), b ^ (m & 2 == 0), c ^ (m & 4 == 0)];
                terms.push(aig.and_n(&t));
            }
        }
        aig.or_n(&terms)
    }
}

/// Simple generators to test functionality
pub mod testcases {
    use crate::{Aig, Signal};

    /// A miter between two associativity variants of the same And chain: `((a & b) & c)` vs `(a & (b & c))`
    ///
    /// Returns the graph and the two nodes computing the function.
    pub fn and_associativity() -> (Aig, u32, u32) {
        let mut ret = Aig::new();
        let a = ret.add_input();
        let b = ret.add_input();
        let c = ret.add_input();
        let ab = ret.and(a, b);
        let x = ret.and(ab, c);
        let bc = ret.and(b, c);
        let y = ret.and(a, bc);
        ret.add_output(x);
        ret.add_output(y);
        ret.check();
        (ret, x.node(), y.node())
    }

    /// A chain of Xor gates where every other stage is complemented
    pub fn inverted_xor_chain(len: usize) -> Aig {
        let mut ret = Aig::new();
        let mut x = ret.add_input();
        for i in 0..len {
            let y = ret.add_input();
            x = ret.xor(x, y) ^ (i % 2 == 1);
            ret.add_output(x);
        }
        ret.check();
        ret
    }

    /// A wide And gate built as a single-fanout chain, forming one supergate
    pub fn and_chain(len: usize) -> (Aig, Signal) {
        assert!(len >= 2);
        let mut ret = Aig::new();
        let mut x = ret.add_input();
        for _ in 1..len {
            let y = ret.add_input();
            x = ret.and(x, y);
        }
        ret.add_output(x);
        (ret, x)
    }

    /// A constant-false function in disguise: `(a & b) & !(a & b & c | a & b & !c)`
    pub fn hidden_zero() -> (Aig, Signal) {
        let mut ret = Aig::new();
        let a = ret.add_input();
        let b = ret.add_input();
        let c = ret.add_input();
        let ab = ret.and(a, b);
        let bc = ret.and(b, c);
        let x = ret.and(a, bc);
        let bnc = ret.and(b, !c);
        let y = ret.and(a, bnc);
        let o = ret.or(x, y);
        let z = ret.and(ab, !o);
        ret.add_output(z);
        assert_ne!(z, Signal::zero());
        (ret, z)
    }
}
