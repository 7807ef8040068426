use std::fmt;
use std::ops::{BitXor, BitXorAssign, Not};

/// Representation of an edge in the graph (a node or its complement)
///
/// May be 0, 1, n or !n. Node 0 is the constant-false node, so that the zero signal
/// is simply the uninverted constant node.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub struct Signal {
    a: u32,
}

impl Signal {
    /// Constant zero signal
    pub fn zero() -> Signal {
        Signal { a: 0 }
    }

    /// Constant one signal
    pub fn one() -> Signal {
        Signal { a: 1 }
    }

    /// Create a signal pointing to a node
    pub fn from_node(n: u32) -> Signal {
        assert!(n < 0x8000_0000);
        Signal { a: n << 1 }
    }

    /// Obtain the node index associated with the signal
    pub fn node(&self) -> u32 {
        self.a >> 1
    }

    /// Obtain the node index as an array index
    pub(crate) fn ind(&self) -> usize {
        self.node() as usize
    }

    /// Returns true if the signal represents a constant
    pub fn is_constant(&self) -> bool {
        self.node() == 0
    }

    /// Clear the inversion, if set
    pub fn without_inversion(&self) -> Signal {
        Signal { a: self.a & !1u32 }
    }

    /// Returns true if the signal is implicitly inverted
    ///
    /// False for nodes and zero. True for their complement and for one.
    pub fn is_inverted(&self) -> bool {
        self.a & 1 != 0
    }

    /// Return the internal representation of the signal
    pub fn raw(&self) -> u32 {
        self.a
    }
}

impl From<bool> for Signal {
    fn from(b: bool) -> Signal {
        if b {
            Signal::one()
        } else {
            Signal::zero()
        }
    }
}

impl Not for Signal {
    type Output = Signal;
    fn not(self) -> Signal {
        Signal { a: self.a ^ 1u32 }
    }
}

impl Not for &'_ Signal {
    type Output = Signal;
    fn not(self) -> Signal {
        Signal { a: self.a ^ 1u32 }
    }
}

impl BitXorAssign<bool> for Signal {
    fn bitxor_assign(&mut self, rhs: bool) {
        self.a ^= rhs as u32;
    }
}

impl BitXor<bool> for Signal {
    type Output = Signal;
    fn bitxor(self, rhs: bool) -> Self::Output {
        let mut l = self;
        l ^= rhs;
        l
    }
}

impl BitXor<bool> for &'_ Signal {
    type Output = Signal;
    fn bitxor(self, rhs: bool) -> Self::Output {
        *self ^ rhs
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_constant() {
            let a = self.a & 1;
            write!(f, "{a}")
        } else {
            if self.is_inverted() {
                write!(f, "!")?;
            }
            write!(f, "n{}", self.node())
        }
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let l0 = Signal::zero();
        let l1 = Signal::one();
        assert_eq!(l0, !l1);
        assert_eq!(l1, !l0);
        assert!(!l0.is_inverted());
        assert!(l1.is_inverted());
        assert!(l0.is_constant());
        assert!(l1.is_constant());
        assert_eq!(format!("{l0}"), "0");
        assert_eq!(format!("{l1}"), "1");
    }

    #[test]
    fn test_node() {
        for n in 1u32..10u32 {
            let l = Signal::from_node(n);
            assert!(!l.is_constant());
            assert_eq!(l.node(), n);
            assert_eq!((!l).node(), n);
            assert!(!l.is_inverted());
            assert!((!l).is_inverted());
            assert_eq!((!l).without_inversion(), l);
            assert_eq!(l ^ false, l);
            assert_eq!(l ^ true, !l);
            assert_eq!(format!("{l}"), format!("n{n}"));
            assert_eq!(format!("{}", !l), format!("!n{n}"));
        }
    }

    #[test]
    fn test_comparison() {
        assert_eq!(Signal::from(false), Signal::zero());
        assert_eq!(Signal::from(true), Signal::one());
        assert_eq!(Signal::from_node(0), Signal::zero());
        assert_ne!(Signal::from_node(1), Signal::one());
        assert_ne!(Signal::from_node(1), Signal::from_node(2));
        assert!(Signal::from_node(1) < Signal::from_node(2));
        assert!(Signal::from_node(1) < !Signal::from_node(1));
    }
}
