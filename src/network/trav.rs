/// Traversal marks based on stamps
///
/// Each node remembers the last traversal that visited it. Starting a new traversal just
/// increments the counter, so marks never need to be cleared between traversals.
#[derive(Debug, Clone, Default)]
pub struct TravIds {
    stamps: Vec<u32>,
    current: u32,
}

impl TravIds {
    /// Create traversal marks for a graph with the given number of nodes
    pub fn new(nb_nodes: usize) -> Self {
        TravIds {
            stamps: vec![0; nb_nodes],
            current: 0,
        }
    }

    /// Start a new traversal: all nodes become unvisited
    pub fn increment(&mut self) {
        if self.current == u32::MAX {
            self.stamps.fill(0);
            self.current = 0;
        }
        self.current += 1;
    }

    /// Returns true if node n was visited during the current traversal
    pub fn is_current(&self, n: u32) -> bool {
        self.stamps[n as usize] == self.current
    }

    /// Mark node n as visited during the current traversal
    pub fn set_current(&mut self, n: u32) {
        self.stamps[n as usize] = self.current;
    }

    /// Mark node n as visited, returning true if it was not visited yet
    pub fn visit(&mut self, n: u32) -> bool {
        if self.is_current(n) {
            false
        } else {
            self.set_current(n);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TravIds;

    #[test]
    fn test_stamps() {
        let mut trav = TravIds::new(4);
        trav.increment();
        assert!(trav.visit(2));
        assert!(!trav.visit(2));
        assert!(trav.is_current(2));
        assert!(!trav.is_current(1));
        trav.increment();
        assert!(!trav.is_current(2));
        assert!(trav.visit(2));
    }
}
