use std::fmt;

/// The three-vertex window `(start, mid, end)` around one position of a cycle.
///
/// `mid` is the vertex occupying the position and defines the triple; `start` and `end`
/// are its predecessor and successor in the cycle.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneTriple {
    pub start: usize,
    pub mid: usize,
    pub end: usize,
}

impl GeneTriple {
    pub fn new(start: usize, mid: usize, end: usize) -> Self {
        Self { start, mid, end }
    }

    /// The two neighbours of `mid`, predecessor first.
    pub fn neighbours(&self) -> [usize; 2] {
        [self.start, self.end]
    }
}

impl fmt::Display for GeneTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.start, self.mid, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(GeneTriple::new(4, 0, 7).to_string(), "[4, 0, 7]");
    }

    #[test]
    fn test_neighbours() {
        assert_eq!(GeneTriple::new(1, 2, 3).neighbours(), [1, 3]);
    }
}
