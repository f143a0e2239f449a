//! Implementation of search algorithms.
//!
//! These algorithms can do path-finding on any `Space` that can hold
//! `SearchMarks`.

use derive_more::Display;

pub mod traversal;

/// The traversals that can be raced against each other.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[display("BFS")]
    BreadthFirst,
    #[display("DFS")]
    DepthFirst,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::BreadthFirst, Algorithm::DepthFirst];

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::BreadthFirst => "Breadth-first search",
            Algorithm::DepthFirst => "Depth-first search",
        }
    }
}
