//! Implementation of search spaces.
//!
//! The grid maze is exposed through the generic `Space` and `SearchMarks`
//! APIs so traversals never look into its cells directly.

pub mod grid;
pub mod grid_generator;
