use shadow_rs::shadow;

shadow!(build);

// Internals
// ---------
pub mod data_structures;
pub mod logging;

// Search space and problems
// -------------------------
pub mod search;
pub mod space;

// Problems
// --------
pub mod problems;

// Algorithms
// ----------
pub mod algorithms;

// Driving runs
// ------------
pub mod animation;
pub mod session;
pub mod stats;
