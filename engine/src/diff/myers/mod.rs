//! Myers diff algorithm implementation.
//!
//! Myers' algorithm finds the shortest edit script (SES) between two
//! sequences in O(ND) time, where N is the combined length and D the number
//! of differences. It is particularly efficient when the two texts are
//! similar. Every frontier is kept for backtracking, so worst-case time and
//! space are O(N²) with N = `len(a) + len(b)`; there is no size cap.

pub mod algorithm;
pub mod optimization;

pub use algorithm::MyersDiff;
