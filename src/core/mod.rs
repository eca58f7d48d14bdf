//! Core data types: ternary scores, the canonical feature set, and the
//! parsed extraction target.

pub mod feature;
pub mod score;
pub mod target;
