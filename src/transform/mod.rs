//! The transformation pipeline: validated city set in, routing schema out.
//!
//! Leaf modules first: identifier encoding, travel-time estimation, and
//! exit synthesis feed the assembler, which walks the city set in a single
//! deterministic pass.

pub mod assembler;
pub mod exits;
pub mod ids;
pub mod travel;
