//! File-backed record store implementations

pub mod json;
