//! World simulation library
//!
//! Procedural terrain, erosion, climate, and a settlement simulation over a
//! shared grid world. Re-exports modules for use by binaries and tools.

pub mod civilization;
pub mod climate;
pub mod engine;
pub mod erosion;
pub mod export;
pub mod seeds;
pub mod terrain;
pub mod tilemap;
