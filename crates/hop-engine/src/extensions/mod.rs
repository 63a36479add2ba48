// extensions/mod.rs
//
// Optional extension modules for hop-engine.
// Decoupled from physics objects; the simulation owns one and mirrors links into it.

pub mod hierarchy;

pub use hierarchy::ParentGraph;
