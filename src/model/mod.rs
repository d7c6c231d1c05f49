//src/model/mod.rs
pub mod atom;
pub mod elements;

// Re-exports for cleaner imports
pub use atom::{AtomRecord, Field};
pub use elements::{ElementProperties, ElementTable};
