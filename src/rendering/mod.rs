pub mod scene;

#[cfg(feature = "cairo")]
pub mod export;
#[cfg(feature = "cairo")]
pub mod painter;
#[cfg(feature = "cairo")]
pub mod primitives;

use crate::error::Result;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimitiveId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub usize);

/// Scene-building backend driven by the converter.
pub trait RenderTarget {
    /// Drops every primitive and material.
    fn reset_scene(&mut self);

    fn add_primitive(&mut self, position: Point3<f64>, radius: f64, label: &str) -> PrimitiveId;

    /// Returns the material registered under `key`, creating it on first use.
    fn get_or_create_material(&mut self, key: &str, color: [f64; 4]) -> MaterialId;

    fn assign_material(&mut self, primitive: PrimitiveId, material: MaterialId) -> Result<()>;

    fn export_scene(&mut self, path: &Path) -> Result<()>;
}
