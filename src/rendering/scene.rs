// src/rendering/scene.rs

use super::{MaterialId, PrimitiveId, RenderTarget};
use crate::config::{ExportFormat, RenderStyle};
use crate::error::{Error, Result};
use log::{debug, info, warn};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
  pub label: String,
  pub position: [f64; 3],
  pub radius: f64,
  pub material: Option<MaterialId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
  pub name: String,
  pub color: [f64; 4],
}

/// In-memory sphere scene. Exports to JSON, or through cairo to PNG/PDF/SVG.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scene {
  primitives: Vec<Primitive>,
  materials: Vec<Material>,
  #[serde(skip)]
  material_index: HashMap<String, MaterialId>,
  #[serde(skip)]
  pub style: RenderStyle,
}

impl Scene {
  pub fn new(style: RenderStyle) -> Self {
    Self {
      style,
      ..Self::default()
    }
  }

  pub fn primitives(&self) -> &[Primitive] {
    &self.primitives
  }

  pub fn materials(&self) -> &[Material] {
    &self.materials
  }

  pub fn material(&self, id: MaterialId) -> Option<&Material> {
    self.materials.get(id.0)
  }

  /// RGBA of a primitive; unassigned primitives render grey.
  pub fn color_of(&self, primitive: &Primitive) -> [f64; 4] {
    primitive
      .material
      .and_then(|id| self.material(id))
      .map(|m| m.color)
      .unwrap_or([0.7, 0.7, 0.7, 1.0])
  }

  pub fn is_empty(&self) -> bool {
    self.primitives.is_empty()
  }

  fn write_json(&self, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), self)
      .map_err(|e| Error::export(path, e.to_string()))
  }
}

impl RenderTarget for Scene {
  fn reset_scene(&mut self) {
    self.primitives.clear();
    self.materials.clear();
    self.material_index.clear();
  }

  fn add_primitive(&mut self, position: Point3<f64>, radius: f64, label: &str) -> PrimitiveId {
    self.primitives.push(Primitive {
      label: label.to_string(),
      position: [position.x, position.y, position.z],
      radius,
      material: None,
    });
    PrimitiveId(self.primitives.len() - 1)
  }

  fn get_or_create_material(&mut self, key: &str, color: [f64; 4]) -> MaterialId {
    if let Some(&id) = self.material_index.get(key) {
      return id;
    }
    debug!("Creating material '{}'", key);
    let id = MaterialId(self.materials.len());
    self.materials.push(Material {
      name: key.to_string(),
      color,
    });
    self.material_index.insert(key.to_string(), id);
    id
  }

  fn assign_material(&mut self, primitive: PrimitiveId, material: MaterialId) -> Result<()> {
    if material.0 >= self.materials.len() {
      return Err(Error::Validation(format!("unknown material {:?}", material)));
    }
    match self.primitives.get_mut(primitive.0) {
      Some(p) => {
        p.material = Some(material);
        Ok(())
      }
      None => Err(Error::Validation(format!("unknown primitive {:?}", primitive))),
    }
  }

  fn export_scene(&mut self, path: &Path) -> Result<()> {
    let format = ExportFormat::from_path(path)
      .ok_or_else(|| Error::export(path, "unsupported export extension"))?;
    if self.is_empty() {
      warn!("Exporting an empty scene to {:?}", path);
    }

    match format {
      ExportFormat::Json => self.write_json(path)?,
      #[cfg(feature = "cairo")]
      ExportFormat::Png => super::export::export_png(self, path)?,
      #[cfg(feature = "cairo")]
      ExportFormat::Pdf => super::export::export_pdf(self, path)?,
      #[cfg(feature = "cairo")]
      ExportFormat::Svg => super::export::export_svg(self, path)?,
      #[cfg(not(feature = "cairo"))]
      _ => return Err(Error::export(path, "built without cairo support")),
    }

    info!(
      "Exported {} primitives ({} materials) to {:?}",
      self.primitives.len(),
      self.materials.len(),
      path
    );
    Ok(())
  }
}
