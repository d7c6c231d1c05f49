// src/config.rs

use crate::error::{Error, Result};
use crate::io::pdb::PdbLayout;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
  Png,
  Pdf,
  Svg,
  Json,
}

impl ExportFormat {
  pub fn extension(self) -> &'static str {
    match self {
      ExportFormat::Png => "png",
      ExportFormat::Pdf => "pdf",
      ExportFormat::Svg => "svg",
      ExportFormat::Json => "json",
    }
  }

  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext {
      "png" => Some(ExportFormat::Png),
      "pdf" => Some(ExportFormat::Pdf),
      "svg" => Some(ExportFormat::Svg),
      "json" => Some(ExportFormat::Json),
      _ => None,
    }
  }

  pub fn from_path(path: &Path) -> Option<Self> {
    path
      .extension()
      .and_then(|e| e.to_str())
      .and_then(Self::from_extension)
  }
}

// --- RenderStyle ---

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderStyle {
  /// Multiplier applied to each element's render radius.
  pub atom_scale: f64,
  pub pixels_per_angstrom: f64,
  pub margin: f64,
  pub background_color: (f64, f64, f64),
  /// View rotation about x, y, z in degrees.
  pub rotation: (f64, f64, f64),
  pub metallic: f64,
  pub roughness: f64,
  /// Per-element color overrides (e.g. "C" -> (0.1, 0.1, 0.1)).
  pub element_colors: HashMap<String, (f64, f64, f64)>,
}

impl Default for RenderStyle {
  fn default() -> Self {
    Self {
      atom_scale: 1.0,
      pixels_per_angstrom: 40.0,
      margin: 20.0,
      background_color: (1.0, 1.0, 1.0),
      rotation: (0.0, 0.0, 0.0),
      metallic: 0.0,
      roughness: 0.3,
      element_colors: HashMap::new(),
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
  /// Root for relative resource paths. `None` means the working directory.
  #[serde(default)]
  pub base_dir: Option<PathBuf>,

  #[serde(default = "default_atom_info_path")]
  pub atom_info_path: PathBuf,

  #[serde(default = "default_cache_dir")]
  pub cache_dir: PathBuf,

  pub export_format: ExportFormat,

  #[serde(default)]
  pub pdb_layout: PdbLayout,

  #[serde(default)]
  pub style: RenderStyle,
}

fn default_atom_info_path() -> PathBuf {
  PathBuf::from("assets/atom_info.dat")
}

fn default_cache_dir() -> PathBuf {
  PathBuf::from("models/pdb")
}

impl Default for Config {
  fn default() -> Self {
    Self {
      base_dir: None,
      atom_info_path: default_atom_info_path(),
      cache_dir: default_cache_dir(),
      export_format: ExportFormat::Png,
      pdb_layout: PdbLayout::default(),
      style: RenderStyle::default(),
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/pdbvis/settings.json)
  pub fn load() -> (Self, String) {
    let path = Self::get_path();
    if path.exists() {
      match Self::load_from(&path) {
        Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
        Err(e) => (Self::default(), format!("Error reading config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  pub fn load_from(path: &Path) -> Result<Self> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| Error::Config(e.to_string()))
  }

  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, self).map_err(|e| Error::Config(e.to_string()))
  }

  pub fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "mavensgroup", "pdbvis") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }

  /// Joins relative paths onto `base_dir`.
  pub fn resolve(&self, path: &Path) -> PathBuf {
    match &self.base_dir {
      Some(base) if path.is_relative() => base.join(path),
      _ => path.to_path_buf(),
    }
  }

  pub fn atom_info_file(&self) -> PathBuf {
    self.resolve(&self.atom_info_path)
  }

  pub fn cache_path(&self) -> PathBuf {
    self.resolve(&self.cache_dir)
  }
}
