//! Converts PDB structures into sphere scenes, with per-element colors and
//! radii taken from an `atom_info.dat` reference file.

pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod io;
pub mod model;
pub mod rendering;
pub mod utils;

pub use config::{Config, ExportFormat};
pub use convert::{ConversionSummary, Converter};
pub use error::{Error, Result};
