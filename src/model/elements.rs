// src/model/elements.rs

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Physical and rendering properties of one chemical element.
/// Serialized keys match the field identifiers of the reference data file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ElementProperties {
    #[serde(rename = "Number")]
    pub atomic_number: i32,
    pub name: String,
    pub short_name: String,
    pub color: [f64; 4],
    pub diffuse_intensity: f64,
    pub specular_intensity: f64,
    #[serde(rename = "SpecularHard")]
    pub specular_hardness: f64,
    pub traceable: f64,
    pub shadow_receive: f64,
    pub shadow_cast: f64,
    pub radius_used: f64,
    pub radius_covalent: f64,
    pub radius_atomic: f64,
    pub charge_state: Option<i32>,
    pub radius_ionic: Option<f64>,
}

/// Read-only lookup of element properties keyed by symbol (e.g. "Na").
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ElementTable {
    elements: HashMap<String, ElementProperties>,
}

impl ElementTable {
    pub fn new(elements: HashMap<String, ElementProperties>) -> Self {
        Self { elements }
    }

    /// Looks up a symbol. A missing symbol is an error, never a panic.
    pub fn get(&self, symbol: &str) -> Result<&ElementProperties> {
        self.elements
            .get(symbol)
            .ok_or_else(|| Error::UnknownElement(symbol.to_string()))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Symbols in alphabetical order.
    pub fn symbols(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.elements.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
