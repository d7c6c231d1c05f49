// src/model/atom.rs

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An auxiliary numeric column. Parse failures keep the trimmed text instead
/// of rejecting the record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Field<T> {
    Parsed(T),
    Unparsed(String),
    Blank,
}

impl<T: FromStr> Field<T> {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Field::Blank;
        }
        match raw.parse::<T>() {
            Ok(v) => Field::Parsed(v),
            Err(_) => Field::Unparsed(raw.to_string()),
        }
    }

    /// Original column text when the value could not be decoded.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Field::Unparsed(s) => Some(s),
            _ => None,
        }
    }
}

/// One ATOM line of a PDB file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtomRecord {
    pub record_tag: String,
    pub serial: Option<i64>,
    pub name: String,
    pub alt_loc: Option<char>,
    pub res_name: String,
    pub chain_id: Option<char>,
    pub res_seq: Field<i32>,
    pub i_code: Option<char>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub occupancy: Field<f64>,
    pub temp_factor: Field<f64>,
    pub element: String,
    pub charge: Option<String>,
}

impl AtomRecord {
    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    /// Object name used for the rendered primitive, e.g. `Atom_12`.
    pub fn label(&self) -> String {
        match self.serial {
            Some(serial) => format!("Atom_{}", serial),
            None => "Atom_None".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_states() {
        assert_eq!(Field::<f64>::parse("1.00"), Field::Parsed(1.0));
        assert_eq!(Field::<f64>::parse("abc"), Field::Unparsed("abc".to_string()));
        assert_eq!(Field::<i32>::parse(""), Field::Blank);

        let degraded = Field::<i32>::parse("1A");
        assert_eq!(degraded.raw(), Some("1A"));
    }

    #[test]
    fn test_label_without_serial() {
        let atom = AtomRecord {
            record_tag: "ATOM".into(),
            serial: None,
            name: "CA".into(),
            alt_loc: None,
            res_name: "AL".into(),
            chain_id: Some('A'),
            res_seq: Field::Parsed(1),
            i_code: None,
            x: 1.0,
            y: 2.0,
            z: 3.0,
            occupancy: Field::Blank,
            temp_factor: Field::Blank,
            element: "C".into(),
            charge: None,
        };
        assert_eq!(atom.label(), "Atom_None");
        assert_eq!(atom.position(), Point3::new(1.0, 2.0, 3.0));
    }
}
