// src/io/atom_info.rs
//
// Reader for the element reference file (`atom_info.dat`). Every element is a
// free-text block introduced by the word `Atom`, holding `Label : value` lines.

use crate::error::{Error, Result};
use crate::model::elements::{ElementProperties, ElementTable};
use log::{debug, info, warn};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

pub const BLOCK_DELIMITER: &str = "Atom";

/// A labelled field of a reference block and the pattern its value must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub value_pattern: &'static str,
}

const fn field(label: &'static str, value_pattern: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        value_pattern,
    }
}

const DECIMAL: &str = r"\d+[.]\d+";
const INTEGER: &str = r"\d+";
const COLOR: &str = r"\d+[.]\d+,\d+[.]\d+,\d+[.]\d+,\d+[.]\d+";

/// Order matters: fields must appear in the block in this sequence.
pub const FIELDS: [FieldSpec; 15] = [
    field("Number", INTEGER),
    field("Name", r"\w+"),
    field("Short name", r"\w+"),
    field("Color", COLOR),
    field("Diffuse intensity", DECIMAL),
    field("Specular intensity", DECIMAL),
    field("Specular hard", INTEGER),
    field("Traceable", INTEGER),
    field("Shadow receive", INTEGER),
    field("Shadow cast", INTEGER),
    field("Radius used", DECIMAL),
    field("Radius covalent", DECIMAL),
    field("Radius atomic", DECIMAL),
    field("Charge state", r"(-)?\d+([.]\d+)?"),
    field("Radius ionic", DECIMAL),
];

/// Blocks without ionic data stop after `Radius atomic`.
pub const REQUIRED_FIELDS: usize = 13;

static FULL_PATTERN: OnceLock<Regex> = OnceLock::new();
static DEGRADED_PATTERN: OnceLock<Regex> = OnceLock::new();

fn full_pattern() -> &'static Regex {
    FULL_PATTERN.get_or_init(|| compile(&FIELDS))
}

fn degraded_pattern() -> &'static Regex {
    DEGRADED_PATTERN.get_or_init(|| compile(&FIELDS[..REQUIRED_FIELDS]))
}

fn compile(fields: &[FieldSpec]) -> Regex {
    // Built from the constant table above, so it always compiles.
    Regex::new(&build_pattern(fields)).expect("reference field pattern must compile")
}

/// Capture group name for a label: "Specular hard" -> "SpecularHard".
pub fn field_identifier(label: &str) -> String {
    label
        .replace(',', "")
        .split_whitespace()
        .map(capitalize)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `label\s*:\s*(?P<Ident>value)` per field, joined by optional whitespace,
/// preceded by an unanchored prefix since block headers are irregular.
pub fn build_pattern(fields: &[FieldSpec]) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|f| {
            format!(
                r"{}\s*:\s*(?P<{}>{})",
                regex::escape(f.label),
                field_identifier(f.label),
                f.value_pattern
            )
        })
        .collect();
    format!(r"[\s\S]*{}.*", parts.join(r"\s*"))
}

/// Loads the reference file at `path`.
pub fn parse(path: impl AsRef<Path>) -> Result<ElementTable> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let table = parse_str(&text)?;
    if table.is_empty() {
        warn!("{:?} holds no element definitions", path);
    }
    info!("Loaded {} element definitions from {:?}", table.len(), path);
    Ok(table)
}

pub fn parse_str(text: &str) -> Result<ElementTable> {
    let mut elements = HashMap::new();

    for block in text.split(BLOCK_DELIMITER) {
        if block.chars().all(char::is_whitespace) {
            continue;
        }
        let props = parse_block(block)?;
        if elements.contains_key(&props.short_name) {
            debug!("Element '{}' defined twice; keeping the later block", props.short_name);
        }
        elements.insert(props.short_name.clone(), props);
    }

    Ok(ElementTable::new(elements))
}

/// Parses a single block (text between two delimiters).
pub fn parse_block(block: &str) -> Result<ElementProperties> {
    if let Some(caps) = full_pattern().captures(block) {
        return RawFields::new(&caps, &FIELDS).into_properties(block);
    }

    match degraded_pattern().captures(block) {
        Some(caps) => {
            let raw = RawFields::new(&caps, &FIELDS[..REQUIRED_FIELDS]);
            debug!(
                "Element '{}' has no ionic data",
                raw.get("ShortName").unwrap_or("?")
            );
            raw.into_properties(block)
        }
        None => Err(Error::ReferenceMatch {
            block: leading_text(block),
        }),
    }
}

/// Captured text keyed by field identifier.
struct RawFields<'t> {
    values: HashMap<String, &'t str>,
}

impl<'t> RawFields<'t> {
    fn new(caps: &Captures<'t>, fields: &[FieldSpec]) -> Self {
        let values = fields
            .iter()
            .filter_map(|f| {
                let key = field_identifier(f.label);
                caps.name(&key).map(|m| (key, m.as_str()))
            })
            .collect();
        Self { values }
    }

    fn get(&self, key: &str) -> Option<&'t str> {
        self.values.get(key).copied()
    }

    fn into_properties(self, block: &str) -> Result<ElementProperties> {
        let malformed = || Error::ReferenceMatch {
            block: leading_text(block),
        };
        let text = |key: &str| self.get(key).map(str::trim).ok_or_else(malformed);
        let float = |key: &str| self.get(key).and_then(to_numeric).ok_or_else(malformed);

        let color = parse_color(text("Color")?).ok_or_else(malformed)?;

        Ok(ElementProperties {
            atomic_number: self.get("Number").and_then(to_integer).ok_or_else(malformed)?,
            name: text("Name")?.to_string(),
            short_name: text("ShortName")?.to_string(),
            color,
            diffuse_intensity: float("DiffuseIntensity")?,
            specular_intensity: float("SpecularIntensity")?,
            specular_hardness: float("SpecularHard")?,
            traceable: float("Traceable")?,
            shadow_receive: float("ShadowReceive")?,
            shadow_cast: float("ShadowCast")?,
            radius_used: float("RadiusUsed")?,
            radius_covalent: float("RadiusCovalent")?,
            radius_atomic: float("RadiusAtomic")?,
            charge_state: self.get("ChargeState").and_then(to_integer),
            radius_ionic: self.get("RadiusIonic").and_then(to_numeric),
        })
    }
}

/// Best-effort float; empty or non-numeric text yields `None`.
pub fn to_numeric(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}

/// Integer with tolerance for a zero fraction ("2.0"). Anything else is `None`.
pub fn to_integer(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(v) = value.parse::<i32>() {
        return Some(v);
    }
    match value.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.abs() <= i32::MAX as f64 => Some(v as i32),
        _ => {
            debug!("Dropping non-integer value '{}'", value);
            None
        }
    }
}

/// "r,g,b,a" -> exactly four floats.
pub fn parse_color(value: &str) -> Option<[f64; 4]> {
    let parts: Option<Vec<f64>> = value.split(',').map(to_numeric).collect();
    parts.and_then(|v| <[f64; 4]>::try_from(v).ok())
}

fn leading_text(block: &str) -> String {
    let flat = block.split_whitespace().collect::<Vec<_>>().join(" ");
    flat.chars().take(48).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SODIUM: &str = "Atom
  Number             : 11
  Name               : Sodium
  Short name         : Na
  Color              : 0.67,0.36,0.95,0.80
  Diffuse intensity  : 1.0
  Specular intensity : 0.5
  Specular hard      : 50
  Traceable          : 1
  Shadow receive     : 1
  Shadow cast        : 1
  Radius used        : 1.80
  Radius covalent    : 1.54
  Radius atomic      : 1.90
  Charge state       : 1
  Radius ionic       : 0.97
";

    const NEON: &str = "Atom
==========
  Number             : 10
  Name               : Neon
  Short name         : Ne
  Color              : 0.70,0.89,0.96,1.0
  Diffuse intensity  : 1.0
  Specular intensity : 0.5
  Specular hard      : 50
  Traceable          : 1
  Shadow receive     : 1
  Shadow cast        : 1
  Radius used        : 0.71
  Radius covalent    : 0.69
  Radius atomic      : 0.51
";

    #[test]
    fn test_field_identifier() {
        assert_eq!(field_identifier("Specular hard"), "SpecularHard");
        assert_eq!(field_identifier("Short name"), "ShortName");
        assert_eq!(field_identifier("Number"), "Number");
        assert_eq!(field_identifier("radius, ionic"), "RadiusIonic");
    }

    #[test]
    fn test_pattern_names_every_field() {
        let pattern = build_pattern(&FIELDS);
        assert!(pattern.starts_with(r"[\s\S]*Number\s*:\s*(?P<Number>"));
        for f in FIELDS.iter() {
            assert!(pattern.contains(&format!("(?P<{}>", field_identifier(f.label))));
        }
        let degraded = build_pattern(&FIELDS[..REQUIRED_FIELDS]);
        assert!(!degraded.contains("ChargeState"));
        assert!(!degraded.contains("RadiusIonic"));
    }

    #[test]
    fn test_full_block() {
        let table = parse_str(SODIUM).unwrap();
        let na = table.get("Na").unwrap();

        assert_eq!(na.atomic_number, 11);
        assert_eq!(na.name, "Sodium");
        assert!((na.radius_used - 1.80).abs() < 1e-9);
        assert_eq!(na.color, [0.67, 0.36, 0.95, 0.80]);
        assert_eq!(na.specular_hardness, 50.0);
        assert_eq!(na.charge_state, Some(1));
        assert_eq!(na.radius_ionic, Some(0.97));
    }

    #[test]
    fn test_block_without_ionic_fields() {
        let table = parse_str(NEON).unwrap();
        let ne = table.get("Ne").unwrap();

        assert_eq!(ne.charge_state, None);
        assert_eq!(ne.radius_ionic, None);
        assert_eq!(ne.atomic_number, 10);
        assert_eq!(ne.short_name, "Ne");
        assert_eq!(ne.color, [0.70, 0.89, 0.96, 1.0]);
        assert!((ne.radius_atomic - 0.51).abs() < 1e-9);
        assert_eq!(ne.shadow_cast, 1.0);
    }

    #[test]
    fn test_charge_without_ionic_radius() {
        let text = format!("{}  Charge state       : 2\n", NEON);
        let table = parse_str(&text).unwrap();
        let ne = table.get("Ne").unwrap();

        // Only the 13 required fields are read when the ionic pair is incomplete.
        assert_eq!(ne.charge_state, None);
        assert_eq!(ne.radius_ionic, None);
        assert!((ne.radius_used - 0.71).abs() < 1e-9);
    }

    #[test]
    fn test_multiple_blocks_and_blank_blocks() {
        let text = format!("\n\n{}\n   \n{}", SODIUM, NEON);
        let table = parse_str(&text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.symbols(), vec!["Na", "Ne"]);
    }

    #[test]
    fn test_negative_charge_state() {
        let text = SODIUM
            .replace("Charge state       : 1", "Charge state       : -1")
            .replace("Short name         : Na", "Short name         : Xa");
        let table = parse_str(&text).unwrap();
        assert_eq!(table.get("Xa").unwrap().charge_state, Some(-1));
    }

    #[test]
    fn test_malformed_block_is_fatal() {
        let text = format!("{}Atom\n  Number : eleven\n  Name : Broken\n", SODIUM);
        match parse_str(&text) {
            Err(Error::ReferenceMatch { block }) => assert!(block.starts_with("Number : eleven")),
            other => panic!("expected ReferenceMatch, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(to_numeric(" 1.5 "), Some(1.5));
        assert_eq!(to_numeric(""), None);
        assert_eq!(to_numeric("n/a"), None);
        assert_eq!(to_integer("-2"), Some(-2));
        assert_eq!(to_integer("3.0"), Some(3));
        assert_eq!(to_integer("1.5"), None);
        assert_eq!(parse_color("0.1,0.2,0.3,1.0"), Some([0.1, 0.2, 0.3, 1.0]));
        assert_eq!(parse_color("0.1,0.2,0.3"), None);
    }

    #[test]
    fn test_missing_file() {
        let err = parse("/nonexistent/atom_info.dat").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_bundled_reference_data() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/atom_info.dat");
        let table = parse(path).unwrap();

        for symbol in ["H", "C", "N", "O", "S", "P", "Na", "Cl", "Fe", "Zn"] {
            assert!(table.get(symbol).is_ok(), "missing {}", symbol);
        }
        let fe = table.get("Fe").unwrap();
        assert_eq!(fe.atomic_number, 26);
        assert_eq!(fe.charge_state, Some(2));
        assert_eq!(table.get("He").unwrap().radius_ionic, None);
    }
}
