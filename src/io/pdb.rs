// src/io/pdb.rs

use crate::error::{Error, Result};
use crate::model::atom::{AtomRecord, Field};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const EXTENSION: &str = "pdb";
pub const RECORD_TAG: &str = "ATOM";

/// Column ranges of an ATOM record, 0-indexed and end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub record_tag: (usize, usize),
    pub serial: (usize, usize),
    pub name: (usize, usize),
    pub alt_loc: (usize, usize),
    pub res_name: (usize, usize),
    pub chain_id: (usize, usize),
    pub res_seq: (usize, usize),
    pub i_code: (usize, usize),
    pub x: (usize, usize),
    pub y: (usize, usize),
    pub z: (usize, usize),
    pub occupancy: (usize, usize),
    pub temp_factor: (usize, usize),
    pub element: (usize, usize),
    pub charge: (usize, usize),
}

impl ColumnLayout {
    /// wwPDB v3.3 coordinate section.
    pub const WWPDB: ColumnLayout = ColumnLayout {
        record_tag: (0, 6),
        serial: (6, 11),
        name: (12, 16),
        alt_loc: (16, 17),
        res_name: (17, 20),
        chain_id: (21, 22),
        res_seq: (22, 26),
        i_code: (26, 27),
        x: (30, 38),
        y: (38, 46),
        z: (46, 54),
        occupancy: (54, 60),
        temp_factor: (60, 66),
        element: (76, 78),
        charge: (78, 80),
    };

    /// Narrower ranges used by the first generation of the converter. Residue
    /// names are cut to two characters and coordinates lose their last digit.
    pub const LEGACY: ColumnLayout = ColumnLayout {
        record_tag: (0, 5),
        serial: (6, 10),
        name: (12, 15),
        alt_loc: (16, 17),
        res_name: (17, 19),
        chain_id: (21, 22),
        res_seq: (22, 25),
        i_code: (26, 27),
        x: (30, 37),
        y: (38, 45),
        z: (46, 53),
        occupancy: (54, 59),
        temp_factor: (60, 65),
        element: (66, 78),
        charge: (79, 80),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PdbLayout {
    #[default]
    Wwpdb,
    Legacy,
}

impl PdbLayout {
    pub fn columns(self) -> &'static ColumnLayout {
        match self {
            PdbLayout::Wwpdb => &ColumnLayout::WWPDB,
            PdbLayout::Legacy => &ColumnLayout::LEGACY,
        }
    }
}

/// An ATOM line that was dropped because its serial or position is unreadable.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub line_number: usize,
    pub serial: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct PdbParse {
    pub atoms: Vec<AtomRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// Reads the ATOM records of a `.pdb` file using the wwPDB layout.
pub fn parse(path: impl AsRef<Path>) -> Result<Vec<AtomRecord>> {
    parse_with(path, PdbLayout::default()).map(|parsed| parsed.atoms)
}

pub fn parse_with(path: impl AsRef<Path>, layout: PdbLayout) -> Result<PdbParse> {
    let path = path.as_ref();
    check_extension(path)?;

    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let parsed = read_atoms(&text, layout);

    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    info!("{} successfully loaded: {} atoms", name, parsed.atoms.len());
    if !parsed.skipped.is_empty() {
        warn!("{}: {} atom records skipped", name, parsed.skipped.len());
    }
    Ok(parsed)
}

pub fn check_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(EXTENSION) => Ok(()),
        _ => Err(Error::Format {
            path: path.to_path_buf(),
            expected: "PDB",
        }),
    }
}

/// Whether the first five characters, spaces removed, read `ATOM`.
pub fn is_atom_record(line: &str) -> bool {
    let head: String = line.chars().take(5).filter(|c| *c != ' ').collect();
    head == RECORD_TAG
}

pub fn read_atoms(text: &str, layout: PdbLayout) -> PdbParse {
    let cols = layout.columns();
    let mut parsed = PdbParse::default();

    for (idx, line) in text.split('\n').enumerate() {
        if !is_atom_record(line) {
            continue;
        }
        match parse_record(line, cols) {
            Ok(atom) => parsed.atoms.push(atom),
            Err((serial, reason)) => {
                warn!(
                    "Atom {} (line {}) serial or 3D position can't be decoded: {}",
                    serial,
                    idx + 1,
                    reason
                );
                parsed.skipped.push(SkippedRecord {
                    line_number: idx + 1,
                    serial,
                    reason,
                });
            }
        }
    }

    parsed
}

fn parse_record(line: &str, cols: &ColumnLayout) -> std::result::Result<AtomRecord, (String, String)> {
    let col = move |range: (usize, usize)| column(line, range).trim();

    let serial_text = col(cols.serial);
    let fail = |what: &str, raw: &str| (serial_text.to_string(), format!("invalid {} '{}'", what, raw));

    let serial = if serial_text.is_empty() {
        None
    } else {
        Some(serial_text.parse::<i64>().map_err(|_| fail("serial", serial_text))?)
    };

    let coord = |what: &str, range: (usize, usize)| {
        let raw = col(range);
        raw.parse::<f64>().map_err(|_| fail(what, raw))
    };
    let x = coord("x", cols.x)?;
    let y = coord("y", cols.y)?;
    let z = coord("z", cols.z)?;

    let res_seq = Field::parse(col(cols.res_seq));
    let occupancy = Field::parse(col(cols.occupancy));
    let temp_factor = Field::parse(col(cols.temp_factor));
    for (what, raw) in [
        ("resSeq", res_seq.raw()),
        ("occupancy", occupancy.raw()),
        ("tempFactor", temp_factor.raw()),
    ] {
        if let Some(raw) = raw {
            debug!("Atom {}: {} '{}' kept as text", serial_text, what, raw);
        }
    }

    let charge = col(cols.charge);

    Ok(AtomRecord {
        record_tag: col(cols.record_tag).to_string(),
        serial,
        name: col(cols.name).to_string(),
        alt_loc: first_char(col(cols.alt_loc)),
        res_name: col(cols.res_name).to_string(),
        chain_id: first_char(col(cols.chain_id)),
        res_seq,
        i_code: first_char(col(cols.i_code)),
        x,
        y,
        z,
        occupancy,
        temp_factor,
        element: col(cols.element).to_string(),
        charge: (!charge.is_empty()).then(|| charge.to_string()),
    })
}

/// Character-indexed slice, clamped to the line length.
fn column(line: &str, (start, end): (usize, usize)) -> &str {
    if line.is_ascii() {
        let len = line.len();
        return &line[start.min(len)..end.min(len)];
    }
    let byte_at = |n: usize| line.char_indices().nth(n).map(|(i, _)| i).unwrap_or(line.len());
    &line[byte_at(start)..byte_at(end)]
}

fn first_char(s: &str) -> Option<char> {
    s.chars().next()
}
