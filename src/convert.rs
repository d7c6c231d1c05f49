// src/convert.rs
//
// PDB -> scene conversion: parse the structure, resolve each atom's element
// properties and drive a render target.

use crate::config::{Config, ExportFormat};
use crate::error::{Error, Result};
use crate::fetch::{RemoteFetcher, StructureCache};
use crate::io::{atom_info, pdb};
use crate::model::elements::{ElementProperties, ElementTable};
use crate::rendering::{MaterialId, RenderTarget};
use log::info;
use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub atoms_rendered: usize,
    pub skipped: Vec<pdb::SkippedRecord>,
    pub element_counts: BTreeMap<String, usize>,
    pub materials: usize,
}

pub struct Converter {
    config: Config,
    elements: OnceCell<ElementTable>,
}

impl Converter {
    /// The element table is read on the first conversion, after the
    /// request has been validated.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            elements: OnceCell::new(),
        }
    }

    pub fn with_elements(config: Config, elements: ElementTable) -> Self {
        Self {
            config,
            elements: OnceCell::from(elements),
        }
    }

    pub fn elements(&self) -> Result<&ElementTable> {
        if let Some(table) = self.elements.get() {
            return Ok(table);
        }
        let table = atom_info::parse(self.config.atom_info_file())?;
        Ok(self.elements.get_or_init(|| table))
    }

    pub fn convert(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        target: &mut dyn RenderTarget,
    ) -> Result<ConversionSummary> {
        let (input, output) = (input.as_ref(), output.as_ref());

        info!("Checking paths...");
        validate_paths(input, output, self.config.export_format)?;

        let elements = self.elements()?;
        let parsed = pdb::parse_with(input, self.config.pdb_layout)?;

        // Resolve everything up front so a missing element leaves the target untouched.
        let resolved = parsed
            .atoms
            .iter()
            .map(|atom| elements.get(&atom.element).map(|props| (atom, props)))
            .collect::<Result<Vec<_>>>()?;

        info!("Initializing scene...");
        target.reset_scene();

        info!("Creating model...");
        let mut materials: HashMap<&str, MaterialId> = HashMap::new();
        let mut element_counts = BTreeMap::new();

        for (atom, props) in resolved {
            let primitive = target.add_primitive(atom.position(), props.radius_used, &atom.label());
            let material = match materials.get(atom.element.as_str()) {
                Some(&id) => id,
                None => {
                    let id = target.get_or_create_material(&atom.element, self.material_color(props));
                    materials.insert(atom.element.as_str(), id);
                    id
                }
            };
            target.assign_material(primitive, material)?;
            *element_counts.entry(atom.element.clone()).or_insert(0) += 1;
        }

        info!("Exporting model...");
        target.export_scene(output)?;
        info!("Conversion of {:?} done", input);

        Ok(ConversionSummary {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            atoms_rendered: parsed.atoms.len(),
            skipped: parsed.skipped,
            element_counts,
            materials: materials.len(),
        })
    }

    /// Looks up `id` in the local cache, downloads it when absent, then converts.
    pub fn convert_by_id(
        &self,
        id: &str,
        cache: &StructureCache,
        fetcher: &dyn RemoteFetcher,
        output: impl AsRef<Path>,
        target: &mut dyn RenderTarget,
    ) -> Result<ConversionSummary> {
        let output = output.as_ref();
        check_file_name(output, self.config.export_format.extension(), "output")?;

        let input = cache.ensure(id, fetcher)?;
        self.convert(input, output, target)
    }

    fn material_color(&self, props: &ElementProperties) -> [f64; 4] {
        match self.config.style.element_colors.get(&props.short_name) {
            Some(&(r, g, b)) => [r, g, b, props.color[3]],
            None => props.color,
        }
    }
}

/// Input must be `name.pdb` and output `name.<export extension>`, with a single dot each.
pub fn validate_paths(input: &Path, output: &Path, format: ExportFormat) -> Result<()> {
    check_file_name(input, pdb::EXTENSION, "input")?;
    check_file_name(output, format.extension(), "output")
}

fn check_file_name(path: &Path, extension: &str, role: &str) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Validation(format!("{} path {:?} has no file name", role, path)))?;

    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() != 2 || parts[1] != extension {
        return Err(Error::Validation(format!(
            "{} file {:?} must be named <name>.{} with no other dots",
            role, name, extension
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::{PrimitiveId, Scene};
    use nalgebra::Point3;
    use std::fs;

    const REFERENCE: &str = "Atom
  Number : 7
  Name : Nitrogen
  Short name : N
  Color : 0.19,0.31,0.97,1.0
  Diffuse intensity : 1.0
  Specular intensity : 0.5
  Specular hard : 50
  Traceable : 1
  Shadow receive : 1
  Shadow cast : 1
  Radius used : 0.65
  Radius covalent : 0.75
  Radius atomic : 0.56
  Charge state : -3
  Radius ionic : 1.71
Atom
  Number : 6
  Name : Carbon
  Short name : C
  Color : 0.20,0.20,0.20,1.0
  Diffuse intensity : 1.0
  Specular intensity : 0.5
  Specular hard : 50
  Traceable : 1
  Shadow receive : 1
  Shadow cast : 1
  Radius used : 0.70
  Radius covalent : 0.77
  Radius atomic : 0.91
";

    const STRUCTURE: &str = "\
HEADER    TEST
ATOM      1  N   ALA A   1      11.104  13.207   2.428  1.00 20.00           N
ATOM      2  CA  ALA A   1      12.560  13.329   2.615  1.00 20.00           C
ATOM      3  C   ALA A   1      13.004  14.751   2.293  1.00 20.00           C
ATOM      4  CB  ALA A   1      bad      13.000   2.000  1.00 20.00           C
END
";

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        next_material: usize,
        keys: HashMap<String, MaterialId>,
        radii: Vec<f64>,
    }

    impl RenderTarget for Recorder {
        fn reset_scene(&mut self) {
            self.calls.push("reset".into());
        }

        fn add_primitive(&mut self, _position: Point3<f64>, radius: f64, label: &str) -> PrimitiveId {
            self.calls.push(format!("add {}", label));
            self.radii.push(radius);
            PrimitiveId(self.radii.len() - 1)
        }

        fn get_or_create_material(&mut self, key: &str, _color: [f64; 4]) -> MaterialId {
            self.calls.push(format!("material {}", key));
            if let Some(&id) = self.keys.get(key) {
                return id;
            }
            let id = MaterialId(self.next_material);
            self.next_material += 1;
            self.keys.insert(key.to_string(), id);
            id
        }

        fn assign_material(&mut self, _primitive: PrimitiveId, _material: MaterialId) -> Result<()> {
            Ok(())
        }

        fn export_scene(&mut self, path: &Path) -> Result<()> {
            self.calls.push(format!("export {}", path.display()));
            Ok(())
        }
    }

    fn converter(format: ExportFormat) -> Converter {
        let config = Config {
            export_format: format,
            ..Config::default()
        };
        Converter::with_elements(config, atom_info::parse_str(REFERENCE).unwrap())
    }

    #[test]
    fn test_call_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ala.pdb");
        fs::write(&input, STRUCTURE).unwrap();

        let mut target = Recorder::default();
        let summary = converter(ExportFormat::Json)
            .convert(&input, dir.path().join("ala.json"), &mut target)
            .unwrap();

        assert_eq!(summary.atoms_rendered, 3);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.materials, 2);
        assert_eq!(summary.element_counts.get("C"), Some(&2));

        assert_eq!(target.calls[0], "reset");
        assert_eq!(target.calls[1], "add Atom_1");
        assert_eq!(target.calls[2], "material N");
        assert!(target.calls.last().unwrap().starts_with("export"));
        // One material request per element, not per atom.
        let material_calls = target.calls.iter().filter(|c| c.starts_with("material")).count();
        assert_eq!(material_calls, 2);
        assert_eq!(target.radii, vec![0.65, 0.70, 0.70]);
    }

    #[test]
    fn test_scene_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ala.pdb");
        fs::write(&input, STRUCTURE).unwrap();
        let output = dir.path().join("ala.json");

        let mut scene = Scene::default();
        scene.add_primitive(Point3::origin(), 9.0, "stale");
        converter(ExportFormat::Json).convert(&input, &output, &mut scene).unwrap();

        assert_eq!(scene.primitives().len(), 3);
        assert_eq!(scene.materials().len(), 2);
        assert_eq!(scene.primitives()[0].label, "Atom_1");
        assert_eq!(scene.primitives()[0].position, [11.104, 13.207, 2.428]);
        assert!(output.exists());
    }

    #[test]
    fn test_validation_precedes_any_work() {
        // The reference file does not exist: a load attempt would fail with Io.
        let config = Config {
            atom_info_path: PathBuf::from("/nonexistent/atom_info.dat"),
            export_format: ExportFormat::Png,
            ..Config::default()
        };
        let conv = Converter::new(config);
        let mut target = Recorder::default();

        let err = conv.convert("model.txt", "model.png", &mut target).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = conv.convert("model.v2.pdb", "model.png", &mut target).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = conv.convert("model.pdb", "model.fbx", &mut target).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = conv.convert("model.pdb", "my.model.png", &mut target).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(target.calls.is_empty());
        assert!(conv.elements.get().is_none());
    }

    #[test]
    fn test_unknown_element_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("fe.pdb");
        fs::write(
            &input,
            "ATOM      1 FE   HEM A   1       1.000   2.000   3.000  1.00 20.00          FE\n",
        )
        .unwrap();

        let mut target = Recorder::default();
        let err = converter(ExportFormat::Json)
            .convert(&input, dir.path().join("fe.json"), &mut target)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownElement(ref s) if s == "FE"));
        assert!(target.calls.is_empty());
    }

    #[test]
    fn test_empty_structure_converts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("none.pdb");
        fs::write(&input, "HEADER    EMPTY\nEND\n").unwrap();

        let mut target = Recorder::default();
        let summary = converter(ExportFormat::Json)
            .convert(&input, dir.path().join("none.json"), &mut target)
            .unwrap();
        assert_eq!(summary.atoms_rendered, 0);
        assert_eq!(target.calls.len(), 2);
    }

    #[test]
    fn test_color_override() {
        let mut config = Config::default();
        config.style.element_colors.insert("C".into(), (0.5, 0.5, 0.5));
        let conv = Converter::with_elements(config, atom_info::parse_str(REFERENCE).unwrap());

        let elements = conv.elements().unwrap();
        assert_eq!(conv.material_color(elements.get("C").unwrap()), [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(conv.material_color(elements.get("N").unwrap()), [0.19, 0.31, 0.97, 1.0]);
    }

    #[test]
    fn test_convert_by_id_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = StructureCache::new(dir.path().join("cache"));
        let fetch = |id: &str| -> Result<Option<Vec<u8>>> {
            assert_eq!(id, "1ALA");
            Ok(Some(STRUCTURE.as_bytes().to_vec()))
        };

        let mut scene = Scene::default();
        let summary = converter(ExportFormat::Json)
            .convert_by_id("1ALA", &cache, &fetch, dir.path().join("1ALA.json"), &mut scene)
            .unwrap();

        assert_eq!(summary.atoms_rendered, 3);
        assert!(cache.contains("1ALA"));
    }
}
