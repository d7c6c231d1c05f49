use clap::{ArgAction, Parser};
use log::{error, info, LevelFilter};
use pdbvis::config::{Config, ExportFormat};
use pdbvis::convert::Converter;
use pdbvis::fetch::{rcsb_download_url, StructureCache};
use pdbvis::io::pdb::PdbLayout;
use pdbvis::rendering::Scene;
use pdbvis::utils::{logger, report};
use pdbvis::{Error, Result};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "pdbvis")]
#[command(about = "Convert PDB structures into sphere scenes (png, pdf, svg, json)", long_about = None)]
struct Cli {
    /// Input .pdb file
    #[arg(value_name = "INPUT", required_unless_present_any = ["id", "list_elements"])]
    input: Option<PathBuf>,

    /// Output file; its extension selects the export format
    #[arg(value_name = "OUTPUT", required_unless_present_any = ["id", "list_elements"])]
    output: Option<PathBuf>,

    /// Convert a cached structure by identifier instead of a local file
    #[arg(
        long,
        num_args = 2,
        value_names = ["PDBID", "OUTPUT"],
        conflicts_with_all = ["input", "output"]
    )]
    id: Option<Vec<String>>,

    /// Element reference file (default: assets/atom_info.dat)
    #[arg(long, value_name = "PATH")]
    atom_info: Option<PathBuf>,

    /// Root for relative resource paths
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Read PDB files with the narrow legacy column ranges
    #[arg(long, action = ArgAction::SetTrue)]
    legacy_columns: bool,

    /// Print the loaded element table and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["input", "id"])]
    list_elements: bool,

    /// Store the effective settings as the user config before running
    #[arg(long, action = ArgAction::SetTrue)]
    save_config: bool,

    /// Debug logging
    #[arg(short, action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Where the structure comes from and where the scene goes.
#[derive(Debug, PartialEq)]
enum Job {
    ListElements,
    File { input: PathBuf, output: PathBuf },
    Identifier { id: String, output: PathBuf },
}

impl Cli {
    fn job(&self) -> Result<Job> {
        if self.list_elements {
            return Ok(Job::ListElements);
        }
        if let Some([id, output]) = self.id.as_deref() {
            return Ok(Job::Identifier {
                id: id.clone(),
                output: PathBuf::from(output),
            });
        }
        match (&self.input, &self.output) {
            (Some(input), Some(output)) => Ok(Job::File {
                input: input.clone(),
                output: output.clone(),
            }),
            _ => Err(Error::Validation("expected an input and an output path".to_string())),
        }
    }

    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.base_dir {
            config.base_dir = Some(dir.clone());
        }
        if let Some(path) = &self.atom_info {
            config.atom_info_path = path.clone();
        }
        if self.legacy_columns {
            config.pdb_layout = PdbLayout::Legacy;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(e) = logger::init(level) {
        eprintln!("pdbvis: logger unavailable: {}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let (mut config, msg) = Config::load();
    info!("{}", msg);
    cli.apply(&mut config);
    if cli.save_config {
        let path = Config::get_path();
        config.save_to(&path)?;
        info!("Config saved to {:?}", path);
    }

    let job = cli.job()?;
    let output = match &job {
        Job::ListElements => {
            let converter = Converter::new(config);
            print!("{}", report::element_table(converter.elements()?));
            return Ok(());
        }
        Job::File { output, .. } | Job::Identifier { output, .. } => output,
    };

    config.export_format = ExportFormat::from_path(output)
        .ok_or_else(|| Error::Validation(format!("unsupported output format {:?}", output)))?;

    let mut scene = Scene::new(config.style.clone());
    let cache = StructureCache::new(config.cache_path());
    let converter = Converter::new(config);

    let summary = match &job {
        Job::Identifier { id, output } => {
            // No network client is bundled; identifiers must already be cached.
            let offline = |id: &str| -> Result<Option<Vec<u8>>> {
                Err(Error::Fetch {
                    id: id.to_string(),
                    details: format!("not in local cache, download {}", rcsb_download_url(id)),
                })
            };
            converter.convert_by_id(id, &cache, &offline, output, &mut scene)?
        }
        Job::File { input, output } => converter.convert(input, output, &mut scene)?,
        Job::ListElements => return Ok(()),
    };

    print!("{}", report::conversion_summary(&summary));
    Ok(())
}
