use clap::Parser;
use footprint::{fetch_structure, StructureFormat};
use std::path::PathBuf;
use tracing::{info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// PDB identifiers of the structures to download
    #[arg(required = true)]
    ids: Vec<String>,

    /// Directory the structures are saved to
    #[arg(short, long, default_value = "structures")]
    dir: PathBuf,

    /// File format to download
    #[arg(short = 't', long, default_value_t = StructureFormat::Cif)]
    format: StructureFormat,
}

pub(crate) fn run(args: &Args) -> footprint::Result<()> {
    trace!("{args:?}");

    for id in &args.ids {
        let path = fetch_structure(id, args.format, &args.dir)?;
        info!("Fetched {id} to {}", path.display());
        println!("{}", path.display());
    }
    Ok(())
}
