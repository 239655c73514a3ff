use clap::Parser;
use footprint::{load_model, log_pdb_warnings, superpose, AlignSettings};
use std::path::PathBuf;
use tracing::{info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Path to the PDB or mmCIF file that stays in place
    #[arg(short, long)]
    target: PathBuf,

    /// Chain of the target used for the superposition
    #[arg(long = "target-chain")]
    target_chain: String,

    /// Path to the PDB or mmCIF file that is moved onto the target
    #[arg(short, long)]
    mobile: PathBuf,

    /// Chain of the mobile structure used for the superposition
    #[arg(long = "mobile-chain")]
    mobile_chain: String,

    /// Output file for the superposed mobile structure (.pdb or .cif)
    #[arg(short, long)]
    output: PathBuf,

    /// Number of outlier rejection cycles
    #[arg(long, default_value_t = 5)]
    cycles: usize,

    /// Outlier rejection cutoff in multiples of the RMSD
    #[arg(long, default_value_t = 2.0)]
    cutoff: f64,
}

pub(crate) fn run(args: &Args) -> footprint::Result<()> {
    trace!("{args:?}");

    let (target, target_warnings) = load_model(&args.target)?;
    log_pdb_warnings(&target_warnings);
    let (mut mobile, mobile_warnings) = load_model(&args.mobile)?;
    log_pdb_warnings(&mobile_warnings);

    let settings = AlignSettings {
        cycles: args.cycles,
        cutoff: args.cutoff,
    };
    let superposition = superpose(
        &target,
        &args.target_chain,
        &mobile,
        &args.mobile_chain,
        settings,
    )?;
    println!("{superposition}");

    superposition.apply(&mut mobile);
    let output_file = args.output.to_string_lossy().to_string();
    pdbtbx::save(&mobile, &output_file, pdbtbx::StrictnessLevel::Loose)?;
    info!("Superposed structure saved to {output_file}");
    Ok(())
}
