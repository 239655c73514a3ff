use clap::Parser;
use footprint::{get_buried_area, load_model, log_pdb_warnings, run_with_threads, InterfaceSettings};
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Path to the PDB or mmCIF file to be analyzed
    #[arg(short, long)]
    input: PathBuf,

    /// Group chains for interface calculation:
    /// e.g. A,B/C,D
    /// where chains A and B form one side and C and D form the other side.
    /// The buried surface area is calculated as the difference between the
    /// combined SASA and the sum of individual group SASAs.
    /// The two groups may not share a chain.
    #[arg(short, long)]
    groups: String,

    /// Probe radius r (smaller r detects more surface details and reports a larger surface)
    #[arg(short = 'r', long = "probe-radius", default_value_t = 1.4)]
    probe_radius: f32,

    /// Number of points on the sphere for sampling
    #[arg(short = 'n', long = "num-points", default_value_t = 100)]
    n_points: usize,

    /// Number of threads to use for parallel processing (0 for all cores)
    #[arg(short = 'j', long = "num-threads", default_value_t = 1)]
    num_threads: usize,
}

pub(crate) fn run(args: &Args) -> footprint::Result<()> {
    trace!("{args:?}");

    let (pdb, pdb_warnings) = load_model(&args.input)?;
    log_pdb_warnings(&pdb_warnings);

    let settings = InterfaceSettings {
        probe_radius: args.probe_radius,
        n_points: args.n_points,
        ..Default::default()
    };
    let buried = run_with_threads(args.num_threads, || {
        debug!("Using {} thread(s)", rayon::current_num_threads());
        get_buried_area(&pdb, &args.groups, settings)
    })?;

    info!("{buried}");
    println!("{:.2}", buried.dsasa);
    Ok(())
}
