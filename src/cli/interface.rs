use clap::Parser;
use footprint::report::{distances_to_df, format_map, interface_to_df};
use footprint::{
    get_interface, load_model, log_pdb_warnings, nearest_partner_distances, run_with_threads,
    write_df_to_file, DataFrameFileType, InterfaceSettings, ResidueKey, Side,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Path to the PDB or mmCIF file to be analyzed
    #[arg(short, long)]
    input: PathBuf,

    /// Group chains for the interface:
    /// e.g. A,B/C,D
    /// where chains A and B form one side and C and D form the other side.
    /// If only one group is provided, all remaining chains will be considered as the other group.
    #[arg(short, long)]
    groups: String,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Name of the output file
    #[arg(short = 'f', long = "filename", default_value_t = String::from("interface"))]
    filename: String,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Probe radius r (smaller r detects more surface details and reports a larger surface)
    #[arg(short = 'r', long = "probe-radius", default_value_t = 1.4)]
    probe_radius: f32,

    /// Number of points on the sphere for sampling
    #[arg(short = 'n', long = "num-points", default_value_t = 100)]
    n_points: usize,

    /// Minimum buried area for a residue to be reported (Ų)
    #[arg(short = 'c', long = "cutoff", default_value_t = 1.0)]
    dsasa_cutoff: f32,

    /// Radius for the closest partner atom search (Å)
    #[arg(short = 's', long = "search-radius", default_value_t = 8.0)]
    search_radius: f64,

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
        dsasa_cutoff: args.dsasa_cutoff,
    };
    let (interface, contacts) = run_with_threads(args.num_threads, || {
        debug!("Using {} thread(s)", rayon::current_num_threads());
        let interface = get_interface(&pdb, &args.groups, settings)?;

        // Closest partner of every interface residue, on both sides
        let first: Vec<ResidueKey> = interface
            .side(Side::First)
            .map(|r| r.residue.clone())
            .collect();
        let second: Vec<ResidueKey> = interface
            .side(Side::Second)
            .map(|r| r.residue.clone())
            .collect();
        let mut contacts = nearest_partner_distances(
            &pdb,
            &first,
            &interface.second_chains,
            args.search_radius,
        );
        contacts.extend(nearest_partner_distances(
            &pdb,
            &second,
            &interface.first_chains,
            args.search_radius,
        ));
        footprint::Result::Ok((interface, contacts))
    })?;

    let dsasa: BTreeMap<String, String> = interface
        .dsasa_map()
        .into_iter()
        .map(|(label, v)| (label, format!("{v:.2} Ų")))
        .collect();
    println!("{}", format_map("Interface residues (dSASA)", &dsasa));
    println!("{}", format_map("Closest partner atoms", &contacts));
    info!(
        "Total dSASA over {} interface residues: {:.2} Ų",
        interface.residues.len(),
        interface.total_dsasa()
    );

    std::fs::create_dir_all(&args.output)?;
    let output_file = args.output.join(&args.filename);
    let mut df_interface = interface_to_df(&interface)?;
    debug!("{df_interface}");
    write_df_to_file(&mut df_interface, &output_file, args.output_format)?;

    let contacts_file = args.output.join(format!("{}_contacts", args.filename));
    let mut df_contacts = distances_to_df(&contacts)?;
    write_df_to_file(&mut df_contacts, &contacts_file, args.output_format)?;

    info!("Results saved to {}", args.output.display());
    Ok(())
}
