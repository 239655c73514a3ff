use clap::Parser;
use footprint::report::{distances_to_df, footprint_to_df, format_footprint, format_map, interface_to_df};
use footprint::{
    compare_structures, fetch_structure, load_model, log_pdb_warnings, run_with_threads,
    write_df_to_file, AlignSettings, CompareSettings, DataFrameFileType, FootprintSettings,
    Interface, InterfaceSettings, StructureFormat,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// First complex: a local PDB/mmCIF file or a PDB identifier to download
    #[arg(long, default_value = "7bz5")]
    first: String,

    /// Chain groups of the first complex, shared protein first: e.g. A/H,L
    #[arg(long = "first-groups", default_value = "A/H,L")]
    first_groups: String,

    /// Second complex: a local PDB/mmCIF file or a PDB identifier to download
    #[arg(long, default_value = "6m0j")]
    second: String,

    /// Chain groups of the second complex, shared protein first: e.g. E/A
    #[arg(long = "second-groups", default_value = "E/A")]
    second_groups: String,

    /// Name of the first binding partner in the report
    #[arg(long = "first-name", default_value = "antibody")]
    first_name: String,

    /// Name of the second binding partner in the report
    #[arg(long = "second-name", default_value = "receptor")]
    second_name: String,

    /// Directory downloaded structures are cached in
    #[arg(short = 'd', long = "structure-dir", default_value = "structures")]
    structure_dir: PathBuf,

    /// File format used for downloads
    #[arg(long, default_value_t = StructureFormat::Cif)]
    format: StructureFormat,

    /// Output directory
    #[arg(short, long, default_value = "footprint_results")]
    output: PathBuf,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Probe radius r (smaller r detects more surface details and reports a larger surface)
    #[arg(short = 'r', long = "probe-radius", default_value_t = 1.4)]
    probe_radius: f32,

    /// Number of points on the sphere for sampling
    #[arg(short = 'n', long = "num-points", default_value_t = 100)]
    n_points: usize,

    /// Minimum buried area for a residue to be part of an interface (Ų)
    #[arg(short = 'c', long = "cutoff", default_value_t = 1.0)]
    dsasa_cutoff: f32,

    /// Minimum buried area in either complex for a hotspot candidate (Ų)
    #[arg(long = "hotspot-cutoff", default_value_t = 20.0)]
    hotspot_cutoff: f32,

    /// Radius for the closest partner atom search (Å)
    #[arg(short = 's', long = "search-radius", default_value_t = 8.0)]
    search_radius: f64,

    /// Number of outlier rejection cycles of the superposition
    #[arg(long, default_value_t = 5)]
    cycles: usize,

    /// Outlier rejection cutoff of the superposition in multiples of the RMSD
    #[arg(long = "align-cutoff", default_value_t = 2.0)]
    align_cutoff: f64,

    /// Number of threads to use for parallel processing (0 for all cores)
    #[arg(short = 'j', long = "num-threads", default_value_t = 1)]
    num_threads: usize,
}

/// Use the local file if it exists, otherwise download the identifier.
fn resolve_structure(input: &str, format: StructureFormat, dir: &Path) -> footprint::Result<PathBuf> {
    let path = PathBuf::from(input);
    if path.is_file() {
        return Ok(path);
    }
    fetch_structure(input, format, dir)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "structure".to_string())
}

fn dsasa_table(interface: &Interface) -> BTreeMap<String, String> {
    interface
        .dsasa_map()
        .into_iter()
        .map(|(label, v)| (label, format!("{v:.2} Ų")))
        .collect()
}

pub(crate) fn run(args: &Args) -> footprint::Result<()> {
    trace!("{args:?}");

    let first_path = resolve_structure(&args.first, args.format, &args.structure_dir)?;
    let second_path = resolve_structure(&args.second, args.format, &args.structure_dir)?;

    let (first, first_warnings) = load_model(&first_path)?;
    log_pdb_warnings(&first_warnings);
    let (second, second_warnings) = load_model(&second_path)?;
    log_pdb_warnings(&second_warnings);

    let settings = CompareSettings {
        interface: InterfaceSettings {
            probe_radius: args.probe_radius,
            n_points: args.n_points,
            dsasa_cutoff: args.dsasa_cutoff,
        },
        align: AlignSettings {
            cycles: args.cycles,
            cutoff: args.align_cutoff,
        },
        footprint: FootprintSettings {
            hotspot_cutoff: args.hotspot_cutoff,
            search_radius: args.search_radius,
        },
    };
    let comparison = run_with_threads(args.num_threads, || {
        debug!("Using {} thread(s)", rayon::current_num_threads());
        compare_structures(
            &first,
            &args.first_groups,
            &second,
            &args.second_groups,
            settings,
        )
    })?;

    let first_name = &args.first_name;
    let second_name = &args.second_name;
    println!("Superposition of the {second_name} complex: {}\n", comparison.superposition);
    println!(
        "{}",
        format_map(
            &format!("Interface residues with the {first_name} (dSASA)"),
            &dsasa_table(&comparison.first_interface)
        )
    );
    println!(
        "{}",
        format_map(
            &format!("Interface residues with the {second_name} (dSASA)"),
            &dsasa_table(&comparison.second_interface)
        )
    );
    println!(
        "{}",
        format_map(
            &format!("Closest {first_name} atoms"),
            &comparison.first_contacts
        )
    );
    println!(
        "{}",
        format_map(
            &format!("Closest {second_name} atoms"),
            &comparison.second_contacts
        )
    );
    println!(
        "{}",
        format_footprint(&comparison.footprint, first_name, second_name)
    );

    std::fs::create_dir_all(&args.output)?;
    let first_stem = file_stem(&first_path);
    let second_stem = file_stem(&second_path);

    let mut df = interface_to_df(&comparison.first_interface)?;
    write_df_to_file(
        &mut df,
        &args.output.join(format!("{first_stem}_interface")),
        args.output_format,
    )?;
    let mut df = interface_to_df(&comparison.second_interface)?;
    write_df_to_file(
        &mut df,
        &args.output.join(format!("{second_stem}_interface")),
        args.output_format,
    )?;
    let mut df = distances_to_df(&comparison.first_contacts)?;
    write_df_to_file(
        &mut df,
        &args.output.join(format!("{first_stem}_contacts")),
        args.output_format,
    )?;
    let mut df = distances_to_df(&comparison.second_contacts)?;
    write_df_to_file(
        &mut df,
        &args.output.join(format!("{second_stem}_contacts")),
        args.output_format,
    )?;
    let mut df = footprint_to_df(&comparison.footprint)?;
    debug!("{df}");
    write_df_to_file(&mut df, &args.output.join("footprint"), args.output_format)?;

    // Aligned structure is written in the input format
    let extension = second_path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "pdb".to_string());
    let aligned_file = args
        .output
        .join(format!("{second_stem}_aligned.{extension}"))
        .to_string_lossy()
        .to_string();
    pdbtbx::save(
        &comparison.aligned_second,
        &aligned_file,
        pdbtbx::StrictnessLevel::Loose,
    )?;

    info!("Results saved to {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdbtbx::{ContainsAtomConformer, ContainsAtomConformerResidue, ContainsAtomConformerResidueChain};

    fn test_file(name: &str) -> String {
        format!("{}/test-data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn writes_tables_and_aligned_structure() {
        let output = std::env::temp_dir().join("footprint-compare-cli");
        let _ = std::fs::remove_dir_all(&output);
        let first = test_file("antibody_complex.pdb");
        let second = test_file("receptor_complex.pdb");

        let args = Args::try_parse_from([
            "compare",
            "--first",
            first.as_str(),
            "--first-groups",
            "A/H",
            "--second",
            second.as_str(),
            "--second-groups",
            "E/R",
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();
        run(&args).unwrap();

        // Header plus one row per residue: 4 interface residues, 2 spike contacts
        for (table, lines) in [
            ("antibody_complex_interface.csv", 5),
            ("receptor_complex_interface.csv", 5),
            ("antibody_complex_contacts.csv", 3),
            ("receptor_complex_contacts.csv", 3),
        ] {
            let content = std::fs::read_to_string(output.join(table)).unwrap();
            assert_eq!(content.lines().count(), lines, "{table}:\n{content}");
        }

        let footprint = std::fs::read_to_string(output.join("footprint.csv")).unwrap();
        let rows: Vec<&str> = footprint.lines().collect();
        assert_eq!(
            rows[0],
            "resn,resi,insertion,first_dsasa,second_dsasa,membership,hotspot"
        );
        assert_eq!(rows.len(), 4);
        assert!(rows[2].starts_with("SER,503,"));
        assert!(rows[2].contains(",shared,"));

        // The receptor spike lands on the antibody spike
        let (aligned, _) = load_model(output.join("receptor_complex_aligned.pdb")).unwrap();
        let ca = aligned
            .atoms_with_hierarchy()
            .find(|x| {
                x.chain().id() == "E" && x.residue().serial_number() == 503 && x.atom().name() == "CA"
            })
            .unwrap();
        let (x, y, z) = ca.atom().pos();
        assert!((x - 20.0).abs() < 0.01 && y.abs() < 0.01 && (z - 5.0).abs() < 0.01);
    }
}
