use crate::chains::ChainExt;
use crate::error::{FootprintError, Result};
use crate::residues::ResidueExt;
use pdbtbx::*;
use polars::prelude::*;
use std::{collections::HashSet, path::Path};
use tracing::{debug, error, warn};

/// Open an atomic data file with [`pdbtbx::ReadOptions`] and remove non-protein residues.
pub fn load_model(input_file: impl AsRef<Path>) -> Result<(PDB, Vec<PDBError>)> {
    let input_file = input_file.as_ref().to_string_lossy().to_string();

    // Load file as complex structure
    let (mut pdb, errors) = pdbtbx::ReadOptions::default()
        .set_only_atomic_coords(true)
        .set_level(pdbtbx::StrictnessLevel::Loose)
        .read(&input_file)?;

    // Remove non-protein residues from model
    pdb.remove_residues_by(|res| res.resn().is_none());

    debug!("Loaded {} chains from {input_file}", pdb.chain_count());
    for chain in pdb.chains() {
        debug!(">{}\n{}", chain.id(), chain.pdb_seq().join(""));
    }

    Ok((pdb, errors))
}

/// Log the warnings collected while parsing a structure file.
pub fn log_pdb_warnings(warnings: &[PDBError]) {
    for e in warnings {
        match e.level() {
            pdbtbx::ErrorLevel::BreakingError => error!("{e}"),
            pdbtbx::ErrorLevel::InvalidatingError => error!("{e}"),
            _ => warn!("{e}"),
        }
    }
}

/// Parse the chain groups from the input string.
/// Only checks the first two fields separated by `/`.
/// If one of the groups is unspecified, all remaining chains from `all_chains` are used.
pub fn parse_groups(
    all_chains: &HashSet<String>,
    groups: &str,
) -> Result<(HashSet<String>, HashSet<String>)> {
    // Parse the first two fields in groups
    let sel_vec: Vec<&str> = groups.split('/').collect();
    if sel_vec.len() < 2 {
        return Err(FootprintError::InvalidGroups(format!(
            "'{groups}' has no '/'; use '/' for all-to-all comparisons"
        )));
    }
    let ligand_chains = sel_vec.first().unwrap_or(&"");
    let receptor_chains = sel_vec.get(1).unwrap_or(&"");

    let mut first: HashSet<String> = ligand_chains
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    let mut second: HashSet<String> = receptor_chains
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    // If both groups are empty, perform all-to-all comparisons
    if first.is_empty() && second.is_empty() {
        return Ok((all_chains.clone(), all_chains.clone()));
    }

    // If there are no chains on one side, use all remaining chains
    if first.is_empty() {
        first = all_chains.difference(&second).cloned().collect();
    } else if second.is_empty() {
        second = all_chains.difference(&first).cloned().collect();
    }

    if first.is_empty() || second.is_empty() {
        return Err(FootprintError::InvalidGroups(format!(
            "'{groups}' leaves one of the groups empty"
        )));
    }

    Ok((first, second))
}

/// Make sure every chain in `chains` is present in `pdb`.
pub fn ensure_chains(pdb: &PDB, chains: &HashSet<String>) -> Result<()> {
    let present: HashSet<&str> = pdb.chains().map(|c| c.id()).collect();
    let mut missing: Vec<&String> = chains
        .iter()
        .filter(|c| !present.contains(c.as_str()))
        .collect();
    missing.sort();
    match missing.first() {
        Some(chain) => Err(FootprintError::MissingChain(chain.to_string())),
        None => Ok(()),
    }
}

/// Parse `groups` against the chains of `pdb` for an interface calculation.
///
/// Both groups must exist in the structure and may not share a chain.
pub fn split_groups(pdb: &PDB, groups: &str) -> Result<(HashSet<String>, HashSet<String>)> {
    let all_chains: HashSet<String> = pdb.chains().map(|c| c.id().to_string()).collect();
    let (first, second) = parse_groups(&all_chains, groups)?;
    ensure_chains(pdb, &first)?;
    ensure_chains(pdb, &second)?;

    let mut overlap: Vec<&String> = first.intersection(&second).collect();
    if !overlap.is_empty() {
        overlap.sort();
        return Err(FootprintError::InvalidGroups(format!(
            "chains {overlap:?} are in both groups of '{groups}'"
        )));
    }
    Ok((first, second))
}

/// Serial number of the first model, the only one used in calculations.
pub(crate) fn first_model_serial(pdb: &PDB) -> Option<usize> {
    pdb.models().next().map(|m| m.serial_number())
}

/// Whether `conformer` is used for `residue`: atoms without an alternate
/// location, or the first alternate location that appears in the residue.
pub(crate) fn in_first_alternative(residue: &Residue, conformer: &Conformer) -> bool {
    match conformer.alternative_location() {
        None => true,
        Some(alt) => residue
            .conformers()
            .find_map(|c| c.alternative_location())
            .is_some_and(|first| first == alt),
    }
}

/// Copy of `pdb` that only contains the given chains.
pub fn select_chains(pdb: &PDB, chains: &HashSet<String>) -> PDB {
    let mut selected = pdb.clone();
    selected.remove_chains_by(|chain| !chains.contains(chain.id()));
    selected
}

/// Remove all hydrogen atoms, which are not used for surface calculations.
pub fn strip_hydrogens(pdb: &mut PDB) {
    pdb.remove_atoms_by(|atom| atom.element() == Some(&Element::H));
}

/// Run `op` inside a rayon thread pool with `num_threads` threads (0 for all cores).
pub fn run_with_threads<F, R>(num_threads: usize, op: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
    {
        Ok(pool) => pool.install(op),
        Err(e) => {
            warn!("Failed to build thread pool ({e}), falling back to the global pool");
            op()
        }
    }
}

/// Write a DataFrame to a file of the given type
pub fn write_df_to_file(
    df: &mut DataFrame,
    file_path: &Path,
    file_type: DataFrameFileType,
) -> Result<()> {
    let file_suffix = file_type.to_string();
    let mut file = std::fs::File::create(file_path.with_extension(file_suffix))?;
    match file_type {
        DataFrameFileType::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Json => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(df)?;
        }
        DataFrameFileType::NDJson => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::JsonLines)
                .finish(df)?;
        }
    }
    Ok(())
}

/// File format for writing DataFrames.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum DataFrameFileType {
    /// Comma-separated values
    Csv,
    /// Parquet columnar storage
    Parquet,
    /// Standard JSON
    Json,
    /// Newline-delimited JSON
    NDJson,
}

impl std::fmt::Display for DataFrameFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataFrameFileType::Csv => write!(f, "csv"),
            DataFrameFileType::Parquet => write!(f, "parquet"),
            DataFrameFileType::Json => write!(f, "json"),
            DataFrameFileType::NDJson => write!(f, "ndjson"),
        }
    }
}
