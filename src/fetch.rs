//! Retrieval of structure files from the RCSB PDB.

use crate::error::{FootprintError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RCSB_DOWNLOAD_URL: &str = "https://files.rcsb.org/download";

/// File flavour to download.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum StructureFormat {
    /// Legacy PDB format
    Pdb,
    /// PDBx/mmCIF
    #[default]
    Cif,
}

impl StructureFormat {
    /// Whether `content` contains coordinate records of this format.
    fn looks_valid(&self, content: &str) -> bool {
        match self {
            StructureFormat::Pdb => content
                .lines()
                .any(|l| l.starts_with("ATOM  ") || l.starts_with("HETATM")),
            StructureFormat::Cif => content.lines().any(|l| l.starts_with("_atom_site.")),
        }
    }
}

impl std::fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StructureFormat::Pdb => write!(f, "pdb"),
            StructureFormat::Cif => write!(f, "cif"),
        }
    }
}

/// Check that `id` is a four character PDB identifier and return it in lower case.
pub fn validate_pdb_id(id: &str) -> Result<String> {
    let id = id.trim();
    let mut chars = id.chars();
    let valid = id.len() == 4
        && chars.next().is_some_and(|c| ('1'..='9').contains(&c))
        && chars.all(|c| c.is_ascii_alphanumeric());

    match valid {
        true => Ok(id.to_lowercase()),
        false => Err(FootprintError::InvalidPdbId(id.to_string())),
    }
}

/// Download URL of a structure on the RCSB file server.
pub fn structure_url(id: &str, format: StructureFormat) -> String {
    format!("{RCSB_DOWNLOAD_URL}/{}.{format}", id.to_uppercase())
}

/// Path where a fetched structure is stored inside `dir`.
pub fn cached_path(dir: &Path, id: &str, format: StructureFormat) -> PathBuf {
    dir.join(id.to_lowercase()).with_extension(format.to_string())
}

/// Fetch a structure into `dir`, reusing a previous download if present.
///
/// # Example
///
/// ```no_run
/// use footprint::{fetch_structure, StructureFormat};
///
/// let path = fetch_structure("6m0j", StructureFormat::Cif, std::path::Path::new("structures")).unwrap();
/// println!("Structure stored at {}", path.display());
/// ```
pub fn fetch_structure(id: &str, format: StructureFormat, dir: &Path) -> Result<PathBuf> {
    let id = validate_pdb_id(id)?;
    let output_path = cached_path(dir, &id, format);
    if is_cached(&output_path, format)? {
        debug!("Using cached {}", output_path.display());
        return Ok(output_path);
    }

    fs::create_dir_all(dir)?;
    let url = structure_url(&id, format);
    info!("Downloading {url}");

    let response = reqwest::blocking::get(&url)?;
    if !response.status().is_success() {
        return Err(FootprintError::Download {
            url,
            reason: format!("HTTP {}", response.status()),
        });
    }

    let content = response.text()?;
    store_structure(&output_path, &content, format).map_err(|e| match e {
        FootprintError::Download { reason, .. } => FootprintError::Download { url, reason },
        e => e,
    })?;
    debug!("Saved {}", output_path.display());
    Ok(output_path)
}

/// Whether a usable structure is stored at `path`. Unusable files are removed.
fn is_cached(path: &Path, format: StructureFormat) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let content = fs::read_to_string(path).unwrap_or_default();
    if format.looks_valid(&content) {
        return Ok(true);
    }
    warn!("Discarding unusable cached file {}", path.display());
    fs::remove_file(path)?;
    Ok(false)
}

/// Validate `content` and move it into `path` from a temporary `.part` file.
fn store_structure(path: &Path, content: &str, format: StructureFormat) -> Result<()> {
    if !format.looks_valid(content) {
        return Err(FootprintError::Download {
            url: path.display().to_string(),
            reason: "response does not contain atomic coordinates".to_string(),
        });
    }
    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);
    fs::write(&part, content)?;
    fs::rename(&part, path)?;
    Ok(())
}
