#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

//! # Footprint Library
//!
//! This library compares the interfaces that two binding partners form with the
//! same protein, e.g. an antibody and a receptor bound to a viral spike. For each
//! complex it finds the interface residues from their loss of solvent accessible
//! surface area, superposes the complexes on the shared protein, and diffs the
//! two footprints to flag hotspot residues for mutagenesis.
//!
//! Tabular results are returned as Polars DataFrames through the [`report`]
//! helpers.

mod chains;
mod compare;
mod distances;
mod error;
mod fetch;
mod footprint;
mod interface;
pub mod report;
mod residues;
mod sasa;
mod settings;
mod superpose;
mod utils;

// Re-export key public types
pub use chains::ChainExt;
pub use compare::{compare_structures, Comparison};
pub use distances::{nearest_partner_distances, Contact};
pub use error::{FootprintError, Result};
pub use fetch::{cached_path, fetch_structure, structure_url, validate_pdb_id, StructureFormat};
pub use footprint::{compare_footprints, FootprintDiff, FootprintEntry, Membership};
pub use interface::{get_interface, Interface, InterfaceResidue, Side};
pub use residues::{ResidueExt, ResidueKey};
pub use sasa::{get_atom_sasa, get_buried_area, get_residue_sasa, total_sasa, AtomSasa, BuriedArea};
pub use settings::{AlignSettings, CompareSettings, FootprintSettings, InterfaceSettings};
pub use superpose::{superpose, Superposition};
pub use utils::{
    ensure_chains, load_model, log_pdb_warnings, parse_groups, run_with_threads, select_chains,
    split_groups, strip_hydrogens, write_df_to_file, DataFrameFileType,
};
