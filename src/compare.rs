//! End-to-end comparison of two complexes that share one binding partner.

use crate::distances::{nearest_partner_distances, Contact};
use crate::error::{FootprintError, Result};
use crate::footprint::{compare_footprints, FootprintDiff};
use crate::interface::{get_interface, Interface, Side};
use crate::residues::ResidueKey;
use crate::settings::CompareSettings;
use crate::superpose::{superpose, Superposition};
use pdbtbx::*;
use std::collections::{BTreeMap, HashSet};
use tracing::info;

/// Everything computed for one pair of complexes.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Transformation of the second complex onto the first
    pub superposition: Superposition,
    /// The second complex moved into the frame of the first
    pub aligned_second: PDB,
    /// Interface of the first complex
    pub first_interface: Interface,
    /// Interface of the second complex
    pub second_interface: Interface,
    /// Closest partner atom of each shared-protein interface residue in the first complex
    pub first_contacts: BTreeMap<String, Contact>,
    /// Closest partner atom of each shared-protein interface residue in the second complex
    pub second_contacts: BTreeMap<String, Contact>,
    /// Diff of the two footprints on the shared protein
    pub footprint: FootprintDiff,
}

/// Alphabetically first chain of the shared group, used for superposition.
fn anchor_chain(chains: &HashSet<String>) -> Result<String> {
    chains
        .iter()
        .min()
        .cloned()
        .ok_or_else(|| FootprintError::InvalidGroups("empty shared group".to_string()))
}

fn shared_contacts(
    pdb: &PDB,
    interface: &Interface,
    search_radius: f64,
) -> BTreeMap<String, Contact> {
    let residues: Vec<ResidueKey> = interface
        .side(Side::First)
        .map(|r| r.residue.clone())
        .collect();
    nearest_partner_distances(pdb, &residues, &interface.second_chains, search_radius)
}

/// Compare the interfaces of two complexes.
///
/// The first group of `first_groups` and `second_groups` must describe the same
/// protein in both structures (e.g. the spike), the second group its binding
/// partner (e.g. an antibody and a receptor).
///
/// # Example
///
/// ```no_run
/// use footprint::{load_model, compare_structures, CompareSettings};
///
/// let (antibody, _) = load_model("7bz5.cif").unwrap();
/// let (receptor, _) = load_model("6m0j.cif").unwrap();
/// let cmp = compare_structures(&antibody, "A/H,L", &receptor, "E/A", CompareSettings::default()).unwrap();
/// println!("{}", cmp.superposition);
/// println!("{} hotspot candidates", cmp.footprint.hotspots().len());
/// ```
pub fn compare_structures(
    first: &PDB,
    first_groups: &str,
    second: &PDB,
    second_groups: &str,
    settings: CompareSettings,
) -> Result<Comparison> {
    let first_interface = get_interface(first, first_groups, settings.interface)?;
    info!(
        "Found {} interface residues in the first complex",
        first_interface.residues.len()
    );
    let second_interface = get_interface(second, second_groups, settings.interface)?;
    info!(
        "Found {} interface residues in the second complex",
        second_interface.residues.len()
    );

    let target_chain = anchor_chain(&first_interface.first_chains)?;
    let mobile_chain = anchor_chain(&second_interface.first_chains)?;
    let superposition = superpose(first, &target_chain, second, &mobile_chain, settings.align)?;
    info!("Superposed chain {mobile_chain} onto chain {target_chain}: {superposition}");

    let mut aligned_second = second.clone();
    superposition.apply(&mut aligned_second);

    let search_radius = settings.footprint.search_radius;
    let first_contacts = shared_contacts(first, &first_interface, search_radius);
    let second_contacts = shared_contacts(&aligned_second, &second_interface, search_radius);

    let footprint = compare_footprints(&first_interface, &second_interface, settings.footprint);
    info!(
        "Footprint overlap {:.2} with {} hotspot candidates",
        footprint.overlap(),
        footprint.hotspots().len()
    );

    Ok(Comparison {
        superposition,
        aligned_second,
        first_interface,
        second_interface,
        first_contacts,
        second_contacts,
        footprint,
    })
}
