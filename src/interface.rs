//! Interface residues of a complex, defined by the surface area they lose on binding.
//!
//! The SASA of every residue is calculated once in the complex and once with
//! only its own chain group present. A residue belongs to the interface when
//! the difference (dSASA) is larger than the configured cutoff.

use crate::error::Result;
use crate::residues::ResidueKey;
use crate::sasa::get_residue_sasa;
use crate::settings::InterfaceSettings;
use crate::utils::{select_chains, split_groups};
use pdbtbx::*;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{debug, trace};

/// Which of the two chain groups a residue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    /// Chains before the `/` in the group string
    First,
    /// Chains after the `/` in the group string
    Second,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::First => write!(f, "first"),
            Side::Second => write!(f, "second"),
        }
    }
}

/// A residue that becomes less accessible when the complex forms.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceResidue {
    /// The residue
    pub residue: ResidueKey,
    /// Chain group of the residue
    pub side: Side,
    /// SASA in the complex (Ų)
    pub sasa_complex: f32,
    /// SASA with only the residue's own group present (Ų)
    pub sasa_unbound: f32,
    /// `sasa_unbound - sasa_complex` (Ų)
    pub dsasa: f32,
}

impl fmt::Display for InterfaceResidue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} dSASA = {:>7.2} Ų ({:.2} -> {:.2})",
            self.residue.label(),
            self.dsasa,
            self.sasa_unbound,
            self.sasa_complex
        )
    }
}

/// Interface between two chain groups of one structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    /// Chains of the first group
    pub first_chains: HashSet<String>,
    /// Chains of the second group
    pub second_chains: HashSet<String>,
    /// Interface residues sorted by side, chain and residue number
    pub residues: Vec<InterfaceResidue>,
}

impl Interface {
    /// Interface residues on one side.
    pub fn side(&self, side: Side) -> impl Iterator<Item = &InterfaceResidue> {
        self.residues.iter().filter(move |r| r.side == side)
    }

    /// Label to dSASA dictionary of all interface residues.
    pub fn dsasa_map(&self) -> BTreeMap<String, f32> {
        self.residues
            .iter()
            .map(|r| (r.residue.label(), r.dsasa))
            .collect()
    }

    /// Sum of dSASA over all interface residues (Ų).
    pub fn total_dsasa(&self) -> f32 {
        self.residues.iter().map(|r| r.dsasa).sum()
    }
}

/// Find the interface residues between the two chain groups of `pdb`.
///
/// # Arguments
///
/// * `pdb` - Reference to a PDB structure
/// * `groups` - Chain groups specification (e.g., "E/A" or "A/H,L")
/// * `settings` - Probe radius, sampling and the dSASA cutoff
///
/// # Example
///
/// ```no_run
/// use footprint::{load_model, get_interface, InterfaceSettings};
///
/// let (pdb, _) = load_model("6m0j.cif").unwrap();
/// let interface = get_interface(&pdb, "E/A", InterfaceSettings::default()).unwrap();
/// for residue in &interface.residues {
///     println!("{residue}");
/// }
/// ```
pub fn get_interface(pdb: &PDB, groups: &str, settings: InterfaceSettings) -> Result<Interface> {
    let (first_chains, second_chains) = split_groups(pdb, groups)?;
    debug!("Interface between chains {first_chains:?} and {second_chains:?}");

    let combined: HashSet<String> = first_chains.union(&second_chains).cloned().collect();
    let complex = select_chains(pdb, &combined);
    let first = select_chains(pdb, &first_chains);
    let second = select_chains(pdb, &second_chains);

    let (complex_sasa, (first_sasa, second_sasa)) = rayon::join(
        || get_residue_sasa(&complex, settings.probe_radius, settings.n_points),
        || {
            rayon::join(
                || get_residue_sasa(&first, settings.probe_radius, settings.n_points),
                || get_residue_sasa(&second, settings.probe_radius, settings.n_points),
            )
        },
    );

    let mut residues: Vec<InterfaceResidue> = first_sasa
        .into_iter()
        .map(|(key, sasa)| (Side::First, key, sasa))
        .chain(
            second_sasa
                .into_iter()
                .map(|(key, sasa)| (Side::Second, key, sasa)),
        )
        .filter_map(|(side, residue, sasa_unbound)| {
            let sasa_complex = *complex_sasa.get(&residue)?;
            let dsasa = sasa_unbound - sasa_complex;
            trace!("{residue}: {sasa_unbound:.2} -> {sasa_complex:.2}");
            (dsasa > settings.dsasa_cutoff).then_some(InterfaceResidue {
                residue,
                side,
                sasa_complex,
                sasa_unbound,
                dsasa,
            })
        })
        .collect();
    residues.sort_by(|a, b| (a.side, &a.residue).cmp(&(b.side, &b.residue)));

    debug!(
        "Found {} interface residues ({} on the first side, {} on the second)",
        residues.len(),
        residues.iter().filter(|r| r.side == Side::First).count(),
        residues.iter().filter(|r| r.side == Side::Second).count()
    );

    Ok(Interface {
        first_chains,
        second_chains,
        residues,
    })
}
