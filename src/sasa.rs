//! Solvent accessible surface area of atoms, residues and chain groups.

use crate::error::Result;
use crate::residues::ResidueKey;
use crate::settings::InterfaceSettings;
use crate::utils::{
    first_model_serial, in_first_alternative, select_chains, split_groups, strip_hydrogens,
};
use pdbtbx::*;
use rust_sasa::calculate_sasa_internal;
use rust_sasa::Atom as SASAAtom;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Fallback radius for atoms without a known element (Å)
const DEFAULT_RADIUS: f64 = 1.5;

/// SASA of a single atom.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSasa {
    /// Residue the atom belongs to
    pub residue: ResidueKey,
    /// Atom name
    pub atomn: String,
    /// Atom serial number
    pub atomi: usize,
    /// Accessible area (Ų)
    pub sasa: f32,
}

/// Calculate the SASA for each heavy atom in the first model of `pdb`.
///
/// Atoms without an alternate location are always used; of the alternate
/// locations only the first one listed in each residue is kept.
pub fn get_atom_sasa(pdb: &PDB, probe_radius: f32, n_points: usize) -> Vec<AtomSasa> {
    let mut pdb = pdb.clone();
    strip_hydrogens(&mut pdb);
    let Some(model_num) = first_model_serial(&pdb) else {
        return vec![];
    };

    let (atoms, annotations): (Vec<SASAAtom>, Vec<(ResidueKey, String, usize)>) = pdb
        .atoms_with_hierarchy()
        .filter(|x| {
            x.model().serial_number() == model_num
                && in_first_alternative(x.residue(), x.conformer())
        })
        .map(|x| {
            let pos = x.atom().pos();
            let sasa_atom = SASAAtom {
                position: nalgebra::Point3::new(pos.0 as f32, pos.1 as f32, pos.2 as f32),
                radius: x
                    .atom()
                    .element()
                    .and_then(|e| e.atomic_radius().van_der_waals)
                    .unwrap_or(DEFAULT_RADIUS) as f32,
                id: x.atom().serial_number(),
                parent_id: None,
            };
            let annotation = (
                ResidueKey::from_hier(&x),
                x.atom().name().to_string(),
                x.atom().serial_number(),
            );
            (sasa_atom, annotation)
        })
        .unzip();

    if atoms.is_empty() {
        return vec![];
    }
    let atom_sasa = calculate_sasa_internal(&atoms, Some(probe_radius), Some(n_points));

    annotations
        .into_iter()
        .zip(atom_sasa)
        .map(|((residue, atomn, atomi), sasa)| AtomSasa {
            residue,
            atomn,
            atomi,
            sasa,
        })
        .collect()
}

/// Calculate the SASA of each residue as the sum of its atoms.
pub fn get_residue_sasa(
    pdb: &PDB,
    probe_radius: f32,
    n_points: usize,
) -> HashMap<ResidueKey, f32> {
    let mut residue_sasa: HashMap<ResidueKey, f32> = HashMap::new();
    for atom in get_atom_sasa(pdb, probe_radius, n_points) {
        *residue_sasa.entry(atom.residue).or_insert(0.0) += atom.sasa;
    }
    residue_sasa
}

/// Total SASA of all atoms in `pdb`.
pub fn total_sasa(pdb: &PDB, probe_radius: f32, n_points: usize) -> f32 {
    get_atom_sasa(pdb, probe_radius, n_points)
        .iter()
        .map(|a| a.sasa)
        .sum()
}

/// Buried surface area between two groups of chains.
#[derive(Debug, Clone, PartialEq)]
pub struct BuriedArea {
    /// Sorted chains of the first group
    pub first_chains: Vec<String>,
    /// Sorted chains of the second group
    pub second_chains: Vec<String>,
    /// SASA of the first group alone (Ų)
    pub first_sasa: f32,
    /// SASA of the second group alone (Ų)
    pub second_sasa: f32,
    /// SASA of both groups together (Ų)
    pub complex_sasa: f32,
    /// `first_sasa + second_sasa - complex_sasa` (Ų)
    pub dsasa: f32,
}

impl fmt::Display for BuriedArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Buried surface area (dSASA) at the interface between chains [{}] and [{}]: {:.2} Ų",
            self.first_chains.join(", "),
            self.second_chains.join(", "),
            self.dsasa
        )
    }
}

fn sorted_chains(chains: &HashSet<String>) -> Vec<String> {
    let mut v: Vec<String> = chains.iter().cloned().collect();
    v.sort();
    v
}

/// Calculate the buried surface area (dSASA) of the interface between two chain groups.
///
/// # Example
///
/// ```no_run
/// use footprint::{load_model, get_buried_area, InterfaceSettings};
///
/// let (pdb, _) = load_model("6m0j.cif").unwrap();
/// let buried = get_buried_area(&pdb, "E/A", InterfaceSettings::default()).unwrap();
/// println!("{buried}");
/// ```
pub fn get_buried_area(pdb: &PDB, groups: &str, settings: InterfaceSettings) -> Result<BuriedArea> {
    let (first_chains, second_chains) = split_groups(pdb, groups)?;

    let combined: HashSet<String> = first_chains.union(&second_chains).cloned().collect();
    let complex_sasa = total_sasa(
        &select_chains(pdb, &combined),
        settings.probe_radius,
        settings.n_points,
    );
    let first_sasa = total_sasa(
        &select_chains(pdb, &first_chains),
        settings.probe_radius,
        settings.n_points,
    );
    let second_sasa = total_sasa(
        &select_chains(pdb, &second_chains),
        settings.probe_radius,
        settings.n_points,
    );

    debug!("SASA of group 1 ({first_chains:?}): {first_sasa:.2} Ų");
    debug!("SASA of group 2 ({second_chains:?}): {second_sasa:.2} Ų");
    debug!("SASA of combined complex: {complex_sasa:.2} Ų");

    Ok(BuriedArea {
        first_chains: sorted_chains(&first_chains),
        second_chains: sorted_chains(&second_chains),
        first_sasa,
        second_sasa,
        complex_sasa,
        dsasa: first_sasa + second_sasa - complex_sasa,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FootprintError;
    use crate::utils::load_model;
    use crate::utils::tests::test_file;

    #[test]
    fn isolated_atom_is_fully_exposed() {
        let (mut pdb, _) = load_model(test_file("antibody_complex.pdb")).unwrap();
        pdb.remove_atoms_by(|atom| atom.serial_number() != 2);

        let atoms = get_atom_sasa(&pdb, 1.4, 100);
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].atomn, "CA");
        assert_eq!(atoms[0].residue.label(), "A/ALA501");

        let radius = Element::C.atomic_radius().van_der_waals.unwrap() as f32 + 1.4;
        let expected = 4.0 * std::f32::consts::PI * radius * radius;
        assert!(
            (atoms[0].sasa - expected).abs() < 0.5,
            "Expected SASA around {expected}, got {}",
            atoms[0].sasa
        );
    }

    #[test]
    fn residue_sasa_sums_atoms() {
        let (pdb, _) = load_model(test_file("antibody_complex.pdb")).unwrap();
        let residues = get_residue_sasa(&pdb, 1.4, 100);
        assert_eq!(residues.len(), 8);

        let summed: f32 = residues.values().sum();
        let total = total_sasa(&pdb, 1.4, 100);
        assert!((summed - total).abs() < 0.1);
    }

    #[test]
    fn buried_area_of_interface() {
        let (pdb, _) = load_model(test_file("antibody_complex.pdb")).unwrap();
        let buried = get_buried_area(&pdb, "A/H", InterfaceSettings::default()).unwrap();

        assert_eq!(buried.first_chains, vec!["A"]);
        assert_eq!(buried.second_chains, vec!["H"]);
        assert!(buried.dsasa > 0.0, "Expected positive dSASA, got {}", buried.dsasa);
        assert!(buried.complex_sasa < buried.first_sasa + buried.second_sasa);
    }

    #[test]
    fn buried_area_with_unknown_chain() {
        let (pdb, _) = load_model(test_file("antibody_complex.pdb")).unwrap();
        assert!(get_buried_area(&pdb, "A/Z", InterfaceSettings::default()).is_err());
    }

    #[test]
    fn buried_area_rejects_overlapping_groups() {
        let (pdb, _) = load_model(test_file("antibody_complex.pdb")).unwrap();
        for groups in ["A,H/H", "/"] {
            assert!(
                matches!(
                    get_buried_area(&pdb, groups, InterfaceSettings::default()),
                    Err(FootprintError::InvalidGroups(_))
                ),
                "groups '{groups}' should be rejected"
            );
        }
    }

    #[test]
    fn alternate_locations_without_a() {
        let (pdb, _) = load_model(test_file("antibody_altloc.pdb")).unwrap();
        let atoms = get_atom_sasa(&pdb, 1.4, 100);

        let partner: Vec<&AtomSasa> = atoms.iter().filter(|a| a.residue.chain == "H").collect();
        assert_eq!(partner.len(), 10);
        assert!(partner.iter().all(|a| a.sasa > 0.0));

        let (reference, _) = load_model(test_file("antibody_complex.pdb")).unwrap();
        let expected = total_sasa(&reference, 1.4, 100);
        assert!((total_sasa(&pdb, 1.4, 100) - expected).abs() < 1e-3);
    }

    #[test]
    fn hydrogens_are_ignored() {
        let (with_h, _) = load_model(test_file("antibody_hydrogens.pdb")).unwrap();
        let (without_h, _) = load_model(test_file("antibody_complex.pdb")).unwrap();
        assert_eq!(with_h.atom_count(), without_h.atom_count() + 5);

        let atoms = get_atom_sasa(&with_h, 1.4, 100);
        assert_eq!(atoms.len(), without_h.atom_count());
        assert!(atoms.iter().all(|a| !a.atomn.starts_with('H')));

        let difference = total_sasa(&with_h, 1.4, 100) - total_sasa(&without_h, 1.4, 100);
        assert!(difference.abs() < 1e-3, "Hydrogens changed SASA by {difference}");
    }

    #[test]
    fn only_first_model_is_measured() {
        let (pdb, _) = load_model(test_file("antibody_models.pdb")).unwrap();
        assert_eq!(pdb.model_count(), 2);

        let atoms = get_atom_sasa(&pdb, 1.4, 100);
        assert_eq!(atoms.len(), pdb.model(0).unwrap().atom_count());
    }
}
