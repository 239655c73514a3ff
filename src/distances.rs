use crate::residues::ResidueKey;
use crate::utils::{first_model_serial, in_first_alternative};
use pdbtbx::*;
use rayon::prelude::*;
use rstar::{PointDistance, RTree};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Closest atom pair between a residue and the partner chains.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Atom of the queried residue
    pub atom: String,
    /// Label of the closest partner residue
    pub partner: String,
    /// Atom of the closest partner residue
    pub partner_atom: String,
    /// Distance between the two atoms (Å)
    pub distance: f64,
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} {} ({:.2} Å)",
            self.atom, self.partner, self.partner_atom, self.distance
        )
    }
}

/// For each residue in `residues`, find the closest atom on any of the `partner_chains`.
///
/// Only the first model is searched, with the same alternate locations as the
/// surface calculations. Residues without a partner atom within `search_radius`
/// are left out of the result, which is keyed by residue label.
pub fn nearest_partner_distances(
    pdb: &PDB,
    residues: &[ResidueKey],
    partner_chains: &HashSet<String>,
    search_radius: f64,
) -> BTreeMap<String, Contact> {
    let Some(model_num) = first_model_serial(pdb) else {
        return BTreeMap::new();
    };
    let wanted: HashSet<&ResidueKey> = residues.iter().collect();
    let max_radius_squared = search_radius * search_radius;

    let (partners, others): (Vec<_>, Vec<_>) = pdb
        .atoms_with_hierarchy()
        .filter(|x| {
            x.model().serial_number() == model_num
                && in_first_alternative(x.residue(), x.conformer())
        })
        .partition(|x| partner_chains.contains(x.chain().id()));
    let tree = RTree::bulk_load(partners);

    let query_atoms: Vec<(ResidueKey, String, (f64, f64, f64))> = others
        .into_iter()
        .map(|x| (ResidueKey::from_hier(&x), x))
        .filter(|(key, _)| wanted.contains(key))
        .map(|(key, x)| (key, x.atom().name().to_string(), x.atom().pos()))
        .collect();

    let closest: Vec<(String, Contact)> = query_atoms
        .par_iter()
        .filter_map(|(key, atomn, pos)| {
            tree.locate_within_distance(*pos, max_radius_squared)
                .map(|y| (y.atom().distance_2(pos).sqrt(), y))
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(d, y)| {
                    (
                        key.label(),
                        Contact {
                            atom: atomn.clone(),
                            partner: ResidueKey::from_hier(y).label(),
                            partner_atom: y.atom().name().to_string(),
                            distance: d,
                        },
                    )
                })
        })
        .collect();

    let mut contacts: BTreeMap<String, Contact> = BTreeMap::new();
    for (label, contact) in closest {
        match contacts.get(&label) {
            Some(current) if current.distance <= contact.distance => {}
            _ => {
                contacts.insert(label, contact);
            }
        }
    }
    contacts
}
