//! Comparison of the footprints two binding partners leave on a shared protein.
//!
//! The shared protein is the first chain group of both interfaces. Its
//! interface residues are paired by residue number and insertion code, so the
//! chain identifiers may differ between the two structures.

use crate::interface::{Interface, Side};
use crate::settings::FootprintSettings;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// In which of the two footprints a residue appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Membership {
    /// Buried by both partners
    Shared,
    /// Only buried by the partner of the first complex
    FirstOnly,
    /// Only buried by the partner of the second complex
    SecondOnly,
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Membership::Shared => write!(f, "shared"),
            Membership::FirstOnly => write!(f, "first_only"),
            Membership::SecondOnly => write!(f, "second_only"),
        }
    }
}

/// One residue of the shared protein that is part of at least one footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintEntry {
    /// Residue index
    pub resi: isize,
    /// Residue insertion code
    pub insertion: String,
    /// Three-letter residue name
    pub resn: String,
    /// dSASA in the first complex, if the residue is in its interface (Ų)
    pub first_dsasa: Option<f32>,
    /// dSASA in the second complex, if the residue is in its interface (Ų)
    pub second_dsasa: Option<f32>,
    /// Which footprints contain the residue
    pub membership: Membership,
    /// Buried area reaches the hotspot cutoff in at least one complex
    pub hotspot: bool,
}

impl FootprintEntry {
    /// Residue label without chain, e.g. `TYR505`.
    pub fn label(&self) -> String {
        format!("{}{}{}", self.resn, self.resi, self.insertion)
    }

    /// Largest buried area over both complexes (Ų).
    pub fn max_dsasa(&self) -> f32 {
        self.first_dsasa
            .unwrap_or(0.0)
            .max(self.second_dsasa.unwrap_or(0.0))
    }
}

impl fmt::Display for FootprintEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_dsasa = |v: Option<f32>| match v {
            Some(v) => format!("{v:>7.2}"),
            None => format!("{:>7}", "-"),
        };
        let (label, first, second) = (
            self.label(),
            fmt_dsasa(self.first_dsasa),
            fmt_dsasa(self.second_dsasa),
        );
        let membership = self.membership.to_string();
        match self.hotspot {
            true => write!(f, "{label:<9} {first} {second} {membership:<11} hotspot"),
            false => write!(f, "{label:<9} {first} {second} {membership}"),
        }
    }
}

/// Residue-level diff of two interface footprints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FootprintDiff {
    /// Entries sorted by residue number and insertion code
    pub entries: Vec<FootprintEntry>,
}

impl FootprintDiff {
    fn with_membership(&self, membership: Membership) -> Vec<&FootprintEntry> {
        self.entries
            .iter()
            .filter(|e| e.membership == membership)
            .collect()
    }

    /// Residues buried by both partners.
    pub fn shared(&self) -> Vec<&FootprintEntry> {
        self.with_membership(Membership::Shared)
    }

    /// Residues only buried by the first partner.
    pub fn first_only(&self) -> Vec<&FootprintEntry> {
        self.with_membership(Membership::FirstOnly)
    }

    /// Residues only buried by the second partner.
    pub fn second_only(&self) -> Vec<&FootprintEntry> {
        self.with_membership(Membership::SecondOnly)
    }

    /// Candidate residues for mutagenesis, largest buried area first.
    pub fn hotspots(&self) -> Vec<&FootprintEntry> {
        let mut hotspots: Vec<&FootprintEntry> =
            self.entries.iter().filter(|e| e.hotspot).collect();
        hotspots.sort_by(|a, b| b.max_dsasa().total_cmp(&a.max_dsasa()));
        hotspots
    }

    /// Jaccard index of the two footprints, 0 if both are empty.
    pub fn overlap(&self) -> f64 {
        match self.entries.len() {
            0 => 0.0,
            n => self.shared().len() as f64 / n as f64,
        }
    }
}

/// Diff the footprints that the second group of each interface leaves on the first group.
///
/// # Example
///
/// ```no_run
/// use footprint::{load_model, get_interface, compare_footprints, FootprintSettings, InterfaceSettings};
///
/// let (antibody, _) = load_model("7bz5.cif").unwrap();
/// let (receptor, _) = load_model("6m0j.cif").unwrap();
/// let first = get_interface(&antibody, "A/H,L", InterfaceSettings::default()).unwrap();
/// let second = get_interface(&receptor, "E/A", InterfaceSettings::default()).unwrap();
/// let diff = compare_footprints(&first, &second, FootprintSettings::default());
/// for entry in diff.hotspots() {
///     println!("{entry}");
/// }
/// ```
pub fn compare_footprints(
    first: &Interface,
    second: &Interface,
    settings: FootprintSettings,
) -> FootprintDiff {
    let mut merged: BTreeMap<(isize, String), FootprintEntry> = BTreeMap::new();

    for residue in first.side(Side::First) {
        let key = residue.residue.position();
        let entry = merged.entry(key).or_insert_with(|| FootprintEntry {
            resi: residue.residue.resi,
            insertion: residue.residue.insertion.clone(),
            resn: residue.residue.resn.clone(),
            first_dsasa: None,
            second_dsasa: None,
            membership: Membership::FirstOnly,
            hotspot: false,
        });
        // Multiple chains of the shared protein may map onto the same position
        entry.first_dsasa = Some(entry.first_dsasa.unwrap_or(0.0).max(residue.dsasa));
    }

    for residue in second.side(Side::First) {
        let key = residue.residue.position();
        let entry = merged.entry(key).or_insert_with(|| FootprintEntry {
            resi: residue.residue.resi,
            insertion: residue.residue.insertion.clone(),
            resn: residue.residue.resn.clone(),
            first_dsasa: None,
            second_dsasa: None,
            membership: Membership::SecondOnly,
            hotspot: false,
        });
        if entry.resn != residue.residue.resn {
            warn!(
                "Residue {}{} is {} in the first complex but {} in the second",
                entry.resi, entry.insertion, entry.resn, residue.residue.resn
            );
        }
        entry.second_dsasa = Some(entry.second_dsasa.unwrap_or(0.0).max(residue.dsasa));
    }

    let entries: Vec<FootprintEntry> = merged
        .into_values()
        .map(|mut entry| {
            entry.membership = match (entry.first_dsasa, entry.second_dsasa) {
                (Some(_), Some(_)) => Membership::Shared,
                (Some(_), None) => Membership::FirstOnly,
                _ => Membership::SecondOnly,
            };
            entry.hotspot = entry.max_dsasa() >= settings.hotspot_cutoff;
            entry
        })
        .collect();

    let diff = FootprintDiff { entries };
    debug!(
        "Footprints: {} shared, {} first only, {} second only, {} hotspots",
        diff.shared().len(),
        diff.first_only().len(),
        diff.second_only().len(),
        diff.hotspots().len()
    );
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::InterfaceResidue;
    use crate::residues::ResidueKey;
    use std::collections::HashSet;

    fn interface(shared_chain: &str, residues: &[(isize, &str, f32)]) -> Interface {
        Interface {
            first_chains: HashSet::from([shared_chain.to_string()]),
            second_chains: HashSet::from(["P".to_string()]),
            residues: residues
                .iter()
                .map(|(resi, resn, dsasa)| InterfaceResidue {
                    residue: ResidueKey::new(shared_chain, *resi, "", resn),
                    side: Side::First,
                    sasa_complex: 100.0 - dsasa,
                    sasa_unbound: 100.0,
                    dsasa: *dsasa,
                })
                .chain(std::iter::once(InterfaceResidue {
                    residue: ResidueKey::new("P", 1, "", "ARG"),
                    side: Side::Second,
                    sasa_complex: 10.0,
                    sasa_unbound: 90.0,
                    dsasa: 80.0,
                }))
                .collect(),
        }
    }

    fn labels(entries: &[&FootprintEntry]) -> Vec<String> {
        entries.iter().map(|e| e.label()).collect()
    }

    #[test]
    fn memberships_across_chain_names() {
        let first = interface("A", &[(455, "LEU", 30.0), (486, "PHE", 5.0), (417, "LYS", 12.0)]);
        let second = interface("E", &[(486, "PHE", 60.0), (505, "TYR", 25.0)]);

        let diff = compare_footprints(&first, &second, FootprintSettings::default());
        assert_eq!(
            labels(&diff.entries.iter().collect::<Vec<_>>()),
            vec!["LYS417", "LEU455", "PHE486", "TYR505"]
        );
        assert_eq!(labels(&diff.shared()), vec!["PHE486"]);
        assert_eq!(labels(&diff.first_only()), vec!["LYS417", "LEU455"]);
        assert_eq!(labels(&diff.second_only()), vec!["TYR505"]);

        // The partner side (chain P) never enters the footprint
        assert!(diff.entries.iter().all(|e| e.resn != "ARG"));

        let phe = diff.shared()[0];
        assert_eq!(phe.first_dsasa, Some(5.0));
        assert_eq!(phe.second_dsasa, Some(60.0));
        assert!((diff.overlap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn hotspots_use_largest_burial() {
        let first = interface("A", &[(455, "LEU", 30.0), (486, "PHE", 5.0), (417, "LYS", 12.0)]);
        let second = interface("E", &[(486, "PHE", 60.0), (505, "TYR", 20.0)]);

        let diff = compare_footprints(&first, &second, FootprintSettings::default());
        // Sorted by buried area, cutoff is inclusive
        assert_eq!(labels(&diff.hotspots()), vec!["PHE486", "LEU455", "TYR505"]);

        let strict = FootprintSettings {
            hotspot_cutoff: 50.0,
            ..Default::default()
        };
        let diff = compare_footprints(&first, &second, strict);
        assert_eq!(labels(&diff.hotspots()), vec!["PHE486"]);
    }

    #[test]
    fn empty_footprints() {
        let first = interface("A", &[]);
        let second = interface("E", &[]);
        let diff = compare_footprints(&first, &second, FootprintSettings::default());
        assert!(diff.entries.is_empty());
        assert_eq!(diff.overlap(), 0.0);
    }

    #[test]
    fn entry_formatting() {
        let first = interface("A", &[(486, "PHE", 5.0)]);
        let second = interface("E", &[]);
        let diff = compare_footprints(&first, &second, FootprintSettings::default());
        assert_eq!(
            diff.entries[0].to_string(),
            "PHE486       5.00       - first_only"
        );

        let second = interface("E", &[(486, "PHE", 60.0)]);
        let diff = compare_footprints(&first, &second, FootprintSettings::default());
        assert_eq!(
            diff.entries[0].to_string(),
            "PHE486       5.00   60.00 shared      hotspot"
        );
        assert!(diff.entries.iter().all(|e| !e.to_string().ends_with(' ')));
    }
}
