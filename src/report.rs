//! Tables and printable summaries of the analysis results.

use crate::distances::Contact;
use crate::footprint::FootprintDiff;
use crate::interface::Interface;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Convert interface residues into a Polars DataFrame.
///
/// Columns: side, chain, resn, resi, insertion, sasa_unbound, sasa_complex, dsasa
pub fn interface_to_df(interface: &Interface) -> PolarsResult<DataFrame> {
    let res = &interface.residues;
    df!(
        "side" => res.iter().map(|x| x.side.to_string()).collect::<Vec<String>>(),
        "chain" => res.iter().map(|x| x.residue.chain.to_owned()).collect::<Vec<String>>(),
        "resn" => res.iter().map(|x| x.residue.resn.to_owned()).collect::<Vec<String>>(),
        "resi" => res.iter().map(|x| x.residue.resi as i32).collect::<Vec<i32>>(),
        "insertion" => res.iter().map(|x| x.residue.insertion.to_owned()).collect::<Vec<String>>(),
        "sasa_unbound" => res.iter().map(|x| x.sasa_unbound).collect::<Vec<f32>>(),
        "sasa_complex" => res.iter().map(|x| x.sasa_complex).collect::<Vec<f32>>(),
        "dsasa" => res.iter().map(|x| x.dsasa).collect::<Vec<f32>>(),
    )
}

/// Convert a footprint diff into a Polars DataFrame.
///
/// Columns: resn, resi, insertion, first_dsasa, second_dsasa, membership, hotspot
pub fn footprint_to_df(diff: &FootprintDiff) -> PolarsResult<DataFrame> {
    let res = &diff.entries;
    df!(
        "resn" => res.iter().map(|x| x.resn.to_owned()).collect::<Vec<String>>(),
        "resi" => res.iter().map(|x| x.resi as i32).collect::<Vec<i32>>(),
        "insertion" => res.iter().map(|x| x.insertion.to_owned()).collect::<Vec<String>>(),
        "first_dsasa" => res.iter().map(|x| x.first_dsasa).collect::<Vec<Option<f32>>>(),
        "second_dsasa" => res.iter().map(|x| x.second_dsasa).collect::<Vec<Option<f32>>>(),
        "membership" => res.iter().map(|x| x.membership.to_string()).collect::<Vec<String>>(),
        "hotspot" => res.iter().map(|x| x.hotspot).collect::<Vec<bool>>(),
    )
}

/// Convert closest partner contacts into a Polars DataFrame.
///
/// Columns: residue, atom, partner, partner_atom, distance
pub fn distances_to_df(contacts: &BTreeMap<String, Contact>) -> PolarsResult<DataFrame> {
    df!(
        "residue" => contacts.keys().cloned().collect::<Vec<String>>(),
        "atom" => contacts.values().map(|x| x.atom.to_owned()).collect::<Vec<String>>(),
        "partner" => contacts.values().map(|x| x.partner.to_owned()).collect::<Vec<String>>(),
        "partner_atom" => contacts.values().map(|x| x.partner_atom.to_owned()).collect::<Vec<String>>(),
        "distance" => contacts.values().map(|x| x.distance as f32).collect::<Vec<f32>>(),
    )
}

/// Render a label dictionary as one `label: value` line per entry under a title.
pub fn format_map<V: std::fmt::Display>(title: &str, map: &BTreeMap<String, V>) -> String {
    let width = map.keys().map(|k| k.len()).max().unwrap_or(0);
    let mut out = format!("{title} ({} entries)\n", map.len());
    for (label, value) in map {
        let _ = writeln!(out, "  {label:<width$}  {value}");
    }
    out
}

/// Render a footprint diff with a header row and a hotspot summary.
pub fn format_footprint(diff: &FootprintDiff, first_name: &str, second_name: &str) -> String {
    let mut out = format!(
        "{:<9} {:>7} {:>7} {}\n",
        "residue",
        truncate(first_name, 7),
        truncate(second_name, 7),
        "membership"
    );
    for entry in &diff.entries {
        let _ = writeln!(out, "{entry}");
    }
    let _ = writeln!(
        out,
        "{} shared, {} only in {first_name}, {} only in {second_name} (overlap {:.2})",
        diff.shared().len(),
        diff.first_only().len(),
        diff.second_only().len(),
        diff.overlap()
    );
    let hotspots: Vec<String> = diff.hotspots().iter().map(|e| e.label()).collect();
    let hotspots = match hotspots.is_empty() {
        true => "none".to_string(),
        false => hotspots.join(", "),
    };
    let _ = write!(out, "Hotspot candidates: {hotspots}");
    out
}

fn truncate(name: &str, len: usize) -> &str {
    match name.char_indices().nth(len) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::{FootprintEntry, Membership};
    use crate::interface::{InterfaceResidue, Side};
    use crate::residues::ResidueKey;
    use std::collections::HashSet;

    fn diff() -> FootprintDiff {
        FootprintDiff {
            entries: vec![
                FootprintEntry {
                    resi: 455,
                    insertion: String::new(),
                    resn: "LEU".to_string(),
                    first_dsasa: Some(30.0),
                    second_dsasa: None,
                    membership: Membership::FirstOnly,
                    hotspot: true,
                },
                FootprintEntry {
                    resi: 486,
                    insertion: String::new(),
                    resn: "PHE".to_string(),
                    first_dsasa: Some(5.0),
                    second_dsasa: Some(60.0),
                    membership: Membership::Shared,
                    hotspot: true,
                },
            ],
        }
    }

    #[test]
    fn interface_table() {
        let interface = Interface {
            first_chains: HashSet::from(["E".to_string()]),
            second_chains: HashSet::from(["A".to_string()]),
            residues: vec![InterfaceResidue {
                residue: ResidueKey::new("E", 505, "", "TYR"),
                side: Side::First,
                sasa_complex: 20.0,
                sasa_unbound: 65.5,
                dsasa: 45.5,
            }],
        };
        let df = interface_to_df(&interface).unwrap();
        assert_eq!(df.shape(), (1, 8));
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>(),
            vec![
                "side",
                "chain",
                "resn",
                "resi",
                "insertion",
                "sasa_unbound",
                "sasa_complex",
                "dsasa"
            ]
        );
    }

    #[test]
    fn footprint_table_keeps_missing_values() {
        let df = footprint_to_df(&diff()).unwrap();
        assert_eq!(df.shape(), (2, 7));
        assert_eq!(df.column("second_dsasa").unwrap().null_count(), 1);
    }

    #[test]
    fn distance_table() {
        let contacts = BTreeMap::from([(
            "E/TYR505".to_string(),
            Contact {
                atom: "OH".to_string(),
                partner: "A/LYS353".to_string(),
                partner_atom: "NZ".to_string(),
                distance: 3.2,
            },
        )]);
        let df = distances_to_df(&contacts).unwrap();
        assert_eq!(df.shape(), (1, 5));
    }

    #[test]
    fn formatted_map() {
        let map = BTreeMap::from([
            ("E/TYR505".to_string(), 45.5f32),
            ("E/GLY502".to_string(), 3.25f32),
        ]);
        let text = format_map("Interface", &map);
        assert_eq!(
            text,
            "Interface (2 entries)\n  E/GLY502  3.25\n  E/TYR505  45.5\n"
        );
    }

    #[test]
    fn formatted_footprint() {
        let text = format_footprint(&diff(), "antibody", "receptor");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("residue"));
        assert!(lines[0].contains("antibod"));
        assert_eq!(
            lines[3],
            "1 shared, 1 only in antibody, 0 only in receptor (overlap 0.50)"
        );
        assert_eq!(lines[4], "Hotspot candidates: PHE486, LEU455");
    }
}
