use pdbtbx::*;
use std::fmt;

/// Owned identifier of a residue within a structure.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct ResidueKey {
    /// Chain identifier
    pub chain: String,
    /// Residue index
    pub resi: isize,
    /// Residue insertion code
    pub insertion: String,
    /// Three-letter residue name
    pub resn: String,
}

impl ResidueKey {
    /// Create a key from its parts.
    pub fn new(chain: &str, resi: isize, insertion: &str, resn: &str) -> Self {
        Self {
            chain: chain.to_string(),
            resi,
            insertion: insertion.to_string(),
            resn: resn.to_string(),
        }
    }

    /// Helper function to convert an [`pdbtbx::AtomConformerResidueChainModel`] to a residue key
    pub fn from_hier(hier: &AtomConformerResidueChainModel) -> Self {
        let (resi, insertion) = hier.residue().id();
        Self::new(
            hier.chain().id(),
            resi,
            insertion.unwrap_or(""),
            hier.residue().name().unwrap_or(""),
        )
    }

    /// Position of the residue independent of its chain, used to pair the same
    /// residue across different structures of one protein.
    pub fn position(&self) -> (isize, String) {
        (self.resi, self.insertion.clone())
    }

    /// Human readable label, e.g. `E/TYR505` or `H/GLY100A`.
    pub fn label(&self) -> String {
        format!(
            "{}/{}{}{}",
            self.chain, self.resn, self.resi, self.insertion
        )
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Extra residue helpers on top of [`pdbtbx::Residue`].
pub trait ResidueExt {
    /// The residue one-letter code, or `None` if it's not an amino acid.
    fn resn(&self) -> Option<&str>;
}

impl ResidueExt for Residue {
    fn resn(&self) -> Option<&str> {
        let aa_code = match self.name().unwrap_or("").to_uppercase().as_str() {
            "ALA" => "A",
            "ARG" => "R",
            "ASN" => "N",
            "ASP" => "D",
            "CYS" => "C",
            "GLN" => "Q",
            "GLU" => "E",
            "GLY" => "G",
            "HIS" => "H",
            "ILE" => "I",
            "LEU" => "L",
            "LYS" => "K",
            "MET" => "M",
            "PHE" => "F",
            "PRO" => "P",
            "SER" => "S",
            "THR" => "T",
            "TRP" => "W",
            "TYR" => "Y",
            "VAL" => "V",
            _ => "X",
        };

        match aa_code {
            "X" => None,
            _ => Some(aa_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_include_insertion_codes() {
        let key = ResidueKey::new("H", 100, "A", "GLY");
        assert_eq!(key.label(), "H/GLY100A");
        assert_eq!(key.to_string(), "H/GLY100A");

        let key = ResidueKey::new("E", 505, "", "TYR");
        assert_eq!(key.label(), "E/TYR505");
        assert_eq!(key.position(), (505, String::new()));
    }

    #[test]
    fn keys_order_by_chain_then_number() {
        let mut keys = vec![
            ResidueKey::new("B", 3, "", "ALA"),
            ResidueKey::new("A", 10, "", "ALA"),
            ResidueKey::new("A", 2, "", "GLY"),
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["A/GLY2", "A/ALA10", "B/ALA3"]);
    }
}
