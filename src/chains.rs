use crate::residues::{ResidueExt, ResidueKey};
use pdbtbx::*;

/// Extra chain helpers on top of [`pdbtbx::Chain`].
pub trait ChainExt {
    /// One-letter codes of the amino acids in the chain.
    fn pdb_seq(&self) -> Vec<&str>;

    /// Key and coordinates of the CA atom of every residue.
    /// Only the first conformer of each residue is considered.
    fn ca_atoms(&self) -> Vec<(ResidueKey, (f64, f64, f64))>;
}

impl ChainExt for Chain {
    fn pdb_seq(&self) -> Vec<&str> {
        self.residues().filter_map(|res| res.resn()).collect()
    }

    fn ca_atoms(&self) -> Vec<(ResidueKey, (f64, f64, f64))> {
        self.residues()
            .filter_map(|res| {
                let conformer = res.conformers().next()?;
                let ca = conformer.atoms().find(|atom| atom.name() == "CA")?;
                let (resi, insertion) = res.id();
                let key = ResidueKey::new(
                    self.id(),
                    resi,
                    insertion.unwrap_or(""),
                    res.name().unwrap_or(""),
                );
                Some((key, ca.pos()))
            })
            .collect()
    }
}
