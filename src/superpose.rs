//! Superposition of one structure onto another using the CA atoms of a shared chain.
//!
//! Residues are paired by number and insertion code, fitted with the Kabsch
//! algorithm, and then refined by repeatedly rejecting pairs that deviate by
//! more than `cutoff` times the current RMSD.

use crate::chains::ChainExt;
use crate::error::{FootprintError, Result};
use crate::settings::AlignSettings;
use nalgebra as na;
use pdbtbx::*;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

const MIN_PAIRS: usize = 3;
const RMSD_EPS: f64 = 1e-8;

/// Rigid body transformation that maps the mobile structure onto the target.
#[derive(Debug, Clone)]
pub struct Superposition {
    /// Rotation applied to mobile coordinates
    pub rotation: na::Matrix3<f64>,
    /// Translation applied after the rotation
    pub translation: na::Vector3<f64>,
    /// RMSD over all paired atoms before outlier rejection (Å)
    pub rmsd_initial: f64,
    /// RMSD over the atoms kept after outlier rejection (Å)
    pub rmsd: f64,
    /// Number of CA pairs found by residue numbering
    pub n_paired: usize,
    /// Number of CA pairs used in the final fit
    pub n_aligned: usize,
    /// Number of rejection cycles that were run
    pub cycles: usize,
}

impl Superposition {
    /// Transform a single coordinate from the mobile frame into the target frame.
    pub fn transform_point(&self, point: (f64, f64, f64)) -> (f64, f64, f64) {
        let p = self.rotation * na::Vector3::new(point.0, point.1, point.2) + self.translation;
        (p.x, p.y, p.z)
    }

    /// The transformation in the form used by [`pdbtbx`].
    pub fn to_transformation(&self) -> TransformationMatrix {
        let r = &self.rotation;
        let t = &self.translation;
        TransformationMatrix::from_matrix([
            [r[(0, 0)], r[(0, 1)], r[(0, 2)], t.x],
            [r[(1, 0)], r[(1, 1)], r[(1, 2)], t.y],
            [r[(2, 0)], r[(2, 1)], r[(2, 2)], t.z],
        ])
    }

    /// Move every atom of `pdb` into the target frame.
    pub fn apply(&self, pdb: &mut PDB) {
        pdb.apply_transformation(&self.to_transformation());
    }
}

impl fmt::Display for Superposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RMSD = {:.3} Å over {} / {} CA atoms ({} cycles, {:.3} Å before refinement)",
            self.rmsd, self.n_aligned, self.n_paired, self.cycles, self.rmsd_initial
        )
    }
}

/// Superpose chain `mobile_chain` of `mobile` onto chain `target_chain` of `target`.
///
/// The structures are not modified; use [`Superposition::apply`] to move the mobile one.
///
/// # Example
///
/// ```no_run
/// use footprint::{load_model, superpose, AlignSettings};
///
/// let (target, _) = load_model("7bz5.cif").unwrap();
/// let (mut mobile, _) = load_model("6m0j.cif").unwrap();
/// let sup = superpose(&target, "A", &mobile, "E", AlignSettings::default()).unwrap();
/// sup.apply(&mut mobile);
/// println!("{sup}");
/// ```
pub fn superpose(
    target: &PDB,
    target_chain: &str,
    mobile: &PDB,
    mobile_chain: &str,
    settings: AlignSettings,
) -> Result<Superposition> {
    let target_ca = find_chain(target, target_chain)?.ca_atoms();
    let mobile_ca: HashMap<(isize, String), (f64, f64, f64)> = find_chain(mobile, mobile_chain)?
        .ca_atoms()
        .into_iter()
        .map(|(key, pos)| (key.position(), pos))
        .collect();

    let (target_pos, mobile_pos): (Vec<_>, Vec<_>) = target_ca
        .iter()
        .filter_map(|(key, pos)| mobile_ca.get(&key.position()).map(|m| (*pos, *m)))
        .unzip();
    debug!(
        "Paired {} CA atoms between chain {target_chain} ({} residues) and chain {mobile_chain} ({} residues)",
        target_pos.len(),
        target_ca.len(),
        mobile_ca.len()
    );

    fit_pairs(&target_pos, &mobile_pos, settings)
}

fn find_chain<'a>(pdb: &'a PDB, chain_id: &str) -> Result<&'a Chain> {
    pdb.chains()
        .find(|c| c.id() == chain_id)
        .ok_or_else(|| FootprintError::MissingChain(chain_id.to_string()))
}

/// Fit paired coordinates with iterative outlier rejection.
pub(crate) fn fit_pairs(
    target: &[(f64, f64, f64)],
    mobile: &[(f64, f64, f64)],
    settings: AlignSettings,
) -> Result<Superposition> {
    if target.len() != mobile.len() {
        return Err(FootprintError::Alignment(format!(
            "{} target atoms but {} mobile atoms",
            target.len(),
            mobile.len()
        )));
    }
    if target.len() < MIN_PAIRS {
        return Err(FootprintError::Alignment(format!(
            "only {} residue pairs in common, at least {MIN_PAIRS} are needed",
            target.len()
        )));
    }

    let mut kept: Vec<usize> = (0..target.len()).collect();
    let (mut rotation, mut translation) = kabsch(target, mobile, &kept)?;
    let mut deviations = pair_deviations(target, mobile, &kept, &rotation, &translation);
    let rmsd_initial = rmsd(&deviations);
    let mut current_rmsd = rmsd_initial;

    let mut cycles = 0;
    while cycles < settings.cycles && current_rmsd > RMSD_EPS {
        let threshold = settings.cutoff * current_rmsd;
        let survivors: Vec<usize> = kept
            .iter()
            .zip(deviations.iter())
            .filter(|(_, d)| **d <= threshold)
            .map(|(i, _)| *i)
            .collect();
        if survivors.len() == kept.len() || survivors.len() < MIN_PAIRS {
            break;
        }
        cycles += 1;
        trace!(
            "Cycle {cycles}: rejected {} pairs above {threshold:.3} Å",
            kept.len() - survivors.len()
        );

        kept = survivors;
        (rotation, translation) = kabsch(target, mobile, &kept)?;
        deviations = pair_deviations(target, mobile, &kept, &rotation, &translation);
        current_rmsd = rmsd(&deviations);
    }

    Ok(Superposition {
        rotation,
        translation,
        rmsd_initial,
        rmsd: current_rmsd,
        n_paired: target.len(),
        n_aligned: kept.len(),
        cycles,
    })
}

fn to_matrix(coords: &[(f64, f64, f64)], idx: &[usize]) -> na::Matrix3xX<f64> {
    na::Matrix3xX::<f64>::from_iterator(
        idx.len(),
        idx.iter().flat_map(|&i| {
            let c = coords[i];
            [c.0, c.1, c.2].into_iter()
        }),
    )
}

/// Least squares rotation and translation that maps `mobile` onto `target`.
fn kabsch(
    target: &[(f64, f64, f64)],
    mobile: &[(f64, f64, f64)],
    idx: &[usize],
) -> Result<(na::Matrix3<f64>, na::Vector3<f64>)> {
    let mut q = to_matrix(target, idx);
    let mut p = to_matrix(mobile, idx);
    let q_center = q.column_mean();
    let p_center = p.column_mean();

    for i in 0..q.ncols() {
        q.set_column(i, &(q.column(i) - q_center));
        p.set_column(i, &(p.column(i) - p_center));
    }

    // Ref: https://en.wikipedia.org/wiki/Kabsch_algorithm
    let covariance: na::Matrix3<f64> = &p * q.transpose();
    let svd = covariance.svd(true, true);
    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => {
            return Err(FootprintError::Alignment(
                "singular value decomposition did not converge".to_string(),
            ))
        }
    };
    let v = v_t.transpose();

    // Correct for a reflection so that the result is a proper rotation
    let d = (v * u.transpose()).determinant();
    let mut correction = na::Matrix3::<f64>::identity();
    if d < 0.0 {
        correction[(2, 2)] = -1.0;
    }

    let rotation = v * correction * u.transpose();
    let translation = q_center - rotation * p_center;
    Ok((rotation, translation))
}

fn pair_deviations(
    target: &[(f64, f64, f64)],
    mobile: &[(f64, f64, f64)],
    idx: &[usize],
    rotation: &na::Matrix3<f64>,
    translation: &na::Vector3<f64>,
) -> Vec<f64> {
    idx.iter()
        .map(|&i| {
            let t = na::Vector3::new(target[i].0, target[i].1, target[i].2);
            let m = na::Vector3::new(mobile[i].0, mobile[i].1, mobile[i].2);
            (rotation * m + translation - t).norm()
        })
        .collect()
}

fn rmsd(deviations: &[f64]) -> f64 {
    if deviations.is_empty() {
        return 0.0;
    }
    (deviations.iter().map(|d| d * d).sum::<f64>() / deviations.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::load_model;
    use crate::utils::tests::test_file;

    fn helix(n: usize) -> Vec<(f64, f64, f64)> {
        (0..n)
            .map(|i| {
                let t = i as f64 * 100f64.to_radians();
                (2.3 * t.cos(), 2.3 * t.sin(), 1.5 * i as f64)
            })
            .collect()
    }

    fn move_points(points: &[(f64, f64, f64)]) -> Vec<(f64, f64, f64)> {
        let rot = na::Rotation3::from_euler_angles(0.3, -1.1, 2.0);
        points
            .iter()
            .map(|p| {
                let v = rot * na::Vector3::new(p.0, p.1, p.2) + na::Vector3::new(4.0, -7.5, 1.0);
                (v.x, v.y, v.z)
            })
            .collect()
    }

    #[test]
    fn exact_fit_recovers_transformation() {
        let target = helix(12);
        let mobile = move_points(&target);
        let sup = fit_pairs(&target, &mobile, AlignSettings::default()).unwrap();

        assert!(sup.rmsd < 1e-6, "Expected RMSD close to 0, got {}", sup.rmsd);
        assert_eq!(sup.n_aligned, 12);
        assert_eq!(sup.cycles, 0);
        assert!((sup.rotation.determinant() - 1.0).abs() < 1e-9);

        let moved = sup.transform_point(mobile[5]);
        assert!((moved.0 - target[5].0).abs() < 1e-6);
        assert!((moved.1 - target[5].1).abs() < 1e-6);
        assert!((moved.2 - target[5].2).abs() < 1e-6);
    }

    #[test]
    fn outliers_are_rejected() {
        let target = helix(12);
        let mut mobile = move_points(&target);
        mobile[4].0 += 10.0;

        let sup = fit_pairs(&target, &mobile, AlignSettings::default()).unwrap();
        assert_eq!(sup.n_paired, 12);
        assert_eq!(sup.n_aligned, 11);
        assert!(sup.cycles >= 1);
        assert!(sup.rmsd_initial > 1.0);
        assert!(sup.rmsd < 1e-6, "Expected RMSD close to 0, got {}", sup.rmsd);

        // Without refinement cycles the outlier stays in the fit
        let no_cycles = AlignSettings {
            cycles: 0,
            ..Default::default()
        };
        let sup = fit_pairs(&target, &mobile, no_cycles).unwrap();
        assert_eq!(sup.n_aligned, 12);
        assert!(sup.rmsd > 1.0);
    }

    #[test]
    fn too_few_pairs() {
        let target = helix(2);
        let mobile = move_points(&target);
        assert!(matches!(
            fit_pairs(&target, &mobile, AlignSettings::default()),
            Err(FootprintError::Alignment(_))
        ));
    }

    #[test]
    fn superpose_complexes_on_shared_chain() {
        let (target, _) = load_model(test_file("antibody_complex.pdb")).unwrap();
        let (mut mobile, _) = load_model(test_file("receptor_complex.pdb")).unwrap();

        let sup = superpose(&target, "A", &mobile, "E", AlignSettings::default()).unwrap();
        assert_eq!(sup.n_paired, 6);
        assert!(sup.rmsd < 1e-3, "Expected RMSD close to 0, got {}", sup.rmsd);

        sup.apply(&mut mobile);
        let ca = mobile
            .chains()
            .find(|c| c.id() == "E")
            .unwrap()
            .ca_atoms();
        let first = ca[0].1;
        assert!(first.0.abs() < 1e-3 && first.1.abs() < 1e-3 && first.2.abs() < 1e-3);
    }

    #[test]
    fn superpose_missing_chain() {
        let (target, _) = load_model(test_file("antibody_complex.pdb")).unwrap();
        assert!(matches!(
            superpose(&target, "A", &target, "Q", AlignSettings::default()),
            Err(FootprintError::MissingChain(c)) if c == "Q"
        ));
    }
}
