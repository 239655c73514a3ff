//! Tunable parameters of the analysis steps.

const PROBE_RADIUS: f32 = 1.4;
const N_POINTS: usize = 100;
const DSASA_CUTOFF: f32 = 1.0;
const ALIGN_CYCLES: usize = 5;
const ALIGN_CUTOFF: f64 = 2.0;
const HOTSPOT_CUTOFF: f32 = 20.0;
const SEARCH_RADIUS: f64 = 8.0;

/// Surface area settings used to find interface residues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceSettings {
    /// Probe radius for SASA calculation (Å)
    pub probe_radius: f32,
    /// Number of points on the sphere for sampling
    pub n_points: usize,
    /// Minimum buried area for a residue to count as interface residue (Ų)
    pub dsasa_cutoff: f32,
}

impl Default for InterfaceSettings {
    fn default() -> Self {
        Self {
            probe_radius: PROBE_RADIUS,
            n_points: N_POINTS,
            dsasa_cutoff: DSASA_CUTOFF,
        }
    }
}

/// Iterative superposition settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignSettings {
    /// Maximum number of outlier rejection cycles
    pub cycles: usize,
    /// Outlier rejection cutoff in multiples of the current RMSD
    pub cutoff: f64,
}

impl Default for AlignSettings {
    fn default() -> Self {
        Self {
            cycles: ALIGN_CYCLES,
            cutoff: ALIGN_CUTOFF,
        }
    }
}

/// Settings for comparing two interface footprints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintSettings {
    /// Buried area above which a residue is flagged as hotspot (Ų)
    pub hotspot_cutoff: f32,
    /// Radius for the closest partner atom search (Å)
    pub search_radius: f64,
}

impl Default for FootprintSettings {
    fn default() -> Self {
        Self {
            hotspot_cutoff: HOTSPOT_CUTOFF,
            search_radius: SEARCH_RADIUS,
        }
    }
}

/// All settings of a complex comparison.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompareSettings {
    /// Interface residue detection
    pub interface: InterfaceSettings,
    /// Superposition of the shared component
    pub align: AlignSettings,
    /// Footprint diff and contact search
    pub footprint: FootprintSettings,
}
