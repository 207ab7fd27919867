//! Engine-wide defaults.
//! Concentrations are expressed in mg/L unless noted otherwise.

/// WHO drinking-water guideline values used when no threshold table is supplied.
pub const WHO_LIMITS_MG_L: [(&str, f64); 8] = [
    ("Pb", 0.05),
    ("Cd", 0.003),
    ("As", 0.01),
    ("Hg", 0.006),
    ("Cr", 0.05),
    ("Cu", 2.0),
    ("Zn", 3.0),
    ("Ni", 0.02),
];

/// Fraction of the limit above which a reading is reported as elevated.
pub const DEFAULT_ELEVATED_RATIO: f64 = 0.6;

/// Map center (lat, lng) used when no sample carries a usable location.
pub const DEFAULT_MAP_CENTER: (f64, f64) = (20.5937, 78.9629);
/// Zoom level paired with [`DEFAULT_MAP_CENTER`].
pub const DEFAULT_MAP_ZOOM: u8 = 5;

/// Unit label shown next to concentration columns.
pub const CONCENTRATION_UNIT: &str = "mg/L";
