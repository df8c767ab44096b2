// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Defaults for RenderConfig
pub const DEFAULT_EPSILON: f64 = 0.0001;
pub const DEFAULT_MAX_DEPTH: usize = 5;

// Common refraction indices
pub const VACUUM_RI: f64 = 1.0;
pub const AIR_RI: f64 = 1.00029;
pub const WATER_RI: f64 = 1.333;
pub const GLASS_RI: f64 = 1.5;
pub const DIAMOND_RI: f64 = 2.417;
