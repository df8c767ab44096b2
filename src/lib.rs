pub mod coord;
pub mod matrix;
pub mod ray;
pub mod intersect;
pub mod shape;

pub mod light;
pub mod pattern;
pub mod noise;

pub mod world;
pub mod camera;
pub mod parallel;

pub mod color;
pub mod canvas;
pub mod scene;

pub mod config;
pub mod consts;
pub mod error;

use consts::FEQ_EPSILON;

/// Approximate floating-point equality, used by the `PartialEq` impls on all
/// geometric types.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
