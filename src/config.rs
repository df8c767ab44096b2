use serde::{ Serialize, Deserialize };

use crate::consts::{ DEFAULT_EPSILON, DEFAULT_MAX_DEPTH };

/// Tunable rendering parameters, threaded by reference through the whole
/// shading call chain.
///
/// `epsilon` is the surface offset used for shadow/reflection/refraction
/// "acne" avoidance and for the near-parallel tests in the shape solvers.
/// `max_depth` is the recursion budget shared by reflection and refraction;
/// both contributions drop to black when the budget reaches zero.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_epsilon() -> f64 { DEFAULT_EPSILON }
fn default_max_depth() -> usize { DEFAULT_MAX_DEPTH }

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            epsilon: DEFAULT_EPSILON,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[test]
fn config_defaults() {
    let cfg: RenderConfig = Default::default();

    assert_eq!(cfg.epsilon, 0.0001);
    assert_eq!(cfg.max_depth, 5);
}

#[test]
fn config_from_partial_json() {
    let cfg: RenderConfig = serde_json::from_str(r#"{ "max_depth": 8 }"#)
        .unwrap();

    assert_eq!(cfg.epsilon, 0.0001);
    assert_eq!(cfg.max_depth, 8);
}
