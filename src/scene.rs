use std::convert::TryFrom;

use serde::{ Serialize, Deserialize };

use crate::color::Color;
use crate::coord::Coordinate;
use crate::matrix::Matrix;
use crate::light::{ PointLight, Material };
use crate::pattern::Pattern;
use crate::shape::{ Shape, ShapeArena, ShapeId };
use crate::world::World;
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::error::TraceError;

/// A fully assembled scene: the world to trace, the camera framing it, and
/// the rendering parameters.
#[derive(Debug)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
    pub config: RenderConfig,
}

/// Parses a JSON scene description into a `Scene`.
///
/// Malformed JSON surfaces as `TraceError::Json`; well-formed JSON that names
/// an unrecognized shape, pattern or transform surfaces as the matching
/// `Unknown*` error.
pub fn parse_scene(json: &str) -> Result<Scene, TraceError> {
    let scene_json: SceneJson = serde_json::from_str(json)?;
    Scene::try_from(scene_json)
}

impl TryFrom<SceneJson> for Scene {
    type Error = TraceError;

    fn try_from(scene_json: SceneJson) -> Result<Scene, TraceError> {
        // Create the camera transform from the view parameters.
        let camera_transform = Matrix::view_transform(
            point(&scene_json.camera.from),
            point(&scene_json.camera.to),
            vector(&scene_json.camera.up)
        );

        let camera = Camera::new(
            scene_json.camera.width,
            scene_json.camera.height,
            scene_json.camera.field_of_view,
            camera_transform
        )?;

        let mut world = World::empty();
        world.light = PointLight::new(
            color(&scene_json.light.intensity),
            point(&scene_json.light.position)
        );

        for shape_json in &scene_json.shapes {
            build_shape(&mut world.shapes, shape_json)?;
        }

        Ok(Scene { world, camera, config: scene_json.config })
    }
}

#[derive(Serialize, Deserialize)]
pub struct SceneJson {
    camera: CameraJson,
    light: LightJson,

    #[serde(default)]
    config: RenderConfig,

    #[serde(default)]
    shapes: Vec<ShapeJson>,
}

#[derive(Serialize, Deserialize)]
struct CameraJson {
    width: usize,
    height: usize,
    field_of_view: f64,

    from: [f64; 3],
    to: [f64; 3],
    up: [f64; 3],
}

#[derive(Serialize, Deserialize)]
struct LightJson {
    intensity: [f64; 3],
    position: [f64; 3],
}

#[derive(Clone, Serialize, Deserialize)]
struct ShapeJson {
    kind: String,

    #[serde(default)]
    min: Option<f64>,

    #[serde(default)]
    max: Option<f64>,

    #[serde(default)]
    closed: bool,

    #[serde(default)]
    transform: Vec<TransformJson>,

    #[serde(default)]
    material: Option<MaterialJson>,

    #[serde(default)]
    children: Vec<ShapeJson>,
}

/// A single transform step, e.g. `{ "op": "rotation_y", "args": [1.57] }`.
#[derive(Clone, Serialize, Deserialize)]
struct TransformJson {
    op: String,

    #[serde(default)]
    args: Vec<f64>,
}

/// Material overrides; any field left out keeps its default.
#[derive(Clone, Serialize, Deserialize)]
struct MaterialJson {
    #[serde(default)]
    pattern: Option<PatternJson>,

    #[serde(default)]
    ambient: Option<f64>,

    #[serde(default)]
    diffuse: Option<f64>,

    #[serde(default)]
    specular: Option<f64>,

    #[serde(default)]
    shininess: Option<f64>,

    #[serde(default)]
    reflective: Option<f64>,

    #[serde(default)]
    transparency: Option<f64>,

    #[serde(default)]
    refractive_index: Option<f64>,
}

#[derive(Clone, Serialize, Deserialize)]
struct PatternJson {
    kind: String,

    /// Pattern colors; the first defaults to white, the second to black.
    #[serde(default)]
    colors: Vec<[f64; 3]>,

    #[serde(default)]
    width: Option<usize>,

    #[serde(default)]
    height: Option<usize>,

    #[serde(default)]
    amount: Option<f64>,

    #[serde(default)]
    base: Option<Box<PatternJson>>,

    #[serde(default)]
    transform: Vec<TransformJson>,
}

fn point(v: &[f64; 3]) -> Coordinate {
    Coordinate::point(v[0], v[1], v[2])
}

fn vector(v: &[f64; 3]) -> Coordinate {
    Coordinate::vector(v[0], v[1], v[2])
}

fn color(v: &[f64; 3]) -> Color {
    Color::rgb(v[0], v[1], v[2])
}

/// Builds a shape (and, recursively, its children) into the arena.
fn build_shape(arena: &mut ShapeArena, shape_json: &ShapeJson)
    -> Result<ShapeId, TraceError> {
    let mut shape = match shape_json.kind.as_str() {
        "sphere" => Shape::sphere(),
        "plane" => Shape::plane(),
        "cube" => Shape::cube(),

        "cylinder" => match (shape_json.min, shape_json.max) {
            (Some(lo), Some(hi)) if shape_json.closed =>
                Shape::capped_cylinder(lo, hi),
            (Some(lo), Some(hi)) => Shape::bounded_cylinder(lo, hi),
            _ => Shape::cylinder(),
        },

        "cone" => match (shape_json.min, shape_json.max) {
            (Some(lo), Some(hi)) if shape_json.closed =>
                Shape::capped_cone(lo, hi),
            (Some(lo), Some(hi)) => Shape::bounded_cone(lo, hi),
            _ => Shape::cone(),
        },

        "group" => Shape::group(),

        other => return Err(TraceError::UnknownShapeKind(other.to_string())),
    };

    if !shape_json.transform.is_empty() {
        shape.set_transform(build_transform(&shape_json.transform)?)?;
    }

    if let Some(material_json) = &shape_json.material {
        shape.set_material(build_material(material_json)?);
    }

    let id = arena.add(shape);

    for child_json in &shape_json.children {
        let child = build_shape(arena, child_json)?;
        arena.add_child(id, child)?;
    }

    Ok(id)
}

/// Composes a list of transform steps, outermost first.
fn build_transform(ops: &[TransformJson]) -> Result<Matrix, TraceError> {
    let mut parts = Vec::with_capacity(ops.len());
    for op in ops {
        parts.push(build_transform_op(op)?);
    }

    Matrix::compose(&parts)
}

fn build_transform_op(op: &TransformJson) -> Result<Matrix, TraceError> {
    let arg = |i: usize| op.args.get(i).copied().unwrap_or(0.0);

    match op.op.as_str() {
        "translation" => Ok(Matrix::translation(arg(0), arg(1), arg(2))),
        "scaling" => Ok(Matrix::scaling(arg(0), arg(1), arg(2))),
        "rotation_x" => Ok(Matrix::rotation_x(arg(0))),
        "rotation_y" => Ok(Matrix::rotation_y(arg(0))),
        "rotation_z" => Ok(Matrix::rotation_z(arg(0))),
        "shearing" => Ok(Matrix::shearing(
            arg(0), arg(1), arg(2), arg(3), arg(4), arg(5)
        )),
        other => Err(TraceError::UnknownTransformOp(other.to_string())),
    }
}

fn build_material(material_json: &MaterialJson)
    -> Result<Material, TraceError> {
    let mut material: Material = Default::default();

    if let Some(pattern_json) = &material_json.pattern {
        material.pattern = build_pattern(pattern_json)?;
    }

    if let Some(ambient) = material_json.ambient {
        material.ambient = ambient;
    }
    if let Some(diffuse) = material_json.diffuse {
        material.diffuse = diffuse;
    }
    if let Some(specular) = material_json.specular {
        material.specular = specular;
    }
    if let Some(shininess) = material_json.shininess {
        material.shininess = shininess;
    }
    if let Some(reflective) = material_json.reflective {
        material.reflective = reflective;
    }
    if let Some(transparency) = material_json.transparency {
        material.transparency = transparency;
    }
    if let Some(refractive_index) = material_json.refractive_index {
        material.refractive_index = refractive_index;
    }

    Ok(material)
}

fn build_pattern(pattern_json: &PatternJson) -> Result<Pattern, TraceError> {
    let a = pattern_json.colors.get(0).map(color)
        .unwrap_or_else(Color::white);
    let b = pattern_json.colors.get(1).map(color)
        .unwrap_or_else(Color::black);

    let mut pattern = match pattern_json.kind.as_str() {
        "plain" => Pattern::plain(a),
        "stripe" => Pattern::stripe(a, b),
        "gradient" => Pattern::gradient(a, b),
        "ring" => Pattern::ring(a, b),
        "checker" => Pattern::checker(a, b),

        "uv_checker" => Pattern::uv_checker(
            a, b,
            pattern_json.width.unwrap_or(16),
            pattern_json.height.unwrap_or(8)
        ),

        "perturbed" => {
            let base = match &pattern_json.base {
                Some(base_json) => build_pattern(base_json)?,
                None => Pattern::plain(a),
            };

            Pattern::perturbed(pattern_json.amount.unwrap_or(0.2), base)
        },

        other => return Err(TraceError::UnknownPatternKind(other.to_string())),
    };

    if !pattern_json.transform.is_empty() {
        pattern.set_transform(build_transform(&pattern_json.transform)?)?;
    }

    Ok(pattern)
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;
    use crate::pattern::PatternKind;

    fn minimal_scene(shapes: &str) -> String {
        format!(r#"{{
            "camera": {{
                "width": 100,
                "height": 50,
                "field_of_view": 1.047,
                "from": [0.0, 1.5, -5.0],
                "to": [0.0, 1.0, 0.0],
                "up": [0.0, 1.0, 0.0]
            }},
            "light": {{
                "intensity": [1.0, 1.0, 1.0],
                "position": [-10.0, 10.0, -10.0]
            }},
            "shapes": {}
        }}"#, shapes)
    }

    #[test]
    fn parse_empty_scene() {
        let scene = parse_scene(&minimal_scene("[]")).unwrap();

        assert_eq!(scene.camera.hsize, 100);
        assert_eq!(scene.camera.vsize, 50);
        assert!(scene.world.shapes.is_empty());
        assert_eq!(scene.world.light.position,
            Coordinate::point(-10.0, 10.0, -10.0));

        // Config falls back to its defaults when absent.
        assert_eq!(scene.config, RenderConfig::default());
    }

    #[test]
    fn parse_sphere_with_material_and_transform() {
        let scene = parse_scene(&minimal_scene(r#"[
            {
                "kind": "sphere",
                "transform": [
                    { "op": "translation", "args": [0.0, 1.0, 0.0] },
                    { "op": "scaling", "args": [0.5, 0.5, 0.5] }
                ],
                "material": {
                    "pattern": {
                        "kind": "plain",
                        "colors": [[0.8, 1.0, 0.6]]
                    },
                    "diffuse": 0.7,
                    "specular": 0.2
                }
            }
        ]"#)).unwrap();

        assert_eq!(scene.world.shapes.len(), 1);

        let s = &scene.world.shapes[0];
        assert_eq!(s.kind, ShapeKind::Sphere);

        let expected = Matrix::compose(&[
            Matrix::translation(0.0, 1.0, 0.0),
            Matrix::scaling(0.5, 0.5, 0.5),
        ]).unwrap();
        assert_eq!(*s.transform(), expected);

        let m = s.material().unwrap();
        assert_eq!(m.pattern, Pattern::plain(Color::rgb(0.8, 1.0, 0.6)));
        assert_eq!(m.diffuse, 0.7);
        assert_eq!(m.specular, 0.2);

        // Unspecified fields keep their defaults.
        assert_eq!(m.ambient, 0.1);
    }

    #[test]
    fn parse_capped_cylinder() {
        let scene = parse_scene(&minimal_scene(r#"[
            { "kind": "cylinder", "min": 0.0, "max": 2.0, "closed": true }
        ]"#)).unwrap();

        assert_eq!(scene.world.shapes[0].kind, ShapeKind::Cylinder {
            minimum: 0.0,
            maximum: 2.0,
            closed: true,
        });
    }

    #[test]
    fn parse_unbounded_cone() {
        let scene = parse_scene(&minimal_scene(r#"[
            { "kind": "cone" }
        ]"#)).unwrap();

        match scene.world.shapes[0].kind {
            ShapeKind::Cone { minimum, maximum, closed } => {
                assert_eq!(minimum, std::f64::NEG_INFINITY);
                assert_eq!(maximum, std::f64::INFINITY);
                assert!(!closed);
            },
            ref other => panic!("expected a cone, got {:?}", other),
        }
    }

    #[test]
    fn parse_group_with_children() {
        let scene = parse_scene(&minimal_scene(r#"[
            {
                "kind": "group",
                "transform": [
                    { "op": "rotation_y", "args": [1.5707963267948966] }
                ],
                "children": [
                    { "kind": "sphere" },
                    {
                        "kind": "plane",
                        "transform": [
                            { "op": "translation", "args": [0.0, -1.0, 0.0] }
                        ]
                    }
                ]
            }
        ]"#)).unwrap();

        let shapes = &scene.world.shapes;
        assert_eq!(shapes.len(), 3);

        let group = &shapes[0];
        assert_eq!(group.children(), Some(&vec![1, 2]));
        assert_eq!(shapes[1].parent(), Some(0));
        assert_eq!(shapes[2].parent(), Some(0));

        // Only the group is a root.
        let roots: Vec<ShapeId> = scene.world.shapes.roots().collect();
        assert_eq!(roots, vec![0]);
    }

    #[test]
    fn parse_perturbed_uv_checker() {
        let scene = parse_scene(&minimal_scene(r#"[
            {
                "kind": "sphere",
                "material": {
                    "pattern": {
                        "kind": "perturbed",
                        "amount": 0.3,
                        "base": {
                            "kind": "uv_checker",
                            "colors": [[1.0, 1.0, 1.0], [0.0, 0.0, 0.0]],
                            "width": 20,
                            "height": 10
                        }
                    }
                }
            }
        ]"#)).unwrap();

        let m = scene.world.shapes[0].material().unwrap();
        match &m.pattern.kind {
            PatternKind::Perturbed { amount, base } => {
                assert_eq!(*amount, 0.3);
                match base.kind {
                    PatternKind::UvChecker { width, height, .. } => {
                        assert_eq!(width, 20);
                        assert_eq!(height, 10);
                    },
                    ref other => panic!("expected uv_checker, got {:?}", other),
                }
            },
            other => panic!("expected perturbed, got {:?}", other),
        }
    }

    #[test]
    fn parse_scene_config() {
        let json = r#"{
            "camera": {
                "width": 10,
                "height": 10,
                "field_of_view": 1.047,
                "from": [0.0, 0.0, -5.0],
                "to": [0.0, 0.0, 0.0],
                "up": [0.0, 1.0, 0.0]
            },
            "light": {
                "intensity": [1.0, 1.0, 1.0],
                "position": [-10.0, 10.0, -10.0]
            },
            "config": { "max_depth": 8 }
        }"#;

        let scene = parse_scene(json).unwrap();

        assert_eq!(scene.config.max_depth, 8);
        assert_eq!(scene.config.epsilon, RenderConfig::default().epsilon);
    }

    #[test]
    fn unknown_shape_kind() {
        let err = parse_scene(&minimal_scene(r#"[
            { "kind": "torus" }
        ]"#)).unwrap_err();

        assert_eq!(err, TraceError::UnknownShapeKind("torus".to_string()));
    }

    #[test]
    fn unknown_pattern_kind() {
        let err = parse_scene(&minimal_scene(r#"[
            { "kind": "sphere", "material": { "pattern": { "kind": "dots" } } }
        ]"#)).unwrap_err();

        assert_eq!(err, TraceError::UnknownPatternKind("dots".to_string()));
    }

    #[test]
    fn unknown_transform_op() {
        let err = parse_scene(&minimal_scene(r#"[
            { "kind": "sphere", "transform": [{ "op": "skew" }] }
        ]"#)).unwrap_err();

        assert_eq!(err, TraceError::UnknownTransformOp("skew".to_string()));
    }

    #[test]
    fn singular_shape_transform() {
        let err = parse_scene(&minimal_scene(r#"[
            { "kind": "sphere", "transform": [{ "op": "scaling" }] }
        ]"#)).unwrap_err();

        assert_eq!(err, TraceError::InvalidTransform);
    }

    #[test]
    fn children_on_non_group() {
        let err = parse_scene(&minimal_scene(r#"[
            { "kind": "sphere", "children": [{ "kind": "sphere" }] }
        ]"#)).unwrap_err();

        assert_eq!(err, TraceError::NotAGroup(0));
    }

    #[test]
    fn malformed_json() {
        let err = parse_scene("{ not json").unwrap_err();

        match err {
            TraceError::Json(_) => {},
            other => panic!("expected a JSON error, got {:?}", other),
        }
    }
}
