use crate::color::Color;
use crate::coord::Coordinate;
use crate::pattern::Pattern;
use crate::shape::{ ShapeArena, ShapeId };

/// A point light.
///
/// A very simple light source. Provides a color and a position where light is
/// produced from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub intensity: Color,
    pub position: Coordinate,
}

impl PointLight {
    /// Creates a point light.
    ///
    /// If `position` isn't a point, it is converted to a point automatically.
    pub fn new(intensity: Color, mut position: Coordinate) -> PointLight {
        if !position.is_point() {
            position.w = 1.0;
        }

        PointLight { intensity, position }
    }
}

/// A material record.
///
/// Materials use attributes from the Phong reflection model; ambient, diffuse,
/// specular and shininess. The surface color always comes from a pattern; a
/// uniformly colored material carries a plain pattern of that color.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub pattern: Pattern,

    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,

    pub reflective: f64,
    pub transparency: f64,
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            pattern: Pattern::plain(Color::white()),

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,

            reflective: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
        }
    }
}

/// Calculate the lighting of a point on a shape's surface.
///
/// Effectively, this function takes a material, a single light, a point, the
/// eye vector and the normal vector, and calculates how the light looks from
/// the eye. The shape (and its arena) are needed so that the material's
/// pattern can be evaluated at the right spot on the surface.
///
/// If this point is in a shadow (parameter `in_shadow`), only ambient light is
/// used.
pub fn lighting(m: &Material, arena: &ShapeArena, shape: ShapeId,
    light: &PointLight, point: Coordinate, eyev: Coordinate,
    normalv: Coordinate, in_shadow: bool) -> Color {
    let color = m.pattern.color_at_shape(arena, shape, point);

    // Combine surface color with light's color
    let effective_color = color * light.intensity;

    // Find direction to light source
    let lightv = (light.position - point).normalize();

    // Compute ambient light
    let ambient = effective_color * m.ambient;

    // If the point is in a shadow, only calculate ambient light
    if in_shadow {
        return ambient;
    }

    // Declare diffuse and specular variables for calculating light
    let diffuse;
    let specular;

    // For the side of the surface with no light, use only ambient light
    let light_dot_normal = lightv.dot(&normalv);
    if light_dot_normal < 0.0 {
        diffuse = Color::black();
        specular = Color::black();
    } else {
        diffuse = effective_color * m.diffuse * light_dot_normal;

        let reflectv = (-lightv).reflect(&normalv);
        let reflect_dot_eye = reflectv.dot(&eyev);

        // If no specular reflection, set the specular light to black
        if reflect_dot_eye <= 0.0 {
            specular = Color::black();
        } else {
            // Otherwise, calculate the shininess factor and apply
            let factor = reflect_dot_eye.powf(m.shininess);
            specular = light.intensity * m.specular * factor;
        }
    }

    ambient + diffuse + specular
}

/* Tests */

#[cfg(test)]
use crate::shape::Shape;

#[test]
fn eye_between_light_and_surface() {
    let m: Material = Default::default();
    let position = Coordinate::point(0.0, 0.0, 0.0);
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let eyev = Coordinate::vector(0.0, 0.0, -1.0);
    let normalv = Coordinate::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Color::rgb(1.0, 1.0, 1.0),
        Coordinate::point(0.0, 0.0, -10.0),
    );

    let res = lighting(&m, &arena, s, &light, position, eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.9, 1.9, 1.9));
}

#[test]
fn eye_between_light_and_surface_offset_45() {
    let m: Material = Default::default();
    let position = Coordinate::point(0.0, 0.0, 0.0);
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let eyev = Coordinate::vector(
        0.0, 2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0
    );
    let normalv = Coordinate::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Color::rgb(1.0, 1.0, 1.0),
        Coordinate::point(0.0, 0.0, -10.0),
    );

    let res = lighting(&m, &arena, s, &light, position, eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.0, 1.0, 1.0));
}

#[test]
fn eye_opposite_from_surface_offset_45() {
    let m: Material = Default::default();
    let position = Coordinate::point(0.0, 0.0, 0.0);
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let eyev = Coordinate::vector(0.0, 0.0, -1.0);
    let normalv = Coordinate::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Color::rgb(1.0, 1.0, 1.0),
        Coordinate::point(0.0, 10.0, -10.0),
    );

    let res = lighting(&m, &arena, s, &light, position, eyev, normalv, false);
    assert_eq!(res, Color::rgb(0.7364, 0.7364, 0.7364));
}

#[test]
fn eye_opposite_from_surface_in_reflection() {
    let m: Material = Default::default();
    let position = Coordinate::point(0.0, 0.0, 0.0);
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let eyev = Coordinate::vector(
        0.0, -(2.0f64.sqrt()) / 2.0, -(2.0f64.sqrt()) / 2.0
    );
    let normalv = Coordinate::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Color::rgb(1.0, 1.0, 1.0),
        Coordinate::point(0.0, 10.0, -10.0),
    );

    let res = lighting(&m, &arena, s, &light, position, eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.6364, 1.6364, 1.6364));
}

#[test]
fn eye_across_surface_from_light() {
    let m: Material = Default::default();
    let position = Coordinate::point(0.0, 0.0, 0.0);
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let eyev = Coordinate::vector(0.0, 0.0, -1.0);
    let normalv = Coordinate::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Color::rgb(1.0, 1.0, 1.0),
        Coordinate::point(0.0, 0.0, 10.0),
    );

    let res = lighting(&m, &arena, s, &light, position, eyev, normalv, false);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn lighting_in_shadow_keeps_only_ambient() {
    let m: Material = Default::default();
    let position = Coordinate::point(0.0, 0.0, 0.0);
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let eyev = Coordinate::vector(0.0, 0.0, -1.0);
    let normalv = Coordinate::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Color::rgb(1.0, 1.0, 1.0),
        Coordinate::point(0.0, 0.0, -10.0),
    );

    let res = lighting(&m, &arena, s, &light, position, eyev, normalv, true);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn lighting_with_stripe_pattern() {
    let m = Material {
        pattern: Pattern::stripe(Color::white(), Color::black()),

        // Note that ONLY ambient light is included, as the color of ambient
        // light is mostly predictable
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,
        shininess: 0.0,

        ..Default::default()
    };

    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let eyev = Coordinate::vector(0.0, 0.0, -1.0);
    let normalv = Coordinate::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(
        Color::white(), Coordinate::point(0.0, 0.0, -10.0)
    );

    assert_eq!(
        Color::white(),
        lighting(&m, &arena, s, &light, Coordinate::point(0.9, 0.0, 0.0),
            eyev, normalv, false)
    );

    assert_eq!(
        Color::black(),
        lighting(&m, &arena, s, &light, Coordinate::point(1.1, 0.0, 0.0),
            eyev, normalv, false)
    );
}
