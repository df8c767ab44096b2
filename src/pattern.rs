use crate::color::Color;
use crate::coord::Coordinate;
use crate::matrix::Matrix;
use crate::error::TraceError;
use crate::noise::noise;
use crate::shape::{ ShapeArena, ShapeId, world_to_object };

#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    /// A single solid color everywhere.
    Plain(Color),

    /// Alternating colors in unit-wide bands along the X axis.
    Stripe(Color, Color),

    /// A linear blend from one color to the other along the X axis.
    Gradient(Color, Color),

    /// Concentric rings of alternating color in the XZ plane.
    Ring(Color, Color),

    /// A 3D checkerboard of unit cubes.
    Checker(Color, Color),

    /// A checkerboard in spherical texture space, with `width` checkers
    /// around the equator and `height` checkers from pole to pole.
    UvChecker { a: Color, b: Color, width: usize, height: usize },

    /// Another pattern, sampled through a noise-jittered point.
    Perturbed { amount: f64, base: Box<Pattern> },
}

/// A color pattern with its own transform.
///
/// Patterns are evaluated in three spaces: a world-space point is first
/// brought into the shape's object space, and from there into pattern space
/// through the pattern's own (inverse) transform. This lets a pattern be
/// scaled, rotated or offset independently of the shape wearing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,

    transform: Matrix,
    inverse_transform: Matrix,
}

impl Pattern {
    fn with_kind(kind: PatternKind) -> Pattern {
        Pattern {
            kind,
            transform: Matrix::identity(4),
            inverse_transform: Matrix::identity(4),
        }
    }

    pub fn plain(color: Color) -> Pattern {
        Pattern::with_kind(PatternKind::Plain(color))
    }

    pub fn stripe(primary: Color, secondary: Color) -> Pattern {
        Pattern::with_kind(PatternKind::Stripe(primary, secondary))
    }

    pub fn gradient(from: Color, to: Color) -> Pattern {
        Pattern::with_kind(PatternKind::Gradient(from, to))
    }

    pub fn ring(primary: Color, secondary: Color) -> Pattern {
        Pattern::with_kind(PatternKind::Ring(primary, secondary))
    }

    pub fn checker(primary: Color, secondary: Color) -> Pattern {
        Pattern::with_kind(PatternKind::Checker(primary, secondary))
    }

    pub fn uv_checker(a: Color, b: Color, width: usize, height: usize)
        -> Pattern {
        Pattern::with_kind(PatternKind::UvChecker { a, b, width, height })
    }

    pub fn perturbed(amount: f64, base: Pattern) -> Pattern {
        Pattern::with_kind(PatternKind::Perturbed {
            amount, base: Box::new(base)
        })
    }

    pub fn transform(&self) -> &Matrix {
        &self.transform
    }

    /// Sets the transform property on a Pattern.
    ///
    /// Only invertible 4x4 matrices are accepted; anything else produces an
    /// `InvalidTransform` error and leaves the pattern unchanged.
    pub fn set_transform(&mut self, transform: Matrix)
        -> Result<(), TraceError> {
        if transform.rows() != 4 || transform.cols() != 4 {
            return Err(TraceError::InvalidTransform);
        }

        let inverse = transform.inverse()
            .map_err(|_| TraceError::InvalidTransform)?;

        self.transform = transform;
        self.inverse_transform = inverse;
        Ok(())
    }

    /// Evaluates the pattern at a pattern-space point.
    pub fn color_at(&self, p: Coordinate) -> Color {
        match self.kind {
            PatternKind::Plain(c) => c,

            PatternKind::Stripe(a, b) => {
                if p.x.floor().rem_euclid(2.0) == 0.0 { a } else { b }
            },

            PatternKind::Gradient(from, to) => {
                from + (to - from) * (p.x - p.x.floor())
            },

            PatternKind::Ring(a, b) => {
                let dist = (p.x.powi(2) + p.z.powi(2)).sqrt();
                if dist.floor().rem_euclid(2.0) == 0.0 { a } else { b }
            },

            PatternKind::Checker(a, b) => {
                let sum = p.x.floor() + p.y.floor() + p.z.floor();
                if sum.rem_euclid(2.0) == 0.0 { a } else { b }
            },

            PatternKind::UvChecker { a, b, width, height } => {
                let (u, v) = spherical_uv(&p);
                let sum = (u * width as f64).floor()
                        + (v * height as f64).floor();

                if sum.rem_euclid(2.0) == 0.0 { a } else { b }
            },

            PatternKind::Perturbed { amount, ref base } => {
                let jittered = Coordinate::point(
                    p.x + noise(p.x, p.y, p.z) * amount,
                    p.y + noise(p.x, p.y, p.z + 1.0) * amount,
                    p.z + noise(p.x, p.y, p.z + 2.0) * amount,
                );

                // The base pattern keeps its own transform.
                base.color_at(&base.inverse_transform * jittered)
            },
        }
    }

    /// Evaluates the pattern at a world-space point on a shape.
    ///
    /// The point travels world space -> object space -> pattern space, so
    /// both the shape's transform (including any group ancestry) and the
    /// pattern's own transform apply.
    pub fn color_at_shape(&self, arena: &ShapeArena, shape: ShapeId,
        world_point: Coordinate) -> Color {
        let object_point = world_to_object(arena, shape, world_point);
        let pattern_point = &self.inverse_transform * object_point;

        self.color_at(pattern_point)
    }
}

/// Maps a point to spherical texture coordinates.
///
/// `u` wraps around the Y axis (0 at -Z going through +X), `v` runs from the
/// south pole (0.0) to the north pole (1.0). A point at the origin has no
/// direction, and maps to the center of texture space.
fn spherical_uv(p: &Coordinate) -> (f64, f64) {
    use std::f64::consts::PI;

    let radius = (p.x.powi(2) + p.y.powi(2) + p.z.powi(2)).sqrt();
    if radius == 0.0 {
        return (0.5, 0.5);
    }

    let u = p.x.atan2(p.z) / (2.0 * PI) + 0.5;
    let v = (p.y / radius).asin() / PI + 0.5;

    (u, v)
}

/* Tests */

#[cfg(test)]
use crate::shape::Shape;

#[test]
fn stripes_constant_along_y_and_z() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    assert_eq!(pattern.color_at(Coordinate::point(0.0, 1.0, 0.0)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(0.0, 2.0, 0.0)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(0.0, 0.0, 1.0)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(0.0, 0.0, 2.0)),
        Color::white());
}

#[test]
fn stripes_alternate_along_x() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    assert_eq!(pattern.color_at(Coordinate::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(0.9, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.color_at(Coordinate::point(-0.1, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.color_at(Coordinate::point(-1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.color_at(Coordinate::point(-1.1, 0.0, 0.0)),
        Color::white());
}

#[test]
fn stripes_with_shape_transform() {
    let mut arena = ShapeArena::new();
    let mut s = Shape::sphere();
    s.set_transform(Matrix::scaling(2.0, 2.0, 2.0)).unwrap();
    let s = arena.add(s);

    let pattern = Pattern::stripe(Color::white(), Color::black());
    let c = pattern.color_at_shape(&arena, s, Coordinate::point(1.5, 0.0, 0.0));

    assert_eq!(c, Color::white());
}

#[test]
fn stripes_with_pattern_transform() {
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let mut pattern = Pattern::stripe(Color::white(), Color::black());
    pattern.set_transform(Matrix::scaling(2.0, 2.0, 2.0)).unwrap();
    let c = pattern.color_at_shape(&arena, s, Coordinate::point(1.5, 0.0, 0.0));

    assert_eq!(c, Color::white());
}

#[test]
fn stripes_with_both_transforms() {
    let mut arena = ShapeArena::new();
    let mut s = Shape::sphere();
    s.set_transform(Matrix::scaling(2.0, 2.0, 2.0)).unwrap();
    let s = arena.add(s);

    let mut pattern = Pattern::stripe(Color::white(), Color::black());
    pattern.set_transform(Matrix::translation(0.5, 0.0, 0.0)).unwrap();
    let c = pattern.color_at_shape(&arena, s, Coordinate::point(2.5, 0.0, 0.0));

    assert_eq!(c, Color::white());
}

#[test]
fn pattern_on_grouped_shape() {
    let mut arena = ShapeArena::new();
    let mut g = Shape::group();
    g.set_transform(Matrix::translation(1.0, 0.0, 0.0)).unwrap();
    let g = arena.add(g);

    let s = arena.add(Shape::sphere());
    arena.add_child(g, s).unwrap();

    // The group's translation shifts the stripe boundaries in world space.
    let pattern = Pattern::stripe(Color::white(), Color::black());
    assert_eq!(
        pattern.color_at_shape(&arena, s, Coordinate::point(1.5, 0.0, 0.0)),
        Color::white()
    );
    assert_eq!(
        pattern.color_at_shape(&arena, s, Coordinate::point(0.5, 0.0, 0.0)),
        Color::black()
    );
}

#[test]
fn gradient_interpolates_along_x() {
    let pattern = Pattern::gradient(Color::white(), Color::black());

    assert_eq!(pattern.color_at(Coordinate::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(0.25, 0.0, 0.0)),
        Color::rgb(0.75, 0.75, 0.75));
    assert_eq!(pattern.color_at(Coordinate::point(0.5, 0.0, 0.0)),
        Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(pattern.color_at(Coordinate::point(0.75, 0.0, 0.0)),
        Color::rgb(0.25, 0.25, 0.25));
}

#[test]
fn rings_extend_in_x_and_z() {
    let pattern = Pattern::ring(Color::white(), Color::black());

    assert_eq!(pattern.color_at(Coordinate::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.color_at(Coordinate::point(0.0, 0.0, 1.0)),
        Color::black());
    // 0.708 is just slightly more than sqrt(2)/2.
    assert_eq!(pattern.color_at(Coordinate::point(0.708, 0.0, 0.708)),
        Color::black());
}

#[test]
fn checkers_repeat_along_each_axis() {
    let pattern = Pattern::checker(Color::white(), Color::black());

    assert_eq!(pattern.color_at(Coordinate::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(0.99, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(1.01, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.color_at(Coordinate::point(0.0, 0.99, 0.0)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(0.0, 1.01, 0.0)),
        Color::black());
    assert_eq!(pattern.color_at(Coordinate::point(0.0, 0.0, 0.99)),
        Color::white());
    assert_eq!(pattern.color_at(Coordinate::point(0.0, 0.0, 1.01)),
        Color::black());
}

#[test]
fn spherical_uv_landmarks() {
    use crate::feq;

    let (u, v) = spherical_uv(&Coordinate::point(0.0, 0.0, 1.0));
    assert!(feq(u, 0.5) && feq(v, 0.5));

    let (u, v) = spherical_uv(&Coordinate::point(1.0, 0.0, 0.0));
    assert!(feq(u, 0.75) && feq(v, 0.5));

    let (u, v) = spherical_uv(&Coordinate::point(-1.0, 0.0, 0.0));
    assert!(feq(u, 0.25) && feq(v, 0.5));

    let (u, v) = spherical_uv(&Coordinate::point(0.0, 1.0, 0.0));
    let _ = u;
    assert!(feq(v, 1.0));

    let (u, v) = spherical_uv(&Coordinate::point(0.0, -1.0, 0.0));
    let _ = u;
    assert!(feq(v, 0.0));
}

#[test]
fn uv_checker_parity() {
    let pattern = Pattern::uv_checker(Color::white(), Color::black(), 2, 1);

    // u = 0.25, v = 0.5: cell (0, 0), even.
    assert_eq!(pattern.color_at(Coordinate::point(-1.0, 0.0, 0.0)),
        Color::white());

    // u = 0.75, v = 0.5: cell (1, 0), odd.
    assert_eq!(pattern.color_at(Coordinate::point(1.0, 0.0, 0.0)),
        Color::black());

    // u = 0.5, v = 0.75: cell (1, 0), odd.
    let sq2 = 2.0f64.sqrt() / 2.0;
    assert_eq!(pattern.color_at(Coordinate::point(0.0, sq2, sq2)),
        Color::black());
}

#[test]
fn perturbed_with_zero_amount_matches_base() {
    let base = Pattern::stripe(Color::white(), Color::black());
    let pattern = Pattern::perturbed(0.0, base.clone());

    for i in 0..20 {
        let p = Coordinate::point(i as f64 * 0.37 - 3.0, 0.5, -1.25);
        assert_eq!(pattern.color_at(p), base.color_at(p));
    }
}

#[test]
fn perturbed_is_deterministic() {
    let pattern = Pattern::perturbed(
        1.5, Pattern::stripe(Color::white(), Color::black())
    );
    let p = Coordinate::point(0.3, 0.7, -1.2);

    assert_eq!(pattern.color_at(p), pattern.color_at(p));
}

#[test]
fn pattern_set_transform_rejects_singular() {
    let mut pattern = Pattern::stripe(Color::white(), Color::black());
    let res = pattern.set_transform(Matrix::scaling(0.0, 1.0, 1.0));

    assert_eq!(res, Err(TraceError::InvalidTransform));
    assert_eq!(*pattern.transform(), Matrix::identity(4));
}
