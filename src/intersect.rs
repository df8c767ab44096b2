use crate::coord::Coordinate;
use crate::ray::Ray;
use crate::config::RenderConfig;
use crate::consts::VACUUM_RI;
use crate::shape::{ Shape, ShapeArena, normal_at };

/// An intersection.
///
/// This structure assumes that some ray produced an intersection. Parameter `t`
/// is analogous to `t` for a ray (the offset from the ray origin).
///
/// The `shape` parameter borrows the intersected `Shape` from its arena.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub shape: &'a Shape,
}

/// Implements partial equality on an Intersection.
///
/// Two Intersection structures are equal if the offsets `t` of the
/// intersections are equivalent, and if the intersected shapes carry the same
/// arena id.
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.t == other.t && self.shape.id() == other.shape.id()
    }
}

impl<'a> Intersection<'a> {
    pub fn new(t: f64, shape: &'a Shape) -> Intersection<'a> {
        Intersection { t, shape }
    }
}

/// A collection of intersections.
///
/// Mostly a wrapper for a vector of `Intersection` records. See the
/// `Intersection` documentation for more information.
#[derive(Clone, Debug, Default)]
pub struct Intersections<'a> {
    pub intersections: Vec<Intersection<'a>>,
}

impl<'a> Intersections<'a> {
    /// Creates a new list of intersections.
    pub fn new() -> Intersections<'a> {
        Intersections { intersections: Vec::new() }
    }

    /// Merges several intersection lists into one, sorted by `t`.
    pub fn aggregate(many: Vec<Intersections<'a>>) -> Intersections<'a> {
        let mut all = Intersections::new();
        for is in many {
            all.intersections.extend(is.intersections);
        }

        all.sort();
        all
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    /// Checks if any shape has been hit.
    ///
    /// If no hit is registered, this function returns `None`.
    ///
    /// Effectively, a hit occurs if at least one `Intersection` in this
    /// `Intersections` is finite and is greater than or equal to 0.
    ///
    /// As a note, this function sorts the `intersections` field on every call.
    /// This is because the `Intersection` with the lowest `t` is chosen. A more
    /// optimal implementation is likely possible.
    pub fn hit<'b>(&'b mut self) -> Option<Intersection<'a>> {
        self.intersections.retain(|i| i.t.is_finite());
        self.sort();

        for i in self.intersections.iter() {
            if i.t >= 0.0 {
                return Some(*i);
            }
        }

        None
    }

    /// Sorts the intersections by `t`, ignoring `f64` semantics.
    ///
    /// The sort is stable; intersections sharing a `t` keep their insertion
    /// order.
    pub fn sort(&mut self) {
        self.intersections.sort_by(|a, b|
            a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal)
        );
    }
}

/// A record for computations associated with an `Intersection`.
///
/// Mostly a superset of an `Intersection`.
#[derive(Clone, Debug)]
pub struct PrecomputedHit<'a> {
    /// The "time" of the ray intersection.
    pub t: f64,

    /// The shape being intersected.
    pub shape: &'a Shape,

    /// The point where the intersection occurs.
    pub point: Coordinate,

    /// A point slightly above the intersected surface. Used to prevent a
    /// shape from shadowing itself (this causes "acne").
    pub over_point: Coordinate,

    /// A point slightly below the intersected surface. Used to prevent a
    /// shape from refracting itself on its surface.
    pub under_point: Coordinate,

    /// The eye vector for the intersection.
    pub eyev: Coordinate,

    /// The normal vector of the shape being intersected.
    pub normalv: Coordinate,

    /// The intersection ray, reflected across the normal.
    pub reflectv: Coordinate,

    /// Whether the intersection occurs within the shape or not.
    pub inside: bool,

    /// The refractive index of the material being exited.
    pub n1: f64,

    /// The refractive index of the material being entered.
    pub n2: f64,
}

impl<'a> PrecomputedHit<'a> {
    /// Creates a new precomputed hit, given a ray and intersection.
    ///
    /// The `is` parameter is a collection of intersections. If provided,
    /// refraction indices will be calculated.
    pub fn new(r: &Ray, hit: &Intersection<'a>, is: Option<&Intersections<'a>>,
        arena: &ShapeArena, cfg: &RenderConfig) -> PrecomputedHit<'a> {
        let t = hit.t;
        let shape = hit.shape;
        let point = r.position(t);
        let eyev = -r.direction;
        let mut normalv = normal_at(arena, shape.id(), point, cfg);

        let inside = if normalv.dot(&eyev) < 0.0 {
            normalv = -normalv;
            true
        } else {
            false
        };

        let over_point = point + normalv * cfg.epsilon;
        let under_point = point - normalv * cfg.epsilon;

        let reflectv = r.direction.reflect(&normalv);
        let (n1, n2) = if let Some(xs) = is {
            Self::refraction_indices(hit, xs)
        } else {
            (VACUUM_RI, VACUUM_RI)
        };

        PrecomputedHit {
            t, shape,
            point, over_point, under_point,
            eyev, normalv, reflectv,
            inside,
            n1, n2,
        }
    }

    /// Walks the sorted intersection list to find the refractive indices on
    /// either side of the hit.
    ///
    /// `containers` holds every shape the ray has entered but not yet exited.
    /// Whichever shape was entered most recently supplies the index being
    /// exited (`n1`, read just before the hit toggles its own shape) and the
    /// index being entered (`n2`, read just after).
    fn refraction_indices(hit: &Intersection<'a>, is: &Intersections<'a>)
        -> (f64, f64) {
        let mut n1 = VACUUM_RI;
        let mut n2 = VACUUM_RI;

        let mut containers: Vec<&'a Shape> = Vec::new();

        for i in is.intersections.iter() {
            if i == hit {
                n1 = containers.last()
                    .map(|s| Self::refractive_index(s))
                    .unwrap_or(VACUUM_RI);
            }

            // If shape `i.shape` is in `containers`, the ray is exiting it;
            // remove it. Otherwise the ray is entering it; add it.
            if let Some(j)
                = containers.iter().position(|s| s.id() == i.shape.id()) {
                containers.remove(j);
            } else {
                containers.push(i.shape);
            }

            if i == hit {
                n2 = containers.last()
                    .map(|s| Self::refractive_index(s))
                    .unwrap_or(VACUUM_RI);

                break;
            }
        }

        (n1, n2)
    }

    /// The refractive index of a shape's material. Shapes without a material
    /// of their own behave like a vacuum.
    fn refractive_index(shape: &Shape) -> f64 {
        shape.material().map(|m| m.refractive_index).unwrap_or(VACUUM_RI)
    }

    /// Calculates the reflectance of a hit.
    ///
    /// The reflectance is a number between 0 and 1, representing what fraction
    /// of the light is reflected for the hit. This is the Schlick
    /// approximation to the Fresnel equations; reflectance climbs steeply as
    /// the viewing angle becomes shallow, and reaches 1.0 under total internal
    /// reflection.
    pub fn schlick(&self) -> f64 {
        let mut cos = self.eyev.dot(&self.normalv);

        // Total internal reflection can only occur if n1 > n2.
        if self.n1 > self.n2 {
            let n = self.n1 / self.n2;
            let sin2_t = n.powi(2) * (1.0 - cos.powi(2));

            if sin2_t > 1.0 {
                return 1.0
            }

            cos = (1.0 - sin2_t).sqrt();
        }

        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos).powi(5)
    }
}

/* Tests */

#[cfg(test)]
fn glass_sphere(arena: &mut ShapeArena) -> crate::shape::ShapeId {
    let mut s = Shape::sphere();
    if let Some(m) = s.material_mut() {
        m.transparency = 1.0;
        m.refractive_index = 1.5;
    }

    arena.add(s)
}

#[test]
fn hit_all_positive() {
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let i1 = Intersection::new(1.0, &arena[s]);
    let i2 = Intersection::new(2.0, &arena[s]);
    let mut is = Intersections { intersections: vec![i2, i1] };

    assert_eq!(is.hit(), Some(i1));
}

#[test]
fn hit_some_negative() {
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let i1 = Intersection::new(-1.0, &arena[s]);
    let i2 = Intersection::new(1.0, &arena[s]);
    let mut is = Intersections { intersections: vec![i2, i1] };

    assert_eq!(is.hit(), Some(i2));
}

#[test]
fn hit_all_negative() {
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let i1 = Intersection::new(-2.0, &arena[s]);
    let i2 = Intersection::new(-1.0, &arena[s]);
    let mut is = Intersections { intersections: vec![i2, i1] };

    assert_eq!(is.hit(), None);
}

#[test]
fn hit_lowest_nonnegative() {
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let i1 = Intersection::new(5.0, &arena[s]);
    let i2 = Intersection::new(7.0, &arena[s]);
    let i3 = Intersection::new(-3.0, &arena[s]);
    let i4 = Intersection::new(2.0, &arena[s]);
    let mut is = Intersections { intersections: vec![i1, i2, i3, i4] };

    assert_eq!(is.hit(), Some(i4));
}

#[test]
fn hit_ignores_non_finite() {
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let i1 = Intersection::new(std::f64::NAN, &arena[s]);
    let i2 = Intersection::new(std::f64::INFINITY, &arena[s]);
    let i3 = Intersection::new(3.0, &arena[s]);
    let mut is = Intersections { intersections: vec![i1, i2, i3] };

    assert_eq!(is.hit(), Some(i3));
}

#[test]
fn sort_is_stable_for_equal_t() {
    let mut arena = ShapeArena::new();
    let s1 = arena.add(Shape::sphere());
    let s2 = arena.add(Shape::sphere());

    let i1 = Intersection::new(1.0, &arena[s1]);
    let i2 = Intersection::new(1.0, &arena[s2]);
    let mut is = Intersections { intersections: vec![i1, i2] };
    is.sort();

    assert_eq!(is.intersections[0].shape.id(), s1);
    assert_eq!(is.intersections[1].shape.id(), s2);
}

#[test]
fn precompute_outside_hit() {
    let cfg: RenderConfig = Default::default();
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let r = Ray::new(
        Coordinate::point(0.0, 0.0, -5.0),
        Coordinate::vector(0.0, 0.0, 1.0)
    ).unwrap();

    let i = Intersection::new(4.0, &arena[s]);
    let comps = PrecomputedHit::new(&r, &i, None, &arena, &cfg);

    assert_eq!(comps.t, 4.0);
    assert_eq!(comps.point, Coordinate::point(0.0, 0.0, -1.0));
    assert_eq!(comps.eyev, Coordinate::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normalv, Coordinate::vector(0.0, 0.0, -1.0));
    assert!(!comps.inside);
}

#[test]
fn precompute_inside_hit() {
    let cfg: RenderConfig = Default::default();
    let mut arena = ShapeArena::new();
    let s = arena.add(Shape::sphere());

    let r = Ray::new(
        Coordinate::point(0.0, 0.0, 0.0),
        Coordinate::vector(0.0, 0.0, 1.0)
    ).unwrap();

    let i = Intersection::new(1.0, &arena[s]);
    let comps = PrecomputedHit::new(&r, &i, None, &arena, &cfg);

    assert_eq!(comps.point, Coordinate::point(0.0, 0.0, 1.0));
    assert_eq!(comps.eyev, Coordinate::vector(0.0, 0.0, -1.0));
    assert!(comps.inside);
    // The normal is inverted, since the hit is inside the sphere.
    assert_eq!(comps.normalv, Coordinate::vector(0.0, 0.0, -1.0));
}

#[test]
fn precompute_over_point() {
    let cfg: RenderConfig = Default::default();
    let mut arena = ShapeArena::new();
    let mut s = Shape::sphere();
    s.set_transform(crate::matrix::Matrix::translation(0.0, 0.0, 1.0)).unwrap();
    let s = arena.add(s);

    let r = Ray::new(
        Coordinate::point(0.0, 0.0, -5.0),
        Coordinate::vector(0.0, 0.0, 1.0)
    ).unwrap();

    let i = Intersection::new(5.0, &arena[s]);
    let comps = PrecomputedHit::new(&r, &i, None, &arena, &cfg);

    assert!(comps.over_point.z < -cfg.epsilon / 2.0);
    assert!(comps.point.z > comps.over_point.z);
}

#[test]
fn precompute_under_point() {
    let cfg: RenderConfig = Default::default();
    let mut arena = ShapeArena::new();
    let mut s = Shape::sphere();
    s.set_transform(crate::matrix::Matrix::translation(0.0, 0.0, 1.0)).unwrap();
    let s = arena.add(s);

    let r = Ray::new(
        Coordinate::point(0.0, 0.0, -5.0),
        Coordinate::vector(0.0, 0.0, 1.0)
    ).unwrap();

    let i = Intersection::new(5.0, &arena[s]);
    let is = Intersections { intersections: vec![i] };
    let comps = PrecomputedHit::new(&r, &i, Some(&is), &arena, &cfg);

    assert!(comps.under_point.z > cfg.epsilon / 2.0);
    assert!(comps.point.z < comps.under_point.z);
}

#[test]
fn precompute_reflectv() {
    let cfg: RenderConfig = Default::default();
    let mut arena = ShapeArena::new();
    let p = arena.add(Shape::plane());

    let sq2 = 2.0f64.sqrt();
    let r = Ray::new(
        Coordinate::point(0.0, 1.0, -1.0),
        Coordinate::vector(0.0, -sq2 / 2.0, sq2 / 2.0)
    ).unwrap();

    let i = Intersection::new(sq2, &arena[p]);
    let comps = PrecomputedHit::new(&r, &i, None, &arena, &cfg);

    assert_eq!(comps.reflectv, Coordinate::vector(0.0, sq2 / 2.0, sq2 / 2.0));
}

#[test]
fn refraction_indices_nested_glass() {
    use crate::matrix::Matrix;

    let cfg: RenderConfig = Default::default();
    let mut arena = ShapeArena::new();

    // A large glass sphere with two smaller spheres inside it, overlapping
    // along the ray's path.
    let a = glass_sphere(&mut arena);
    arena[a].set_transform(Matrix::scaling(2.0, 2.0, 2.0)).unwrap();

    let b = glass_sphere(&mut arena);
    arena[b].set_transform(Matrix::translation(0.0, 0.0, -0.25)).unwrap();
    if let Some(m) = arena[b].material_mut() {
        m.refractive_index = 2.0;
    }

    let c = glass_sphere(&mut arena);
    arena[c].set_transform(Matrix::translation(0.0, 0.0, 0.25)).unwrap();
    if let Some(m) = arena[c].material_mut() {
        m.refractive_index = 2.5;
    }

    let r = Ray::new(
        Coordinate::point(0.0, 0.0, -4.0),
        Coordinate::vector(0.0, 0.0, 1.0)
    ).unwrap();

    let is = Intersections {
        intersections: vec![
            Intersection::new(2.00, &arena[a]),
            Intersection::new(2.75, &arena[b]),
            Intersection::new(3.25, &arena[c]),
            Intersection::new(4.75, &arena[b]),
            Intersection::new(5.25, &arena[c]),
            Intersection::new(6.00, &arena[a]),
        ]
    };

    let expected = [
        (1.0, 1.5),
        (1.5, 2.0),
        (2.0, 2.5),
        (2.5, 2.5),
        (2.5, 1.5),
        (1.5, 1.0),
    ];

    for (index, (n1, n2)) in expected.iter().enumerate() {
        let comps = PrecomputedHit::new(
            &r, &is.intersections[index], Some(&is), &arena, &cfg
        );

        assert_eq!(comps.n1, *n1, "n1 at index {}", index);
        assert_eq!(comps.n2, *n2, "n2 at index {}", index);
    }
}

#[test]
fn schlick_total_internal_reflection() {
    let cfg: RenderConfig = Default::default();
    let mut arena = ShapeArena::new();
    let s = glass_sphere(&mut arena);

    let sq2 = 2.0f64.sqrt();
    let r = Ray::new(
        Coordinate::point(0.0, 0.0, sq2 / 2.0),
        Coordinate::vector(0.0, 1.0, 0.0)
    ).unwrap();

    let is = Intersections {
        intersections: vec![
            Intersection::new(-sq2 / 2.0, &arena[s]),
            Intersection::new(sq2 / 2.0, &arena[s]),
        ]
    };

    let comps = PrecomputedHit::new(
        &r, &is.intersections[1], Some(&is), &arena, &cfg
    );

    assert_eq!(comps.schlick(), 1.0);
}

#[test]
fn schlick_perpendicular_ray() {
    use crate::feq;

    let cfg: RenderConfig = Default::default();
    let mut arena = ShapeArena::new();
    let s = glass_sphere(&mut arena);

    let r = Ray::new(
        Coordinate::point(0.0, 0.0, 0.0),
        Coordinate::vector(0.0, 1.0, 0.0)
    ).unwrap();

    let is = Intersections {
        intersections: vec![
            Intersection::new(-1.0, &arena[s]),
            Intersection::new(1.0, &arena[s]),
        ]
    };

    let comps = PrecomputedHit::new(
        &r, &is.intersections[1], Some(&is), &arena, &cfg
    );

    assert!(feq(comps.schlick(), 0.04));
}

#[test]
fn schlick_small_angle() {
    use crate::feq;

    let cfg: RenderConfig = Default::default();
    let mut arena = ShapeArena::new();
    let s = glass_sphere(&mut arena);

    let r = Ray::new(
        Coordinate::point(0.0, 0.99, -2.0),
        Coordinate::vector(0.0, 0.0, 1.0)
    ).unwrap();

    let is = Intersections {
        intersections: vec![
            Intersection::new(1.8589, &arena[s]),
        ]
    };

    let comps = PrecomputedHit::new(
        &r, &is.intersections[0], Some(&is), &arena, &cfg
    );

    assert!(feq(comps.schlick(), 0.48873));
}
