use crate::coord::Coordinate;
use crate::matrix::Matrix;
use crate::error::TraceError;

/// A ray with a point of origin and a direction vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Coordinate,
    pub direction: Coordinate,
}

impl Ray {
    /// Creates a new `Ray`.
    ///
    /// The origin must be a point (`w == 1.0`) and the direction must be a
    /// vector (`w == 0.0`); anything else is rejected. Crate-internal code
    /// that derives rays from known points and vectors builds them with a
    /// struct literal instead.
    pub fn new(origin: Coordinate, direction: Coordinate)
        -> Result<Ray, TraceError> {
        if !origin.is_point() {
            return Err(TraceError::NonPointOrigin(origin.w));
        }

        if !direction.is_vector() {
            return Err(TraceError::NonVectorDirection(direction.w));
        }

        Ok(Ray { origin, direction })
    }

    /// The point along the ray at distance `t` from its origin.
    pub fn position(&self, t: f64) -> Coordinate {
        self.origin + (t * self.direction)
    }

    pub fn transform(&self, m: &Matrix) -> Ray {
        Ray {
            origin: m * self.origin,
            direction: m * self.direction,
        }
    }
}

/* Tests */

#[test]
fn ray_position() {
    let r = Ray::new(
                Coordinate::point(2.0, 3.0, 4.0),
                Coordinate::vector(1.0, 0.0, 0.0)
            ).unwrap();

    assert_eq!(r.position(0.0), Coordinate::point(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Coordinate::point(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Coordinate::point(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Coordinate::point(4.5, 3.0, 4.0));
}

#[test]
fn ray_rejects_vector_origin() {
    let r = Ray::new(
                Coordinate::vector(2.0, 3.0, 4.0),
                Coordinate::vector(1.0, 0.0, 0.0)
            );

    assert_eq!(r, Err(TraceError::NonPointOrigin(0.0)));
}

#[test]
fn ray_rejects_point_direction() {
    let r = Ray::new(
                Coordinate::point(2.0, 3.0, 4.0),
                Coordinate::point(1.0, 0.0, 0.0)
            );

    assert_eq!(r, Err(TraceError::NonVectorDirection(1.0)));
}

#[test]
fn ray_translation() {
    let r = Ray::new(
                Coordinate::point(1.0, 2.0, 3.0),
                Coordinate::vector(0.0, 1.0, 0.0)
            ).unwrap();
    let m = Matrix::translation(3.0, 4.0, 5.0);
    let t = r.transform(&m);

    assert_eq!(t.origin, Coordinate::point(4.0, 6.0, 8.0));
    assert_eq!(t.direction, Coordinate::vector(0.0, 1.0, 0.0));
}

#[test]
fn ray_scaling() {
    let r = Ray::new(
                Coordinate::point(1.0, 2.0, 3.0),
                Coordinate::vector(0.0, 1.0, 0.0)
            ).unwrap();
    let m = Matrix::scaling(2.0, 3.0, 4.0);
    let t = r.transform(&m);

    assert_eq!(t.origin, Coordinate::point(2.0, 6.0, 12.0));
    assert_eq!(t.direction, Coordinate::vector(0.0, 3.0, 0.0));
}
