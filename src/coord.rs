use std::ops::{ Add, Sub, Neg, Mul, Div };

use crate::feq;

/// A 4-component coordinate.
///
/// The `w` component tags the coordinate's role: `w == 1.0` marks a point in
/// space, `w == 0.0` marks a free vector. All arithmetic is component-wise,
/// including `w`, so the tagging falls out of the algebra naturally
/// (point − point yields `w == 0.0`, a vector; point + vector yields a point).
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Coordinate) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z) &&
            feq(self.w, other.w)
    }
}

impl Coordinate {
    pub fn tuple(x: f64, y: f64, z: f64, w: f64) -> Coordinate {
        Coordinate { x, y, z, w }
    }

    /// Creates a point (`w == 1.0`).
    pub fn point(x: f64, y: f64, z: f64) -> Coordinate {
        Coordinate { x, y, z, w: 1.0 }
    }

    /// Creates a vector (`w == 0.0`).
    pub fn vector(x: f64, y: f64, z: f64) -> Coordinate {
        Coordinate { x, y, z, w: 0.0 }
    }

    pub fn is_point(&self) -> bool {
        self.w == 1.0
    }

    pub fn is_vector(&self) -> bool {
        self.w == 0.0
    }

    pub fn magnitude(&self) -> f64 {
        f64::sqrt(
            self.x.powi(2)
            + self.y.powi(2)
            + self.z.powi(2)
            + self.w.powi(2)
        )
    }

    /// Scales a coordinate to unit magnitude.
    ///
    /// A zero-magnitude coordinate is returned unchanged; a degenerate input
    /// degrades to a degenerate pixel downstream rather than poisoning the
    /// arithmetic with NaN.
    pub fn normalize(&self) -> Coordinate {
        let mag = self.magnitude();
        if mag == 0.0 {
            return *self;
        }

        *self / mag
    }

    /// Full 4-component dot product. Vectors carry `w == 0.0`, so for vector
    /// operands this matches the 3-component dot product.
    pub fn dot(&self, other: &Coordinate) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
            + self.w * other.w
    }

    /// Cross product over the x/y/z components. Assumes vector operands.
    pub fn cross(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
            w: 0.0,
        }
    }

    /// Reflects a vector across a normal.
    pub fn reflect(&self, normal: &Coordinate) -> Coordinate {
        *self - (*normal * 2.0 * self.dot(normal))
    }
}

impl Add for Coordinate {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
            w: self.w + other.w,
        }
    }
}

impl Sub for Coordinate {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            w: self.w - other.w,
        }
    }
}

impl Neg for Coordinate {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w,
        }
    }
}

impl Mul<f64> for Coordinate {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
            w: self.w * other,
        }
    }
}

impl Mul<Coordinate> for f64 {
    type Output = Coordinate;

    fn mul(self, other: Coordinate) -> Coordinate {
        other * self
    }
}

impl Div<f64> for Coordinate {
    type Output = Self;

    fn div(self, other: f64) -> Self {
        Self {
            x: self.x / other,
            y: self.y / other,
            z: self.z / other,
            w: self.w / other,
        }
    }
}

/* Tests */

#[test]
fn add_tuples() {
    let a1 = Coordinate::tuple(3.0, -2.0, 5.0, 1.0);
    let a2 = Coordinate::tuple(-2.0, 3.0, 1.0, 0.0);

    assert_eq!(a1 + a2, Coordinate::tuple(1.0, 1.0, 6.0, 1.0));
}

#[test]
fn point_plus_vector_is_point() {
    let p = Coordinate::point(3.0, -2.0, 5.0);
    let v = Coordinate::vector(-2.0, 3.0, 1.0);

    let sum = p + v;
    assert!(sum.is_point());
    assert_eq!(sum, Coordinate::point(1.0, 1.0, 6.0));
}

#[test]
fn point_minus_point_is_vector() {
    let p1 = Coordinate::point(3.0, 2.0, 1.0);
    let p2 = Coordinate::point(5.0, 6.0, 7.0);

    let diff = p1 - p2;
    assert!(diff.is_vector());
    assert_eq!(diff, Coordinate::vector(-2.0, -4.0, -6.0));
}

#[test]
fn vector_plus_vector_is_vector() {
    let v1 = Coordinate::vector(3.0, 2.0, 1.0);
    let v2 = Coordinate::vector(5.0, 6.0, 7.0);

    let sum = v1 + v2;
    assert!(sum.is_vector());
    assert_eq!(sum, Coordinate::vector(8.0, 8.0, 8.0));
}

#[test]
fn sub_vector_from_point() {
    let p = Coordinate::point(3.0, 2.0, 1.0);
    let v = Coordinate::vector(5.0, 6.0, 7.0);

    assert_eq!(p - v, Coordinate::point(-2.0, -4.0, -6.0));
}

#[test]
fn neg_tuple() {
    let a = Coordinate::tuple(1.0, -2.0, 3.0, -4.0);

    assert_eq!(-a, Coordinate::tuple(-1.0, 2.0, -3.0, 4.0));
}

#[test]
fn mul_scalar() {
    let a = Coordinate::tuple(1.0, -2.0, 3.0, -4.0);

    assert_eq!(a * 3.5, Coordinate::tuple(3.5, -7.0, 10.5, -14.0));
    assert_eq!(3.5 * a, Coordinate::tuple(3.5, -7.0, 10.5, -14.0));
}

#[test]
fn div_scalar() {
    let a = Coordinate::tuple(1.0, -2.0, 3.0, -4.0);

    assert_eq!(a / 2.0, Coordinate::tuple(0.5, -1.0, 1.5, -2.0));
}

#[test]
fn magnitude_pos() {
    let v = Coordinate::vector(1.0, 2.0, 3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn magnitude_neg() {
    let v = Coordinate::vector(-1.0, -2.0, -3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_clean() {
    let v = Coordinate::vector(4.0, 0.0, 0.0);

    assert_eq!(v.normalize(), Coordinate::vector(1.0, 0.0, 0.0));
}

#[test]
fn normalize_dirty() {
    let v = Coordinate::vector(1.0, 2.0, 3.0);
    let e = Coordinate::vector(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0),
    );

    assert_eq!(v.normalize(), e);
}

#[test]
fn normalize_has_unit_magnitude() {
    let v = Coordinate::vector(1.0, -2.0, 3.0);

    assert!(feq(v.normalize().magnitude(), 1.0));
    assert_eq!(v.normalize().normalize(), v.normalize());
}

#[test]
fn normalize_zero_vector_is_unchanged() {
    let v = Coordinate::vector(0.0, 0.0, 0.0);

    assert_eq!(v.normalize(), v);
}

#[test]
fn dot_vectors() {
    let a = Coordinate::vector(1.0, 2.0, 3.0);
    let b = Coordinate::vector(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Coordinate::vector(1.0, 2.0, 3.0);
    let b = Coordinate::vector(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Coordinate::vector(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Coordinate::vector(1.0, -2.0, 1.0));
}

#[test]
fn reflect_45() {
    let v = Coordinate::vector(1.0, -1.0, 0.0);
    let n = Coordinate::vector(0.0, 1.0, 0.0);

    assert_eq!(v.reflect(&n), Coordinate::vector(1.0, 1.0, 0.0));
}

#[test]
fn reflect_slanted() {
    let v = Coordinate::vector(0.0, -1.0, 0.0);
    let n = Coordinate::vector(
        2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0, 0.0
    );

    assert_eq!(v.reflect(&n), Coordinate::vector(1.0, 0.0, 0.0));
}
