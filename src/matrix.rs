use std::fmt;
use std::ops::{ Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::coord::Coordinate;
use crate::error::TraceError;

/// A dense, row-major matrix of arbitrary dimensions.
///
/// Most matrices in the ray tracer are 4x4 transforms, but the type is kept
/// general so that column vectors (4x1) and the smaller submatrices produced
/// during determinant expansion are the same type. Operations whose validity
/// depends on dimensions (`multiply`, `determinant`, `inverse`) return a
/// `Result` rather than assuming their operands line up.
///
/// # Examples
///
/// Creating an identity matrix:
///
/// ```
/// # #![allow(unused)]
/// # use lumiray::matrix::Matrix;
/// let mat = Matrix::identity(4);
/// assert_eq!(mat.determinant().unwrap(), 1.0);
/// ```
///
/// Calculating a view transformation (for cameras, etc.):
///
/// ```
/// # #![allow(unused)]
/// # use lumiray::coord::Coordinate;
/// # use lumiray::matrix::Matrix;
/// let from = Coordinate::point(0.0, 0.0, 0.0);
/// let to = Coordinate::point(0.0, 0.0, 5.0);
/// let up = Coordinate::vector(0.0, 1.0, 0.0);
/// let view = Matrix::view_transform(from, to, up);
/// ```
#[derive(Clone, Debug, Default, PartialOrd)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// Determines whether two `Matrix` instances are equal.
///
/// Matrices of different dimensions are never equal. Same-dimension matrices
/// are compared element-wise; equality is approximate, as elements are
/// floating point numbers.
impl PartialEq for Matrix {
    fn eq(&self, other: &Matrix) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.data.iter().zip(other.data.iter()).all(|(x, y)| feq(*x, *y))
    }
}

impl Matrix {
    /// Creates a new `Matrix`. All elements are initialized to `0.0`.
    pub fn new(rows: usize, cols: usize) -> Matrix {
        Matrix { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Instantiates an `n` by `n` identity matrix.
    pub fn identity(n: usize) -> Matrix {
        let mut buf = Matrix::new(n, n);
        for i in 0..n {
            buf[(i, i)] = 1.0;
        }

        buf
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Instantiates a 4x4 translation matrix.
    ///
    /// This matrix offsets a point by `x`, `y` and `z`.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix {
        let mut trans = Self::identity(4);
        trans[(0, 3)] = x;
        trans[(1, 3)] = y;
        trans[(2, 3)] = z;

        trans
    }

    /// Instantiates a 4x4 scaling matrix.
    ///
    /// This matrix scales vectors or points by `x`, `y` and `z` along the X, Y
    /// and Z axes, respectively.
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix {
        let mut scale = Self::identity(4);
        scale[(0, 0)] = x;
        scale[(1, 1)] = y;
        scale[(2, 2)] = z;

        scale
    }

    /// Instantiates a 4x4 rotation matrix, rotating about the X axis.
    ///
    /// Rotations occur clockwise. Assumes that parameter `r` is in radians.
    pub fn rotation_x(r: f64) -> Matrix {
        let mut rotate = Self::identity(4);
        rotate[(1, 1)] =  r.cos();
        rotate[(1, 2)] = -r.sin();
        rotate[(2, 1)] =  r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Instantiates a 4x4 rotation matrix, rotating about the Y axis.
    ///
    /// Rotations occur clockwise. Assumes that parameter `r` is in radians.
    pub fn rotation_y(r: f64) -> Matrix {
        let mut rotate = Self::identity(4);
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 2)] =  r.sin();
        rotate[(2, 0)] = -r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Instantiates a 4x4 rotation matrix, rotating about the Z axis.
    ///
    /// Rotations occur clockwise. Assumes that parameter `r` is in radians.
    pub fn rotation_z(r: f64) -> Matrix {
        let mut rotate = Self::identity(4);
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 1)] = -r.sin();
        rotate[(1, 0)] =  r.sin();
        rotate[(1, 1)] =  r.cos();

        rotate
    }

    /// Instantiates a 4x4 shearing matrix.
    ///
    /// Each parameter names the axis being sheared and the axis it is sheared
    /// in proportion to; `xy` moves `x` in proportion to `y`, and so on.
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64)
        -> Matrix {
        let mut shear = Self::identity(4);
        shear[(0, 1)] = xy;
        shear[(0, 2)] = xz;
        shear[(1, 0)] = yx;
        shear[(1, 2)] = yz;
        shear[(2, 0)] = zx;
        shear[(2, 1)] = zy;

        shear
    }

    /// Generates a view transformation.
    ///
    /// The view transform manipulates the world from the perspective of an eye.
    /// The `from` parameter is where the eye is, the `to` parameter is where
    /// the eye is looking, and the `up` parameter indicates where "up" is in
    /// the world.
    ///
    /// A "default" orientation fixes the eye at the origin, looking at a screen
    /// one unit "deep." The `up` vector points conventionally up, with `y=1`.
    ///
    /// Note that the view transformation moves the *world* with respect to the
    /// eye, not the other way around.
    pub fn view_transform(from: Coordinate, to: Coordinate, up: Coordinate)
        -> Matrix {
        let forward = (to - from).normalize();
        let left = forward.cross(&up.normalize());
        let true_up = left.cross(&forward);

        let mut orientation = Matrix::identity(4);
        orientation[(0, 0)] = left.x;
        orientation[(0, 1)] = left.y;
        orientation[(0, 2)] = left.z;

        orientation[(1, 0)] = true_up.x;
        orientation[(1, 1)] = true_up.y;
        orientation[(1, 2)] = true_up.z;

        orientation[(2, 0)] = -forward.x;
        orientation[(2, 1)] = -forward.y;
        orientation[(2, 2)] = -forward.z;

        orientation.mul4(&Matrix::translation(-from.x, -from.y, -from.z))
    }

    /// Folds a list of 4x4 transforms into a single transform.
    ///
    /// Transforms are listed outermost-first; the last transform in the slice
    /// is the one applied to the object first. An empty slice folds to the
    /// identity.
    pub fn compose(transforms: &[Matrix]) -> Result<Matrix, TraceError> {
        let mut combined = Matrix::identity(4);
        for transform in transforms {
            combined = combined.multiply(transform)?;
        }

        Ok(combined)
    }

    /// Multiplies two matrices of known-compatible 4x4 dimensions.
    ///
    /// Used by the transform builders, which only ever produce 4x4 matrices.
    fn mul4(&self, other: &Matrix) -> Matrix {
        debug_assert!(self.rows == 4 && self.cols == 4);
        debug_assert!(other.rows == 4 && other.cols == 4);

        let mut res = Matrix::new(4, 4);
        for r in 0..4 {
            for c in 0..4 {
                res[(r, c)] = self[(r, 0)] * other[(0, c)]
                    + self[(r, 1)] * other[(1, c)]
                    + self[(r, 2)] * other[(2, c)]
                    + self[(r, 3)] * other[(3, c)];
            }
        }

        res
    }

    /// Multiplies two matrices.
    ///
    /// The left operand's column count must match the right operand's row
    /// count; otherwise a `DimensionMismatch` error is returned. Note that
    /// matrix multiplication is not commutative.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, TraceError> {
        if self.cols != other.rows {
            return Err(TraceError::DimensionMismatch(
                self.rows, self.cols, other.rows, other.cols
            ));
        }

        let mut res = Matrix::new(self.rows, other.cols);
        for r in 0..self.rows {
            for c in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self[(r, k)] * other[(k, c)];
                }

                res[(r, c)] = sum;
            }
        }

        Ok(res)
    }

    /// Produces the transpose of a matrix, returning a new matrix as a result.
    pub fn transposition(&self) -> Matrix {
        let mut buf = Matrix::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                buf[(c, r)] = self[(r, c)];
            }
        }

        buf
    }

    /// Returns the submatrix of a `Matrix`.
    ///
    /// A submatrix can be thought of as a matrix which "eliminates" a row and
    /// column of a larger matrix. For example, given the following 3x3 matrix:
    ///
    /// ```text
    /// [
    ///     1.0, 0.0, 2.0,
    ///     3.0, 1.0, 0.0,
    ///     1.0, 1.0, 1.0
    /// ]
    /// ```
    ///
    /// The corresponding submatrix for `row == 1`, `col == 2` (assuming zero
    /// index), would be a 2x2 matrix:
    ///
    /// ```text
    /// [
    ///     1.0, 0.0,
    ///     1.0, 1.0
    /// ]
    /// ```
    pub fn submatrix(&self, row: usize, col: usize) -> Matrix {
        let mut buf = Matrix::new(self.rows - 1, self.cols - 1);
        let mut count = 0;

        for r in 0..self.rows {
            for c in 0..self.cols {
                if !(r == row || c == col) {
                    buf.data[count] = self[(r, c)];
                    count += 1;
                }
            }
        }

        buf
    }

    /// Returns the minor of a `Matrix` at row and column.
    ///
    /// The "minor" is the determinant of the submatrix at `row` and `col`. See
    /// the documentation for `submatrix` for what this means.
    pub fn minor(&self, row: usize, col: usize) -> Result<f64, TraceError> {
        self.submatrix(row, col).determinant()
    }

    /// Returns the cofactor of a `Matrix` at row and column.
    ///
    /// The "cofactor" is the minor of a matrix, negated according to the
    /// "cofactor matrix." Basically, if the sum of row and column is even,
    /// the minor remains positive; if the sum is odd, the minor is negated.
    pub fn cofactor(&self, row: usize, col: usize) -> Result<f64, TraceError> {
        let m = self.minor(row, col)?;
        Ok(m * if (row + col) % 2 == 0 { 1.0 } else { -1.0 })
    }

    /// Calculates the determinant of a square `Matrix`.
    ///
    /// Non-square matrices produce a `NotSquare` error. The determinant of a
    /// 0x0 matrix is `1.0` (the empty product), which also terminates the
    /// cofactor recursion.
    pub fn determinant(&self) -> Result<f64, TraceError> {
        if !self.is_square() {
            return Err(TraceError::NotSquare(self.rows, self.cols));
        }

        match self.rows {
            0 => Ok(1.0),
            1 => Ok(self[(0, 0)]),
            2 => Ok(self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]),
            _ => {
                let mut sum = 0.0;
                for c in 0..self.cols {
                    sum += self[(0, c)] * self.cofactor(0, c)?;
                }

                Ok(sum)
            },
        }
    }

    /// Calculates the inverse of a `Matrix`, if it exists.
    ///
    /// Only square matrices with a nonzero determinant are invertible;
    /// non-square matrices produce a `NotSquare` error and singular matrices
    /// produce a `SingularMatrix` error.
    pub fn inverse(&self) -> Result<Matrix, TraceError> {
        let det = self.determinant()?;
        if det == 0.0 {
            return Err(TraceError::SingularMatrix);
        }

        let mut inv = Matrix::new(self.rows, self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                inv[(c, r)] = self.cofactor(r, c)? / det;
            }
        }

        Ok(inv)
    }

    /// Reinterprets a 4x1 column matrix as a `Coordinate`.
    ///
    /// Returns `None` for any other dimensions. Together with
    /// `From<Coordinate>`, this round-trips exactly.
    pub fn to_coordinate(&self) -> Option<Coordinate> {
        if self.rows != 4 || self.cols != 1 {
            return None;
        }

        Some(Coordinate {
            x: self.data[0],
            y: self.data[1],
            z: self.data[2],
            w: self.data[3],
        })
    }
}

impl From<[f64; 16]> for Matrix {
    fn from(data: [f64; 16]) -> Matrix {
        Matrix { rows: 4, cols: 4, data: data.to_vec() }
    }
}

impl From<[f64; 9]> for Matrix {
    fn from(data: [f64; 9]) -> Matrix {
        Matrix { rows: 3, cols: 3, data: data.to_vec() }
    }
}

impl From<[f64; 4]> for Matrix {
    fn from(data: [f64; 4]) -> Matrix {
        Matrix { rows: 2, cols: 2, data: data.to_vec() }
    }
}

/// Converts a `Coordinate` into a 4x1 column matrix.
impl From<Coordinate> for Matrix {
    fn from(c: Coordinate) -> Matrix {
        Matrix { rows: 4, cols: 1, data: vec![c.x, c.y, c.z, c.w] }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index<'a>(&'a self, index: (usize, usize)) -> &'a f64 {
        &self.data[(index.0 * self.cols) + index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut<'a>(&'a mut self, index: (usize, usize)) -> &'a mut f64 {
        &mut self.data[(index.0 * self.cols) + index.1]
    }
}

/// Multiplication between a matrix and a `Coordinate`.
///
/// Note that `Coordinate`s are multiplied on the right, matching the
/// convention of a 4D vector having 4 rows, 1 column. The matrix operand must
/// be 4x4; every transform attached to a shape, pattern or camera is validated
/// to be an invertible 4x4 before it is stored, so a violation here is a
/// construction bug and panics rather than limping along.
impl Mul<Coordinate> for &Matrix {
    type Output = Coordinate;

    fn mul(self, other: Coordinate) -> Coordinate {
        assert!(self.rows == 4 && self.cols == 4,
            "coordinate transform requires a 4x4 matrix");

        let mut buf: [f64; 4] = Default::default();
        for r in 0..4 {
            buf[r] = self[(r, 0)] * other.x
                + self[(r, 1)] * other.y
                + self[(r, 2)] * other.z
                + self[(r, 3)] * other.w;
        }

        Coordinate { x: buf[0], y: buf[1], z: buf[2], w: buf[3] }
    }
}

impl Mul<Coordinate> for Matrix {
    type Output = Coordinate;

    fn mul(self, other: Coordinate) -> Coordinate {
        &self * other
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            write!(f, "|")?;
            for c in 0..self.cols {
                write!(f, " {} |", self[(r, c)])?;
            }

            // Don't put a newline on the final row (allow the user to do that)
            if r != self.rows - 1 {
                write!(f, "\n")?;
            }
        }

        Ok(())
    }
}

/* Tests */

#[test]
fn identity() {
    let i = Matrix::identity(4);
    let a: Matrix = [ 0.0, 1.0,  2.0,  4.0,
                      1.0, 2.0,  4.0,  8.0,
                      2.0, 4.0,  8.0, 16.0,
                      4.0, 8.0, 16.0, 32.0, ].into();

    assert_eq!(i.multiply(&a).unwrap(), a);
    assert_eq!(a.multiply(&i).unwrap(), a);
}

#[test]
fn multiply_matrices() {
    let a: Matrix = [ 1.0, 2.0, 3.0, 4.0,
                      5.0, 6.0, 7.0, 8.0,
                      9.0, 8.0, 7.0, 6.0,
                      5.0, 4.0, 3.0, 2.0, ].into();

    let b: Matrix = [ -2.0, 1.0, 2.0,  3.0,
                       3.0, 2.0, 1.0, -1.0,
                       4.0, 3.0, 6.0,  5.0,
                       1.0, 2.0, 7.0,  8.0, ].into();

    let e: Matrix = [ 20.0, 22.0,  50.0,  48.0,
                      44.0, 54.0, 114.0, 108.0,
                      40.0, 58.0, 110.0, 102.0,
                      16.0, 26.0,  46.0,  42.0, ].into();

    assert_eq!(a.multiply(&b).unwrap(), e);
}

#[test]
fn multiply_rectangular() {
    let mut a = Matrix::new(2, 3);
    a[(0, 0)] = 1.0; a[(0, 1)] = 2.0; a[(0, 2)] = 3.0;
    a[(1, 0)] = 4.0; a[(1, 1)] = 5.0; a[(1, 2)] = 6.0;

    let mut b = Matrix::new(3, 2);
    b[(0, 0)] = 7.0;  b[(0, 1)] = 8.0;
    b[(1, 0)] = 9.0;  b[(1, 1)] = 10.0;
    b[(2, 0)] = 11.0; b[(2, 1)] = 12.0;

    let mut e = Matrix::new(2, 2);
    e[(0, 0)] = 58.0;  e[(0, 1)] = 64.0;
    e[(1, 0)] = 139.0; e[(1, 1)] = 154.0;

    assert_eq!(a.multiply(&b).unwrap(), e);
}

#[test]
fn multiply_dimension_mismatch() {
    use crate::error::TraceError;

    let a = Matrix::new(2, 3);
    let b = Matrix::new(2, 3);

    assert_eq!(a.multiply(&b), Err(TraceError::DimensionMismatch(2, 3, 2, 3)));
}

#[test]
fn multiply_column_vector() {
    let a: Matrix = [ 1.0, 2.0, 3.0, 4.0,
                      2.0, 4.0, 4.0, 2.0,
                      8.0, 6.0, 4.0, 1.0,
                      0.0, 0.0, 0.0, 1.0, ].into();

    let v = Coordinate::tuple(1.0, 2.0, 3.0, 1.0);
    let col: Matrix = v.into();

    let product = a.multiply(&col).unwrap().to_coordinate().unwrap();
    assert_eq!(product, Coordinate::tuple(18.0, 24.0, 33.0, 1.0));
    assert_eq!(product, &a * v);
}

#[test]
fn coordinate_column_round_trip() {
    let c = Coordinate::tuple(1.5, -2.25, 3.0, 1.0);
    let col: Matrix = c.into();

    assert_eq!(col.rows(), 4);
    assert_eq!(col.cols(), 1);
    assert_eq!(col.to_coordinate(), Some(c));
}

#[test]
fn to_coordinate_wrong_shape() {
    assert_eq!(Matrix::new(4, 4).to_coordinate(), None);
    assert_eq!(Matrix::new(3, 1).to_coordinate(), None);
}

#[test]
fn transpose() {
    let a: Matrix = [ 0.0, 9.0, 3.0, 0.0,
                      9.0, 8.0, 0.0, 8.0,
                      1.0, 8.0, 5.0, 3.0,
                      0.0, 0.0, 5.0, 8.0, ].into();

    let t: Matrix = [ 0.0, 9.0, 1.0, 0.0,
                      9.0, 8.0, 8.0, 0.0,
                      3.0, 0.0, 5.0, 5.0,
                      0.0, 8.0, 3.0, 8.0, ].into();

    assert_eq!(t, a.transposition());
    assert_eq!(t.transposition(), a);
}

#[test]
fn transpose_identity() {
    let i = Matrix::identity(4);
    assert_eq!(i, i.transposition());
}

#[test]
fn transpose_rectangular() {
    let mut a = Matrix::new(2, 3);
    a[(0, 0)] = 1.0; a[(0, 1)] = 2.0; a[(0, 2)] = 3.0;
    a[(1, 0)] = 4.0; a[(1, 1)] = 5.0; a[(1, 2)] = 6.0;

    let t = a.transposition();
    assert_eq!(t.rows(), 3);
    assert_eq!(t.cols(), 2);
    assert_eq!(t[(2, 1)], 6.0);
    assert_eq!(t.transposition(), a);
}

#[test]
fn mat3_submatrix() {
    let a: Matrix = [  1.0, 5.0,  0.0,
                      -3.0, 2.0,  7.0,
                       0.0, 6.0, -3.0, ].into();

    let s: Matrix = [ -3.0, 2.0,
                       0.0, 6.0  ].into();

    assert_eq!(a.submatrix(0, 2), s);
}

#[test]
fn mat4_submatrix() {
    let a: Matrix = [ -6.0, 1.0,  1.0, 6.0,
                      -8.0, 5.0,  8.0, 6.0,
                      -1.0, 0.0,  8.0, 2.0,
                      -7.0, 1.0, -1.0, 1.0, ].into();

    let s: Matrix = [ -6.0,  1.0, 6.0,
                      -8.0,  8.0, 6.0,
                      -7.0, -1.0, 1.0, ].into();

    assert_eq!(a.submatrix(2, 1), s);
}

#[test]
fn mat3_minor() {
    let a: Matrix = [ 3.0,  5.0,  0.0,
                      2.0, -1.0, -7.0,
                      6.0, -1.0,  5.0, ].into();

    assert_eq!(a.minor(1, 0).unwrap(), 25.0);
}

#[test]
fn mat3_cofactor() {
    let a: Matrix = [ 3.0,  5.0,  0.0,
                      2.0, -1.0, -7.0,
                      6.0, -1.0,  5.0, ].into();

    assert_eq!(a.minor(0, 0).unwrap(), -12.0);
    assert_eq!(a.cofactor(0, 0).unwrap(), -12.0);
    assert_eq!(a.minor(1, 0).unwrap(), 25.0);
    assert_eq!(a.cofactor(1, 0).unwrap(), -25.0);
}

#[test]
fn mat3_determinant() {
    let a: Matrix = [  1.0, 2.0,  6.0,
                      -5.0, 8.0, -4.0,
                       2.0, 6.0,  4.0, ].into();

    assert_eq!(a.cofactor(0, 0).unwrap(), 56.0);
    assert_eq!(a.cofactor(0, 1).unwrap(), 12.0);
    assert_eq!(a.cofactor(0, 2).unwrap(), -46.0);
    assert_eq!(a.determinant().unwrap(), -196.0);
}

#[test]
fn mat4_determinant() {
    let a: Matrix = [ -2.0, -8.0,  3.0,  5.0,
                      -3.0,  1.0,  7.0,  3.0,
                       1.0,  2.0, -9.0,  6.0,
                      -6.0,  7.0,  7.0, -9.0, ].into();

    assert_eq!(a.cofactor(0, 0).unwrap(), 690.0);
    assert_eq!(a.cofactor(0, 1).unwrap(), 447.0);
    assert_eq!(a.cofactor(0, 2).unwrap(), 210.0);
    assert_eq!(a.cofactor(0, 3).unwrap(), 51.0);
    assert_eq!(a.determinant().unwrap(), -4071.0);
}

#[test]
fn degenerate_determinants() {
    assert_eq!(Matrix::new(0, 0).determinant().unwrap(), 1.0);

    let mut one = Matrix::new(1, 1);
    one[(0, 0)] = -3.0;
    assert_eq!(one.determinant().unwrap(), -3.0);
}

#[test]
fn determinant_not_square() {
    use crate::error::TraceError;

    assert_eq!(Matrix::new(2, 3).determinant(), Err(TraceError::NotSquare(2, 3)));
}

#[test]
fn mat4_inverse() {
    let a: Matrix = [ -5.0,  2.0,  6.0, -8.0,
                       1.0, -5.0,  1.0,  8.0,
                       7.0,  7.0, -6.0, -7.0,
                       1.0, -3.0,  7.0,  4.0, ].into();

    let i: Matrix = [  0.21805,  0.45113,  0.24060, -0.04511,
                      -0.80827, -1.45677, -0.44361,  0.52068,
                      -0.07895, -0.22368, -0.05263,  0.19737,
                      -0.52256, -0.81391, -0.30075,  0.30639, ].into();

    assert_eq!(a.determinant().unwrap(), 532.0);
    assert_eq!(a.inverse().unwrap(), i);
}

#[test]
fn mat4_inverse_mult() {
    let a: Matrix = [  3.0, -9.0,  7.0,  3.0,
                       3.0,  8.0,  2.0, -9.0,
                      -4.0,  4.0,  4.0,  1.0,
                      -6.0,  5.0, -1.0,  1.0, ].into();

    let b: Matrix = [ 8.0,  2.0, 2.0, 2.0,
                      3.0, -1.0, 7.0, 0.0,
                      7.0,  0.0, 5.0, 4.0,
                      6.0, -2.0, 0.0, 5.0  ].into();

    let c = a.multiply(&b).unwrap();

    assert_eq!(a, c.multiply(&b.inverse().unwrap()).unwrap());
    assert_eq!(a.multiply(&a.inverse().unwrap()).unwrap(), Matrix::identity(4));
}

#[test]
fn singular_inverse() {
    use crate::error::TraceError;

    let a: Matrix = [ -4.0,  2.0, -2.0, -3.0,
                       9.0,  6.0,  2.0,  6.0,
                       0.0, -5.0,  1.0, -5.0,
                       0.0,  0.0,  0.0,  0.0, ].into();

    assert_eq!(a.determinant().unwrap(), 0.0);
    assert_eq!(a.inverse(), Err(TraceError::SingularMatrix));
}

#[test]
fn mat4_translation() {
    let transform = Matrix::translation(5.0, -3.0, 2.0);
    let point = Coordinate::point(-3.0, 4.0, 5.0);

    assert_eq!(&transform * point, Coordinate::point(2.0, 1.0, 7.0));
}

#[test]
fn mat4_translation_inverse() {
    let transform = Matrix::translation(5.0, -3.0, 2.0).inverse().unwrap();
    let point = Coordinate::point(-3.0, 4.0, 5.0);

    assert_eq!(&transform * point, Coordinate::point(-8.0, 7.0, 3.0));
}

#[test]
fn mat4_translation_vector() {
    let transform = Matrix::translation(5.0, -3.0, 2.0);
    let vector = Coordinate::vector(-3.0, 4.0, 5.0);

    assert_eq!(&transform * vector, vector);
}

#[test]
fn mat4_scaling() {
    let transform = Matrix::scaling(2.0, 3.0, 4.0);
    let vector = Coordinate::vector(-4.0, 6.0, 8.0);

    assert_eq!(&transform * vector, Coordinate::vector(-8.0, 18.0, 32.0));
}

#[test]
fn mat4_scaling_inverse() {
    let transform = Matrix::scaling(2.0, 3.0, 4.0).inverse().unwrap();
    let vector = Coordinate::vector(-4.0, 6.0, 8.0);

    assert_eq!(&transform * vector, Coordinate::vector(-2.0, 2.0, 2.0));
}

#[test]
fn mat4_scaling_reflection() {
    let transform = Matrix::scaling(-1.0, 1.0, 1.0);
    let point = Coordinate::point(2.0, 3.0, 4.0);

    assert_eq!(&transform * point, Coordinate::point(-2.0, 3.0, 4.0));
}

#[test]
fn mat4_rotate_x() {
    let half_quarter = Matrix::rotation_x(std::f64::consts::PI / 4.0);
    let full_quarter = Matrix::rotation_x(std::f64::consts::PI / 2.0);
    let point = Coordinate::point(0.0, 1.0, 0.0);

    assert_eq!(&full_quarter * point,
        Coordinate::point(0.0, 0.0, 1.0));
    assert_eq!(&half_quarter * point,
        Coordinate::point(0.0, 2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0));
}

#[test]
fn mat4_rotate_y() {
    let half_quarter = Matrix::rotation_y(std::f64::consts::PI / 4.0);
    let full_quarter = Matrix::rotation_y(std::f64::consts::PI / 2.0);
    let point = Coordinate::point(0.0, 0.0, 1.0);

    assert_eq!(&full_quarter * point,
        Coordinate::point(1.0, 0.0, 0.0));
    assert_eq!(&half_quarter * point,
        Coordinate::point(2.0f64.sqrt() / 2.0, 0.0, 2.0f64.sqrt() / 2.0));
}

#[test]
fn mat4_rotate_z() {
    let half_quarter = Matrix::rotation_z(std::f64::consts::PI / 4.0);
    let full_quarter = Matrix::rotation_z(std::f64::consts::PI / 2.0);
    let point = Coordinate::point(0.0, 1.0, 0.0);

    assert_eq!(&full_quarter * point,
        Coordinate::point(-1.0, 0.0, 0.0));
    assert_eq!(&half_quarter * point,
        Coordinate::point(-2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0, 0.0));
}

#[test]
fn mat4_shear_xy() {
    let transform = Matrix::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    let point = Coordinate::point(2.0, 3.0, 4.0);

    assert_eq!(&transform * point, Coordinate::point(5.0, 3.0, 4.0));
}

#[test]
fn mat4_shear_zy() {
    let transform = Matrix::shearing(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    let point = Coordinate::point(2.0, 3.0, 4.0);

    assert_eq!(&transform * point, Coordinate::point(2.0, 3.0, 7.0));
}

#[test]
fn chained_transforms() {
    let a = Matrix::rotation_x(std::f64::consts::PI / 2.0);
    let b = Matrix::scaling(5.0, 5.0, 5.0);
    let c = Matrix::translation(10.0, 5.0, 7.0);

    let t = Matrix::compose(&[c, b, a]).unwrap();
    let p = Coordinate::point(1.0, 0.0, 1.0);

    assert_eq!(&t * p, Coordinate::point(15.0, 0.0, 7.0));
}

#[test]
fn compose_empty_is_identity() {
    assert_eq!(Matrix::compose(&[]).unwrap(), Matrix::identity(4));
}

#[test]
fn default_view() {
    let from = Coordinate::point(0.0, 0.0, 0.0);
    let to = Coordinate::point(0.0, 0.0, -1.0);
    let up = Coordinate::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix::identity(4), Matrix::view_transform(from, to, up));
}

#[test]
fn positive_z_view() {
    let from = Coordinate::point(0.0, 0.0, 0.0);
    let to = Coordinate::point(0.0, 0.0, 1.0);
    let up = Coordinate::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix::view_transform(from, to, up),
        Matrix::scaling(-1.0, 1.0, -1.0));
}

#[test]
fn view_moves_world() {
    let from = Coordinate::point(0.0, 0.0, 8.0);
    let to = Coordinate::point(0.0, 0.0, 0.0);
    let up = Coordinate::vector(0.0, 1.0, 0.0);

    assert_eq!(Matrix::view_transform(from, to, up),
        Matrix::translation(0.0, 0.0, -8.0));
}

#[test]
fn arbitrary_view() {
    let from = Coordinate::point(1.0, 3.0, 2.0);
    let to = Coordinate::point(4.0, -2.0, 8.0);
    let up = Coordinate::vector(1.0, 1.0, 0.0);

    let a: Matrix = [ -0.50709, 0.50709,  0.67612, -2.36643,
                       0.76772, 0.60609,  0.12122, -2.82843,
                      -0.35857, 0.59761, -0.71714,  0.00000,
                      -0.00000, 0.00000,  0.00000,  1.00000, ].into();

    assert_eq!(Matrix::view_transform(from, to, up), a);
}
