use crate::ray::Ray;
use crate::coord::Coordinate;
use crate::matrix::Matrix;
use crate::world::World;
use crate::canvas::{ Canvas, Pixel };
use crate::config::RenderConfig;
use crate::error::TraceError;

/// A camera record for generating a canvas.
///
/// This record gives a "frame" of the world. Based on camera parameters,
/// different perspectives can be produced. The camera's view transform is
/// validated and inverted once at construction; every generated ray reuses
/// the cached inverse.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    pub hsize: usize,

    /// The vertical size of the resultant canvas.
    pub vsize: usize,

    pub half_width: f64,
    pub half_height: f64,
    pub pixel_size: f64,

    /// The angle describing "how much" the camera can see.
    pub field_of_view: f64,

    /// A matrix describing how the world should be oriented relative to the
    /// camera (typically a view transformation).
    transform: Matrix,
    inverse_transform: Matrix,
}

impl Camera {
    /// Creates a camera.
    ///
    /// Fails with `TraceError::InvalidTransform` when `transform` is not an
    /// invertible 4x4 matrix.
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64,
        transform: Matrix) -> Result<Camera, TraceError> {
        let half_view = (field_of_view / 2.0).tan();
        let aspect = (hsize as f64) / (vsize as f64);

        let half_width: f64;
        let half_height: f64;

        if aspect >= 1.0 {
            half_width = half_view;
            half_height = half_view / aspect;
        } else {
            half_width = half_view * aspect;
            half_height = half_view;
        }

        let pixel_size = half_width * 2.0 / (hsize as f64);

        let mut camera = Camera {
            hsize,
            vsize,
            half_width,
            half_height,
            pixel_size,
            field_of_view,
            transform: Matrix::identity(4),
            inverse_transform: Matrix::identity(4),
        };
        camera.set_transform(transform)?;

        Ok(camera)
    }

    pub fn transform(&self) -> &Matrix {
        &self.transform
    }

    pub fn inverse_transform(&self) -> &Matrix {
        &self.inverse_transform
    }

    /// Replaces the camera's view transform, re-caching its inverse.
    pub fn set_transform(&mut self, transform: Matrix)
        -> Result<(), TraceError> {
        if transform.rows() != 4 || transform.cols() != 4 {
            return Err(TraceError::InvalidTransform);
        }

        self.inverse_transform = transform.inverse()
            .map_err(|_| TraceError::InvalidTransform)?;
        self.transform = transform;

        Ok(())
    }

    /// The ray through the center of pixel `(px, py)` on the canvas.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        // Offsets from the edge of the canvas to the pixel's center
        let xoffset = (px as f64 + 0.5) * self.pixel_size;
        let yoffset = (py as f64 + 0.5) * self.pixel_size;

        // The untransformed coordinates of the pixel in world space
        let world_x = self.half_width - xoffset;
        let world_y = self.half_height - yoffset;

        // Using the camera matrix, transform the canvas point and origin,
        // computing the ray's direction vector
        let pixel = &self.inverse_transform
            * Coordinate::point(world_x, world_y, -1.0);
        let origin = &self.inverse_transform
            * Coordinate::point(0.0, 0.0, 0.0);
        let direction = (pixel - origin).normalize();

        Ray { origin, direction }
    }

    /// Renders the world to a canvas, one pixel at a time.
    pub fn render(&self, w: &World, cfg: &RenderConfig) -> Canvas {
        let mut image = Canvas::new(self.hsize, self.vsize);

        for y in 0..self.vsize {
            for x in 0..self.hsize {
                let ray = self.ray_for_pixel(x, y);
                let color = w.color_at(&ray, cfg, cfg.max_depth);
                image.write_pixel(x, y, Pixel::from(color));
            }
        }

        image
    }
}

/* Tests */
