use std::convert::From;

use crate::color::Color;

/// A display-ready pixel with 8-bit channels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Quantizes a floating-point `Color` to an 8-bit `Pixel`.
///
/// Each channel is scaled by 255, rounded to the nearest integer and clamped
/// to the `[0, 255]` range. Out-of-gamut colors saturate rather than wrap.
impl From<Color> for Pixel {
    fn from(c: Color) -> Pixel {
        Pixel {
            r: (c.r * 255.0).round().clamp(0.0, 255.0) as u8,
            g: (c.g * 255.0).round().clamp(0.0, 255.0) as u8,
            b: (c.b * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }
}

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray tracer. Once the user
/// specifies the desired image width and height, the `Camera` generates rays
/// which are cast into a `World`, and the resulting colors land here as
/// quantized `Pixel`s. All pixels start black.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Pixel>,
}

impl Canvas {
    /// Creates a new canvas with specified width and height.
    ///
    /// This function allocates a `Vec<Pixel>` of size `width * height`, which
    /// may take up a decent amount of memory, depending on image size.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Pixel::default(); width * height]
        }
    }

    /// Writes a pixel to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in row-column
    /// order, where `y` is the row of the pixel, and `x` is the column. Rows
    /// and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use lumiray::color::Color;
    /// # use lumiray::canvas::{ Canvas, Pixel };
    /// let purple = Pixel::from(Color::rgb(1.0, 0.0, 1.0));
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: Pixel) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel;
    }

    /// Reads a pixel from a location on the `Canvas`.
    ///
    /// Pixels are specified in row-column order, where `y` is the row of the
    /// pixel, and `x` is the column. Rows and columns are zero-indexed. If
    /// the specified pixel location is out-of-bounds, `None` is returned by
    /// this function.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }
}

/* Tests */

#[test]
fn canvas_starts_black() {
    let canvas = Canvas::new(10, 20);

    assert_eq!(canvas.width, 10);
    assert_eq!(canvas.height, 20);
    for y in 0..20 {
        for x in 0..10 {
            assert_eq!(canvas.read_pixel(x, y).unwrap(),
                Pixel { r: 0, g: 0, b: 0 });
        }
    }
}

#[test]
fn write_and_read_pixel() {
    let red = Pixel::from(Color::rgb(1.0, 0.0, 0.0));
    let mut canvas = Canvas::new(10, 20);

    canvas.write_pixel(2, 3, red);
    assert_eq!(canvas.read_pixel(2, 3), Some(red));
}

#[test]
fn out_of_bounds_pixels() {
    let red = Pixel::from(Color::rgb(1.0, 0.0, 0.0));
    let mut canvas = Canvas::new(4, 4);

    canvas.write_pixel(4, 0, red);
    canvas.write_pixel(0, 4, red);
    assert_eq!(canvas.read_pixel(4, 0), None);
    assert_eq!(canvas.read_pixel(0, 4), None);
    assert_eq!(canvas.read_pixel(3, 3), Some(Pixel::default()));
}

#[test]
fn quantize_color() {
    assert_eq!(Pixel::from(Color::rgb(0.0, 0.5, 1.0)),
        Pixel { r: 0, g: 128, b: 255 });
}

#[test]
fn quantize_saturates_out_of_gamut() {
    assert_eq!(Pixel::from(Color::rgb(-0.5, 1.5, 2.0)),
        Pixel { r: 0, g: 255, b: 255 });
}
