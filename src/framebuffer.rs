use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

use anyhow::{ anyhow, Context, Result };

/// The output raster.
///
/// Pixels are packed opaque ARGB (`0xFFRRGGBB`), stored row by row. The size
/// is fixed at creation; rendering only ever writes into it.
///
/// Writes are bounds-checked and out-of-bounds pixels are silently dropped,
/// so callers can write blocks hanging over the edge without clipping them
/// first.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Framebuffer {
    /// The width of the framebuffer, in pixels.
    pub width: usize,

    /// The height of the framebuffer, in pixels.
    pub height: usize,

    pixels: Vec<u32>,
}

impl Framebuffer {
    /// Creates a framebuffer filled with one pixel value.
    ///
    /// # Panics
    ///
    /// If `width * height` overflows. Use `try_new` for sizes that come from
    /// user input.
    pub fn new(width: usize, height: usize, fill: u32) -> Framebuffer {
        match Framebuffer::try_new(width, height, fill) {
            Ok(fb) => fb,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a framebuffer filled with one pixel value, or fails if the
    /// pixel count does not fit in a `usize`.
    pub fn try_new(width: usize, height: usize, fill: u32) -> Result<Framebuffer> {
        let count = width.checked_mul(height)
            .ok_or_else(|| anyhow!("Framebuffer size {}x{} is too large", width, height))?;

        Ok(Framebuffer {
            width,
            height,
            pixels: vec![fill; count]
        })
    }

    /// Overwrites every pixel.
    pub fn clear(&mut self, pixel: u32) {
        for p in self.pixels.iter_mut() {
            *p = pixel;
        }
    }

    /// Writes a pixel at column `x`, row `y`.
    ///
    /// Out-of-bounds pixels are ignored.
    ///
    /// ```
    /// # use raytracer::framebuffer::Framebuffer;
    /// let mut fb = Framebuffer::new(8, 8, 0xFF000000);
    /// fb.write_pixel(4, 2, 0xFFFF00FF);
    /// fb.write_pixel(8, 2, 0xFFFFFFFF);
    /// assert_eq!(fb.read_pixel(4, 2), Some(0xFFFF00FF));
    /// assert_eq!(fb.read_pixel(8, 2), None);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: u32) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel;
    }

    /// Writes a `size` by `size` block whose top left corner is `(x, y)`.
    ///
    /// Parts of the block outside the framebuffer are dropped.
    pub fn fill_block(&mut self, x: usize, y: usize, size: usize, pixel: u32) {
        for row in y..y + size {
            for col in x..x + size {
                self.write_pixel(col, row, pixel);
            }
        }
    }

    /// Reads the pixel at column `x`, row `y`, or `None` if out of bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// All pixels, row-major, for handing to a display surface.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Saves the framebuffer to a PPM file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);

        self.write_ppm(&mut out)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        out.flush()?;

        Ok(())
    }

    /// Writes the framebuffer as a plain PPM image.
    ///
    /// Lines are kept within 70 columns; a color that would cross the mark
    /// moves to the next line. The alpha lane is dropped.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        let mut col = 0;
        for pixel in self.pixels.iter() {
            for shift in [16, 8, 0].iter() {
                let lane = ((pixel >> shift) & 0xFF).to_string();

                if col != 0 && col + 1 + lane.len() > 70 {
                    writeln!(out)?;
                    col = 0;
                }

                if col != 0 {
                    write!(out, " ")?;
                    col += 1;
                }

                write!(out, "{}", lane)?;
                col += lane.len();
            }
        }

        writeln!(out)?;
        Ok(())
    }
}

#[test]
fn new_framebuffer_is_filled() {
    let fb = Framebuffer::new(10, 20, 0xFF123456);

    assert_eq!(fb.pixels().len(), 200);
    assert!(fb.pixels().iter().all(|p| *p == 0xFF123456));
}

#[test]
fn oversized_framebuffer_is_an_error() {
    let err = Framebuffer::try_new(usize::MAX, 2, 0).unwrap_err();
    assert!(err.to_string().contains("too large"));

    assert_eq!(Framebuffer::try_new(0, usize::MAX, 0).unwrap().pixels().len(), 0);
}

#[test]
#[should_panic]
fn new_panics_on_overflowing_size() {
    Framebuffer::new(2, usize::MAX, 0);
}

#[test]
fn clear_overwrites_everything() {
    let mut fb = Framebuffer::new(4, 4, 0xFF000000);
    fb.write_pixel(1, 1, 0xFFFFFFFF);
    fb.clear(0xFF00FF00);

    assert!(fb.pixels().iter().all(|p| *p == 0xFF00FF00));
}

#[test]
fn write_is_row_major() {
    let mut fb = Framebuffer::new(3, 2, 0);
    fb.write_pixel(2, 1, 7);

    assert_eq!(fb.pixels()[5], 7);
}

#[test]
fn out_of_bounds_writes_are_dropped() {
    let mut fb = Framebuffer::new(4, 3, 0);
    fb.write_pixel(4, 0, 1);
    fb.write_pixel(0, 3, 1);
    fb.write_pixel(usize::MAX, usize::MAX, 1);

    assert!(fb.pixels().iter().all(|p| *p == 0));
}

#[test]
fn block_is_clipped_at_edges() {
    let mut fb = Framebuffer::new(5, 5, 0);
    fb.fill_block(3, 3, 4, 9);

    let written = fb.pixels().iter().filter(|p| **p == 9).count();
    assert_eq!(written, 4);
    assert_eq!(fb.read_pixel(4, 4), Some(9));
    assert_eq!(fb.read_pixel(2, 4), Some(0));
}

#[test]
fn ppm_header_and_pixels() {
    let mut fb = Framebuffer::new(2, 1, 0xFF000000);
    fb.write_pixel(1, 0, 0xFFFF8001);

    let mut out = Vec::new();
    fb.write_ppm(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "P3\n2 1\n255\n0 0 0 255 128 1\n");
}

#[test]
fn ppm_lines_stay_within_70_columns() {
    let fb = Framebuffer::new(10, 2, 0xFFFFFFFF);

    let mut out = Vec::new();
    fb.write_ppm(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    for line in text.lines() {
        assert!(line.len() <= 70);
    }

    let values = text.lines().skip(3)
        .flat_map(|l| l.split_whitespace())
        .count();
    assert_eq!(values, 60);
}
