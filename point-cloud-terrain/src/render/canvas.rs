/// Raster drawing surface for plots
use crate::error::{Result, TerrainError};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_polygon_mut,
    draw_text_mut, text_size,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

/// Embedded font data - DejaVu Sans Mono
const FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const GREY: Rgb<u8> = Rgb([200, 200, 200]);

/// Parsed once per process; `None` when the embedded data is unusable
fn font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font = Font::try_from_bytes(FONT_DATA);
        if font.is_none() {
            warn!("Failed to load plot font, labels are skipped");
        }
        font
    })
    .as_ref()
}

/// Pixel width and height of `text` at `size`
pub fn measure_text(size: f32, text: &str) -> (i32, i32) {
    font().map_or((0, 0), |font| text_size(Scale::uniform(size), font, text))
}

/// White RGB image with the handful of primitives the plots need.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), colour: Rgb<u8>) {
        draw_line_segment_mut(&mut self.image, from, to, colour);
    }

    /// Line drawn as parallel one pixel segments
    pub fn thick_line(&mut self, from: (f32, f32), to: (f32, f32), width: i32, colour: Rgb<u8>) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return;
        }
        let (nx, ny) = (-dy / len, dx / len);
        let half = width / 2;
        for k in -half..=half {
            let off = k as f32;
            self.line(
                (from.0 + nx * off, from.1 + ny * off),
                (to.0 + nx * off, to.1 + ny * off),
                colour,
            );
        }
    }

    /// Filled polygon; degenerate outlines are skipped
    pub fn polygon(&mut self, corners: &[(f32, f32)], colour: Rgb<u8>) {
        let mut points: Vec<Point<i32>> = Vec::with_capacity(corners.len());
        for &(x, y) in corners {
            let p = Point::new(x.round() as i32, y.round() as i32);
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            if let (Some(a), Some(b)) = (points.first(), points.last()) {
                self.line((a.x as f32, a.y as f32), (b.x as f32, b.y as f32), colour);
            }
            return;
        }
        draw_polygon_mut(&mut self.image, &points, colour);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, colour: Rgb<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        draw_filled_rect_mut(&mut self.image, Rect::at(x, y).of_size(width, height), colour);
    }

    pub fn outline_rect(&mut self, x: i32, y: i32, width: u32, height: u32, colour: Rgb<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        draw_hollow_rect_mut(&mut self.image, Rect::at(x, y).of_size(width, height), colour);
    }

    /// Draw `text` with its top left corner at (x, y)
    pub fn text(&mut self, x: i32, y: i32, size: f32, text: &str, colour: Rgb<u8>) {
        if let Some(font) = font() {
            draw_text_mut(&mut self.image, colour, x, y, Scale::uniform(size), font, text);
        }
    }

    /// Encode as PNG at `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path).map_err(TerrainError::from)
    }
}
