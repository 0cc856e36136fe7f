/// Orthographic 3D surface rendering of gridded heights
use crate::render::canvas::{BLACK, Canvas, GREY, measure_text};
use crate::render::colormap::{ColourScale, viridis};
use constants::render_settings::{
    COLOUR_BAR_GAP, COLOUR_BAR_LABEL_WIDTH, COLOUR_BAR_WIDTH, PLOT_MARGIN, PLOT_SIZE,
    TICK_FONT_SIZE,
};
use ndarray::Array2;

/// Height of the unit box relative to its footprint
const Z_ASPECT: f64 = 0.75;

/// Camera direction in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub elevation: f64,
    pub azimuth: f64,
}

impl View {
    pub fn new(elevation: f64, azimuth: f64) -> Self {
        Self {
            elevation,
            azimuth,
        }
    }

    /// Screen right, screen up and depth toward the camera for a box-space point
    fn project(&self, p: [f64; 3]) -> (f64, f64, f64) {
        let (el, az) = (self.elevation.to_radians(), self.azimuth.to_radians());
        let horizontal = p[0] * az.cos() + p[1] * az.sin();
        let u = -p[0] * az.sin() + p[1] * az.cos();
        let v = p[2] * el.cos() - horizontal * el.sin();
        let depth = horizontal * el.cos() + p[2] * el.sin();
        (u, v, depth)
    }
}

/// Maps data coordinates into the centred unit box.
struct BoxTransform {
    min: [f64; 3],
    span: [f64; 3],
}

impl BoxTransform {
    fn to_box(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        let axis = |v: f64, k: usize| {
            if self.span[k] > 0.0 {
                (v - self.min[k]) / self.span[k] - 0.5
            } else {
                0.0
            }
        };
        [axis(x, 0), axis(y, 1), axis(z, 2) * Z_ASPECT]
    }
}

/// Screen placement for projected box coordinates.
struct Viewport {
    u_min: f64,
    v_max: f64,
    scale: f64,
    left: f64,
    top: f64,
}

impl Viewport {
    fn fit(view: &View, left: f64, top: f64, width: f64, height: f64) -> Self {
        let corners = box_corners();
        let projected: Vec<(f64, f64, f64)> = corners.iter().map(|&c| view.project(c)).collect();
        let u_min = projected.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let u_max = projected.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let v_min = projected.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let v_max = projected.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let scale = (width / (u_max - u_min)).min(height / (v_max - v_min));
        Self {
            u_min,
            v_max,
            scale,
            left: left + (width - (u_max - u_min) * scale) / 2.0,
            top: top + (height - (v_max - v_min) * scale) / 2.0,
        }
    }

    fn to_screen(&self, u: f64, v: f64) -> (f32, f32) {
        (
            (self.left + (u - self.u_min) * self.scale) as f32,
            (self.top + (self.v_max - v) * self.scale) as f32,
        )
    }
}

fn box_corners() -> [[f64; 3]; 8] {
    let h = Z_ASPECT / 2.0;
    [
        [-0.5, -0.5, -h],
        [0.5, -0.5, -h],
        [0.5, 0.5, -h],
        [-0.5, 0.5, -h],
        [-0.5, -0.5, h],
        [0.5, -0.5, h],
        [0.5, 0.5, h],
        [-0.5, 0.5, h],
    ]
}

const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

struct Facet {
    corners: [(f32, f32); 4],
    depth: f64,
    height: f64,
}

/// Render a surface from coordinate meshes and values of identical shape.
///
/// Facets with a no-data corner are left out; a field without data still yields the frame.
pub fn render_surface(
    xs: &Array2<f64>,
    ys: &Array2<f64>,
    zs: &Array2<f64>,
    view: View,
    colour_bar: bool,
) -> Canvas {
    let mut canvas = Canvas::new(PLOT_SIZE, PLOT_SIZE);
    let scale = ColourScale::from_values(zs.iter());

    let reserved = if colour_bar {
        COLOUR_BAR_WIDTH + COLOUR_BAR_GAP + COLOUR_BAR_LABEL_WIDTH
    } else {
        0
    };
    let margin = PLOT_MARGIN as f64;
    let viewport = Viewport::fit(
        &view,
        margin,
        margin,
        (PLOT_SIZE - reserved) as f64 - 2.0 * margin,
        PLOT_SIZE as f64 - 2.0 * margin,
    );

    let transform = BoxTransform {
        min: [
            finite_min(xs),
            finite_min(ys),
            scale.map_or(0.0, |s| s.min),
        ],
        span: [
            finite_max(xs) - finite_min(xs),
            finite_max(ys) - finite_min(ys),
            scale.map_or(0.0, |s| s.max - s.min),
        ],
    };

    let corners = box_corners();
    for (a, b) in BOX_EDGES {
        let pa = view.project(corners[a]);
        let pb = view.project(corners[b]);
        canvas.line(
            viewport.to_screen(pa.0, pa.1),
            viewport.to_screen(pb.0, pb.1),
            GREY,
        );
    }

    if let Some(scale) = scale {
        let mut facets = collect_facets(xs, ys, zs, &view, &transform, &viewport);
        facets.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        for facet in &facets {
            if let Some(colour) = scale.colour(facet.height) {
                canvas.polygon(&facet.corners, colour);
            }
        }
        if colour_bar {
            draw_colour_bar(&mut canvas, reserved, &scale);
        }
    }

    canvas
}

fn collect_facets(
    xs: &Array2<f64>,
    ys: &Array2<f64>,
    zs: &Array2<f64>,
    view: &View,
    transform: &BoxTransform,
    viewport: &Viewport,
) -> Vec<Facet> {
    let (rows, cols) = zs.dim();
    let mut facets = Vec::new();
    for i in 0..rows.saturating_sub(1) {
        for j in 0..cols.saturating_sub(1) {
            let idx = [(i, j), (i + 1, j), (i + 1, j + 1), (i, j + 1)];
            if idx.iter().any(|&k| zs[k].is_nan()) {
                continue;
            }
            let mut corners = [(0.0f32, 0.0f32); 4];
            let mut depth = 0.0;
            let mut height = 0.0;
            for (slot, &k) in corners.iter_mut().zip(idx.iter()) {
                let (u, v, d) = view.project(transform.to_box(xs[k], ys[k], zs[k]));
                *slot = viewport.to_screen(u, v);
                depth += d / 4.0;
                height += zs[k] / 4.0;
            }
            facets.push(Facet {
                corners,
                depth,
                height,
            });
        }
    }
    facets
}

/// Vertical gradient from the low end at the bottom to the high end at the top,
/// with the scale's value printed at each tick
fn draw_colour_bar(canvas: &mut Canvas, reserved: u32, scale: &ColourScale) {
    let x = (canvas.width() - reserved + COLOUR_BAR_GAP) as i32;
    let top = PLOT_MARGIN as i32 * 2;
    let height = canvas.height().saturating_sub(PLOT_MARGIN * 4);
    if height == 0 {
        return;
    }
    for row in 0..height {
        let t = 1.0 - row as f64 / (height - 1).max(1) as f64;
        canvas.fill_rect(x, top + row as i32, COLOUR_BAR_WIDTH, 1, viridis(t));
    }
    canvas.outline_rect(x, top, COLOUR_BAR_WIDTH, height, BLACK);
    let right = x + COLOUR_BAR_WIDTH as i32;
    for tick in 0..5 {
        let t = tick as f64 / 4.0;
        let y = top as f32 + (height - 1) as f32 * t as f32;
        canvas.line((right as f32, y), (right as f32 + 10.0, y), BLACK);

        let value = scale.max - t * (scale.max - scale.min);
        let label = format!("{value:.3}");
        let (_, text_height) = measure_text(TICK_FONT_SIZE, &label);
        canvas.text(
            right + 14,
            y as i32 - text_height / 2,
            TICK_FONT_SIZE,
            &label,
            BLACK,
        );
    }
}

fn finite_min(values: &Array2<f64>) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::INFINITY, f64::min)
}

fn finite_max(values: &Array2<f64>) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max)
}
