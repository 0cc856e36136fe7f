/// Cross-section line plot of height against position
use crate::labeled::Profile;
use crate::render::canvas::{BLACK, Canvas, GREY, measure_text};
use constants::render_settings::{
    LEGEND_FONT_SIZE, LEGEND_TITLE, PLOT_MARGIN, PLOT_SIZE, PROFILE_COLOURS,
    PROFILE_LINE_WIDTH, PROFILE_TITLE, TICK_FONT_SIZE, TITLE_FONT_SIZE,
};
use image::Rgb;

const TICKS: usize = 5;
const LEGEND_ROW: i32 = 40;
const LEGEND_SWATCH: f32 = 48.0;
const LEGEND_PAD: i32 = 16;

/// Data to pixel mapping for the plot area.
struct Axes {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Axes {
    fn to_screen(&self, x: f64, y: f64) -> (f32, f32) {
        let tx = normalize(x, self.x_range);
        let ty = normalize(y, self.y_range);
        (
            (self.left + tx * self.width) as f32,
            (self.top + (1.0 - ty) * self.height) as f32,
        )
    }
}

fn normalize(v: f64, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo { (v - lo) / (hi - lo) } else { 0.5 }
}

/// Finite extent over every profile's values, padded by 5%
fn value_range(profiles: &[Profile]) -> (f64, f64) {
    let (lo, hi) = profiles
        .iter()
        .flat_map(|p| p.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn coord_range(profiles: &[Profile]) -> (f64, f64) {
    let (lo, hi) = profiles
        .iter()
        .flat_map(|p| p.coords.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi { (0.0, 1.0) } else { (lo, hi) }
}

/// Draw every profile as a line; NaN values break the line.
pub fn render_profiles(profiles: &[Profile]) -> Canvas {
    let mut canvas = Canvas::new(PLOT_SIZE, PLOT_SIZE);
    let margin = PLOT_MARGIN as f64;
    let axes = Axes {
        left: margin,
        top: margin,
        width: PLOT_SIZE as f64 - 2.0 * margin,
        height: PLOT_SIZE as f64 - 2.0 * margin,
        x_range: coord_range(profiles),
        y_range: value_range(profiles),
    };

    draw_frame(&mut canvas, &axes);

    for (k, profile) in profiles.iter().enumerate() {
        let colour = Rgb(PROFILE_COLOURS[k % PROFILE_COLOURS.len()]);
        let samples: Vec<(f64, f64)> = profile
            .coords
            .iter()
            .copied()
            .zip(profile.values.iter().copied())
            .collect();
        for pair in samples.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            if y0.is_nan() || y1.is_nan() {
                continue;
            }
            canvas.thick_line(
                axes.to_screen(x0, y0),
                axes.to_screen(x1, y1),
                PROFILE_LINE_WIDTH,
                colour,
            );
        }
    }

    draw_title(&mut canvas);
    draw_legend(&mut canvas, &axes, profiles);
    canvas
}

fn draw_title(canvas: &mut Canvas) {
    let (width, height) = measure_text(TITLE_FONT_SIZE, PROFILE_TITLE);
    let x = (canvas.width() as i32 - width) / 2;
    let y = (PLOT_MARGIN as i32 - height) / 2;
    canvas.text(x, y, TITLE_FONT_SIZE, PROFILE_TITLE, BLACK);
}

fn draw_frame(canvas: &mut Canvas, axes: &Axes) {
    let (left, top) = (axes.left as f32, axes.top as f32);
    let (right, bottom) = (left + axes.width as f32, top + axes.height as f32);
    for tick in 0..TICKS {
        let t = tick as f32 / (TICKS - 1) as f32;
        let x = left + t * axes.width as f32;
        let y = top + t * axes.height as f32;
        canvas.line((x, top), (x, bottom), GREY);
        canvas.line((left, y), (right, y), GREY);
        canvas.line((x, bottom), (x, bottom + 12.0), BLACK);
        canvas.line((left - 12.0, y), (left, y), BLACK);

        let coord = axes.x_range.0 + t as f64 * (axes.x_range.1 - axes.x_range.0);
        let label = format!("{coord:.2}");
        let (w, _) = measure_text(TICK_FONT_SIZE, &label);
        canvas.text(x as i32 - w / 2, bottom as i32 + 16, TICK_FONT_SIZE, &label, BLACK);

        let value = axes.y_range.1 - t as f64 * (axes.y_range.1 - axes.y_range.0);
        let label = format!("{value:.3}");
        let (w, h) = measure_text(TICK_FONT_SIZE, &label);
        canvas.text(left as i32 - 16 - w, y as i32 - h / 2, TICK_FONT_SIZE, &label, BLACK);
    }
    canvas.outline_rect(
        axes.left as i32,
        axes.top as i32,
        axes.width as u32,
        axes.height as u32,
        BLACK,
    );
}

/// Legend placement and size.
struct LegendBox {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl LegendBox {
    /// Top right corner of the plot area, wide enough for the longest label
    fn fit(axes: &Axes, labels: &[String]) -> Self {
        let text_width = labels
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(LEGEND_TITLE))
            .map(|text| measure_text(LEGEND_FONT_SIZE, text).0)
            .max()
            .unwrap_or(0);
        let width = LEGEND_PAD * 3 + LEGEND_SWATCH as i32 + text_width;
        Self {
            x: (axes.left + axes.width) as i32 - width - 20,
            y: axes.top as i32 + 20,
            width,
            height: LEGEND_ROW * (labels.len() as i32 + 1) + LEGEND_PAD,
        }
    }

    /// Left edge of the label column
    fn text_x(&self) -> i32 {
        self.x + LEGEND_PAD * 2 + LEGEND_SWATCH as i32
    }
}

/// Titled box with a swatch and `x = loc` label per profile
fn draw_legend(canvas: &mut Canvas, axes: &Axes, profiles: &[Profile]) {
    if profiles.is_empty() {
        return;
    }
    let labels: Vec<String> = profiles.iter().map(Profile::label).collect();
    let legend = LegendBox::fit(axes, &labels);
    let (w, h) = (legend.width as u32, legend.height as u32);
    canvas.fill_rect(legend.x, legend.y, w, h, Rgb([250, 250, 250]));
    canvas.outline_rect(legend.x, legend.y, w, h, GREY);

    let (title_width, _) = measure_text(LEGEND_FONT_SIZE, LEGEND_TITLE);
    canvas.text(
        legend.x + (legend.width - title_width) / 2,
        legend.y + LEGEND_PAD,
        LEGEND_FONT_SIZE,
        LEGEND_TITLE,
        BLACK,
    );

    for (k, label) in labels.iter().enumerate() {
        let colour = Rgb(PROFILE_COLOURS[k % PROFILE_COLOURS.len()]);
        let row_top = legend.y + LEGEND_PAD / 2 + LEGEND_ROW * (k as i32 + 1);
        let row_mid = row_top + LEGEND_ROW / 2;
        let start = (legend.x + LEGEND_PAD) as f32;
        canvas.thick_line(
            (start, row_mid as f32),
            (start + LEGEND_SWATCH, row_mid as f32),
            PROFILE_LINE_WIDTH,
            colour,
        );
        let (_, text_height) = measure_text(LEGEND_FONT_SIZE, label);
        canvas.text(
            legend.text_x(),
            row_mid - text_height / 2,
            LEGEND_FONT_SIZE,
            label,
            BLACK,
        );
    }
}
