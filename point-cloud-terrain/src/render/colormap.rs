/// Viridis colour lookup for height values
use image::Rgb;

/// Viridis control points at even spacing over [0, 1]
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

/// Sample the colormap at `t` in [0, 1]; values outside are clamped
pub fn viridis(t: f64) -> Rgb<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let k = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - k as f64;
    let (a, b) = (VIRIDIS[k], VIRIDIS[k + 1]);
    let mix = |c: usize| (a[c] as f64 + (b[c] as f64 - a[c] as f64) * frac).round() as u8;
    Rgb([mix(0), mix(1), mix(2)])
}

/// Maps height values onto the colormap over a fixed range.
#[derive(Debug, Clone, Copy)]
pub struct ColourScale {
    pub min: f64,
    pub max: f64,
}

impl ColourScale {
    /// Scale over the finite values, None when there are none
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .map(|(min, max)| Self { min, max })
    }

    /// Position of `v` within the range; flat ranges map to the midpoint
    pub fn normalize(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 { (v - self.min) / span } else { 0.5 }
    }

    /// Colour for `v`, None for no-data
    pub fn colour(&self, v: f64) -> Option<Rgb<u8>> {
        if v.is_nan() {
            None
        } else {
            Some(viridis(self.normalize(v)))
        }
    }
}
