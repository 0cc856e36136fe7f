/// Default region of interest, open interval on both axes (metres)
pub const DEFAULT_X_MIN: f64 = -0.4;
pub const DEFAULT_X_MAX: f64 = 0.4;
pub const DEFAULT_Y_MIN: f64 = 0.0;
pub const DEFAULT_Y_MAX: f64 = 1.0;
