/// Output directory for rendered plots
pub const PLOT_DIR: &str = "plots";

pub const SURFACE_COORDINATES_FILE: &str = "terrain_coordinates.png";
pub const SURFACE_DATAARRAY_FILE: &str = "terrain_dataarray.png";
pub const PROFILE_FILE: &str = "profile.png";

/// Optional raster and summary exports
pub const HEIGHTFIELD_DDS_FILE: &str = "heightfield.dds";
pub const HEIGHTFIELD_SUMMARY_FILE: &str = "heightfield.json";

/// Square canvas edge for every plot (pixels)
pub const PLOT_SIZE: u32 = 1600;
pub const PLOT_MARGIN: u32 = 120;

/// Camera for the coordinate mesh surface (degrees)
pub const MESH_VIEW_ELEVATION: f64 = 30.0;
pub const MESH_VIEW_AZIMUTH: f64 = 30.0;

/// Camera for the labelled field surface (degrees)
pub const FIELD_VIEW_ELEVATION: f64 = 30.0;
pub const FIELD_VIEW_AZIMUTH: f64 = -60.0;

/// Cross-section x offsets from the region centre (metres)
pub const PROFILE_OFFSETS: [f64; 5] = [-0.3, -0.15, 0.0, 0.15, 0.3];

/// Line colour cycle for profiles (RGB)
pub const PROFILE_COLOURS: [[u8; 3]; 5] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
];

pub const PROFILE_LINE_WIDTH: i32 = 3;

/// Colour bar geometry (pixels)
pub const COLOUR_BAR_WIDTH: u32 = 40;
pub const COLOUR_BAR_GAP: u32 = 30;
/// Room right of the bar for tick values
pub const COLOUR_BAR_LABEL_WIDTH: u32 = 120;

/// Text sizes (pixels)
pub const TITLE_FONT_SIZE: f32 = 40.0;
pub const LEGEND_FONT_SIZE: f32 = 30.0;
pub const TICK_FONT_SIZE: f32 = 22.0;

pub const PROFILE_TITLE: &str = "Profiles";
pub const LEGEND_TITLE: &str = "Legend";
