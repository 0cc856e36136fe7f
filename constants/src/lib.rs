/// Shared defaults for point cloud gridding and terrain plotting
pub mod grid;
pub mod record;
pub mod region;
pub mod render_settings;
