/// Fields per scan record: x y z r g b
pub const RECORD_FIELD_COUNT: usize = 6;

/// Leading fields that must be present to form a point
pub const COORDINATE_FIELD_COUNT: usize = 3;

/// Bytes read between progress bar refreshes
pub const PROGRESS_REFRESH_BYTES: u64 = 256 * 1024;
