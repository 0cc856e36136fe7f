/// Whitespace-delimited scan reader with region of interest filtering
use crate::bounds::{Extents, Region};
use crate::error::{Result, TerrainError};
use crate::point::{Point, PointSet};
use crate::progress::progress_bar;
use constants::record::{COORDINATE_FIELD_COUNT, PROGRESS_REFRESH_BYTES, RECORD_FIELD_COUNT};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// What to do with a line that cannot be split into coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Count the line and keep reading.
    #[default]
    Skip,
    /// Abort the load with `MalformedRecord`.
    Strict,
}

/// Per-outcome line counts for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub lines: usize,
    pub blank: usize,
    pub malformed: usize,
    pub unparseable: usize,
    pub outside_region: usize,
    pub kept: usize,
}

/// Classification of a single input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Blank,
    Point(Point),
    /// Enough fields, but x, y or z is not a finite number.
    Unparseable,
    /// Fewer than the six fields of a full record.
    Malformed(String),
}

/// Decode one line into a point.
///
/// A record needs all six fields; anything past them is ignored. Colour fields are
/// counted but never parsed.
pub fn parse_record(line: &str) -> Record {
    let fields: Vec<&str> = line.split_whitespace().take(RECORD_FIELD_COUNT).collect();
    if fields.is_empty() {
        return Record::Blank;
    }
    if fields.len() < RECORD_FIELD_COUNT {
        return Record::Malformed(format!(
            "expected {} fields (x y z r g b), found {}",
            RECORD_FIELD_COUNT,
            fields.len()
        ));
    }

    let mut coords = [0.0f64; COORDINATE_FIELD_COUNT];
    for (slot, field) in coords.iter_mut().zip(&fields) {
        match field.parse::<f64>() {
            Ok(value) if value.is_finite() => *slot = value,
            _ => return Record::Unparseable,
        }
    }
    Record::Point(Point::new(coords[0], coords[1], coords[2]))
}

/// Reads scan records and narrows them to the analysis region.
pub struct PointCloudLoader {
    region: Region,
    policy: MalformedPolicy,
}

impl PointCloudLoader {
    /// Create a loader for the given region with the skip policy
    pub fn new(region: Region) -> Self {
        Self {
            region,
            policy: MalformedPolicy::Skip,
        }
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load the file at `path`, returning the filtered points and line statistics.
    pub fn load(&self, path: &Path) -> Result<(PointSet, LoadStats)> {
        self.region.validate()?;
        let file = open_input(path)?;
        let total_bytes = file.metadata().map(|m| m.len()).unwrap_or(0);
        let reader = BufReader::new(file);

        info!(path = %path.display(), bytes = total_bytes, "Loading scan");
        let pb = progress_bar(total_bytes, "bytes", "Reading points");
        let result = self.read_records(path, reader, |n| pb.inc(n));
        pb.finish_with_message("Points loaded");

        let (points, stats, extents) = result?;
        log_summary(&stats, &extents);
        Ok((points, stats))
    }

    /// Load from any buffered reader; `path` is only used for error context.
    pub fn load_from_reader<R: BufRead>(
        &self,
        path: &Path,
        reader: R,
    ) -> Result<(PointSet, LoadStats)> {
        self.region.validate()?;
        let (points, stats, extents) = self.read_records(path, reader, |_| {})?;
        log_summary(&stats, &extents);
        Ok((points, stats))
    }

    fn read_records<R: BufRead>(
        &self,
        path: &Path,
        mut reader: R,
        mut on_progress: impl FnMut(u64),
    ) -> Result<(PointSet, LoadStats, Extents)> {
        let mut points = PointSet::new(self.region);
        let mut stats = LoadStats::default();
        let mut extents = Extents::empty();
        let mut buf = Vec::new();
        let mut pending_bytes = 0u64;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| TerrainError::Read {
                    path: path.to_path_buf(),
                    line: stats.lines + 1,
                    source,
                })?;
            if read == 0 {
                break;
            }
            stats.lines += 1;

            pending_bytes += read as u64;
            if pending_bytes >= PROGRESS_REFRESH_BYTES {
                on_progress(pending_bytes);
                pending_bytes = 0;
            }

            let line = String::from_utf8_lossy(&buf);
            match parse_record(&line) {
                Record::Blank => stats.blank += 1,
                Record::Unparseable => stats.unparseable += 1,
                Record::Malformed(reason) => match self.policy {
                    MalformedPolicy::Skip => {
                        debug!(line = stats.lines, %reason, "Skipping malformed record");
                        stats.malformed += 1;
                    }
                    MalformedPolicy::Strict => {
                        return Err(TerrainError::malformed(stats.lines, reason));
                    }
                },
                Record::Point(point) => {
                    if points.push(point) {
                        extents.include(&point);
                        stats.kept += 1;
                    } else {
                        stats.outside_region += 1;
                    }
                }
            }
        }
        on_progress(pending_bytes);

        Ok((points, stats, extents))
    }
}

/// Open the input, mapping every failure (missing, directory, permissions) to InputNotFound
fn open_input(path: &Path) -> Result<File> {
    let not_found = |source: std::io::Error| TerrainError::InputNotFound {
        path: path.to_path_buf(),
        source,
    };
    let metadata = std::fs::metadata(path).map_err(not_found)?;
    if !metadata.is_file() {
        return Err(not_found(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    File::open(path).map_err(not_found)
}

fn log_summary(stats: &LoadStats, extents: &Extents) {
    info!(
        lines = stats.lines,
        kept = stats.kept,
        outside_region = stats.outside_region,
        unparseable = stats.unparseable,
        malformed = stats.malformed,
        "Scan loaded"
    );
    if !extents.is_empty() {
        info!(
            x = %span(extents.axis(0)),
            y = %span(extents.axis(1)),
            z = %span(extents.axis(2)),
            "Kept point extents"
        );
    }
}

fn span((lo, hi): (f64, f64)) -> String {
    format!("{lo:.3} to {hi:.3}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record() {
        assert_eq!(
            parse_record("0.1 0.2 0.3 255 128 0"),
            Record::Point(Point::new(0.1, 0.2, 0.3))
        );
    }

    #[test]
    fn ignores_fields_past_colour() {
        assert_eq!(
            parse_record("0.1\t0.2   0.3 1 2 3 4 5"),
            Record::Point(Point::new(0.1, 0.2, 0.3))
        );
    }

    #[test]
    fn missing_colour_fields_are_malformed() {
        assert!(matches!(parse_record("0.1 0.5 7.0"), Record::Malformed(_)));
        assert!(matches!(parse_record("0.1 0.5 7.0 1 2"), Record::Malformed(_)));
    }

    #[test]
    fn classifies_bad_lines() {
        assert_eq!(parse_record("   \n"), Record::Blank);
        assert_eq!(parse_record("X Y Z R G B"), Record::Unparseable);
        assert_eq!(parse_record("0.1 nan 0.3 0 0 0"), Record::Unparseable);
        assert!(matches!(parse_record("0.1 0.2"), Record::Malformed(_)));
    }
}
