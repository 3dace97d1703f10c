//! Functions for reading FreeSurfer `.stats` text reports, like `lh.aparc.stats`.
//!
//! These files start with `#` comment lines, some of which carry `# Measure` key/value pairs,
//! followed by one whitespace-separated row of measurements per brain region.

use serde::Serialize;
use tracing::debug;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::util::file_name_string;

const MEASURE_PREFIX: &str = "# Measure";

/// The measurements for one brain region from a stats file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRegion {
    pub name: String,
    pub num_vertices: i64,
    pub surface_area: f64,
    pub gray_volume: f64,
    pub avg_thickness: f64,
    pub std_thickness: f64,
}

/// Models a parsed FreeSurfer stats file.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FsStats {
    /// Region rows keyed by region name. Later rows with the same name replace earlier ones.
    pub regions: BTreeMap<String, StatsRegion>,
    /// Key/value pairs from the `# Measure` header lines.
    pub metadata: BTreeMap<String, String>,
    pub source_file: String,
}

impl FsStats {
    /// Read an FsStats instance from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FsStats> {
        let source_file = file_name_string(&path);
        let file = BufReader::new(File::open(path)?);
        FsStats::from_reader(file, source_file)
    }

    /// Parse stats lines from the given reader. Lines that cannot be parsed are skipped.
    pub fn from_reader<R: BufRead>(input: R, source_file: String) -> Result<FsStats> {
        let mut stats = FsStats {
            source_file,
            ..FsStats::default()
        };

        for (line_idx, line) in input.lines().enumerate() {
            let line = line?;
            if line.starts_with(MEASURE_PREFIX) {
                if let Some((key, value)) = parse_measure_line(&line) {
                    stats.metadata.insert(key, value);
                }
            } else if !line.starts_with('#') && !line.trim().is_empty() {
                match parse_region_line(&line) {
                    Some(region) => {
                        stats.regions.insert(region.name.clone(), region);
                    }
                    None => debug!(line = line_idx + 1, "Skipping unparsable stats row"),
                }
            }
        }
        Ok(stats)
    }
}

/// Parse a `# Measure <key>, <value>, ...` header line into its key and value.
///
/// # Examples
///
/// ```
/// use surfjson::fs_stats::parse_measure_line;
/// let kv = parse_measure_line("# Measure BrainVol, 1234567");
/// assert_eq!(kv, Some((String::from("BrainVol"), String::from("1234567"))));
/// ```
pub fn parse_measure_line(line: &str) -> Option<(String, String)> {
    let mut parts = line.trim().split(',');
    let key_part = parts.next()?;
    let value = parts.next()?.trim();
    let key = key_part.replacen(MEASURE_PREFIX, "", 1).trim().to_string();
    Some((key, value.to_string()))
}

/// Parse a data row of at least 5 whitespace-separated fields into a [`StatsRegion`].
///
/// The 6th field, the thickness standard deviation, defaults to `0.0` if missing.
pub fn parse_region_line(line: &str) -> Option<StatsRegion> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        return None;
    }
    let std_thickness = match parts.get(5) {
        Some(field) => field.parse().ok()?,
        None => 0.0,
    };
    Some(StatsRegion {
        name: parts[0].to_string(),
        num_vertices: parts[1].parse().ok()?,
        surface_area: parts[2].parse().ok()?,
        gray_volume: parts[3].parse().ok()?,
        avg_thickness: parts[4].parse().ok()?,
        std_thickness,
    })
}

/// Read a FreeSurfer stats file.
///
/// # Examples
///
/// ```no_run
/// let stats = surfjson::read_stats("/path/to/subjects_dir/subject1/stats/lh.aparc.stats").unwrap();
/// println!("Found measurements for {} regions.", stats.regions.len());
/// ```
pub fn read_stats<P: AsRef<Path>>(path: P) -> Result<FsStats> {
    FsStats::from_file(path)
}
