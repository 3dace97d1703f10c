//! The conversion run: finds FreeSurfer files in a subject directory by naming convention,
//! converts them and writes the JSON documents plus a manifest to the output directory.

use serde::Serialize;
use tracing::{debug, info};

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::fs_annot::read_annot;
use crate::fs_curv::read_curv;
use crate::fs_stats::{read_stats, FsStats};
use crate::morphometry::Morphometry;
use crate::parcellation::Parcellation;
use crate::regions::RegionDescriptions;
use crate::util::{file_name_string, file_stem_string, split_hemisphere, write_json_compact, write_json_pretty, Hemisphere};

pub const PARCELLATION_DIR: &str = "parcellation";
pub const MORPHOMETRY_DIR: &str = "morphometry";
pub const STATISTICS_DIR: &str = "statistics";
pub const METADATA_DIR: &str = "metadata";

pub const ALL_STATS_ID: &str = "all_stats";
pub const CONVERSION_INFO_ID: &str = "conversion_info";

/// The morphometry measures that are converted, in conversion order.
pub const MORPH_MEASURES: [&str; 3] = ["thickness", "curv", "sulc"];
const MORPH_HEMISPHERES: [Hemisphere; 2] = [Hemisphere::Lh, Hemisphere::Rh];

/// Settings for a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    /// The FreeSurfer subject directory, containing `label/`, `surf/` and `stats/`.
    pub input_dir: PathBuf,
    /// The directory that receives the JSON documents.
    pub output_dir: PathBuf,
}

impl Default for ConverterConfig {
    fn default() -> ConverterConfig {
        ConverterConfig {
            input_dir: PathBuf::from("../freesurfer_data"),
            output_dir: PathBuf::from("../public/brain-data"),
        }
    }
}

/// Output identifiers (file stems) of the documents written by a run, grouped by category.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AvailableData {
    pub parcellations: Vec<String>,
    pub morphometry: Vec<String>,
    pub statistics: Vec<String>,
}

/// The manifest written to `metadata/conversion_info.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionInfo {
    pub input_directory: String,
    pub output_directory: String,
    pub available_data: AvailableData,
    pub region_descriptions: RegionDescriptions,
}

/// What a finished run produced, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub output_dir: PathBuf,
    pub available_data: AvailableData,
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "CONVERSION SUMMARY")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Output directory: {}", self.output_dir.display())?;
        writeln!(f, "- Parcellations: {} files", self.available_data.parcellations.len())?;
        writeln!(f, "- Morphometry: {} files", self.available_data.morphometry.len())?;
        writeln!(f, "- Statistics: {} files", self.available_data.statistics.len())?;
        write!(f, "{}", rule)
    }
}

/// Converts the files of one FreeSurfer subject directory.
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    /// Create a converter. Fails if the input directory does not exist.
    /// Creates the output directory and its category subdirectories.
    pub fn new(config: ConverterConfig) -> Result<Converter> {
        if !config.input_dir.is_dir() {
            return Err(ConvertError::MissingInputDir(config.input_dir));
        }
        for sub in [PARCELLATION_DIR, MORPHOMETRY_DIR, STATISTICS_DIR, METADATA_DIR] {
            fs::create_dir_all(config.output_dir.join(sub))?;
        }
        Ok(Converter { config })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    fn output_path(&self, category: &str, id: &str) -> PathBuf {
        self.config.output_dir.join(category).join(format!("{}.json", id))
    }

    /// Convert one annot file and write it to `parcellation/<hemi>.<atlas>.json`.
    pub fn convert_annot_file(&self, annot_path: &Path, hemisphere: Hemisphere, atlas: &str) -> Result<Parcellation> {
        info!("Converting annotation file: {}", annot_path.display());

        let annot = read_annot(annot_path)?;
        let parcellation = Parcellation::from_annot(&annot, hemisphere, atlas, &file_name_string(annot_path));

        let output_path = self.output_path(PARCELLATION_DIR, &format!("{}.{}", hemisphere, atlas));
        write_json_compact(&output_path, &parcellation)?;
        info!("Saved parcellation to: {}", output_path.display());
        Ok(parcellation)
    }

    /// Convert one curv file and write it to `morphometry/<hemi>.<measure>.json`.
    pub fn convert_morphometry_file(&self, morph_path: &Path, hemisphere: Hemisphere, measure: &str) -> Result<Morphometry> {
        info!("Converting morphometry file: {}", morph_path.display());

        let curv = read_curv(morph_path)?;
        let morphometry = Morphometry::from_curv(curv, hemisphere, measure, &file_name_string(morph_path))?;

        let output_path = self.output_path(MORPHOMETRY_DIR, &format!("{}.{}", hemisphere, measure));
        write_json_compact(&output_path, &morphometry)?;
        info!("Saved morphometry to: {}", output_path.display());
        Ok(morphometry)
    }

    /// Parse one stats file.
    pub fn parse_stats_file(&self, stats_path: &Path) -> Result<FsStats> {
        info!("Parsing stats file: {}", stats_path.display());
        read_stats(stats_path)
    }

    /// Parse all `stats/*.stats` files and write them combined to `statistics/all_stats.json`.
    ///
    /// Returns `None` without writing anything if there is no `stats` directory.
    pub fn convert_stats_files(&self) -> Result<Option<BTreeMap<String, FsStats>>> {
        let stats_dir = self.config.input_dir.join("stats");
        if !stats_dir.is_dir() {
            info!("No stats directory found");
            return Ok(None);
        }

        let mut all_stats: BTreeMap<String, FsStats> = BTreeMap::new();
        for stats_file in files_with_extension(&stats_dir, "stats")? {
            let stats = self.parse_stats_file(&stats_file)?;
            all_stats.insert(stats_key(&file_stem_string(&stats_file)), stats);
        }

        let output_path = self.output_path(STATISTICS_DIR, ALL_STATS_ID);
        write_json_pretty(&output_path, &all_stats)?;
        info!("Saved statistics to: {}", output_path.display());
        Ok(Some(all_stats))
    }

    /// Write the manifest listing the produced documents and the region reference table.
    pub fn create_metadata_file(&self, available_data: &AvailableData) -> Result<ConversionInfo> {
        let info = ConversionInfo {
            input_directory: self.config.input_dir.display().to_string(),
            output_directory: self.config.output_dir.display().to_string(),
            available_data: available_data.clone(),
            region_descriptions: RegionDescriptions,
        };

        let output_path = self.output_path(METADATA_DIR, CONVERSION_INFO_ID);
        write_json_pretty(&output_path, &info)?;
        info!("Saved metadata to: {}", output_path.display());
        Ok(info)
    }

    /// Convert all annot, morphometry and stats files of the input directory, then write the manifest.
    pub fn convert_all(&self) -> Result<ConversionSummary> {
        info!("Starting FreeSurfer data conversion...");
        let mut available = AvailableData::default();

        let label_dir = self.config.input_dir.join("label");
        if label_dir.is_dir() {
            for annot_file in files_with_extension(&label_dir, "annot")? {
                let stem = file_stem_string(&annot_file);
                let (hemisphere, atlas) = split_hemisphere(&stem);
                let parcellation = self.convert_annot_file(&annot_file, hemisphere, atlas)?;
                available.parcellations.push(format!("{}.{}", parcellation.hemisphere, parcellation.atlas));
            }
        } else {
            info!("No label directory found");
        }

        let surf_dir = self.config.input_dir.join("surf");
        if surf_dir.is_dir() {
            for measure in MORPH_MEASURES {
                for hemisphere in MORPH_HEMISPHERES {
                    let morph_file = surf_dir.join(format!("{}.{}", hemisphere, measure));
                    if morph_file.is_file() {
                        self.convert_morphometry_file(&morph_file, hemisphere, measure)?;
                        available.morphometry.push(format!("{}.{}", hemisphere, measure));
                    }
                }
            }
        } else {
            info!("No surf directory found");
        }

        if self.convert_stats_files()?.is_some() {
            available.statistics.push(ALL_STATS_ID.to_string());
        }

        self.create_metadata_file(&available)?;
        info!("Conversion complete!");

        Ok(ConversionSummary {
            output_dir: self.config.output_dir.clone(),
            available_data: available,
        })
    }
}

/// The key of a stats file in the combined statistics document: `<hemi>.<atlas>`, or the bare stem without hemisphere prefix.
pub fn stats_key(stem: &str) -> String {
    match split_hemisphere(stem) {
        (Hemisphere::Both, name) => name.to_string(),
        (hemisphere, atlas) => format!("{}.{}", hemisphere, atlas),
    }
}

/// All regular files in `dir` with the given extension, sorted by path.
fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map(|e| e == extension).unwrap_or(false) {
            if path.is_file() {
                files.push(path);
            } else {
                debug!("Skipping non-file entry: {}", path.display());
            }
        }
    }
    files.sort();
    Ok(files)
}
