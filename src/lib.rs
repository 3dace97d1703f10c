//! Conversion of FreeSurfer surface-based brain data into JSON documents for web viewers.
//!
//! The crate reads brain surface parcellations (annot files), per-vertex morphometry data (curv files)
//! and regional statistics (stats files), and turns them into JSON documents.

pub mod color;
pub mod convert;
pub mod error;
pub mod fs_annot;
pub mod fs_curv;
pub mod fs_stats;
pub mod morphometry;
pub mod parcellation;
pub mod regions;
pub mod util;

pub use convert::{AvailableData, ConversionInfo, ConversionSummary, Converter, ConverterConfig};
pub use error::{ConvertError, Result};
pub use fs_annot::{read_annot, FsAnnot, FsAnnotColortable};
pub use fs_curv::{read_curv, CurvHeader, FsCurv};
pub use fs_stats::{read_stats, FsStats, StatsRegion};
pub use morphometry::{MorphStatistics, Morphometry};
pub use parcellation::{Parcellation, Region};
pub use util::Hemisphere;
