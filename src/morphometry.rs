//! Conversion of per-vertex morphometry data (thickness, curvature, sulcal depth) into JSON documents.
//!
//! Zero values mark vertices without a measurement, typically the medial wall. They stay in the
//! value array, but are left out of the summary statistics.

use ndarray::{Array1, Axis};
use ndarray_stats::interpolate::Linear;
use ndarray_stats::{QuantileExt, SummaryStatisticsExt};
use noisy_float::types::n64;
use serde::Serialize;

use crate::error::Result;
use crate::fs_curv::FsCurv;
use crate::util::Hemisphere;

/// Summary statistics over the non-zero values of a morphometry array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MorphStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub median: f64,
    pub percentile_5: f64,
    pub percentile_95: f64,
}

impl MorphStatistics {
    /// Compute the statistics over all non-zero `values`. All statistics are `0` if there are none.
    pub fn from_values(values: &[f32]) -> Result<MorphStatistics> {
        let mut valid: Array1<f64> = values
            .iter()
            .filter(|v| **v != 0.0 && !v.is_nan())
            .map(|v| *v as f64)
            .collect();
        if valid.is_empty() {
            return Ok(MorphStatistics::default());
        }

        Ok(MorphStatistics {
            min: *valid.min_skipnan(),
            max: *valid.max_skipnan(),
            mean: SummaryStatisticsExt::mean(&valid)?,
            std: valid.central_moment(2)?.sqrt(),
            median: percentile(&mut valid, 0.5)?,
            percentile_5: percentile(&mut valid, 0.05)?,
            percentile_95: percentile(&mut valid, 0.95)?,
        })
    }
}

/// The `q` quantile of the values, linearly interpolated between the closest ranks. NaN values are ignored.
fn percentile(values: &mut Array1<f64>, q: f64) -> Result<f64> {
    let quantile = values.quantile_axis_skipnan_mut(Axis(0), n64(q), &Linear)?;
    Ok(quantile[()])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MorphometrySource {
    pub source_file: String,
    pub num_non_zero: usize,
}

/// A morphometry JSON document: the raw per-vertex values plus summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Morphometry {
    pub hemisphere: Hemisphere,
    pub measure: String,
    pub num_vertices: usize,
    pub values: Vec<f32>,
    pub statistics: MorphStatistics,
    pub metadata: MorphometrySource,
}

impl Morphometry {
    /// Build a morphometry document from raw per-vertex values.
    pub fn from_values(values: Vec<f32>, hemisphere: Hemisphere, measure: &str, source_file: &str) -> Result<Morphometry> {
        let statistics = MorphStatistics::from_values(&values)?;
        let num_non_zero = values.iter().filter(|v| **v != 0.0).count();

        Ok(Morphometry {
            hemisphere,
            measure: measure.to_string(),
            num_vertices: values.len(),
            values,
            statistics,
            metadata: MorphometrySource {
                source_file: source_file.to_string(),
                num_non_zero,
            },
        })
    }

    /// Build a morphometry document from a decoded curv file.
    pub fn from_curv(curv: FsCurv, hemisphere: Hemisphere, measure: &str, source_file: &str) -> Result<Morphometry> {
        Morphometry::from_values(curv.data, hemisphere, measure, source_file)
    }
}
