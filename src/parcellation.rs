//! Conversion of brain surface parcellations into JSON documents with a region table and per-vertex region ids.

use serde::Serialize;
use tracing::warn;

use std::collections::BTreeMap;

use crate::color::{fallback_color, Rgba};
use crate::fs_annot::{FsAnnot, FsAnnotColortable};
use crate::util::Hemisphere;

/// The per-vertex label value of vertices without a region, e.g. on the medial wall.
pub const UNKNOWN_LABEL: i32 = -1;

/// One brain region of a parcellation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Ordinal of the region's label among all distinct labels, in ascending label order.
    pub id: i32,
    pub name: String,
    pub label: i32,
    pub color: Rgba,
    pub vertex_count: usize,
    pub vertex_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcellationSource {
    pub source_file: String,
    pub has_color_table: bool,
}

/// A parcellation JSON document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parcellation {
    pub hemisphere: Hemisphere,
    pub atlas: String,
    pub num_vertices: usize,
    pub num_regions: usize,
    /// The region `id` for each vertex, or `-1`.
    pub vertex_labels: Vec<i32>,
    pub regions: Vec<Region>,
    pub metadata: ParcellationSource,
}

impl Parcellation {
    /// Build a parcellation document from a decoded annot file.
    pub fn from_annot(annot: &FsAnnot, hemisphere: Hemisphere, atlas: &str, source_file: &str) -> Parcellation {
        let labels = annot.vertex_region_indices();
        let names = annot.regions();
        Parcellation::from_labels(&labels, annot.colortable.as_ref(), &names, hemisphere, atlas, source_file)
    }

    /// Build a parcellation document from per-vertex labels, an optional colortable and the region names.
    ///
    /// The distinct label values are enumerated in ascending order. The value at ordinal `i` is paired
    /// with `names[i]` and colortable row `i`. The label `-1` is skipped, its vertices keep the region id `-1`.
    pub fn from_labels(
        labels: &[i32],
        colortable: Option<&FsAnnotColortable>,
        names: &[String],
        hemisphere: Hemisphere,
        atlas: &str,
        source_file: &str,
    ) -> Parcellation {
        let mut label_vertices: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (vertex_idx, label) in labels.iter().enumerate() {
            label_vertices.entry(*label).or_default().push(vertex_idx);
        }

        let mut vertex_labels: Vec<i32> = vec![UNKNOWN_LABEL; labels.len()];
        let mut regions: Vec<Region> = Vec::with_capacity(label_vertices.len());

        for (ordinal, (label, vertex_indices)) in label_vertices.into_iter().enumerate() {
            if label == UNKNOWN_LABEL {
                continue;
            }
            let id = ordinal as i32;
            for v in &vertex_indices {
                vertex_labels[*v] = id;
            }
            regions.push(Region {
                id,
                name: region_name(names, ordinal, label),
                label,
                color: region_color(colortable, ordinal),
                vertex_count: vertex_indices.len(),
                vertex_indices,
            });
        }

        Parcellation {
            hemisphere,
            atlas: atlas.to_string(),
            num_vertices: labels.len(),
            num_regions: regions.len(),
            vertex_labels,
            regions,
            metadata: ParcellationSource {
                source_file: source_file.to_string(),
                has_color_table: colortable.is_some(),
            },
        }
    }
}

fn region_name(names: &[String], ordinal: usize, label: i32) -> String {
    match names.get(ordinal) {
        Some(name) => name.clone(),
        None => {
            warn!(ordinal, label, "No region name for label, using a generated one");
            format!("label_{}", label)
        }
    }
}

fn region_color(colortable: Option<&FsAnnotColortable>, ordinal: usize) -> Rgba {
    match colortable {
        Some(ct) if ordinal < ct.num_rows() => Rgba::from_channels(ct.r[ordinal], ct.g[ordinal], ct.b[ordinal], ct.a[ordinal]),
        _ => fallback_color(ordinal),
    }
}
