//! Functions for reading FreeSurfer brain surface parcellations from annot files.
//!
//! These files assign each vertex of a brain surface mesh to exactly one brain region
//! or label. A so-called colortable contains data on the regions, including the region's
//! name, an RGB display color, and a unique identifier.

use byteordered::ByteOrdered;

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::util::{open_maybe_gz, read_fixed_length_string};

/// Upper bound for the number of colortable rows. The full FreeSurferColorLUT stays well below it.
pub const MAX_COLORTABLE_ROWS: i32 = 1 << 16;

/// The raw per-vertex label of vertices that are not assigned to any region.
pub const RAW_UNASSIGNED_LABEL: i32 = 0;

/// The colortable of an annot file, stored column-wise. Row `i` of all columns describes the structure with id `i`.
///
/// In version 2 colortables the structure ids may have gaps, the rows for missing ids are all zero with an empty name.
/// The `entry_names` hold the names of the entries actually stored in the file, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FsAnnotColortable {
    pub id: Vec<i32>, // The structure id, identical to the row index.
    pub name: Vec<String>,
    pub r: Vec<i32>,
    pub g: Vec<i32>,
    pub b: Vec<i32>,
    pub a: Vec<i32>,
    pub label: Vec<i32>, // A unique label computed from r,g,b. Used in annot.vertex_labels to identify the region.
    pub entry_names: Vec<String>,
}

/// Compute the annot label of a region from its color. The transparency channel is not part of it.
pub fn colortable_label(r: i32, g: i32, b: i32) -> i32 {
    r + g * (1 << 8) + b * (1 << 16)
}

/// One colortable entry as stored in the file.
struct CtabEntry {
    name: String,
    rgba: [i32; 4],
}

impl CtabEntry {
    fn from_reader<S: Read>(input: &mut S) -> Result<CtabEntry> {
        let mut input = ByteOrdered::be(input);
        let num_chars_region_name: i32 = input.read_i32()?; // Length of following string.
        let name = read_fixed_length_string(&mut input, num_chars_region_name.max(0) as usize)?;
        let mut rgba = [0i32; 4];
        for c in &mut rgba {
            *c = input.read_i32()?;
        }
        Ok(CtabEntry { name, rgba })
    }
}

impl FsAnnotColortable {
    /// An all-zero colortable with `num_rows` rows.
    fn zeroed(num_rows: usize) -> FsAnnotColortable {
        FsAnnotColortable {
            id: (0..num_rows as i32).collect(),
            name: vec![String::new(); num_rows],
            r: vec![0; num_rows],
            g: vec![0; num_rows],
            b: vec![0; num_rows],
            a: vec![0; num_rows],
            label: vec![0; num_rows],
            entry_names: Vec::new(),
        }
    }

    fn set_row(&mut self, row: usize, entry: CtabEntry) {
        let [r, g, b, a] = entry.rgba;
        self.name[row] = entry.name.clone();
        self.r[row] = r;
        self.g[row] = g;
        self.b[row] = b;
        self.a[row] = a;
        self.label[row] = colortable_label(r, g, b);
        self.entry_names.push(entry.name);
    }

    /// Read a colortable in format version 2 from a reader. The reader must be at the start position of the colortable,
    /// right after the `-2` version marker.
    ///
    /// The table gets one row per structure id below the stored maximum, and each entry is placed at the row of its structure id.
    pub fn from_reader<S>(input: &mut S) -> Result<FsAnnotColortable>
    where
        S: Read,
    {
        let mut input = ByteOrdered::be(input);

        let max_structure_id: i32 = input.read_i32()?; // Number of rows, i.e., the largest structure id + 1.
        let num_chars_orig_filename: i32 = input.read_i32()?; // Length of following string.
        let _orig_filename = read_fixed_length_string(&mut input, num_chars_orig_filename.max(0) as usize)?;
        let num_entries_to_read: i32 = input.read_i32()?; // May be smaller than the number of rows.

        let mut entries: Vec<(i32, CtabEntry)> = Vec::new();
        for _ in 0..num_entries_to_read.max(0) {
            let structure_id = input.read_i32()?;
            entries.push((structure_id, CtabEntry::from_reader(&mut input)?));
        }

        if !(0..=MAX_COLORTABLE_ROWS).contains(&max_structure_id) {
            return Err(ConvertError::InvalidFsAnnotFormat);
        }
        let mut ct = FsAnnotColortable::zeroed(max_structure_id as usize);
        for (structure_id, entry) in entries {
            if !(0..max_structure_id).contains(&structure_id) {
                return Err(ConvertError::InvalidFsAnnotFormat);
            }
            ct.set_row(structure_id as usize, entry);
        }
        Ok(ct)
    }

    /// Read a colortable in the old format (version 1) with `num_entries` entries. The reader must be right after the entry count.
    pub fn from_reader_old_format<S>(input: &mut S, num_entries: i32) -> Result<FsAnnotColortable>
    where
        S: Read,
    {
        let mut input = ByteOrdered::be(input);

        let num_chars_orig_filename: i32 = input.read_i32()?;
        let _orig_filename = read_fixed_length_string(&mut input, num_chars_orig_filename.max(0) as usize)?;

        let mut entries: Vec<CtabEntry> = Vec::new();
        for _ in 0..num_entries.max(0) {
            entries.push(CtabEntry::from_reader(&mut input)?);
        }

        let mut ct = FsAnnotColortable::zeroed(entries.len());
        for (row, entry) in entries.into_iter().enumerate() {
            ct.set_row(row, entry);
        }
        Ok(ct)
    }

    /// The number of rows in this colortable, including empty rows for unused structure ids.
    pub fn num_rows(&self) -> usize {
        self.id.len()
    }
}

impl fmt::Display for FsAnnotColortable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Colortable for {} brain regions.", self.entry_names.len())
    }
}

/// Models a FreeSurfer brain surface parcellation from an annot file. This is the result of applying a brain atlas (like Desikan-Killiani) to a subject. The `vertex_indices` are the 0-based indices used in FreeSurfer and should be ignored. The `vertex_labels` field contains the mesh vertices in order, and assigns to each vertex a brain region using the `label` field (not the `id` field!) from the `colortable`. The field `colortable` contains an [`FsAnnotColortable`] struct that describes the brain regions, if the file has one.
#[derive(Debug, Clone, PartialEq)]
pub struct FsAnnot {
    pub vertex_indices: Vec<i32>, // 0-based indices, not really needed as all vertices need to be covered in order.
    pub vertex_labels: Vec<i32>,
    pub colortable: Option<FsAnnotColortable>,
}

impl FsAnnot {
    /// Read an FsAnnot instance from a file. Files ending in ".gz" are decompressed on the fly.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FsAnnot> {
        FsAnnot::from_reader(open_maybe_gz(path)?)
    }

    /// Read an FsAnnot instance from the given byte stream, which must be at the start of the annot data.
    pub fn from_reader<S>(input: S) -> Result<FsAnnot>
    where
        S: Read,
    {
        let mut file = ByteOrdered::be(input);

        let num_vertices: i32 = file.read_i32()?;

        // Not pre-sized: the count is untrusted, a truncated file ends in an EOF error.
        let mut vertex_indices: Vec<i32> = Vec::new();
        let mut vertex_labels: Vec<i32> = Vec::new();
        for _ in 0..num_vertices.max(0) {
            vertex_indices.push(file.read_i32()?);
            vertex_labels.push(file.read_i32()?);
        }

        let has_colortable: i32 = match file.read_i32() {
            Ok(v) => v,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => 0,
            Err(e) => return Err(e.into()),
        };

        let colortable = if has_colortable == 1 {
            let num_colortable_entries: i32 = file.read_i32()?;
            if num_colortable_entries > 0 {
                Some(FsAnnotColortable::from_reader_old_format(&mut file, num_colortable_entries)?)
            } else if num_colortable_entries == -2 {
                // If this is negative, the absolute value encodes the file format version.
                Some(FsAnnotColortable::from_reader(&mut file)?)
            } else {
                return Err(ConvertError::UnsupportedFsAnnotFormatVersion);
            }
        } else {
            None
        };

        Ok(FsAnnot {
            vertex_indices,
            vertex_labels,
            colortable,
        })
    }

    /// Get the region names contained in the [`FsAnnot`] struct, in file order. Empty if there is no colortable.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// let annot = surfjson::read_annot("/path/to/subjects_dir/subject1/label/lh.aparc.annot").unwrap();
    /// annot.regions();
    /// ```
    pub fn regions(&self) -> Vec<String> {
        self.colortable
            .as_ref()
            .map(|ct| ct.entry_names.clone())
            .unwrap_or_default()
    }

    /// Get the number of regions contained in the [`FsAnnot`] struct, or its [`FsAnnotColortable`].
    pub fn num_regions(&self) -> usize {
        self.colortable.as_ref().map(|ct| ct.entry_names.len()).unwrap_or(0)
    }

    /// Get the indices of all vertices which are part of the given brain region of the [`FsAnnot`] struct.
    ///
    /// Note that it can happen that no vertices are assigned to the region, in which case the result vector is empty.
    /// The result is `None` if the given `region` is not a valid region name for the [`FsAnnot`] struct.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// let annot = surfjson::read_annot("/path/to/subjects_dir/subject1/label/lh.aparc.annot").unwrap();
    /// annot.region_vertices("bankssts");
    /// ```
    pub fn region_vertices(&self, region: &str) -> Option<Vec<usize>> {
        let ct = self.colortable.as_ref()?;
        let region_idx = ct.name.iter().position(|x| x == region)?;
        let region_idx = region_idx as i32;

        Some(
            self.vertex_region_indices()
                .iter()
                .enumerate()
                .filter(|(_, row)| **row == region_idx)
                .map(|(idx, _)| idx)
                .collect(),
        )
    }

    /// Returns the colortable row index (the structure id) for each vertex, or `-1` for unassigned vertices.
    ///
    /// A vertex is unassigned if its raw label is `0` or matches no colortable row. All vertices are `-1` if the annot has no colortable.
    pub fn vertex_region_indices(&self) -> Vec<i32> {
        let lookup: HashMap<i32, i32> = match &self.colortable {
            Some(ct) => {
                let mut lookup = HashMap::with_capacity(ct.label.len());
                for (region_idx, region_label) in ct.label.iter().enumerate() {
                    // first row wins for duplicated labels
                    lookup.entry(*region_label).or_insert(region_idx as i32);
                }
                lookup
            }
            None => HashMap::new(),
        };
        self.vertex_labels
            .iter()
            .map(|vlabel| match *vlabel {
                RAW_UNASSIGNED_LABEL => -1,
                raw => lookup.get(&raw).copied().unwrap_or(-1),
            })
            .collect()
    }
}

impl fmt::Display for FsAnnot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Surface parcellation assigning {} vertices to {} brain regions.", self.vertex_indices.len(), self.num_regions())
    }
}

/// Read a brain parcellation from a FreeSurfer annot file.
///
/// A parcellation assigns each vertex of a brain surface mesh to exactly one brain region.
/// The colortable contains data on the regions, including the region's
/// name, an RGB display color, and a unique identifier. A parcellation is the result of
/// applying a brain atlas to the brain surface reconstruction of a subject.
///
/// # See also
///
/// One can use the functions [`FsAnnot::regions`], [`FsAnnot::vertex_region_indices`], and [`FsAnnot::region_vertices`] to
/// perform common tasks related to brain surface parcellations.
///
/// # Examples
///
/// ```no_run
/// let annot = surfjson::read_annot("/path/to/subjects_dir/subject1/label/lh.aparc.annot").unwrap();
/// println!("Annotation assigns the {} brain mesh vertices to {} different regions.", annot.vertex_indices.len(), annot.regions().len());
/// ```
pub fn read_annot<P: AsRef<Path>>(path: P) -> Result<FsAnnot> {
    FsAnnot::from_file(path)
}

#[cfg(test)]
mod test {
    use super::*;
    use byteordered::ByteOrdered;
    use std::io::Write;

    // (structure id, name, r, g, b)
    type Entry = (i32, &'static str, i32, i32, i32);

    const REGIONS: [Entry; 3] = [
        (0, "unknown", 25, 5, 25),
        (1, "bankssts", 25, 100, 40),
        (2, "insula", 255, 192, 32),
    ];

    fn entry_bytes(name: &str, rgb: [i32; 3]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(name.len() as i32 + 1).to_be_bytes());
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(0);
        for c in rgb {
            bytes.extend_from_slice(&c.to_be_bytes());
        }
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes
    }

    /// Encode an annot stream. `colortable_version` 0 writes no colortable, 1 the old format, 2 the current one with `max_id` rows.
    fn annot_bytes(raw_labels: &[i32], entries: &[Entry], max_id: i32, colortable_version: i32) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut w = ByteOrdered::be(&mut buf);
            w.write_i32(raw_labels.len() as i32).unwrap();
            for (idx, label) in raw_labels.iter().enumerate() {
                w.write_i32(idx as i32).unwrap();
                w.write_i32(*label).unwrap();
            }
            if colortable_version == 0 {
                w.write_i32(0).unwrap();
                return buf;
            }
            w.write_i32(1).unwrap();
            if colortable_version == 2 {
                w.write_i32(-2).unwrap();
                w.write_i32(max_id).unwrap();
            } else {
                w.write_i32(entries.len() as i32).unwrap();
            }
            w.write_i32(4).unwrap();
            w.write_all(b"ctb\0").unwrap();
            if colortable_version == 2 {
                w.write_i32(entries.len() as i32).unwrap();
            }
            for (id, name, r, g, b) in entries {
                if colortable_version == 2 {
                    w.write_i32(*id).unwrap();
                }
                w.write_all(&entry_bytes(name, [*r, *g, *b])).unwrap();
            }
        }
        buf
    }

    fn label_of(region_idx: usize) -> i32 {
        let (_, _, r, g, b) = REGIONS[region_idx];
        colortable_label(r, g, b)
    }

    #[test]
    fn a_version_2_annot_stream_can_be_read() {
        let raw = vec![label_of(1), label_of(1), label_of(2), label_of(0)];
        let annot = FsAnnot::from_reader(&annot_bytes(&raw, &REGIONS, 3, 2)[..]).unwrap();

        assert_eq!(4, annot.vertex_indices.len());
        assert_eq!(raw, annot.vertex_labels);

        let ct = annot.colortable.as_ref().unwrap();
        assert_eq!(3, ct.num_rows());
        assert_eq!("unknown", ct.name[0]);
        assert_eq!(25, ct.r[0]);
        assert_eq!(5, ct.g[0]);
        assert_eq!(0, ct.a[0]);
        assert_eq!(1639705, ct.label[0]);
        assert_eq!(vec![0, 1, 2], ct.id);
        assert_eq!(vec![1, 1, 2, 0], annot.vertex_region_indices());
    }

    #[test]
    fn version_2_rows_are_indexed_by_structure_id() {
        let entries: [Entry; 2] = [(0, "unknown", 25, 5, 25), (2, "caudalanteriorcingulate", 125, 100, 160)];
        let raw = vec![colortable_label(125, 100, 160), colortable_label(25, 5, 25)];
        let annot = FsAnnot::from_reader(&annot_bytes(&raw, &entries, 3, 2)[..]).unwrap();

        let ct = annot.colortable.as_ref().unwrap();
        assert_eq!(3, ct.num_rows());
        assert_eq!("", ct.name[1]);
        assert_eq!(0, ct.label[1]);
        assert_eq!("caudalanteriorcingulate", ct.name[2]);
        assert_eq!(125, ct.r[2]);
        assert_eq!(annot.regions(), vec!["unknown", "caudalanteriorcingulate"]);
        assert_eq!(2, annot.num_regions());
        assert_eq!(vec![2, 0], annot.vertex_region_indices());
    }

    #[test]
    fn a_structure_id_beyond_the_row_count_is_rejected() {
        let entries: [Entry; 1] = [(5, "insula", 255, 192, 32)];
        let result = FsAnnot::from_reader(&annot_bytes(&[0], &entries, 3, 2)[..]);
        assert!(matches!(result, Err(ConvertError::InvalidFsAnnotFormat)));
    }

    #[test]
    fn raw_label_zero_is_unassigned_even_with_a_black_colortable_row() {
        let entries: [Entry; 2] = [(0, "Unknown", 0, 0, 0), (1, "G_front", 23, 220, 60)];
        let g_front = colortable_label(23, 220, 60);
        let annot = FsAnnot::from_reader(&annot_bytes(&[0, 0, g_front], &entries, 2, 2)[..]).unwrap();

        assert_eq!(0, annot.colortable.as_ref().unwrap().label[0]);
        assert_eq!(vec![-1, -1, 1], annot.vertex_region_indices());
        assert_eq!(Some(vec![]), annot.region_vertices("Unknown"));
    }

    #[test]
    fn an_old_format_colortable_gets_sequential_ids() {
        let raw = vec![label_of(2), label_of(0)];
        let annot = FsAnnot::from_reader(&annot_bytes(&raw, &REGIONS, 0, 1)[..]).unwrap();

        let ct = annot.colortable.as_ref().unwrap();
        assert_eq!(vec![0, 1, 2], ct.id);
        assert_eq!(annot.regions(), vec!["unknown", "bankssts", "insula"]);
        assert_eq!(vec![2, 0], annot.vertex_region_indices());
    }

    #[test]
    fn an_annot_without_colortable_has_no_regions() {
        let annot = FsAnnot::from_reader(&annot_bytes(&[7, 7], &[], 0, 0)[..]).unwrap();

        assert!(annot.colortable.is_none());
        assert_eq!(0, annot.num_regions());
        assert_eq!(vec![-1, -1], annot.vertex_region_indices());
    }

    #[test]
    fn an_unknown_colortable_version_is_rejected() {
        let mut bytes = annot_bytes(&[label_of(0)], &REGIONS, 3, 2);
        // version marker directly follows vertex data and the has-colortable flag
        let marker_pos = 4 + 8 + 4;
        bytes[marker_pos..marker_pos + 4].copy_from_slice(&(-3i32).to_be_bytes());
        assert!(matches!(
            FsAnnot::from_reader(&bytes[..]),
            Err(ConvertError::UnsupportedFsAnnotFormatVersion)
        ));
    }

    #[test]
    fn huge_counts_in_a_short_stream_are_io_errors() {
        // vertex count i32::MAX, but only one vertex present
        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&i32::MAX.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
        assert!(matches!(FsAnnot::from_reader(&bytes[..]), Err(ConvertError::Io(_))));

        // one vertex, then a version 2 colortable claiming i32::MAX rows and entries
        let mut bytes = annot_bytes(&[label_of(0)], &[], i32::MAX, 2);
        let entries_pos = bytes.len() - 4;
        bytes[entries_pos..].copy_from_slice(&i32::MAX.to_be_bytes());
        assert!(matches!(FsAnnot::from_reader(&bytes[..]), Err(ConvertError::Io(_))));

        // old format colortable with i32::MAX entries
        let mut bytes = annot_bytes(&[label_of(0)], &[], 0, 1);
        let count_pos = 4 + 8 + 4;
        bytes[count_pos..count_pos + 4].copy_from_slice(&i32::MAX.to_be_bytes());
        assert!(matches!(FsAnnot::from_reader(&bytes[..]), Err(ConvertError::Io(_))));
    }

    #[test]
    fn a_huge_region_name_length_is_an_io_error() {
        let mut bytes = annot_bytes(&[label_of(0)], &REGIONS[..1], 1, 2);
        // layout after the vertex data: flag, -2, max id, filename length, "ctb\0", entry count, structure id, name length
        let name_len_pos = 4 + 8 + 4 + 4 + 4 + 4 + 4 + 4 + 4;
        bytes[name_len_pos..name_len_pos + 4].copy_from_slice(&i32::MAX.to_be_bytes());
        assert!(matches!(FsAnnot::from_reader(&bytes[..]), Err(ConvertError::Io(_))));
    }

    #[test]
    fn a_row_count_above_the_limit_is_rejected() {
        let result = FsAnnot::from_reader(&annot_bytes(&[label_of(0)], &REGIONS, MAX_COLORTABLE_ROWS + 1, 2)[..]);
        assert!(matches!(result, Err(ConvertError::InvalidFsAnnotFormat)));
    }
}
