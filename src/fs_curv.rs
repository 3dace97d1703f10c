//! Functions for reading FreeSurfer per-vertex data in binary 'curv' files.
//!
//! These files store 1 scalar value (typically a morphological descriptor, like cortical thickness at that point)
//! for each vertex of the respective brain surface mesh.

use byteordered::ByteOrdered;

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::util::{interpret_fs_int24, open_maybe_gz};

pub const CURV_MAGIC_FILE_TYPE_NUMBER: i32 = 16777215;

/// Models the header of a FreeSurfer curv file.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvHeader {
    pub curv_magic: [u8; 3],
    pub num_vertices: i32,
    pub num_faces: i32,
    pub num_values_per_vertex: i32,
}

impl Default for CurvHeader {
    fn default() -> CurvHeader {
        CurvHeader {
            curv_magic: [255; 3],
            num_vertices: 0,
            num_faces: 0,
            num_values_per_vertex: 1,
        }
    }
}

impl CurvHeader {
    /// Read a Curv header from a file.
    /// If the file's name ends with ".gz", the file is assumed to need GZip decoding. This is not typically the case
    /// for FreeSurfer Curv files, but very handy (and it helps us to reduce the size of our test data).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<CurvHeader> {
        CurvHeader::from_reader(open_maybe_gz(path)?)
    }

    /// Read a Curv header from the given byte stream.
    /// It is assumed that the input is currently at the start of the
    /// Curv header.
    ///
    /// Files in the old curv format have no magic number, their header is two 24 bit integers.
    /// These are reported with a `curv_magic` other than `[255; 3]` and `num_values_per_vertex` 1.
    pub fn from_reader<S>(input: S) -> Result<CurvHeader>
    where
        S: Read,
    {
        let mut hdr = CurvHeader::default();
        let mut input = ByteOrdered::be(input);

        for v in &mut hdr.curv_magic {
            *v = input.read_u8()?;
        }

        if hdr.is_new_format() {
            hdr.num_vertices = input.read_i32()?;
            hdr.num_faces = input.read_i32()?;
            hdr.num_values_per_vertex = input.read_i32()?;
        } else {
            hdr.num_vertices = interpret_fs_int24(hdr.curv_magic[0], hdr.curv_magic[1], hdr.curv_magic[2]);
            let mut fnum = [0u8; 3];
            for v in &mut fnum {
                *v = input.read_u8()?;
            }
            hdr.num_faces = interpret_fs_int24(fnum[0], fnum[1], fnum[2]);
        }

        if hdr.num_vertices < 0 || hdr.num_values_per_vertex != 1 {
            return Err(ConvertError::InvalidCurvFormat);
        }
        Ok(hdr)
    }

    /// Whether the header starts with the magic number of the current curv format.
    pub fn is_new_format(&self) -> bool {
        interpret_fs_int24(self.curv_magic[0], self.curv_magic[1], self.curv_magic[2]) == CURV_MAGIC_FILE_TYPE_NUMBER
    }
}

/// Models a FreeSurfer curv file: one scalar value per mesh vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct FsCurv {
    pub header: CurvHeader,
    pub data: Vec<f32>,
}

impl FsCurv {
    /// Read an FsCurv instance from a file. Files ending in ".gz" are decompressed on the fly.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FsCurv> {
        FsCurv::from_reader(open_maybe_gz(path)?)
    }

    /// Read an FsCurv instance from the given byte stream, which must be at the start of the curv header.
    pub fn from_reader<S>(input: S) -> Result<FsCurv>
    where
        S: Read,
    {
        let mut input = ByteOrdered::be(input);
        let hdr = CurvHeader::from_reader(&mut input)?;

        // Grows while reading, a header claiming more vertices than the file holds ends in an EOF error.
        let mut data: Vec<f32> = Vec::new();
        if hdr.is_new_format() {
            for _ in 0..hdr.num_vertices {
                data.push(input.read_f32()?);
            }
        } else {
            // Old format stores values as shorts, scaled by 100.
            for _ in 0..hdr.num_vertices {
                data.push(input.read_i16()? as f32 / 100.0);
            }
        }

        Ok(FsCurv { header: hdr, data })
    }
}

impl fmt::Display for FsCurv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Per-vertex data for {} vertices.", self.data.len())
    }
}

/// Read per-vertex data from a FreeSurfer curv file, like `lh.thickness`, `lh.curv` or `lh.sulc`.
///
/// # Examples
///
/// ```no_run
/// let curv = surfjson::read_curv("/path/to/subjects_dir/subject1/surf/lh.thickness").unwrap();
/// println!("Read {} thickness values.", curv.data.len());
/// ```
pub fn read_curv<P: AsRef<Path>>(path: P) -> Result<FsCurv> {
    FsCurv::from_file(path)
}
