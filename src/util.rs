//! Utility functions used in all other surfjson modules.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteordered::byteorder::ReadBytesExt;
use flate2::bufread::GzDecoder;
use serde::Serialize;

use crate::error::Result;

/// Check whether the file extension ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// Open a file for buffered reading, transparently decompressing it if the name ends with ".gz".
pub fn open_maybe_gz<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read>> {
    let gz = is_gz_file(&path);
    let file = BufReader::new(File::open(path)?);
    if gz {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Read a fixed length zero-terminated byte string of the given length from the input. Embedded '\0' chars are allowed, but not added to the returned String.
pub fn read_fixed_length_string<S>(input: &mut S, len: usize) -> Result<String>
where
    S: Read,
{
    let mut info_line = String::new();
    for _ in 0..len {
        let cur_char = input.read_u8()? as char;
        if cur_char != '\0' {
            info_line.push(cur_char);
        }
    }
    Ok(info_line)
}

/// Interpret three bytes as a single 24 bit integer, FreeSurfer style.
pub fn interpret_fs_int24(b1: u8, b2: u8, b3: u8) -> i32 {
    ((b1 as i32) << 16) + ((b2 as i32) << 8) + b3 as i32
}

/// A brain hemisphere, as encoded in FreeSurfer file name prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    Lh,
    Rh,
    /// No hemisphere prefix, e.g. whole-brain files like `aseg.stats`.
    Both,
}

impl Hemisphere {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::Lh => "lh",
            Hemisphere::Rh => "rh",
            Hemisphere::Both => "both",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a file stem like `lh.aparc` into its hemisphere and the remainder (`aparc`).
///
/// Only a literal `lh.` or `rh.` prefix counts. Anything else is [`Hemisphere::Both`] with the full stem as the name.
///
/// # Examples
///
/// ```
/// use surfjson::util::{split_hemisphere, Hemisphere};
/// assert_eq!(split_hemisphere("rh.aparc"), (Hemisphere::Rh, "aparc"));
/// assert_eq!(split_hemisphere("aseg"), (Hemisphere::Both, "aseg"));
/// ```
pub fn split_hemisphere(stem: &str) -> (Hemisphere, &str) {
    if let Some(rest) = stem.strip_prefix("lh.") {
        (Hemisphere::Lh, rest)
    } else if let Some(rest) = stem.strip_prefix("rh.") {
        (Hemisphere::Rh, rest)
    } else {
        (Hemisphere::Both, stem)
    }
}

/// The file name of a path without its last extension, as an owned String.
pub fn file_stem_string<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The file name of a path, as an owned String.
pub fn file_name_string<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write a value as compact JSON, without any extra whitespace.
pub fn write_json_compact<T, P>(path: P, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Write a value as pretty-printed JSON, indented by 2 spaces.
pub fn write_json_pretty<T, P>(path: P, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ConvertError;

    #[test]
    fn hemisphere_prefixes_are_split_literally() {
        assert_eq!(split_hemisphere("lh.aparc"), (Hemisphere::Lh, "aparc"));
        assert_eq!(split_hemisphere("rh.aparc.a2009s"), (Hemisphere::Rh, "aparc.a2009s"));
        assert_eq!(split_hemisphere("lh.thickness"), (Hemisphere::Lh, "thickness"));
        assert_eq!(split_hemisphere("aseg"), (Hemisphere::Both, "aseg"));
        assert_eq!(split_hemisphere("lhaparc"), (Hemisphere::Both, "lhaparc"));
        assert_eq!(split_hemisphere("wm.lh.stuff"), (Hemisphere::Both, "wm.lh.stuff"));
    }

    #[test]
    fn file_stems_drop_only_the_last_extension() {
        assert_eq!(file_stem_string("label/rh.aparc.annot"), "rh.aparc");
        assert_eq!(file_stem_string("stats/lh.aparc.a2009s.stats"), "lh.aparc.a2009s");
        assert_eq!(file_name_string("surf/lh.thickness"), "lh.thickness");
    }

    #[test]
    fn gz_files_are_detected_by_name() {
        assert!(is_gz_file("surf/lh.thickness.gz"));
        assert!(!is_gz_file("surf/lh.thickness"));
    }

    #[test]
    fn a_string_length_beyond_the_stream_is_an_io_error() {
        let mut input: &[u8] = b"abc\0";
        assert_eq!("abc", read_fixed_length_string(&mut input, 4).unwrap());

        let mut input: &[u8] = b"abc";
        assert!(matches!(read_fixed_length_string(&mut input, usize::MAX), Err(ConvertError::Io(_))));
    }

    #[test]
    fn fs_int24_is_big_endian() {
        assert_eq!(interpret_fs_int24(0xff, 0xff, 0xff), 16777215);
        assert_eq!(interpret_fs_int24(0, 1, 2), 258);
    }

    #[test]
    fn fixed_length_strings_drop_embedded_nul_chars() {
        let mut input: &[u8] = b"bankssts\0rest";
        let s = read_fixed_length_string(&mut input, 9).unwrap();
        assert_eq!(s, "bankssts");
        assert_eq!(input, b"rest");
    }
}
