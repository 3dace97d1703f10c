use ndarray_stats::errors::{EmptyInput, QuantileError};
use quick_error::quick_error;
use serde_json::Error as JsonError;
use std::io::Error as IOError;
use std::path::PathBuf;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum ConvertError {
        /// Invalid curv file: wrong magic number or unsupported layout.
        InvalidCurvFormat {
            display("Invalid Curv file")
        }

        /// Invalid annot file: the colortable uses a format version we cannot read.
        UnsupportedFsAnnotFormatVersion {
            display("Unsupported FreeSurfer annot file format version")
        }

        /// Invalid annot file: colortable sizes or structure ids out of range.
        InvalidFsAnnotFormat {
            display("Invalid FreeSurfer annot file")
        }

        /// The input directory given to the converter does not exist.
        MissingInputDir(path: PathBuf) {
            display("Input directory does not exist: {}", path.display())
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            display("I/O error: {}", err)
            source(err)
        }

        /// JSON serialization error
        Json(err: JsonError) {
            from()
            display("JSON error: {}", err)
            source(err)
        }

        /// Statistics over an empty set of values.
        Statistics(err: EmptyInput) {
            from()
            display("Statistics error: {}", err)
            source(err)
        }

        /// Quantile computation failed.
        Quantile(err: QuantileError) {
            from()
            display("Quantile error: {}", err)
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, ConvertError>;
