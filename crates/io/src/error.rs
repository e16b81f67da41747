use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum IoError {
    /// File could not be opened (missing, permissions, not a workbook).
    Open { path: PathBuf, message: String },
    /// File opened but its content could not be read.
    Read { path: PathBuf, message: String },
    /// Workbook without any worksheet.
    NoSheets { path: PathBuf },
    /// Extension is neither a spreadsheet nor a delimited text format.
    UnsupportedFormat { path: PathBuf },
    /// Export file name does not follow `YYYYMMDD<name>_<index>_<count>.<ext>`.
    BatchName { name: String },
    /// Latest export batch is incomplete or has extra files.
    BatchCount { date: String, expected: usize, found: usize },
    /// Output could not be written.
    Write { path: PathBuf, message: String },
}

impl IoError {
    pub(crate) fn open(path: &Path, err: impl fmt::Display) -> Self {
        Self::Open { path: path.to_path_buf(), message: err.to_string() }
    }

    pub(crate) fn read(path: &Path, err: impl fmt::Display) -> Self {
        Self::Read { path: path.to_path_buf(), message: err.to_string() }
    }

    pub(crate) fn write(path: &Path, err: impl fmt::Display) -> Self {
        Self::Write { path: path.to_path_buf(), message: err.to_string() }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, message } => write!(f, "cannot open {}: {message}", path.display()),
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::NoSheets { path } => write!(f, "{} contains no sheets", path.display()),
            Self::UnsupportedFormat { path } => {
                write!(f, "{}: unsupported file type (expected xlsx, xls, xlsb, ods, csv or tsv)", path.display())
            }
            Self::BatchName { name } => {
                write!(f, "'{name}' is not a ledger export name (YYYYMMDD<name>_<index>_<count>)")
            }
            Self::BatchCount { date, expected, found } => {
                write!(f, "export batch {date}: expected {expected} file(s), found {found}")
            }
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
        }
    }
}

impl std::error::Error for IoError {}
