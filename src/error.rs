use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not determine the program directory")]
    WorkingDirectory(#[source] io::Error),

    #[error("could not list directory {}", path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("could not read metadata of {}", path.display())]
    ReadMetadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write report to {}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not encode CSV for {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("report file not found: {}", path.display())]
    MissingReport { path: PathBuf },

    #[error("could not parse timestamp '{value}' in {}", path.display())]
    ParseTimestamp {
        path: PathBuf,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
