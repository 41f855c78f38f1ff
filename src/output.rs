//! Destinations for rendered subnet configs.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Errors that can occur while writing rendered output
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to create output directory {path}")]
    CreateDir {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Subnet label '{label}' cannot be used as a file name")]
    InvalidFileName { label: String },
}

/// Where rendered documents go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Print every document to stdout, one after another
    Stdout,
    /// Write each document to a file named after its subnet label
    Directory(PathBuf),
}

impl OutputSink {
    /// Write one rendered document for the subnet `label`.
    pub fn write(&self, label: &str, content: &str) -> Result<(), OutputError> {
        match self {
            OutputSink::Stdout => Self::print(&mut io::stdout().lock(), content),
            OutputSink::Directory(dir) => {
                let path = Self::file_path(dir, label)?;
                if !dir.exists() {
                    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
                        path: dir.display().to_string(),
                        source,
                    })?;
                }
                fs::write(&path, content).map_err(|source| OutputError::Write {
                    path: path.display().to_string(),
                    source,
                })?;
                log::debug!("Wrote {}", path.display());
                Ok(())
            }
        }
    }

    /// Print one document followed by a newline
    fn print(out: &mut impl Write, content: &str) -> Result<(), OutputError> {
        writeln!(out, "{}", content).map_err(|source| OutputError::Write {
            path: "<stdout>".to_string(),
            source,
        })
    }

    /// Path a subnet's document is written to in directory mode
    pub fn file_path(dir: &Path, label: &str) -> Result<PathBuf, OutputError> {
        if label.is_empty() || label == "." || label == ".." || label.contains(['/', '\\']) {
            return Err(OutputError::InvalidFileName {
                label: label.to_string(),
            });
        }
        Ok(dir.join(label))
    }
}
