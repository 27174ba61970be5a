//! error taxonomy of the catalog pipeline.
//!
//! Per-record problems during edge normalization are not here : they are
//! logged and the record is skipped. Everything below aborts the run
//! before artifacts are written.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// a clustering threshold outside the percentage range
    #[error("configuration error : {name} = {value} must lie in [0,100]")]
    BadThreshold { name: &'static str, value: f64 },

    /// no fasta file found in the input directory
    #[error("no fasta file (*.fa, *.fasta, *.fna, possibly gzipped) found under {0:?}")]
    NoFastaFile(PathBuf),

    /// aggregation produced zero valid genomes
    #[error("no valid genome collected from {0:?}")]
    EmptyCorpus(PathBuf),

    /// same id seen twice in the length registry. Silent merging would corrupt the length sort
    #[error("duplicate genome id in registry : {0}")]
    DuplicateId(String),

    /// genome with null length
    #[error("genome {0} has length 0")]
    NullLength(String),

    /// a similarity record names a genome the registry never saw.
    /// Defaulting it to length 0 would bias representative selection, so we abort.
    #[error("similarity record references id absent from length registry : {0}")]
    RegistryMismatch(String),

    /// a representative id not found back in the corpus at extraction time
    #[error("representative id absent from corpus : {0}")]
    MissingRepresentative(String),

    /// external similarity engine could not be launched at all (not installed, not on PATH)
    #[error("could not launch command : {command}")]
    CommandLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// external similarity engine ran but exited with failure
    #[error("command failed with {status} : {command}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
    },

    /// fasta parsing failure
    #[error("fasta parse error on {path:?} : {message}")]
    Fasta { path: PathBuf, message: String },

    #[error("io error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
} // end of CatalogError

impl CatalogError {
    /// attach a path to a raw io error
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
} // end of impl CatalogError
