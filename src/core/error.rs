use crate::core::pipeline::Step;
use std::env;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KoyukiError {
    #[error("Failed to write asset to {}", .path.display())]
    AssetWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to open key {path}")]
    KeyOpen {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to create key {path}")]
    KeyCreate {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to enumerate subkeys of {path}")]
    Enumerate {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to set default value of {path}")]
    SetValue {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Embedded asset missing: {0}")]
    AssetMissing(String),
    #[error("Hive file error: {0}")]
    HiveFile(String),
    #[error("Unsupported store: {0}")]
    UnsupportedStore(String),
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] env::VarError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to {step}")]
    Step {
        step: Step,
        #[source]
        source: Box<KoyukiError>,
    },
}

impl KoyukiError {
    /// Wrap this error with the pipeline step it originated from.
    pub fn at(self, step: Step) -> Self {
        KoyukiError::Step {
            step,
            source: Box::new(self),
        }
    }

    /// The pipeline step that failed, if the error has been attributed to one.
    pub fn step(&self) -> Option<Step> {
        match self {
            KoyukiError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}
