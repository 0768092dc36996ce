use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchCheckError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid benchmark json in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

impl BenchCheckError {
    pub fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        BenchCheckError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse<P: Into<PathBuf>>(path: P, source: serde_json::Error) -> Self {
        BenchCheckError::Parse {
            path: path.into(),
            source,
        }
    }
}
