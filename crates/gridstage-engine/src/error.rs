use gridstage_core::gateway::GatewayError;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes at the orchestrator boundary. Invalid command-line
/// input exits with clap's usage error code before the engine runs.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const RUN_PROCESSING: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const DB_ERROR: i32 = 3;
    pub const NO_RUN_DIR: i32 = 4;
    pub const TEST_FILE: i32 = 5;
}

#[derive(Error, Debug)]
pub enum StagingError {
    #[error("could not resolve run data: {0}")]
    Database(#[from] GatewayError),

    #[error("run directory '{0}' does not exist")]
    NoRunDirectory(PathBuf),

    #[error("failed to write test driver file '{path}': {source}")]
    TestFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build results archive '{path}': {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StagingError {
    /// Collapse the taxonomy to the orchestrator's exit codes. Anything not
    /// explicitly distinguished is the generic run-processing failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            StagingError::Database(_) => exit_codes::DB_ERROR,
            StagingError::NoRunDirectory(_) => exit_codes::NO_RUN_DIR,
            StagingError::TestFile { .. } => exit_codes::TEST_FILE,
            StagingError::Archive { .. } | StagingError::WalkDir(_) | StagingError::Io(_) => {
                exit_codes::RUN_PROCESSING
            }
        }
    }
}
