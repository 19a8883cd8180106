use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum NatusferaError {
    #[error("invalid iconic taxon: {0}")]
    #[diagnostic(help(
        "expected one of Chromista, Protozoa, Animalia, Mollusca, Arachnida, Insecta, Aves, \
         Mammalia, Amphibia, Reptilia, Actinopterygii, Fungi, Plantae, Unknown"
    ))]
    InvalidTaxon(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no project matches name: {0}")]
    ProjectNotFound(String),

    #[error("natusfera request failed: {0}")]
    Http(String),

    #[error("natusfera returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("natusfera returned malformed JSON: {0}")]
    Json(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
