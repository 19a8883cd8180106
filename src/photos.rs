use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use crate::error::NatusferaError;
use crate::export::PhotoRow;
use crate::transport::Transport;

/// Downloads the medium-size image of every row into `directory`, creating it
/// when missing. Returns the absolute paths written, in row order.
pub fn download_photos<T: Transport + ?Sized>(
    transport: &T,
    rows: &[PhotoRow],
    directory: &Utf8Path,
) -> Result<Vec<Utf8PathBuf>, NatusferaError> {
    fs::create_dir_all(directory).map_err(|err| NatusferaError::Filesystem(err.to_string()))?;
    let directory = directory
        .canonicalize_utf8()
        .map_err(|err| NatusferaError::Filesystem(err.to_string()))?;

    let mut written = Vec::new();
    for row in rows {
        let Some(url) = row.medium_url.as_deref() else {
            debug!(photo_id = row.photo_id, "photo has no medium url");
            continue;
        };
        let Some(bytes) = transport.get_bytes(url)? else {
            warn!(%url, "photo download refused");
            continue;
        };
        let destination = directory.join(&row.path);
        fs::write(&destination, bytes).map_err(|err| NatusferaError::Filesystem(err.to_string()))?;
        written.push(destination);
    }
    Ok(written)
}
