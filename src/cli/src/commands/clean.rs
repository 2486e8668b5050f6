//! `near clean`: remove the contract build output.

use crate::errors::CommandError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Removes `out_dir` and everything in it. A missing directory is fine.
pub async fn run<P: AsRef<Path>>(out_dir: P) -> Result<(), CommandError> {
    let out_dir = out_dir.as_ref();
    match tokio::fs::remove_dir_all(out_dir).await {
        Ok(()) => debug!("Removed {}", out_dir.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => debug!("{} does not exist", out_dir.display()),
        Err(e) => return Err(e.into()),
    }

    println!("Clean complete.");
    Ok(())
}
