use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use egui::Pos2;

use crate::annotation::{AnnotationStore, CORNERS};
use crate::error::{Result, ViewerError};

/// Where the points file goes: beside the image, or the working directory.
pub fn points_path(image_dir: Option<&Path>, file_name: &str) -> PathBuf {
    match image_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Write `x\ty` lines, six decimals each, for the given corners.
pub fn write_points(path: &Path, corners: &[Pos2]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for p in corners {
        writeln!(out, "{:.6}\t{:.6}", p.x, p.y)?;
    }
    out.flush()?;
    Ok(())
}

/// Save the four corners of a closed loop, overwriting any previous file.
pub fn export_corners(store: &AnnotationStore, image_dir: Option<&Path>, file_name: &str) -> Result<PathBuf> {
    let corners = store
        .corners()
        .ok_or(ViewerError::IncompleteLoop { count: store.len() })?;
    debug_assert_eq!(corners.len(), CORNERS);

    let path = points_path(image_dir, file_name);
    write_points(&path, corners)?;
    tracing::info!(path = %path.display(), "exported corner points");
    Ok(path)
}
