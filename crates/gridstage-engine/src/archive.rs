use crate::error::StagingError;
use std::fs::File;
use std::io;
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Zip the whole tree under `root` into `dest`. `dest` normally lives inside
/// `root`; the in-progress archive itself is skipped so it does not swallow
/// its own partial bytes.
pub fn zip_dir_tree(root: &Path, dest: &Path) -> Result<(), StagingError> {
    let file = File::create(dest)?;
    let mut writer = ZipWriter::new(file);

    for entry in WalkDir::new(root) {
        let entry = entry?;
        let path = entry.path();
        if path == root || path == dest {
            continue;
        }

        let name = match path.strip_prefix(root) {
            Ok(rel) => rel.to_string_lossy().into_owned(),
            Err(_) => continue,
        };

        if entry.file_type().is_dir() {
            writer
                .add_directory(name, entry_options())
                .map_err(|source| StagingError::Archive {
                    path: dest.to_path_buf(),
                    source,
                })?;
        } else {
            writer
                .start_file(name, entry_options())
                .map_err(|source| StagingError::Archive {
                    path: dest.to_path_buf(),
                    source,
                })?;
            let mut src = File::open(path)?;
            io::copy(&mut src, &mut writer)?;
        }
    }

    let file = writer.finish().map_err(|source| StagingError::Archive {
        path: dest.to_path_buf(),
        source,
    })?;
    file.sync_all()?;

    Ok(())
}
