use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use failure::{format_err, ResultExt};
use zip::ZipArchive;

use crate::errors::*;

pub type FeatureName = String;

pub fn extract_artifacts_zip_archive<R: io::Read + io::Seek>(
    zip_reader: R,
    dest_path: &Path,
) -> Result<PathBuf> {
    let mut archive =
        ZipArchive::new(zip_reader).with_context(|_| "Could not read model artifacts zip data")?;
    if archive.len() == 0 {
        return Err(format_err!("Model artifacts archive is empty"));
    }
    for file_index in 0..archive.len() {
        let mut file = archive.by_index(file_index)?;
        let outpath = dest_path.join(file.sanitized_name());

        if file.name().ends_with('/') || file.name().ends_with('\\') {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(p) = outpath.parent() {
                if !p.exists() {
                    fs::create_dir_all(&p)?;
                }
            }
            let mut outfile = fs::File::create(&outpath)
                .with_context(|_| format!("Could not create file {:?}", outpath))?;
            io::copy(&mut file, &mut outfile)?;
        }
    }
    let (first_archive_file, first_is_dir) = {
        let first = archive.by_index(0)?;
        (first.sanitized_name(), first.name().ends_with('/'))
    };
    // flat archives hold the artifacts at their root
    if !first_is_dir && first_archive_file.components().count() == 1 {
        return Ok(dest_path.to_path_buf());
    }
    let artifacts_dir_path = first_archive_file
        .components()
        .find(|component| matches!(component, Component::Normal(_)))
        .ok_or_else(|| format_err!("Model artifacts archive is incorrect"))?
        .as_os_str();
    let artifacts_dir_name = artifacts_dir_path
        .to_str()
        .ok_or_else(|| format_err!("Model artifacts directory name is empty"))?;
    Ok(dest_path.join(artifacts_dir_name))
}
